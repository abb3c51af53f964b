//! # Feedback Module
//!
//! The Feedback Sink is an external collaborator (haptics, a visual cue);
//! this module defines its trait contract and the session-scoped cooldown
//! gate that rate-limits triggers so rapid distinct matches do not produce
//! overlapping haptic bursts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Fire-and-forget haptic/visual cue. Must be safe to call redundantly.
pub trait FeedbackSink: Send + Sync {
    fn trigger(&self);
}

/// A sink that does nothing, for flows with feedback disabled
#[derive(Debug, Default)]
pub struct NullSink;

impl FeedbackSink for NullSink {
    fn trigger(&self) {}
}

/// Test double counting how many times feedback actually fired
#[derive(Debug, Default)]
pub struct CountingSink {
    count: AtomicUsize,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl FeedbackSink for CountingSink {
    fn trigger(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Cooldown-gated wrapper around a feedback sink.
///
/// After a trigger, further triggers are swallowed until the fixed cooldown
/// interval elapses, regardless of match state. The gate itself is not
/// synchronized; callers serialize access through the session lock.
pub struct CooldownGate {
    sink: Arc<dyn FeedbackSink>,
    cooldown: Duration,
    last_fired: Option<Instant>,
}

impl CooldownGate {
    pub fn new(sink: Arc<dyn FeedbackSink>, cooldown: Duration) -> Self {
        Self {
            sink,
            cooldown,
            last_fired: None,
        }
    }

    /// Trigger the sink unless still inside the cooldown window.
    ///
    /// Returns whether the sink actually fired.
    pub fn fire(&mut self) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last_fired {
            if now.duration_since(last) < self.cooldown {
                trace!("Feedback swallowed by cooldown window");
                return false;
            }
        }
        self.last_fired = Some(now);
        self.sink.trigger();
        true
    }

    /// Re-arm the gate, used on retake so a fresh session can alert at once
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
