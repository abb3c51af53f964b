#[cfg(test)]
mod tests {
    use allergen_scanner::dictionary::{
        AllergenCategory, AllergenDictionary, AllergenWord, SelectedAllergens,
    };
    use allergen_scanner::feedback::CountingSink;
    use allergen_scanner::session::{
        create_shared_session, run_recognition_intake, RecognitionEvent, RecognitionKind,
        ScanSessionController, ScanState, StatusMessage,
    };
    use allergen_scanner::ScannerConfig;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn dairy_dictionary() -> Arc<AllergenDictionary> {
        Arc::new(AllergenDictionary::from_categories(&[AllergenCategory {
            name: "Dairy".to_string(),
            icon: String::new(),
            words: vec![AllergenWord {
                id: "milk".to_string(),
                canonical_term: "milk".to_string(),
                synonyms: vec!["dairy".to_string()],
            }],
        }]))
    }

    fn session_with_sink(sink: Arc<CountingSink>) -> ScanSessionController {
        ScanSessionController::new(
            ScannerConfig::default(),
            dairy_dictionary(),
            SelectedAllergens::from_terms(["milk"]),
            sink,
        )
        .unwrap()
    }

    fn lines(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_end_to_end_photo_with_selected_allergen() {
        // dictionary = {Dairy: ["milk", synonyms:["dairy"]]}; selected = ["milk"]
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink.clone());
        let generation = session.start_scan();

        session.ingest_photo(generation, &lines(&["Ingredients:", "water sugar milk salt"]));

        assert_eq!(session.detected_matches().len(), 1);
        assert_eq!(session.detected_matches()[0].category, "Dairy");
        assert_eq!(session.detected_matches()[0].term, "milk");
        assert_ne!(session.status(), StatusMessage::AllergenFree);
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_end_to_end_photo_allergen_free() {
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink.clone());
        let generation = session.start_scan();

        session.ingest_photo(generation, &lines(&["Ingredients:", "water sugar salt"]));

        assert!(session.detected_matches().is_empty());
        assert_eq!(session.status(), StatusMessage::AllergenFree);
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_end_to_end_photo_without_ingredients_keyword() {
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink);
        let generation = session.start_scan();

        session.ingest_photo(generation, &lines(&["water sugar salt"]));

        assert!(session.detected_matches().is_empty());
        assert_eq!(session.status(), StatusMessage::IngredientsNotFound);
    }

    #[test]
    fn test_live_feed_deduplicates_across_frames() {
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink.clone());
        let generation = session.start_scan();

        // The same label stays in view for several frames
        for _ in 0..5 {
            session.ingest_frame(generation, &lines(&["Ingredients: milk, sugar"]));
        }

        assert_eq!(session.detected_matches().len(), 1);
        assert_eq!(sink.count(), 1);
        assert_eq!(session.state(), ScanState::IngredientsDetected);
    }

    #[test]
    fn test_synonym_and_canonical_collapse_to_one_alert() {
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink.clone());
        let generation = session.start_scan();

        // "milk" and its synonym "dairy" in the same frame
        session.ingest_frame(generation, &lines(&["contains milk and dairy"]));

        assert_eq!(session.detected_matches().len(), 1);
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_retake_allows_fresh_alerts() {
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink.clone());
        let generation = session.start_scan();
        session.ingest_frame(generation, &lines(&["milk"]));
        assert_eq!(sink.count(), 1);

        let retaken = session.retake();
        assert!(session.detected_matches().is_empty());
        assert_eq!(session.status(), StatusMessage::Scanning);

        session.ingest_frame(retaken, &lines(&["milk"]));
        assert_eq!(session.detected_matches().len(), 1);
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn test_stale_results_after_retake_are_discarded() {
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink.clone());
        let old_generation = session.start_scan();
        session.retake();

        // A callback from the discarded attempt lands late
        session.ingest_frame(old_generation, &lines(&["milk"]));
        assert!(session.detected_matches().is_empty());
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_term_leaving_view_can_realert() {
        let sink = Arc::new(CountingSink::new());
        let mut session = session_with_sink(sink.clone());
        let generation = session.start_scan();

        session.ingest_frame(generation, &lines(&["milk"]));
        assert_eq!(sink.count(), 1);

        // Term disappears for a frame, then reappears after the cooldown
        session.ingest_frame(generation, &lines(&["water sugar"]));
        std::thread::sleep(ScannerConfig::default().feedback_cooldown());
        session.ingest_frame(generation, &lines(&["milk"]));

        assert_eq!(session.detected_matches().len(), 2);
        assert_eq!(sink.count(), 2);
    }

    #[test]
    fn test_cooldown_limits_rapid_distinct_alerts() {
        let dictionary = Arc::new(AllergenDictionary::from_categories(&[AllergenCategory {
            name: "Dairy".to_string(),
            icon: String::new(),
            words: vec![
                AllergenWord {
                    id: "milk".to_string(),
                    canonical_term: "milk".to_string(),
                    synonyms: vec![],
                },
                AllergenWord {
                    id: "whey".to_string(),
                    canonical_term: "whey".to_string(),
                    synonyms: vec![],
                },
            ],
        }]));
        let sink = Arc::new(CountingSink::new());
        let mut session = ScanSessionController::new(
            ScannerConfig::default(),
            dictionary,
            SelectedAllergens::from_terms(["milk", "whey"]),
            sink.clone(),
        )
        .unwrap();
        let generation = session.start_scan();

        // Two distinct terms in one frame: both recorded, one haptic burst
        session.ingest_frame(generation, &lines(&["milk whey"]));
        assert_eq!(session.detected_matches().len(), 2);
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_async_intake_applies_events_in_order() {
        let sink = Arc::new(CountingSink::new());
        let shared = create_shared_session(session_with_sink(sink.clone()));
        let generation = shared.lock().start_scan();

        let (tx, rx) = mpsc::channel(16);
        let intake = tokio::spawn(run_recognition_intake(Arc::clone(&shared), rx));

        for frame in ["water sugar", "Ingredients: water", "Ingredients: milk"] {
            tx.send(RecognitionEvent {
                generation,
                kind: RecognitionKind::Frame,
                lines: lines(&[frame]),
            })
            .await
            .unwrap();
        }
        tx.send(RecognitionEvent {
            generation,
            kind: RecognitionKind::Photo,
            lines: lines(&["Ingredients: water sugar milk salt"]),
        })
        .await
        .unwrap();

        drop(tx);
        intake.await.unwrap();

        let session = shared.lock();
        assert_eq!(session.state(), ScanState::AllergenChecked);
        assert_eq!(session.detected_matches().len(), 1);
        assert!(session.has_ingredient_marker());
        assert_eq!(sink.count(), 1);
    }

    #[tokio::test]
    async fn test_async_intake_discards_stale_generation() {
        let sink = Arc::new(CountingSink::new());
        let shared = create_shared_session(session_with_sink(sink.clone()));
        let old_generation = shared.lock().start_scan();
        let new_generation = shared.lock().retake();

        let (tx, rx) = mpsc::channel(16);
        let intake = tokio::spawn(run_recognition_intake(Arc::clone(&shared), rx));

        // Stale event first, then a current one
        tx.send(RecognitionEvent {
            generation: old_generation,
            kind: RecognitionKind::Frame,
            lines: lines(&["milk"]),
        })
        .await
        .unwrap();
        tx.send(RecognitionEvent {
            generation: new_generation,
            kind: RecognitionKind::Frame,
            lines: lines(&["water sugar"]),
        })
        .await
        .unwrap();

        drop(tx);
        intake.await.unwrap();

        let session = shared.lock();
        assert!(session.detected_matches().is_empty());
        assert_eq!(sink.count(), 0);
    }
}
