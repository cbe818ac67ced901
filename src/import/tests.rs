#[cfg(test)]
mod tests {
    use crate::config::ImportConfig;
    use crate::enrichment::*;
    use crate::import::*;
    use crate::store::InMemoryTaskStore;
    use chrono::NaiveDate;
    use std::sync::Arc;
    use std::time::Duration;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn pipeline(
        service: ScriptedEnrichment,
        concurrency: usize,
    ) -> (Arc<InMemoryTaskStore>, Arc<ScriptedEnrichment>, ImportPipeline) {
        let store = Arc::new(InMemoryTaskStore::new());
        let service = Arc::new(service);
        let client = EnrichmentClient::new(service.clone(), Duration::from_secs(5))
            .with_clock(Arc::new(FixedClock(date("2025-07-06"))));
        let pipeline = ImportPipeline::new(store.clone(), client, &ImportConfig { concurrency });
        (store, service, pipeline)
    }

    fn complete_record(title: &str) -> TaskRecord {
        TaskRecord {
            priority_score: Some(7),
            deadline: Some(date("2025-07-20")),
            status: Some(30),
            category: Some("Home".to_string()),
            ..TaskRecord::new(title)
        }
    }

    #[test]
    fn test_record_completeness() {
        assert!(complete_record("A").is_complete());

        let mut no_deadline = complete_record("B");
        no_deadline.deadline = None;
        assert!(!no_deadline.is_complete());

        let mut zero_priority = complete_record("C");
        zero_priority.priority_score = Some(0);
        assert!(!zero_priority.is_complete());
    }

    #[test]
    fn test_record_category_object_collapses() {
        let record: TaskRecord = serde_json::from_str(
            r#"{"title": "T", "category": {"id": 4, "name": "Work", "usage_frequency": 3}}"#,
        )
        .unwrap();
        assert_eq!(record.category.as_deref(), Some("Work"));
    }

    #[tokio::test]
    async fn test_mixed_type_records_all_import() {
        let records: Vec<TaskRecord> = serde_json::from_str(
            r#"[
                {"title": "Ok", "priority_score": 8, "deadline": "2025-07-20", "status": 10},
                {"title": "Str", "priority_score": "7", "deadline": "2025-07-21", "status": "40"},
                {"title": "Bad", "priority_score": 15, "deadline": 20250722, "status": -5},
                {"title": "Junk", "priority_score": "high", "deadline": "next week", "status": null}
            ]"#,
        )
        .unwrap();

        assert_eq!(records[1].priority_score, Some(7));
        assert_eq!(records[1].status, Some(40));
        assert!(records[1].is_complete());
        assert_eq!(records[2].priority_score, None);
        assert_eq!(records[2].deadline, None);
        assert_eq!(records[2].status, None);
        assert!(!records[3].is_complete());

        let (_store, service, pipeline) = pipeline(ScriptedEnrichment::default(), 1);
        let summary = pipeline.import_batch(records).await;

        assert_eq!(summary.status(), ImportStatus::Succeeded);
        assert_eq!(summary.created.len(), 4);
        assert_eq!(summary.created[1].priority_score, 7);
        assert_eq!(summary.created[1].status, 40);
        let enriched: Vec<String> = service
            .suggest_requests()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(enriched, vec!["Bad".to_string(), "Junk".to_string()]);
    }

    #[tokio::test]
    async fn test_complete_record_skips_enrichment() {
        let (store, service, pipeline) = pipeline(ScriptedEnrichment::default(), 1);

        let summary = pipeline.import_batch(vec![complete_record("Ready")]).await;

        assert_eq!(summary.status(), ImportStatus::Succeeded);
        assert!(service.suggest_requests().is_empty());
        let task = store.get(summary.created[0].id).unwrap();
        assert_eq!(task.priority_score, 7);
        assert_eq!(task.status, 30);
        assert_eq!(task.category.as_deref(), Some("Home"));
    }

    #[tokio::test]
    async fn test_incomplete_record_uses_suggestion_defaults() {
        let (_store, service, pipeline) = pipeline(ScriptedEnrichment::default(), 1);
        let record = TaskRecord {
            description: "Raw".to_string(),
            context: "From a note".to_string(),
            ..TaskRecord::new("Sparse")
        };

        let summary = pipeline.import_batch(vec![record]).await;

        let task = &summary.created[0];
        assert_eq!(task.priority_score, 3);
        assert_eq!(task.category.as_deref(), Some("Uncategorized"));
        assert_eq!(task.deadline, None);
        assert_eq!(task.description, "Raw");
        assert_eq!(task.status, 0);

        let requests = service.suggest_requests();
        assert_eq!(requests[0].context, "From a note");
        assert_eq!(requests[0].date.current_day, "Sunday");
    }

    #[tokio::test]
    async fn test_failing_record_does_not_abort_batch() {
        let service = ScriptedEnrichment::new(EnrichmentSuggestion {
            priority_score: Some(8),
            suggested_deadline: Some(date("2025-07-08")),
            ..Default::default()
        })
        .on_suggest(
            "Broken",
            Err(EnrichmentError::Timeout("suggest".to_string())),
        );
        let (store, _service, pipeline) = pipeline(service, 1);

        let summary = pipeline
            .import_batch(vec![
                TaskRecord::new("First"),
                TaskRecord::new("Broken"),
                TaskRecord::new(""),
                complete_record("Last"),
            ])
            .await;

        assert_eq!(summary.status(), ImportStatus::PartiallySucceeded);
        assert_eq!(summary.total(), 4);
        assert_eq!(summary.skipped, vec![2]);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].index, 1);
        assert_eq!(summary.failed[0].title, "Broken");
        let titles: Vec<&str> = summary.created.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Last"]);
        assert_eq!(summary.created[0].priority_score, 8);
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_all_failing_reports_failed() {
        let (store, _service, pipeline) = pipeline(ScriptedEnrichment::default(), 1);
        store.fail_creates(true);

        let summary = pipeline
            .import_batch(vec![complete_record("A"), TaskRecord::new("B")])
            .await;

        assert_eq!(summary.status(), ImportStatus::Failed);
        assert!(matches!(summary.failed[0].error, ImportError::Store(_)));
    }

    #[tokio::test]
    async fn test_concurrent_import_keeps_input_order() {
        let (store, service, pipeline) = pipeline(ScriptedEnrichment::default(), 4);
        let records: Vec<TaskRecord> = (0..10)
            .map(|i| TaskRecord::new(format!("Task {}", i)))
            .collect();

        let summary = pipeline.import_batch(records).await;

        assert_eq!(summary.created.len(), 10);
        for (i, task) in summary.created.iter().enumerate() {
            assert_eq!(task.title, format!("Task {}", i));
        }
        assert_eq!(service.suggest_requests().len(), 10);
        assert_eq!(store.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_batch_succeeds() {
        let (_store, _service, pipeline) = pipeline(ScriptedEnrichment::default(), 1);
        let summary = pipeline.import_batch(Vec::new()).await;
        assert_eq!(summary.status(), ImportStatus::Succeeded);
        assert_eq!(summary.total(), 0);
    }
}
