#[cfg(test)]
mod tests {
    use crate::store::http::with_trailing_slash;
    use crate::store::*;
    use crate::task::{NewTask, Task};

    fn existing(id: i64, title: &str) -> Task {
        Task {
            id,
            title: title.to_string(),
            description: String::new(),
            priority_score: 4,
            deadline: None,
            status: 0,
            category: None,
        }
    }

    #[tokio::test]
    async fn test_memory_store_assigns_ids_after_seeded_tasks() {
        let store = InMemoryTaskStore::with_tasks(vec![existing(5, "Seed")]);

        let created = store
            .create_task(NewTask::new("Fresh", "", 6, None, None))
            .await
            .unwrap();

        assert_eq!(created.id, 6);
        assert_eq!(created.category.as_deref(), Some("Uncategorized"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_memory_store_lists_newest_first() {
        let store = InMemoryTaskStore::with_tasks(vec![existing(1, "Old"), existing(2, "New")]);

        let titles: Vec<String> = store
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();

        assert_eq!(titles, vec!["New".to_string(), "Old".to_string()]);
    }

    #[tokio::test]
    async fn test_memory_store_update_and_delete_missing() {
        let store = InMemoryTaskStore::new();

        let update = store.update_task(existing(9, "Ghost")).await;
        assert!(matches!(update, Err(StoreError::NotFound(9))));

        let delete = store.delete_task(9).await;
        assert!(matches!(delete, Err(StoreError::NotFound(9))));
    }

    #[tokio::test]
    async fn test_memory_store_injected_failures() {
        let store = InMemoryTaskStore::with_tasks(vec![existing(1, "A")]);
        store.fail_update_of(1);
        store.fail_delete_of(1);

        assert!(matches!(
            store.update_task(existing(1, "A2")).await,
            Err(StoreError::Rejected { status: 500, .. })
        ));
        assert!(store.delete_task(1).await.is_err());
        assert_eq!(store.get(1).map(|t| t.title), Some("A".to_string()));

        store.fail_creates(true);
        assert!(store.create_task(NewTask::new("B", "", 3, None, None)).await.is_err());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_memory_context_store() {
        let store = InMemoryTaskStore::new();

        store
            .create_context("Dentist moved to Friday".to_string(), SourceType::WhatsApp)
            .await
            .unwrap();
        store
            .create_context("Report due next week".to_string(), SourceType::Email)
            .await
            .unwrap();

        let entries = store.list_contexts().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].content, "Report due next week");
    }

    #[test]
    fn test_source_type_wire_names() {
        assert_eq!(
            serde_json::to_value(SourceType::WhatsApp).unwrap(),
            serde_json::json!("whatsapp")
        );
        assert_eq!("Email".parse::<SourceType>(), Ok(SourceType::Email));
        assert!("sms".parse::<SourceType>().is_err());
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let url = url::Url::parse("http://localhost:8000/api").unwrap();
        assert_eq!(with_trailing_slash(url).as_str(), "http://localhost:8000/api/");

        let url = url::Url::parse("http://localhost:8000/api/").unwrap();
        assert_eq!(with_trailing_slash(url).as_str(), "http://localhost:8000/api/");
    }
}
