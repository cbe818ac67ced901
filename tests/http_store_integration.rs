use serde_json::json;
use smart_todo::config::StoreConfig;
use smart_todo::store::{ContextStore, HttpTaskStore, SourceType, StoreError, TaskStore};
use smart_todo::task::NewTask;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn store_for(server: &MockServer) -> HttpTaskStore {
    HttpTaskStore::new(&StoreConfig {
        base_url: format!("{}/api", server.uri()),
        timeout_secs: 5,
    })
    .expect("Should build store client")
}

#[tokio::test]
async fn test_list_tasks_collapses_category_objects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 2,
                "title": "Write report",
                "description": "Q3 numbers",
                "priority_score": 7,
                "deadline": "2025-01-10",
                "status": 40,
                "category": {"id": 1, "name": "Work", "usage_frequency": 5}
            },
            {
                "id": 1,
                "title": "Buy milk",
                "priority_score": 2,
                "deadline": null,
                "status": 0,
                "category": "Home"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = store_for(&server)
        .list_tasks()
        .await
        .expect("Should list tasks");

    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].category.as_deref(), Some("Work"));
    assert_eq!(tasks[1].category.as_deref(), Some("Home"));
    assert_eq!(tasks[1].deadline, None);
    assert_eq!(tasks[1].description, "");
}

#[tokio::test]
async fn test_create_task_posts_category_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/create/"))
        .and(body_partial_json(json!({
            "title": "Call Bob",
            "priority_score": 6,
            "deadline": "2025-02-01",
            "status": 0,
            "category": "Social"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 11,
            "title": "Call Bob",
            "description": "About the offer",
            "priority_score": 6,
            "deadline": "2025-02-01",
            "status": 0,
            "category": {"id": 3, "name": "Social", "usage_frequency": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let new_task = NewTask::new(
        "Call Bob",
        "About the offer",
        6,
        chrono::NaiveDate::from_ymd_opt(2025, 2, 1),
        Some("Social".to_string()),
    );
    let created = store_for(&server)
        .create_task(new_task)
        .await
        .expect("Should create task");

    assert_eq!(created.id, 11);
    assert_eq!(created.category.as_deref(), Some("Social"));
}

#[tokio::test]
async fn test_update_missing_task_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/tasks/99/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let task = NewTask::new("Ghost", "", 5, None, None).into_task(99);
    let result = store_for(&server).update_task(task).await;

    assert!(matches!(result, Err(StoreError::NotFound(99))));
}

#[tokio::test]
async fn test_server_error_is_rejected_with_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/4/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database locked"))
        .mount(&server)
        .await;

    let result = store_for(&server).delete_task(4).await;

    match result {
        Err(StoreError::Rejected { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "database locked");
        }
        other => panic!("Expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_json_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = store_for(&server).list_tasks().await;
    assert!(matches!(result, Err(StoreError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_unreachable_store_is_network_error() {
    let store = HttpTaskStore::new(&StoreConfig {
        base_url: "http://127.0.0.1:9/api/".to_string(),
        timeout_secs: 2,
    })
    .expect("Should build store client");

    let result = store.list_tasks().await;
    assert!(matches!(
        result,
        Err(StoreError::Network(_)) | Err(StoreError::Timeout(_))
    ));
}

#[tokio::test]
async fn test_context_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/context/create/"))
        .and(body_partial_json(json!({
            "content": "Meeting moved to Friday",
            "source_type": "whatsapp"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5,
            "content": "Meeting moved to Friday",
            "source_type": "whatsapp",
            "timestamp": "2025-01-06T09:30:00Z",
            "processed_insights": ""
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/context/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 5,
                "content": "Meeting moved to Friday",
                "source_type": "whatsapp",
                "timestamp": "2025-01-06T09:30:00Z",
                "processed_insights": "Reschedule"
            }
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let entry = store
        .create_context("Meeting moved to Friday".to_string(), SourceType::WhatsApp)
        .await
        .expect("Should create context");
    assert_eq!(entry.id, 5);

    let entries = store.list_contexts().await.expect("Should list contexts");
    assert_eq!(entries[0].processed_insights, "Reschedule");
    assert_eq!(entries[0].source_type, SourceType::WhatsApp);
}

#[tokio::test]
async fn test_list_categories() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Work", "usage_frequency": 12},
            {"id": 2, "name": "Home", "usage_frequency": 3}
        ])))
        .mount(&server)
        .await;

    let categories = store_for(&server)
        .list_categories()
        .await
        .expect("Should list categories");

    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Work", "Home"]);
    assert_eq!(categories[0].usage_frequency, 12);
}
