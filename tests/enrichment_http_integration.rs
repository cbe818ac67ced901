use chrono::NaiveDate;
use serde_json::json;
use smart_todo::config::EnrichmentConfig;
use smart_todo::enrichment::{
    EnrichmentClient, EnrichmentError, FixedClock, HttpEnrichmentClient, ProposedTask,
};
use smart_todo::task::Task;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> EnrichmentClient {
    let service = HttpEnrichmentClient::new(&EnrichmentConfig {
        base_url: format!("{}/api/", server.uri()),
        timeout_secs: 5,
    })
    .expect("Should build enrichment client");

    EnrichmentClient::new(Arc::new(service), Duration::from_secs(5))
        .with_clock(Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 7, 6).unwrap())))
}

fn conflicting_task() -> Task {
    Task {
        id: 8,
        title: "Finish slides".to_string(),
        description: "For Monday".to_string(),
        priority_score: 5,
        deadline: NaiveDate::from_ymd_opt(2025, 7, 7),
        status: 20,
        category: Some("Work".to_string()),
    }
}

fn proposed() -> ProposedTask {
    ProposedTask {
        title: "Client call".to_string(),
        description: "Prepare numbers".to_string(),
        context: String::new(),
        deadline: NaiveDate::from_ymd_opt(2025, 7, 8),
    }
}

#[tokio::test]
async fn test_suggest_sends_date_and_unwraps_fence() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/suggest/"))
        .and(body_partial_json(json!({
            "title": "Client call",
            "context": "Email from ACME",
            "current_date": "2025-07-06",
            "current_day": "Sunday"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "```json\n{\"enhanced_description\": \"Prepare Q3 numbers\", \
             \"priority_score\": \"8\", \"suggested_deadline\": \"2025-07-08\", \
             \"suggested_category\": \"Work\"}\n```",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let suggestion = client_for(&server)
        .suggest("Client call", "Prepare numbers", "Email from ACME")
        .await
        .expect("Should parse fenced suggestion");

    assert_eq!(suggestion.priority_score, Some(8));
    assert_eq!(suggestion.suggested_deadline, NaiveDate::from_ymd_opt(2025, 7, 8));
    assert_eq!(suggestion.suggested_category.as_deref(), Some("Work"));
}

#[tokio::test]
async fn test_rescore_sends_conflicting_tasks_with_ids() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/rescore/"))
        .and(body_partial_json(json!({
            "new_task": {"title": "Client call", "deadline": "2025-07-08"},
            "current_tasks": [{"id": 8, "title": "Finish slides"}],
            "current_day": "Sunday"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 8, "title": "Finish slides", "new_priority_score": 9},
            {"title": "Client call", "new_priority_score": "7", "recommended_category": "Work"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let results = client_for(&server)
        .rescore(proposed(), vec![conflicting_task()])
        .await
        .expect("Should parse rescore results");

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, Some(8));
    assert_eq!(results[0].new_priority_score, 9);
    assert_eq!(results[1].id, None);
    assert_eq!(results[1].new_priority_score, 7);
}

#[tokio::test]
async fn test_rescore_rejects_non_array() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/rescore/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": "Finish slides", "new_priority_score": 9
        })))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .rescore(proposed(), vec![conflicting_task()])
        .await;

    assert!(matches!(result, Err(EnrichmentError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_rescore_accepts_double_encoded_array() {
    let server = MockServer::start().await;
    let inner = json!([{"title": "Finish slides", "new_priority_score": 4}]).to_string();
    Mock::given(method("POST"))
        .and(path("/api/ai/rescore/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(inner)))
        .mount(&server)
        .await;

    let results = client_for(&server)
        .rescore(proposed(), vec![conflicting_task()])
        .await
        .expect("Should unwrap double-encoded array");

    assert_eq!(results[0].new_priority_score, 4);
}

#[tokio::test]
async fn test_service_error_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/suggest/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model overloaded"))
        .mount(&server)
        .await;

    let result = client_for(&server).suggest("Anything", "", "").await;

    match result {
        Err(EnrichmentError::Service { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "model overloaded");
        }
        other => panic!("Expected service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ai/suggest/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"priority_score": 5}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let service = HttpEnrichmentClient::new(&EnrichmentConfig {
        base_url: format!("{}/api/", server.uri()),
        timeout_secs: 30,
    })
    .expect("Should build enrichment client");
    let client = EnrichmentClient::new(Arc::new(service), Duration::from_millis(200));

    let result = client.suggest("Slow", "", "").await;
    assert!(matches!(result, Err(EnrichmentError::Timeout(_))));
}
