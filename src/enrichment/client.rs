//! HTTP client for the AI enrichment endpoints.
//!
//! Implements [`EnrichmentService`] against the backend's `ai/suggest/` and
//! `ai/rescore/` endpoints. The backend relays raw model output, so replies may
//! arrive wrapped in Markdown code fences or double-encoded as a JSON string;
//! both are unwrapped before parsing.
//!
//! The client never retries. Timeouts and transport failures map to
//! [`EnrichmentError::Timeout`] and [`EnrichmentError::Unavailable`].

use crate::config::EnrichmentConfig;
use crate::enrichment::service::EnrichmentService;
use crate::enrichment::types::{
    EnrichmentError, EnrichmentSuggestion, RescoreRequest, RescoreResult, SuggestRequest,
};
use crate::store::http::with_trailing_slash;
use futures::future::BoxFuture;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// REST-backed enrichment service
#[derive(Debug, Clone)]
pub struct HttpEnrichmentClient {
    client: Client,
    base_url: Url,
}

impl HttpEnrichmentClient {
    pub fn new(config: &EnrichmentConfig) -> Result<Self, EnrichmentError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EnrichmentError::Configuration(e.to_string()))?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            EnrichmentError::Configuration(format!(
                "Invalid base URL '{}': {}",
                config.base_url, e
            ))
        })?;

        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, EnrichmentError> {
        let url = self.base_url.join(path).map_err(|e| {
            EnrichmentError::Configuration(format!("Invalid endpoint '{}': {}", path, e))
        })?;

        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            warn!("Enrichment endpoint {} returned {}", path, status);
            return Err(EnrichmentError::Service {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(text)
    }
}

impl EnrichmentService for HttpEnrichmentClient {
    fn suggest(
        &self,
        request: SuggestRequest,
    ) -> BoxFuture<'_, Result<EnrichmentSuggestion, EnrichmentError>> {
        Box::pin(async move {
            debug!("Requesting enrichment for '{}'", request.title);
            let body = self.post("ai/suggest/", &request).await?;
            parse_model_json(&body)
        })
    }

    fn rescore(
        &self,
        request: RescoreRequest,
    ) -> BoxFuture<'_, Result<Vec<RescoreResult>, EnrichmentError>> {
        Box::pin(async move {
            debug!(
                "Requesting rescore of {} tasks against '{}'",
                request.current_tasks.len(),
                request.new_task.title
            );
            let body = self.post("ai/rescore/", &request).await?;

            let value = match parse_model_json::<serde_json::Value>(&body)? {
                serde_json::Value::String(inner) => parse_model_json(&inner)?,
                value => value,
            };
            if !value.is_array() {
                return Err(EnrichmentError::MalformedResponse(
                    "Expected a JSON array of rescored tasks".to_string(),
                ));
            }
            serde_json::from_value(value)
                .map_err(|e| EnrichmentError::MalformedResponse(e.to_string()))
        })
    }

    fn service_name(&self) -> &'static str {
        "http"
    }
}

/// Strip a surrounding Markdown code fence, if any
pub(crate) fn extract_json_payload(content: &str) -> &str {
    let trimmed = content.trim();

    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };

    let after_fence = &trimmed[start + 3..];
    let after_label = after_fence.strip_prefix("json").unwrap_or(after_fence);
    match after_label.find("```") {
        Some(end) => after_label[..end].trim(),
        None => after_label.trim(),
    }
}

/// Parse model output, tolerating code fences and double-encoded JSON
pub(crate) fn parse_model_json<T: DeserializeOwned>(content: &str) -> Result<T, EnrichmentError> {
    let payload = extract_json_payload(content);

    match serde_json::from_str::<T>(payload) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            if let Ok(unescaped) = serde_json::from_str::<String>(payload) {
                return parse_model_json_once(extract_json_payload(&unescaped), &first_err);
            }
            Err(EnrichmentError::MalformedResponse(format!(
                "{}. Content: {}",
                first_err,
                payload.chars().take(200).collect::<String>()
            )))
        }
    }
}

fn parse_model_json_once<T: DeserializeOwned>(
    payload: &str,
    first_err: &serde_json::Error,
) -> Result<T, EnrichmentError> {
    serde_json::from_str(payload).map_err(|e| {
        EnrichmentError::MalformedResponse(format!(
            "{}. Original error: {}. Content: {}",
            e,
            first_err,
            payload.chars().take(200).collect::<String>()
        ))
    })
}
