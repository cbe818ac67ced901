use crate::enrichment::types::{
    Clock, EnrichmentError, EnrichmentSuggestion, ProposedTask, RescoreRequest, RescoreResult,
    SuggestRequest, SystemClock,
};
use crate::task::Task;
use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Remote oracle that turns free text into task suggestions and rescoring
pub trait EnrichmentService: Send + Sync {
    /// Suggest description, priority, deadline and category for one task
    fn suggest(
        &self,
        request: SuggestRequest,
    ) -> BoxFuture<'_, Result<EnrichmentSuggestion, EnrichmentError>>;

    /// Recompute priorities for tasks competing with a proposed task
    fn rescore(
        &self,
        request: RescoreRequest,
    ) -> BoxFuture<'_, Result<Vec<RescoreResult>, EnrichmentError>>;

    /// Get service name/identifier
    fn service_name(&self) -> &'static str;
}

/// Contract wrapper used by the workflows.
///
/// Stamps every request with the invocation-time date and bounds each call
/// with a timeout; expiry is reported like any transport failure. No retries.
#[derive(Clone)]
pub struct EnrichmentClient {
    service: Arc<dyn EnrichmentService>,
    clock: Arc<dyn Clock>,
    timeout: Duration,
}

impl EnrichmentClient {
    pub fn new(service: Arc<dyn EnrichmentService>, timeout: Duration) -> Self {
        Self {
            service,
            clock: Arc::new(SystemClock),
            timeout,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub async fn suggest(
        &self,
        title: &str,
        description: &str,
        context: &str,
    ) -> Result<EnrichmentSuggestion, EnrichmentError> {
        let request =
            SuggestRequest::new(title, description, context, self.clock.request_date());
        self.bounded("suggest", self.service.suggest(request)).await
    }

    pub async fn rescore(
        &self,
        new_task: ProposedTask,
        conflicting: Vec<Task>,
    ) -> Result<Vec<RescoreResult>, EnrichmentError> {
        let request = RescoreRequest {
            new_task,
            current_tasks: conflicting,
            date: self.clock.request_date(),
        };
        self.bounded("rescore", self.service.rescore(request)).await
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = Result<T, EnrichmentError>>,
    ) -> Result<T, EnrichmentError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "{} via {} timed out after {:?}",
                    operation,
                    self.service.service_name(),
                    self.timeout
                );
                Err(EnrichmentError::Timeout(format!(
                    "{} did not complete within {:?}",
                    operation, self.timeout
                )))
            }
        }
    }
}

impl std::fmt::Debug for EnrichmentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnrichmentClient")
            .field("service", &self.service.service_name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
