use crate::enrichment::service::EnrichmentService;
use crate::enrichment::types::{
    EnrichmentError, EnrichmentSuggestion, RescoreRequest, RescoreResult, SuggestRequest,
};
use dashmap::DashMap;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Enrichment service that answers from a script and records every request.
///
/// Suggestions are looked up by title, falling back to a default. Used for
/// offline runs and by the workflow tests. The script is fixed once built;
/// requests are keyed by arrival sequence so they read back in call order.
#[derive(Debug, Default)]
pub struct ScriptedEnrichment {
    default_suggestion: EnrichmentSuggestion,
    suggestions: HashMap<String, Result<EnrichmentSuggestion, EnrichmentError>>,
    rescore_response: Option<Result<Vec<RescoreResult>, EnrichmentError>>,
    sequence: AtomicUsize,
    suggest_requests: DashMap<usize, SuggestRequest>,
    rescore_requests: DashMap<usize, RescoreRequest>,
}

fn in_call_order<T: Clone>(log: &DashMap<usize, T>) -> Vec<T> {
    let mut entries: Vec<(usize, T)> = log
        .iter()
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    entries.sort_by_key(|(seq, _)| *seq);
    entries.into_iter().map(|(_, request)| request).collect()
}

impl ScriptedEnrichment {
    pub fn new(default_suggestion: EnrichmentSuggestion) -> Self {
        Self {
            default_suggestion,
            ..Default::default()
        }
    }

    /// Answer suggestions for `title` with `response`
    pub fn on_suggest(
        mut self,
        title: impl Into<String>,
        response: Result<EnrichmentSuggestion, EnrichmentError>,
    ) -> Self {
        self.suggestions.insert(title.into(), response);
        self
    }

    /// Answer every rescore with `response`
    pub fn on_rescore(mut self, response: Result<Vec<RescoreResult>, EnrichmentError>) -> Self {
        self.rescore_response = Some(response);
        self
    }

    pub fn suggest_requests(&self) -> Vec<SuggestRequest> {
        in_call_order(&self.suggest_requests)
    }

    pub fn rescore_requests(&self) -> Vec<RescoreRequest> {
        in_call_order(&self.rescore_requests)
    }

    fn next_sequence(&self) -> usize {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }
}

impl EnrichmentService for ScriptedEnrichment {
    fn suggest(
        &self,
        request: SuggestRequest,
    ) -> BoxFuture<'_, Result<EnrichmentSuggestion, EnrichmentError>> {
        Box::pin(async move {
            let response = self
                .suggestions
                .get(&request.title)
                .cloned()
                .unwrap_or_else(|| Ok(self.default_suggestion.clone()));
            self.suggest_requests.insert(self.next_sequence(), request);
            response
        })
    }

    fn rescore(
        &self,
        request: RescoreRequest,
    ) -> BoxFuture<'_, Result<Vec<RescoreResult>, EnrichmentError>> {
        Box::pin(async move {
            let response = self
                .rescore_response
                .clone()
                .unwrap_or_else(|| Ok(Vec::new()));
            self.rescore_requests.insert(self.next_sequence(), request);
            response
        })
    }

    fn service_name(&self) -> &'static str {
        "scripted"
    }
}
