pub mod client;
pub mod scripted;
pub mod service;
pub mod types;


pub use client::HttpEnrichmentClient;
pub use scripted::ScriptedEnrichment;
pub use service::{EnrichmentClient, EnrichmentService};
pub use types::*;
