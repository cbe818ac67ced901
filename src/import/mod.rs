//! Bulk import of externally supplied task records.

pub mod pipeline;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::ImportPipeline;
pub use types::*;
