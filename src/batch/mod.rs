//! Multi-task operations on a user selection.

pub mod coordinator;
pub mod selection;


pub use coordinator::{BatchOperationCoordinator, BatchReport};
pub use selection::Selection;
