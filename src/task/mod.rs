pub mod conflict;
pub mod filter;
pub mod types;


pub use conflict::*;
pub use filter::*;
pub use types::*;
