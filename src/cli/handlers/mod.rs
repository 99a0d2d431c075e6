//! CLI command handlers module
//!
//! - serve: API server
//! - index: Index build and inspection
//! - ask: One-off questions
//! - info: Configuration display

pub mod ask;
pub mod index;
pub mod info;
pub mod serve;

pub use ask::*;
pub use index::*;
pub use info::*;
pub use serve::*;
