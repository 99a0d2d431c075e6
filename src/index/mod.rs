//! Document index: loading sources, splitting, embedding, persistence and lifecycle

pub mod builder;
pub mod lifecycle;
pub mod loader;
pub mod splitter;
pub mod storage;
pub mod vector;

pub use builder::IndexBuilder;
pub use lifecycle::build_and_persist;
pub use lifecycle::load_or_build;
pub use lifecycle::IndexOrigin;
pub use lifecycle::IndexStorage;
pub use splitter::SentenceSplitter;
pub use vector::IndexMeta;
pub use vector::VectorIndex;
