//! Kernel module - infrastructure adapters and dependency container.

pub mod ai;
pub mod backend;
pub mod deps;
pub mod memory;
pub mod retrieval;
pub mod social;
pub mod test_dependencies;
pub mod traits;

pub use ai::GrokAI;
pub use backend::HttpSupportBackend;
pub use deps::ServerDeps;
pub use memory::{create_memory_store, FileMemoryStore, InMemoryMemoryStore};
pub use retrieval::KeywordContextRetriever;
pub use social::XPlatform;
pub use test_dependencies::TestDependencies;
pub use traits::*;
