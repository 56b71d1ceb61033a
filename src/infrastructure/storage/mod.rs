//! Storage adapters for the repository ports

mod in_memory;

pub use in_memory::{InMemoryStore, InMemoryTransaction};
