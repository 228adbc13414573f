//! Decision storage adapters

mod memory;

pub use memory::InMemoryDecisionStore;
