//! Adapters layer: Concrete implementations of ports.
//!
//! - `tree`: decision tree classifier loaded from a JSON export

pub mod tree;

// Re-export model error for lib.rs
pub use tree::ModelError;
