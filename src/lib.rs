//! Block implementations for a visual bot-automation builder
//!
//! This crate provides the custom blocks shipped with the automation builder,
//! including the core block abstractions, the block categories, and the
//! single-invocation execution harness.

pub mod core;
pub mod categories;
pub mod runtime;
mod tests;

// Re-export commonly used types
pub use crate::categories::BlockCategory;
pub use crate::core::block::{Block, BlockDescriptor, BlockError, BlockMetadata};
pub use crate::core::context::ExecutionContext;
pub use crate::core::registry::BlockRegistry;
pub use crate::core::value::Value;
pub use crate::runtime::harness::{run_block, BlockHarness, Invocation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
