//! Core block abstractions and types
//!
//! This module defines the fundamental value model, descriptor types, traits,
//! and invocation context that form the foundation of the block system.

pub mod block;
pub mod context;
pub mod metrics;
pub mod option;
pub mod registry;
pub mod slot;
pub mod value;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single block invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvocationId(pub Uuid);

impl InvocationId {
    /// Generate a new random invocation ID
    pub fn new() -> Self {
        InvocationId(Uuid::new_v4())
    }
}

impl Default for InvocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InvocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
