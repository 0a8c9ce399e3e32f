//! Block categories and the built-in block set
//!
//! This module groups the shipped blocks by the category the host UI files
//! them under, and exposes the full built-in set for registry loading.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::block::Block;

pub mod collections;
pub mod date;
pub mod validation;

/// Block category enumeration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockCategory {
    /// Date construction and arithmetic blocks
    Date,
    /// Branching validator blocks
    Validation,
    /// Collection and set-algebra blocks
    Collections,
    /// Custom user-defined blocks
    Custom(String),
}

impl BlockCategory {
    /// Get a human-readable name for the category
    pub fn display_name(&self) -> &str {
        match self {
            BlockCategory::Date => "Date & Time",
            BlockCategory::Validation => "Validation",
            BlockCategory::Collections => "Collections",
            BlockCategory::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for BlockCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// All blocks this crate ships, ready for registration
pub fn builtin_blocks() -> Vec<Arc<dyn Block>> {
    vec![
        Arc::new(date::create_date::CreateDateBlock::new()),
        Arc::new(validation::is_number::IsNumberBlock::new()),
        Arc::new(validation::channel_name::CheckChannelNameBlock::new()),
        Arc::new(collections::set_operation::SetOperationBlock::new()),
    ]
}
