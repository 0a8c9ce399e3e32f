//! Block Registry - Central registry for the blocks available to the host
//!
//! This module provides a thread-safe registry for registering, discovering,
//! and describing blocks. It supports:
//! - Block registration and unregistration, with descriptor validation
//! - Lookup by id, category, or search query
//! - Descriptor export for the host UI

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use super::block::{Block, BlockDescriptor};
use super::option::OptionKind;
use crate::categories::BlockCategory;

/// Block registry for the blocks this crate ships.
///
/// The registry uses `Arc<RwLock<HashMap>>` for thread-safe access, using
/// parking_lot's RwLock so reads never allocate a poison guard.
#[derive(Clone, Default)]
pub struct BlockRegistry {
    blocks: Arc<RwLock<HashMap<String, Arc<dyn Block>>>>,
}

impl BlockRegistry {
    /// Create a new empty block registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-loaded with the blocks this crate ships
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        for block in crate::categories::builtin_blocks() {
            // Built-in descriptors are valid by construction.
            let _ = registry.register(block);
        }
        registry
    }

    /// Register a block.
    ///
    /// The block's descriptor is validated first: ids, name, and version must
    /// be non-empty, slot and option ids unique, and select options must
    /// carry at least one choice.
    pub fn register(&self, block: Arc<dyn Block>) -> Result<(), RegistryError> {
        validate_descriptor(&*block)?;

        let id = block.metadata().id.clone();
        let mut blocks = self.blocks.write();
        if blocks.contains_key(&id) {
            return Err(RegistryError::DuplicateBlock(id));
        }
        blocks.insert(id, block);
        Ok(())
    }

    /// Remove a block from the registry
    pub fn unregister(&self, block_id: &str) -> Result<(), RegistryError> {
        self.blocks
            .write()
            .remove(block_id)
            .map(|_| ())
            .ok_or_else(|| RegistryError::BlockNotFound(block_id.to_string()))
    }

    /// Get a block by its id
    pub fn get_block(&self, id: &str) -> Result<Arc<dyn Block>, RegistryError> {
        self.blocks
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| RegistryError::BlockNotFound(id.to_string()))
    }

    /// Get all registered blocks
    pub fn all_blocks(&self) -> Vec<Arc<dyn Block>> {
        self.blocks.read().values().cloned().collect()
    }

    /// Get blocks in the given category
    pub fn blocks_by_category(&self, category: &BlockCategory) -> Vec<Arc<dyn Block>> {
        self.blocks
            .read()
            .values()
            .filter(|b| &b.metadata().category == category)
            .cloned()
            .collect()
    }

    /// Search blocks by a case-insensitive query over id, name, and
    /// description
    pub fn search_blocks(&self, query: &str) -> Vec<Arc<dyn Block>> {
        let query = query.to_lowercase();
        self.blocks
            .read()
            .values()
            .filter(|b| {
                let meta = b.metadata();
                meta.id.to_lowercase().contains(&query)
                    || meta.name.to_lowercase().contains(&query)
                    || meta.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect()
    }

    /// Export the descriptors of all registered blocks, sorted by id, for
    /// the host UI
    pub fn descriptors(&self) -> Vec<BlockDescriptor> {
        let mut descriptors: Vec<BlockDescriptor> = self
            .blocks
            .read()
            .values()
            .map(|b| b.descriptor())
            .collect();
        descriptors.sort_by(|a, b| a.metadata.id.cmp(&b.metadata.id));
        descriptors
    }

    /// Export all descriptors as a JSON value
    pub fn descriptors_json(&self) -> serde_json::Value {
        serde_json::to_value(self.descriptors()).unwrap_or(serde_json::Value::Null)
    }

    /// Number of registered blocks
    pub fn count(&self) -> usize {
        self.blocks.read().len()
    }

    /// Whether a block with the given id is registered
    pub fn contains(&self, id: &str) -> bool {
        self.blocks.read().contains_key(id)
    }

    /// Remove all registered blocks
    pub fn clear(&self) {
        self.blocks.write().clear();
    }
}

fn validate_descriptor(block: &dyn Block) -> Result<(), RegistryError> {
    let meta = block.metadata();
    if meta.id.is_empty() {
        return Err(RegistryError::ValidationError("block id cannot be empty".into()));
    }
    if meta.name.is_empty() {
        return Err(RegistryError::ValidationError("block name cannot be empty".into()));
    }
    if meta.version.is_empty() {
        return Err(RegistryError::ValidationError("block version cannot be empty".into()));
    }

    for (kind, slots) in [("input", block.inputs()), ("output", block.outputs())] {
        let mut seen = HashSet::new();
        for slot in slots {
            if slot.id.is_empty() {
                return Err(RegistryError::ValidationError(format!(
                    "{kind} slot of '{}' has an empty id",
                    meta.id
                )));
            }
            if !seen.insert(slot.id.as_str()) {
                return Err(RegistryError::ValidationError(format!(
                    "duplicate {kind} slot '{}' on '{}'",
                    slot.id, meta.id
                )));
            }
        }
    }

    let mut seen = HashSet::new();
    for opt in block.options() {
        if !seen.insert(opt.id.as_str()) {
            return Err(RegistryError::ValidationError(format!(
                "duplicate option '{}' on '{}'",
                opt.id, meta.id
            )));
        }
        if let OptionKind::Select { choices } = &opt.kind {
            if choices.is_empty() {
                return Err(RegistryError::ValidationError(format!(
                    "select option '{}' on '{}' has no choices",
                    opt.id, meta.id
                )));
            }
        }
    }

    Ok(())
}

/// Registry error types
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Block with the given id was not found
    #[error("block not found: {0}")]
    BlockNotFound(String),

    /// Attempted to register a block with a duplicate id
    #[error("duplicate block id: {0}")]
    DuplicateBlock(String),

    /// Block descriptor validation failed
    #[error("descriptor validation failed: {0}")]
    ValidationError(String),
}
