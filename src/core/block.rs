//! Block trait and related types
//!
//! This module defines the core Block trait that all blocks implement, along
//! with the descriptor metadata the host UI consumes and the error type
//! blocks raise.

use serde::{Deserialize, Serialize};

use super::context::ExecutionContext;
use super::metrics::MetricDefinition;
use super::option::ConfigOption;
use super::slot::Slot;
use crate::categories::BlockCategory;

/// Core block trait that all blocks implement.
///
/// Blocks are stateless: the descriptor accessors return static shape, and
/// `execute` reads everything invocation-specific from the context. A block
/// may therefore be shared (`Arc<dyn Block>`) and invoked from any thread.
pub trait Block: Send + Sync {
    /// Get block metadata
    fn metadata(&self) -> &BlockMetadata;

    /// Get input slot definitions, in declaration order
    fn inputs(&self) -> &[Slot];

    /// Get output slot definitions, in declaration order
    fn outputs(&self) -> &[Slot];

    /// Get configuration option definitions, in declaration order
    fn options(&self) -> &[ConfigOption];

    /// Get metric definitions this block may record
    fn metrics(&self) -> &[MetricDefinition] {
        &[]
    }

    /// Execute the block for a single invocation.
    ///
    /// On error, the contract is that the invocation has stored no outputs
    /// and triggered no continuations; the error propagates to the host,
    /// which surfaces it to the workflow author.
    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), BlockError>;

    /// Assemble the serializable descriptor consumed by the host UI
    fn descriptor(&self) -> BlockDescriptor {
        BlockDescriptor {
            metadata: self.metadata().clone(),
            inputs: self.inputs().to_vec(),
            outputs: self.outputs().to_vec(),
            options: self.options().to_vec(),
            metrics: self.metrics().to_vec(),
        }
    }
}

/// Block metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockMetadata {
    /// Stable block identifier (registry key)
    pub id: String,
    /// Human-readable block name
    pub name: String,
    /// Block category
    pub category: BlockCategory,
    /// Brief description of the block
    pub description: String,
    /// Block version
    pub version: String,
}

/// The full static shape of a block, as pure data for the host UI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDescriptor {
    pub metadata: BlockMetadata,
    pub inputs: Vec<Slot>,
    pub outputs: Vec<Slot>,
    pub options: Vec<ConfigOption>,
    pub metrics: Vec<MetricDefinition>,
}

/// Block invocation errors.
///
/// Both variants are authoring-time failures: an invalid enumerated option
/// or an input of fundamentally wrong shape. Malformed *data* never raises;
/// blocks coerce it to an identity value or route it to their false branch
/// instead.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BlockError {
    /// An option holds an unrecognized or structurally invalid value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An input has a shape the block's contract rejects outright
    #[error("invalid input: {0}")]
    Input(String),
}
