//! Slot descriptors for block inputs and outputs
//!
//! Slots declare the named, typed connection points a block exposes to the
//! host's workflow editor. The declared types are advisory: they drive the
//! host UI's wiring hints, not runtime enforcement.

use serde::{Deserialize, Serialize};

use super::value::SlotType;

/// A named input or output slot on a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    /// Unique slot identifier within the block
    pub id: String,
    /// Human-readable slot name
    pub name: String,
    /// Slot description shown in the host UI
    pub description: String,
    /// Advisory type tags the slot accepts or produces
    pub types: Vec<SlotType>,
}

impl Slot {
    /// Create a new slot
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        types: Vec<SlotType>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            types,
        }
    }

    /// The conventional "run this block" input slot
    pub fn action_input() -> Self {
        Self::new(
            "action",
            "Action",
            "Executes this block.",
            vec![SlotType::Action],
        )
    }

    /// A continuation output slot with the given id and description
    pub fn action_output(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(id, name, description, vec![SlotType::Action])
    }

    /// Whether this slot carries continuation signals rather than data
    pub fn is_action(&self) -> bool {
        self.types.contains(&SlotType::Action)
    }
}
