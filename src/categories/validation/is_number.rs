//! Is Number Block
//!
//! Classifies an input as "a number" under a strict, locale-naive rule: its
//! string form, trimmed, must be one or more ASCII digits. No sign, decimal
//! point, separators, exponent, or Unicode digits.

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata};
use crate::core::context::ExecutionContext;
use crate::core::option::ConfigOption;
use crate::core::slot::Slot;
use crate::core::value::{SlotType, Value};

/// Whether the value reads as an unsigned decimal digit string.
///
/// Only text and number values are inspected; every other tag is not a
/// number without looking at its string form.
fn is_number(value: &Value) -> bool {
    let text = match value {
        Value::Text(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return false,
    };
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

pub struct IsNumberBlock {
    metadata: BlockMetadata,
    input_slots: Vec<Slot>,
    output_slots: Vec<Slot>,
}

impl IsNumberBlock {
    pub fn new() -> Self {
        Self {
            metadata: BlockMetadata {
                id: "is_number".into(),
                name: "Is Number".into(),
                category: BlockCategory::Validation,
                description:
                    "Validates that the input is a number (only characters 0-9 allowed) and \
                     executes an action based on that."
                        .into(),
                version: "1.0.0".into(),
            },
            input_slots: vec![
                Slot::action_input(),
                Slot::new(
                    "input",
                    "Input",
                    "Value to check for being a number.",
                    vec![SlotType::Text, SlotType::Number],
                ),
            ],
            output_slots: vec![
                Slot::action_output(
                    "true_action",
                    "True Action",
                    "Executes if the input is a number.",
                ),
                Slot::action_output(
                    "false_action",
                    "False Action",
                    "Executes if the input is NOT a number.",
                ),
            ],
        }
    }
}

impl Default for IsNumberBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for IsNumberBlock {
    fn metadata(&self) -> &BlockMetadata {
        &self.metadata
    }
    fn inputs(&self) -> &[Slot] {
        &self.input_slots
    }
    fn outputs(&self) -> &[Slot] {
        &self.output_slots
    }
    fn options(&self) -> &[ConfigOption] {
        &[]
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), BlockError> {
        if is_number(ctx.input("input")) {
            ctx.trigger("true_action");
        } else {
            ctx.trigger("false_action");
        }
        Ok(())
    }
}
