//! Check Channel Name Block
//!
//! Decides whether a candidate name is acceptable for a channel of the
//! configured kind. Every kind shares the length rule; text channels add
//! character, case, and leading-dash restrictions.

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata};
use crate::core::context::ExecutionContext;
use crate::core::option::ConfigOption;
use crate::core::slot::Slot;
use crate::core::value::{SlotType, Value};

// Characters a text channel name may not contain (this may not be exhaustive)
const INVALID_TEXT_CHANNEL_CHARACTERS: &str = " ~!@#$%^&*()+{}|:\"<>?`=,./;'\\[]";

fn contains_invalid_character(input: &str, characters: &str) -> bool {
    characters.chars().any(|c| input.contains(c))
}

fn is_lower_case(input: &str) -> bool {
    input.to_lowercase() == input
}

/// Validate a candidate name against the rules for `channel_type`.
///
/// Returns `Ok(false)` for any data-shaped problem; only an unrecognized
/// channel type is a configuration error.
fn validate_name(name: &Value, channel_type: &str) -> Result<bool, BlockError> {
    let Value::Text(name) = name else {
        return Ok(false);
    };

    // Names are 1-100 characters, counted on the raw string including any
    // leading/trailing whitespace the platform would strip later.
    let length = name.chars().count();
    if !(1..=100).contains(&length) {
        return Ok(false);
    }

    match channel_type {
        "thread" | "category" | "voice" => Ok(true),
        "text" => Ok(
            !contains_invalid_character(name.trim(), INVALID_TEXT_CHANNEL_CHARACTERS)
                // upper-case characters are not allowed
                && is_lower_case(name)
                // can't start with a dash (-)
                && !name.starts_with('-'),
        ),
        other => Err(BlockError::Config(format!("invalid channel type: {other}"))),
    }
}

pub struct CheckChannelNameBlock {
    metadata: BlockMetadata,
    input_slots: Vec<Slot>,
    output_slots: Vec<Slot>,
    option_defs: Vec<ConfigOption>,
}

impl CheckChannelNameBlock {
    pub fn new() -> Self {
        Self {
            metadata: BlockMetadata {
                id: "check_channel_name".into(),
                name: "Check Channel Name".into(),
                category: BlockCategory::Validation,
                description: "Check whether a channel name is valid for the given channel type."
                    .into(),
                version: "1.0.0".into(),
            },
            input_slots: vec![
                Slot::action_input(),
                Slot::new(
                    "channel_name",
                    "Channel Name",
                    "Channel name to verify.",
                    vec![SlotType::Text, SlotType::Unspecified],
                ),
            ],
            output_slots: vec![
                Slot::action_output(
                    "action_true",
                    "Action (Valid)",
                    "Executes if the channel name is valid.",
                ),
                Slot::action_output(
                    "action_false",
                    "Action (Invalid)",
                    "Executes if the channel name is invalid.",
                ),
            ],
            option_defs: vec![ConfigOption::select(
                "channel_type",
                "Channel Type",
                "The type of channel to verify the name for.",
                &[
                    ("text", "Text Channel"),
                    ("voice", "Voice Channel"),
                    ("category", "Category"),
                    ("thread", "Forum Thread"),
                ],
            )],
        }
    }
}

impl Default for CheckChannelNameBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for CheckChannelNameBlock {
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
        &self.option_defs
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), BlockError> {
        let channel_type = ctx.option("channel_type").as_text().unwrap_or_default();
        if validate_name(ctx.input("channel_name"), channel_type)? {
            ctx.trigger("action_true");
        } else {
            ctx.trigger("action_false");
        }
        Ok(())
    }
}
