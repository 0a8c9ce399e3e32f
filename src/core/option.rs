//! Configuration options for blocks
//!
//! Options are the per-block settings a workflow author fixes in the host
//! UI, as opposed to inputs, which arrive per invocation from upstream
//! blocks. Select options enumerate their choices in order; the first choice
//! is the default.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::value::Value;

/// A configuration option declared by a block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOption {
    /// Unique option identifier within the block
    pub id: String,
    /// Human-readable option name
    pub name: String,
    /// Option description shown in the host UI
    pub description: String,
    /// Option kind and, for selects, the enumerated choices
    pub kind: OptionKind,
}

/// Option kinds supported by the host UI
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum OptionKind {
    /// Free-form text entry
    Text,
    /// Color picker
    Color,
    /// Numeric entry
    Number,
    /// Dropdown with an ordered set of choices
    Select {
        /// Enumerated choices; the first is the default
        choices: Vec<SelectChoice>,
    },
}

/// One enumerated choice of a select option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectChoice {
    /// Stable value stored in the workflow
    pub value: String,
    /// Human-readable label shown in the host UI
    pub label: String,
}

impl ConfigOption {
    /// Create a select option from `(value, label)` pairs
    pub fn select(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        choices: &[(&str, &str)],
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            kind: OptionKind::Select {
                choices: choices
                    .iter()
                    .map(|(value, label)| SelectChoice {
                        value: (*value).to_string(),
                        label: (*label).to_string(),
                    })
                    .collect(),
            },
        }
    }

    /// The default value of this option: the first choice for selects,
    /// unset otherwise.
    pub fn default_value(&self) -> Value {
        match &self.kind {
            OptionKind::Select { choices } => choices
                .first()
                .map(|c| Value::Text(c.value.clone()))
                .unwrap_or(Value::Unspecified),
            _ => Value::Unspecified,
        }
    }
}

/// Derive the per-invocation option defaults from a block's descriptor.
///
/// Computed fresh on every invocation; nothing is cached or shared between
/// invocations.
pub fn option_defaults(options: &[ConfigOption]) -> HashMap<String, Value> {
    options
        .iter()
        .map(|opt| (opt.id.clone(), opt.default_value()))
        .collect()
}
