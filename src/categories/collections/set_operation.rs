//! Set Operation Block
//!
//! Normalizes two collection-like inputs to sets of unique values, applies
//! one binary set operation, optionally sorts with a mixed-type total order,
//! and shapes the result. Sorting always produces an ordered list, even when
//! the set output shape was requested.

use std::cmp::Ordering;

use indexmap::IndexSet;

use crate::categories::BlockCategory;
use crate::core::block::{Block, BlockError, BlockMetadata};
use crate::core::context::ExecutionContext;
use crate::core::metrics::{MetricDefinition, MetricType};
use crate::core::option::ConfigOption;
use crate::core::slot::Slot;
use crate::core::value::{SlotType, Value};

fn validate_input(input: &Value, name: &str) -> Result<(), BlockError> {
    match input {
        Value::Text(_) | Value::Null | Value::Unspecified => Err(BlockError::Input(format!(
            "'{name}' can't be text, null, or unspecified"
        ))),
        _ => Ok(()),
    }
}

/// Normalize a collection-like value to a set of unique members.
///
/// Sequences and sets contribute their elements (duplicates collapse,
/// insertion order kept). Mappings contribute keys or values per the
/// configured method. Anything else is an unknown input.
fn normalize(input: &Value, object_process_method: &str) -> Result<IndexSet<Value>, BlockError> {
    match input {
        Value::List(items) => Ok(items.iter().cloned().collect()),
        Value::Set(items) => Ok(items.clone()),
        Value::Object(map) => match object_process_method {
            "keys" => Ok(map.keys().map(|k| Value::Text(k.clone())).collect()),
            "values" => Ok(map.values().cloned().collect()),
            other => Err(BlockError::Config(format!(
                "invalid object process method: {other}"
            ))),
        },
        other => Err(BlockError::Input(format!("unknown input: {other}"))),
    }
}

fn execute_set_operation(
    input1: IndexSet<Value>,
    input2: IndexSet<Value>,
    operation: &str,
) -> Result<IndexSet<Value>, BlockError> {
    match operation {
        "union" => Ok(input1.union(&input2).cloned().collect()),
        "intersect" => Ok(input1.intersection(&input2).cloned().collect()),
        "diff" => Ok(input1.difference(&input2).cloned().collect()),
        "symdiff" => Ok(input1.symmetric_difference(&input2).cloned().collect()),
        other => Err(BlockError::Config(format!("invalid set operation: {other}"))),
    }
}

/// Total order over mixed-type values for sorting.
///
/// Numbers compare numerically, text compares with the natural
/// (numeric-substring-aware) string order, and everything else falls back to
/// natural comparison of the deterministic JSON serializations.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Text(sa), Value::Text(sb)) => natural_cmp(sa, sb),
        (Value::Number(na), Value::Number(nb)) => {
            na.partial_cmp(nb).unwrap_or(Ordering::Equal)
        }
        _ => natural_cmp(&a.to_json().to_string(), &b.to_json().to_string()),
    }
}

/// Natural string comparison: runs of ASCII digits compare by magnitude,
/// everything else by code point. Equal magnitudes with different leading
/// zeros tie-break on run length so the order stays total.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut ca = a.chars().peekable();
    let mut cb = b.chars().peekable();
    loop {
        match (ca.peek().copied(), cb.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let run_a: String = take_digits(&mut ca);
                let run_b: String = take_digits(&mut cb);
                let ord = cmp_digit_runs(&run_a, &run_b);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(x), Some(y)) => {
                let ord = x.cmp(&y);
                if ord != Ordering::Equal {
                    return ord;
                }
                ca.next();
                cb.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.peek().copied() {
        if !c.is_ascii_digit() {
            break;
        }
        run.push(c);
        chars.next();
    }
    run
}

fn cmp_digit_runs(a: &str, b: &str) -> Ordering {
    let a_digits = a.trim_start_matches('0');
    let b_digits = b.trim_start_matches('0');
    a_digits
        .len()
        .cmp(&b_digits.len())
        .then_with(|| a_digits.cmp(b_digits))
        .then_with(|| a.len().cmp(&b.len()))
}

fn execute_sort(input: IndexSet<Value>, method: &str) -> Result<Value, BlockError> {
    match method {
        "no" => Ok(Value::Set(input)),
        "alpha" => {
            let mut items: Vec<Value> = input.into_iter().collect();
            items.sort_by(compare);
            Ok(Value::List(items))
        }
        "alpharev" => {
            let mut items: Vec<Value> = input.into_iter().collect();
            items.sort_by(|a, b| compare(b, a));
            Ok(Value::List(items))
        }
        other => Err(BlockError::Config(format!("invalid sort method: {other}"))),
    }
}

fn convert_output(input: Value, output_type: &str) -> Result<Value, BlockError> {
    match output_type {
        // a list here means the result was sorted, and sorting always wins
        // over the requested set shape
        "set" => Ok(input),
        "array" => Ok(match input {
            Value::Set(items) => Value::List(items.into_iter().collect()),
            other => other,
        }),
        other => Err(BlockError::Config(format!("invalid output type: {other}"))),
    }
}

pub struct SetOperationBlock {
    metadata: BlockMetadata,
    input_slots: Vec<Slot>,
    output_slots: Vec<Slot>,
    option_defs: Vec<ConfigOption>,
    metric_defs: Vec<MetricDefinition>,
}

impl SetOperationBlock {
    pub fn new() -> Self {
        Self {
            metadata: BlockMetadata {
                id: "set_operation".into(),
                name: "Set Operation".into(),
                category: BlockCategory::Collections,
                description: "Various set operations over two collections.".into(),
                version: "1.0.0".into(),
            },
            input_slots: vec![
                Slot::action_input(),
                Slot::new(
                    "in1",
                    "Input 1",
                    "First collection to compare.",
                    vec![SlotType::List, SlotType::Object],
                ),
                Slot::new(
                    "in2",
                    "Input 2",
                    "Second collection to compare.",
                    vec![SlotType::List, SlotType::Object],
                ),
            ],
            output_slots: vec![
                Slot::action_output(
                    "action",
                    "Action",
                    "Executes the following blocks when this block finishes its task.",
                ),
                Slot::new(
                    "result",
                    "Result",
                    "Result of the operation.",
                    vec![SlotType::List, SlotType::Object],
                ),
            ],
            option_defs: Self::build_options(),
            metric_defs: Self::build_metrics(),
        }
    }

    fn build_options() -> Vec<ConfigOption> {
        vec![
            ConfigOption::select(
                "operation",
                "Operation",
                "Operation to perform.",
                &[
                    ("union", "Union (unique values from both inputs)"),
                    ("intersect", "Intersect (values in both inputs)"),
                    ("diff", "Diff (values in the first but not the second input)"),
                    ("symdiff", "Symmetric Diff (values in either input but not both)"),
                ],
            ),
            ConfigOption::select(
                "object_process_method",
                "Object Processing",
                "How to read a non-sequence mapping input.",
                &[
                    ("keys", "Use the mapping's keys"),
                    ("values", "Use the mapping's values"),
                ],
            ),
            ConfigOption::select(
                "sort",
                "Sort",
                "Sort the output (always converts to an ordered list).",
                &[
                    ("no", "No Sorting"),
                    ("alpha", "Sort Alphanumeric"),
                    ("alpharev", "Sort Alphanumeric (Reverse)"),
                ],
            ),
            ConfigOption::select(
                "output_type",
                "Output Type",
                "What kind of value to output.",
                &[
                    ("set", "Set (ignored if sorted)"),
                    ("array", "Ordered list"),
                ],
            ),
        ]
    }

    fn build_metrics() -> Vec<MetricDefinition> {
        let gauge = |id: &str, name: &str, description: &str| MetricDefinition {
            id: id.into(),
            name: name.into(),
            metric_type: MetricType::Gauge,
            unit: "items".into(),
            description: description.into(),
        };
        vec![
            gauge("input1_size", "Input 1 Size", "Unique members of the first input"),
            gauge("input2_size", "Input 2 Size", "Unique members of the second input"),
            gauge("result_size", "Result Size", "Members of the operation result"),
        ]
    }
}

impl Default for SetOperationBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl Block for SetOperationBlock {
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
    fn metrics(&self) -> &[MetricDefinition] {
        &self.metric_defs
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), BlockError> {
        validate_input(ctx.input("in1"), "Input 1")?;
        validate_input(ctx.input("in2"), "Input 2")?;

        let method = ctx.option("object_process_method").as_text().unwrap_or_default().to_string();
        let operation = ctx.option("operation").as_text().unwrap_or_default().to_string();
        let sort = ctx.option("sort").as_text().unwrap_or_default().to_string();
        let output_type = ctx.option("output_type").as_text().unwrap_or_default().to_string();

        let processed1 = normalize(ctx.input("in1"), &method)?;
        let processed2 = normalize(ctx.input("in2"), &method)?;
        ctx.metrics.record("input1_size", processed1.len() as f64);
        ctx.metrics.record("input2_size", processed2.len() as f64);

        let operated = execute_set_operation(processed1, processed2, &operation)?;
        ctx.metrics.record("result_size", operated.len() as f64);

        let sorted = execute_sort(operated, &sort)?;
        let result = convert_output(sorted, &output_type)?;

        ctx.store_output("result", result);
        ctx.trigger("action");
        Ok(())
    }
}
