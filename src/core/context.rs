//! Per-invocation execution context
//!
//! Every invocation receives a fresh context holding its input bindings, its
//! merged option values, and the outputs and continuation signals it
//! produces. The context is owned exclusively for the duration of the call;
//! nothing is shared between invocations.

use std::collections::HashMap;

use super::metrics::{Logger, MetricsCollector};
use super::value::Value;
use super::InvocationId;

static UNSPECIFIED: Value = Value::Unspecified;

/// Invocation-scoped read/write context handed to [`Block::execute`].
///
/// [`Block::execute`]: super::block::Block::execute
pub struct ExecutionContext {
    /// Unique id of this invocation
    pub invocation_id: InvocationId,
    inputs: HashMap<String, Value>,
    options: HashMap<String, Value>,
    outputs: HashMap<String, Value>,
    triggered: Vec<String>,
    /// Metrics recorded during this invocation
    pub metrics: MetricsCollector,
    /// Structured logger bound to this invocation
    pub logger: Logger,
}

impl ExecutionContext {
    /// Create a fresh context for one invocation of the named block
    pub fn new(
        block_id: &str,
        inputs: HashMap<String, Value>,
        options: HashMap<String, Value>,
    ) -> Self {
        let invocation_id = InvocationId::new();
        Self {
            invocation_id,
            inputs,
            options,
            outputs: HashMap::new(),
            triggered: Vec::new(),
            metrics: MetricsCollector::new(),
            logger: Logger::new(invocation_id, block_id),
        }
    }

    /// Read the value bound to an input slot.
    ///
    /// Unbound slots read as [`Value::Unspecified`]; the declared slot types
    /// are advisory only, so the returned value may carry any tag.
    pub fn input(&self, key: &str) -> &Value {
        self.inputs.get(key).unwrap_or(&UNSPECIFIED)
    }

    /// Read the configured value of an option (defaults already merged)
    pub fn option(&self, key: &str) -> &Value {
        self.options.get(key).unwrap_or(&UNSPECIFIED)
    }

    /// Store a result value against an output slot
    pub fn store_output(&mut self, key: &str, value: Value) {
        self.outputs.insert(key.to_string(), value);
    }

    /// Signal that the named action slot's downstream work should run next.
    ///
    /// Recorded as a presence marker in trigger order; triggering the same
    /// slot twice records it once.
    pub fn trigger(&mut self, key: &str) {
        if !self.triggered.iter().any(|k| k == key) {
            self.triggered.push(key.to_string());
        }
    }

    /// All outputs stored so far
    pub fn outputs(&self) -> &HashMap<String, Value> {
        &self.outputs
    }

    /// All continuations triggered so far, in trigger order
    pub fn triggered(&self) -> &[String] {
        &self.triggered
    }

    /// Whether the named continuation was triggered
    pub fn was_triggered(&self, key: &str) -> bool {
        self.triggered.iter().any(|k| k == key)
    }

    /// Consume the context, returning its outputs and triggered continuations
    pub fn into_results(self) -> (HashMap<String, Value>, Vec<String>, MetricsCollector) {
        (self.outputs, self.triggered, self.metrics)
    }
}
