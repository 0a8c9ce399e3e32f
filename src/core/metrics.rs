//! Metrics and logging for block invocations
//!
//! Blocks may record simple counters and gauges while executing; the host
//! reads them back after the invocation. The logger attaches invocation and
//! block identity to every event so host-side log collection can correlate
//! them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::InvocationId;

/// Metric definition describing a metric a block can record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricDefinition {
    /// Unique identifier for the metric
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Type of metric
    pub metric_type: MetricType,
    /// Unit of measurement (e.g., "items", "ms")
    pub unit: String,
    /// Description of what this metric measures
    pub description: String,
}

/// Type of metric being recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricType {
    /// Monotonically increasing count
    Counter,
    /// Point-in-time value
    Gauge,
}

/// Aggregations supported when reading recorded values back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationType {
    Sum,
    Avg,
    Min,
    Max,
}

/// Thread-safe collector for values recorded during an invocation
#[derive(Debug, Clone, Default)]
pub struct MetricsCollector {
    values: Arc<Mutex<HashMap<String, Vec<f64>>>>,
}

impl MetricsCollector {
    /// Create a new empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a metric value
    pub fn record(&self, metric_id: &str, value: f64) {
        self.values
            .lock()
            .entry(metric_id.to_string())
            .or_default()
            .push(value);
    }

    /// Increment a counter metric by 1
    pub fn increment(&self, metric_id: &str) {
        self.record(metric_id, 1.0);
    }

    /// Get all recorded values for a metric
    pub fn get_values(&self, metric_id: &str) -> Vec<f64> {
        self.values.lock().get(metric_id).cloned().unwrap_or_default()
    }

    /// Aggregate recorded values, or `None` if nothing was recorded
    pub fn aggregate(&self, metric_id: &str, agg: AggregationType) -> Option<f64> {
        let values = self.get_values(metric_id);
        if values.is_empty() {
            return None;
        }
        match agg {
            AggregationType::Sum => Some(values.iter().sum()),
            AggregationType::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
            AggregationType::Min => values.iter().cloned().reduce(f64::min),
            AggregationType::Max => values.iter().cloned().reduce(f64::max),
        }
    }

    /// Get all metric IDs that have recorded values
    pub fn metric_ids(&self) -> Vec<String> {
        self.values.lock().keys().cloned().collect()
    }

    /// Clear all recorded values
    pub fn clear(&self) {
        self.values.lock().clear();
    }
}

/// Structured logger bound to one invocation of one block
#[derive(Debug, Clone)]
pub struct Logger {
    invocation_id: InvocationId,
    block_id: String,
}

impl Logger {
    /// Create a logger for the given invocation/block pair
    pub fn new(invocation_id: InvocationId, block_id: impl Into<String>) -> Self {
        Self {
            invocation_id,
            block_id: block_id.into(),
        }
    }

    /// Log a debug message
    pub fn debug(&self, message: &str) {
        tracing::debug!(invocation_id = %self.invocation_id, block = %self.block_id, "{}", message);
    }

    /// Log an info message
    pub fn info(&self, message: &str) {
        tracing::info!(invocation_id = %self.invocation_id, block = %self.block_id, "{}", message);
    }

    /// Log a warning
    pub fn warn(&self, message: &str) {
        tracing::warn!(invocation_id = %self.invocation_id, block = %self.block_id, "{}", message);
    }

    /// Log an error
    pub fn error(&self, message: &str) {
        tracing::error!(invocation_id = %self.invocation_id, block = %self.block_id, "{}", message);
    }
}
