//! Block execution harness
//!
//! Runs one block invocation end to end: derive option defaults from the
//! descriptor, merge the caller's overrides over them, build a fresh
//! context, execute, and hand back the full post-invocation state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::core::block::{Block, BlockError};
use crate::core::context::ExecutionContext;
use crate::core::metrics::MetricsCollector;
use crate::core::option::option_defaults;
use crate::core::registry::{BlockRegistry, RegistryError};
use crate::core::value::Value;
use crate::core::InvocationId;

/// The full post-invocation state of one block run
#[derive(Debug)]
pub struct Invocation {
    /// Id of the invocation that produced this state
    pub invocation_id: InvocationId,
    /// All outputs the block stored
    pub outputs: HashMap<String, Value>,
    /// All continuations the block triggered, in trigger order
    pub triggered: Vec<String>,
    /// Metrics the block recorded
    pub metrics: MetricsCollector,
    /// Wall-clock execution time in milliseconds
    pub elapsed_ms: f64,
}

/// Execute a block once with the given input bindings and option overrides.
///
/// Option defaults are derived fresh from the descriptor and the overrides
/// merged over them. On error the invocation state is discarded: the block
/// contract guarantees nothing was stored or triggered.
pub fn run_block(
    block: &dyn Block,
    inputs: HashMap<String, Value>,
    overrides: HashMap<String, Value>,
) -> Result<Invocation, BlockError> {
    let mut options = option_defaults(block.options());
    options.extend(overrides);

    let mut ctx = ExecutionContext::new(&block.metadata().id, inputs, options);
    let invocation_id = ctx.invocation_id;

    let started = Instant::now();
    block.execute(&mut ctx)?;
    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

    let (outputs, triggered, metrics) = ctx.into_results();
    Ok(Invocation {
        invocation_id,
        outputs,
        triggered,
        metrics,
        elapsed_ms,
    })
}

/// Harness over a registry, running blocks by id
pub struct BlockHarness {
    registry: BlockRegistry,
}

impl BlockHarness {
    /// Create a harness over the given registry
    pub fn new(registry: BlockRegistry) -> Self {
        Self { registry }
    }

    /// Create a harness over the built-in block set
    pub fn with_builtins() -> Self {
        Self::new(BlockRegistry::with_builtins())
    }

    /// The underlying registry
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// Look up a block by id and execute it once
    pub fn run(
        &self,
        block_id: &str,
        inputs: HashMap<String, Value>,
        overrides: HashMap<String, Value>,
    ) -> Result<Invocation, HarnessError> {
        let block: Arc<dyn Block> = self.registry.get_block(block_id)?;
        Ok(run_block(&*block, inputs, overrides)?)
    }
}

/// Harness error types
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// The requested block is not registered
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The block invocation failed
    #[error(transparent)]
    Block(#[from] BlockError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::BlockCategory;
    use crate::core::block::BlockMetadata;
    use crate::core::option::ConfigOption;
    use crate::core::slot::Slot;

    struct EchoModeBlock {
        metadata: BlockMetadata,
        inputs: Vec<Slot>,
        outputs: Vec<Slot>,
        options: Vec<ConfigOption>,
    }

    impl EchoModeBlock {
        fn new() -> Self {
            Self {
                metadata: BlockMetadata {
                    id: "echo_mode".into(),
                    name: "Echo Mode".into(),
                    category: BlockCategory::Custom("Test".into()),
                    description: "Copies its configured mode to an output.".into(),
                    version: "1.0.0".into(),
                },
                inputs: vec![Slot::action_input()],
                outputs: vec![Slot::action_output("action", "Action", "Next.")],
                options: vec![ConfigOption::select(
                    "mode",
                    "Mode",
                    "",
                    &[("first", "First"), ("second", "Second")],
                )],
            }
        }
    }

    impl Block for EchoModeBlock {
        fn metadata(&self) -> &BlockMetadata {
            &self.metadata
        }
        fn inputs(&self) -> &[Slot] {
            &self.inputs
        }
        fn outputs(&self) -> &[Slot] {
            &self.outputs
        }
        fn options(&self) -> &[ConfigOption] {
            &self.options
        }
        fn execute(&self, ctx: &mut ExecutionContext) -> Result<(), BlockError> {
            let mode = ctx.option("mode").clone();
            ctx.store_output("mode", mode);
            ctx.trigger("action");
            Ok(())
        }
    }

    #[test]
    fn test_defaults_applied_when_no_overrides() {
        let invocation = run_block(&EchoModeBlock::new(), HashMap::new(), HashMap::new()).unwrap();
        assert_eq!(invocation.outputs["mode"], Value::from("first"));
        assert_eq!(invocation.triggered, ["action"]);
    }

    #[test]
    fn test_overrides_win_over_defaults() {
        let overrides = HashMap::from([("mode".to_string(), Value::from("second"))]);
        let invocation = run_block(&EchoModeBlock::new(), HashMap::new(), overrides).unwrap();
        assert_eq!(invocation.outputs["mode"], Value::from("second"));
    }

    #[test]
    fn test_each_run_is_a_fresh_invocation() {
        let block = EchoModeBlock::new();
        let a = run_block(&block, HashMap::new(), HashMap::new()).unwrap();
        let b = run_block(&block, HashMap::new(), HashMap::new()).unwrap();
        assert_ne!(a.invocation_id, b.invocation_id);
        assert!(a.elapsed_ms >= 0.0);
    }

    #[test]
    fn test_harness_runs_by_id() {
        let harness = BlockHarness::with_builtins();
        let inputs = HashMap::from([("input".to_string(), Value::from("123"))]);
        let invocation = harness.run("is_number", inputs, HashMap::new()).unwrap();
        assert_eq!(invocation.triggered, ["true_action"]);
    }

    #[test]
    fn test_harness_unknown_block() {
        let harness = BlockHarness::with_builtins();
        let result = harness.run("nope", HashMap::new(), HashMap::new());
        assert!(matches!(result.unwrap_err(), HarnessError::Registry(_)));
    }
}
