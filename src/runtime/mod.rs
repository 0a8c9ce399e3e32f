//! Single-invocation execution
//!
//! The host platform schedules blocks; this module provides the
//! run-to-completion execution of one block invocation, used both by hosts
//! embedding the crate and by the test suite.

pub mod harness;

pub use harness::{run_block, BlockHarness, HarnessError, Invocation};
