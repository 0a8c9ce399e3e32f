//! Test suite for the block system
//!
//! Unit tests live next to the code they cover; this module holds the
//! cross-cutting suites: descriptor/contract checks, end-to-end invocation
//! through the harness, and property-based tests.
