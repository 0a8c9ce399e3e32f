//! Branching validator blocks
//!
//! These blocks classify an input and fire exactly one of two continuation
//! slots per invocation. Malformed data never raises; it routes to the
//! false/invalid branch.

pub mod channel_name;
pub mod is_number;

pub use channel_name::CheckChannelNameBlock;
pub use is_number::IsNumberBlock;
