//! Collection and set-algebra blocks

pub mod set_operation;

pub use set_operation::SetOperationBlock;
