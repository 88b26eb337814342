//! Message Schema Descriptors
//!
//! This crate contains the descriptor data structures consumed by the
//! TypeScript generator. It provides pure data structures for representing
//! message schemas (files, messages, fields, oneofs, enums) without any file
//! I/O or code generation logic.

pub mod descriptor;
pub mod scalar;

// Re-export commonly used types at the crate root
pub use descriptor::*;
pub use scalar::*;
