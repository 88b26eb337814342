//! TypeScript code generation for message schemas.
//!
//! Messages become constructor-shaped classes whose parameters mirror the
//! schema fields; oneofs collapse into one discriminated-union parameter.

pub mod codegen;
pub mod config;
pub mod error;
pub mod schema;

pub use config::{ConfigError, GeneratorConfig};
pub use error::{EmitError, GenError, GenResult};
