//! Error types for schema resolution and code generation.
//!
//! Every `GenError` is a contract violation between the descriptor layer and the
//! generator. Generation of the affected message stops at the first one and the
//! error is handed back to the driver unchanged.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenError {
    #[error("field '{message}.{field}' has unsupported kind '{kind}'")]
    UnsupportedFieldKind {
        message: String,
        field: String,
        kind: String,
    },

    #[error("field '{message}.{field}' names oneof '{oneof}' which the message does not declare")]
    MissingOneofGroup {
        message: String,
        field: String,
        oneof: String,
    },

    #[error("message '{message}' has no field with number {tag}")]
    FieldMetaNotFound { message: String, tag: u32 },

    #[error("type '{identity}' is not known to the descriptor pool or symbol table")]
    UnknownType { identity: String },

    #[error("'{identity}' is already registered as '{existing}', cannot register it again as '{name}'")]
    SymbolConflict {
        name: String,
        existing: String,
        identity: String,
    },

    #[error("oneof '{message}.{oneof}' has member '{field}' whose name collides with the discriminator")]
    DiscriminatorCollision {
        message: String,
        oneof: String,
        field: String,
    },
}

pub type GenResult<T> = Result<T, GenError>;

/// Failure while writing generated files.
#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Generate(#[from] GenError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
