//! Seams between the class shape builder and the rest of the generator.
//!
//! The builder only ever talks to symbol registration, name resolution and
//! comment attachment through these traits. `codegen::symbols` holds the
//! default implementations.

use crate::error::GenResult;
use crate::schema::pool::SchemaIdentity;
use proto_types::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, MessageDescriptor, OneofDescriptor,
};
use serde_derive::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SymbolKind {
    /// `export type X = XClass;` alias that field references point at.
    Message,
    Enum,
    ConstructorClass,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Message => "message",
            SymbolKind::Enum => "enum",
            SymbolKind::ConstructorClass => "constructor class",
        };
        f.write_str(name)
    }
}

/// Maps a schema identity to the TypeScript name it was registered under.
///
/// Resolution must be deterministic: the same identity and kind always yield
/// the same name.
pub trait NameResolver: Send + Sync {
    fn resolve(&self, identity: &SchemaIdentity, kind: SymbolKind) -> GenResult<String>;
}

/// Reserves declaration names. `name` is the preferred spelling; the returned
/// name is the one actually declared, which differs when the preferred one is
/// already taken in `origin_file`.
pub trait SymbolRegistry: Send + Sync {
    fn register(
        &self,
        name: &str,
        identity: &SchemaIdentity,
        origin_file: &str,
        kind: SymbolKind,
    ) -> GenResult<String>;
}

/// Documentation lines collected for one declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Docs {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub leading: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub trailing: Vec<String>,
}

impl Docs {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }

    /// Leading lines followed by trailing lines, as rendered into one block.
    pub fn lines(&self) -> Vec<String> {
        self.leading.iter().chain(self.trailing.iter()).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Leading,
    Trailing,
}

#[derive(Debug, Clone, Copy)]
pub enum SchemaElement<'a> {
    Message(&'a MessageDescriptor),
    Field(&'a FieldDescriptor),
    Oneof(&'a OneofDescriptor),
    Enum(&'a EnumDescriptor),
    EnumValue(&'a EnumValueDescriptor),
}

pub trait CommentAttacher: Send + Sync {
    fn attach(&self, docs: &mut Docs, element: SchemaElement<'_>, placement: Placement);
}
