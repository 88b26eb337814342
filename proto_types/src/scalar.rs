use serde_derive::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "kebab-case")]
pub enum ScalarKind {
    Bool,
    String,
    Bytes,
    Float,
    Double,
    Int32,
    Uint32,
    Sint32,
    Fixed32,
    Sfixed32,
    Int64,
    Uint64,
    Sint64,
    Fixed64,
    Sfixed64,
}

impl ScalarKind {
    pub const ALL: [ScalarKind; 15] = [
        ScalarKind::Bool,
        ScalarKind::String,
        ScalarKind::Bytes,
        ScalarKind::Float,
        ScalarKind::Double,
        ScalarKind::Int32,
        ScalarKind::Uint32,
        ScalarKind::Sint32,
        ScalarKind::Fixed32,
        ScalarKind::Sfixed32,
        ScalarKind::Int64,
        ScalarKind::Uint64,
        ScalarKind::Sint64,
        ScalarKind::Fixed64,
        ScalarKind::Sfixed64,
    ];

    /// True for the five integer kinds that need a `LongRepresentation`.
    pub fn is_64_bit_integer(self) -> bool {
        matches!(
            self,
            ScalarKind::Int64
                | ScalarKind::Uint64
                | ScalarKind::Sint64
                | ScalarKind::Fixed64
                | ScalarKind::Sfixed64
        )
    }

    pub fn is_integer(self) -> bool {
        self.is_64_bit_integer()
            || matches!(
                self,
                ScalarKind::Int32
                    | ScalarKind::Uint32
                    | ScalarKind::Sint32
                    | ScalarKind::Fixed32
                    | ScalarKind::Sfixed32
            )
    }

    /// Map keys may be any integral or string kind plus bool. Floats and bytes
    /// are not valid keys.
    pub fn is_valid_map_key(self) -> bool {
        self.is_integer() || matches!(self, ScalarKind::Bool | ScalarKind::String)
    }

    /// Keyword used for this kind in schema sources.
    pub fn keyword(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
            ScalarKind::Bytes => "bytes",
            ScalarKind::Float => "float",
            ScalarKind::Double => "double",
            ScalarKind::Int32 => "int32",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Sint32 => "sint32",
            ScalarKind::Fixed32 => "fixed32",
            ScalarKind::Sfixed32 => "sfixed32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::Fixed64 => "fixed64",
            ScalarKind::Sfixed64 => "sfixed64",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Target encoding for 64-bit integer values.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LongRepresentation {
    /// Decimal text, e.g. `"18446744073709551615"`.
    #[default]
    String,
    /// IEEE-754 double. Values beyond 2^53 lose precision.
    Number,
    /// Arbitrary precision integer.
    #[serde(rename = "bigint")]
    BigInt,
}

impl fmt::Display for LongRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LongRepresentation::String => f.write_str("string"),
            LongRepresentation::Number => f.write_str("number"),
            LongRepresentation::BigInt => f.write_str("bigint"),
        }
    }
}
