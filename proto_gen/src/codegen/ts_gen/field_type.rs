//! Field Type Resolver: one schema field to the TypeScript type of its value.

use super::long_repr::long_strategy;
use super::map_type::map_type;
use super::ts_type::{TsPrimitive, TsType};
use crate::codegen::collab::{NameResolver, SymbolKind};
use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::schema::meta::{FieldKind, FieldMeta, MessageMeta};
use proto_types::{LongRepresentation, ScalarKind};

/// Everything type resolution needs besides the field itself.
#[derive(Clone, Copy)]
pub struct TypeContext<'a> {
  pub names: &'a dyn NameResolver,
  pub config: &'a GeneratorConfig,
}

impl<'a> TypeContext<'a> {
  pub fn new(names: &'a dyn NameResolver, config: &'a GeneratorConfig) -> Self {
    Self { names, config }
  }

  pub fn discriminator(&self) -> &str {
    &self.config.discriminator_field_name
  }

  pub fn long_for(&self, field: &FieldMeta) -> LongRepresentation {
    field.long_representation(self.config.default_long_representation)
  }
}

/* Fixed scalar table; only the 64-bit kinds consult the policy */
pub fn scalar_type(kind: ScalarKind, long: LongRepresentation) -> TsType {
  match kind {
    ScalarKind::Bool => TsType::primitive(TsPrimitive::Boolean),
    ScalarKind::String => TsType::primitive(TsPrimitive::String),
    ScalarKind::Bytes => TsType::primitive(TsPrimitive::Uint8Array),
    ScalarKind::Float
    | ScalarKind::Double
    | ScalarKind::Int32
    | ScalarKind::Uint32
    | ScalarKind::Sint32
    | ScalarKind::Fixed32
    | ScalarKind::Sfixed32 => TsType::primitive(TsPrimitive::Number),
    ScalarKind::Int64
    | ScalarKind::Uint64
    | ScalarKind::Sint64
    | ScalarKind::Fixed64
    | ScalarKind::Sfixed64 => long_strategy(long).ts_type(),
  }
}

/// Type of a scalar, enum or message kind. Maps and groups are not element
/// kinds and are rejected here.
pub fn element_type(
  ctx: &TypeContext<'_>,
  message: &MessageMeta,
  field: &FieldMeta,
  kind: &FieldKind,
) -> GenResult<TsType> {
  match kind {
    FieldKind::Scalar(scalar) => Ok(scalar_type(*scalar, ctx.long_for(field))),
    FieldKind::Enum(identity) => Ok(TsType::reference(
      ctx.names.resolve(identity, SymbolKind::Enum)?,
    )),
    FieldKind::Message(identity) => Ok(TsType::reference(
      ctx.names.resolve(identity, SymbolKind::Message)?,
    )),
    FieldKind::Map { .. } | FieldKind::Group(_) => Err(unsupported(message, field, kind)),
  }
}

/// Value type of a field without repetition or optional wrapping.
pub fn base_type(ctx: &TypeContext<'_>, message: &MessageMeta, field: &FieldMeta) -> GenResult<TsType> {
  match &field.kind {
    FieldKind::Map { key, value } => map_type(ctx, message, field, *key, value),
    kind => element_type(ctx, message, field, kind),
  }
}

/// Declared type of a field: the base type, wrapped as `T[]` when repeated.
pub fn resolve_field_type(
  ctx: &TypeContext<'_>,
  message: &MessageMeta,
  field: &FieldMeta,
) -> GenResult<TsType> {
  let base = base_type(ctx, message, field)?;
  if field.repeated {
    Ok(TsType::array_of(base))
  } else {
    Ok(base)
  }
}

pub(super) fn unsupported(message: &MessageMeta, field: &FieldMeta, kind: &FieldKind) -> GenError {
  let kind = match kind {
    FieldKind::Scalar(scalar) => scalar.to_string(),
    other => other.kind_name().to_string(),
  };
  GenError::UnsupportedFieldKind {
    message: message.identity.to_string(),
    field: field.name.clone(),
    kind,
  }
}
