//! Map Type Synthesizer.
//!
//! Object keys are always strings at runtime, so the key type is narrowed to
//! what a JavaScript property name can hold: `bool` keys become `string`, and
//! integer keys ignore the configured long policy (32-bit keys stay `number`,
//! 64-bit keys are decimal `string`). The value keeps the field's own policy.

use super::field_type::{TypeContext, element_type, scalar_type, unsupported};
use super::ts_type::{TsPrimitive, TsType};
use crate::error::{GenError, GenResult};
use crate::schema::meta::{FieldKind, FieldMeta, MessageMeta};
use proto_types::{LongRepresentation, ScalarKind};

/// Key and value types of a map field.
pub fn map_entry_types(
  ctx: &TypeContext<'_>,
  message: &MessageMeta,
  field: &FieldMeta,
  key: ScalarKind,
  value: &FieldKind,
) -> GenResult<(TsType, TsType)> {
  if !key.is_valid_map_key() {
    return Err(GenError::UnsupportedFieldKind {
      message: message.identity.to_string(),
      field: field.name.clone(),
      kind: format!("map key {}", key),
    });
  }
  let key_type = match key {
    ScalarKind::Bool | ScalarKind::String => TsType::primitive(TsPrimitive::String),
    integer => scalar_type(integer, LongRepresentation::String),
  };

  let value_type = match value {
    FieldKind::Map { .. } | FieldKind::Group(_) => {
      return Err(unsupported(message, field, value));
    }
    kind => element_type(ctx, message, field, kind)?,
  };

  Ok((key_type, value_type))
}

/// Structural `{[key:K]:V}` type for a map field.
pub fn map_type(
  ctx: &TypeContext<'_>,
  message: &MessageMeta,
  field: &FieldMeta,
  key: ScalarKind,
  value: &FieldKind,
) -> GenResult<TsType> {
  let (key_type, value_type) = map_entry_types(ctx, message, field, key, value)?;
  Ok(TsType::index_signature(key_type, value_type))
}
