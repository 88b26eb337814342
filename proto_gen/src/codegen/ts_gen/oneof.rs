//! Oneof ADT Synthesizer.
//!
//! A oneof becomes a single discriminated union property. Each member is a
//! record `{<disc>:"<local>",<local>:T}`, and the union always ends with the
//! empty record `{<disc>:undefined}` for "nothing set".

use super::field_type::{TypeContext, base_type};
use super::ts_type::{TsPrimitive, TsProperty, TsType};
use crate::error::{GenError, GenResult};
use crate::schema::meta::{FieldMeta, MessageMeta};
use serde_derive::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "variant")]
pub enum OneofVariant {
  Member {
    tag: u32,
    local_name: String,
    #[serde(rename = "type")]
    ty: TsType,
    optional: bool,
  },
  Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneofAdt {
  pub name: String,
  pub local_name: String,
  pub discriminator: String,
  /// Members in declaration order followed by exactly one `Empty`.
  pub variants: Vec<OneofVariant>,
}

/// A oneof recovered from one of its member fields.
#[derive(Debug, Clone)]
pub struct OneofGroup<'m> {
  pub message: &'m MessageMeta,
  pub name: &'m str,
  pub local_name: &'m str,
  pub members: Vec<&'m FieldMeta>,
}

/// Recovers the owning message, ordered members and local name of the oneof
/// `field` belongs to.
pub fn resolve_group<'m>(message: &'m MessageMeta, field: &FieldMeta) -> GenResult<OneofGroup<'m>> {
  let missing = |oneof: &str| GenError::MissingOneofGroup {
    message: message.identity.to_string(),
    field: field.name.clone(),
    oneof: oneof.to_string(),
  };

  let group_name = field.oneof.as_deref().ok_or_else(|| missing(""))?;
  let group = message.oneof(group_name).ok_or_else(|| missing(group_name))?;

  let members = group
    .members
    .iter()
    .map(|tag| message.field_by_tag(*tag))
    .collect::<GenResult<Vec<_>>>()?;

  Ok(OneofGroup {
    message,
    name: &group.name,
    local_name: &group.local_name,
    members,
  })
}

/// Builds the tagged union for a resolved group.
pub fn synthesize_oneof(ctx: &TypeContext<'_>, group: &OneofGroup<'_>) -> GenResult<OneofAdt> {
  let discriminator = ctx.discriminator();
  let mut variants = Vec::with_capacity(group.members.len() + 1);

  for member in &group.members {
    /* resolve_message never hands a member the discriminator's name */
    if member.local_name == discriminator {
      return Err(GenError::DiscriminatorCollision {
        message: group.message.identity.to_string(),
        oneof: group.name.to_string(),
        field: member.name.clone(),
      });
    }
    variants.push(OneofVariant::Member {
      tag: member.tag,
      local_name: member.local_name.clone(),
      ty: base_type(ctx, group.message, member)?,
      optional: member.optional,
    });
  }
  variants.push(OneofVariant::Empty);

  Ok(OneofAdt {
    name: group.name.to_string(),
    local_name: group.local_name.to_string(),
    discriminator: discriminator.to_string(),
    variants,
  })
}

impl OneofVariant {
  pub fn to_ts_type(&self, discriminator: &str) -> TsType {
    match self {
      OneofVariant::Member {
        local_name,
        ty,
        optional,
        ..
      } => TsType::Record(vec![
        TsProperty::new(discriminator, TsType::StringLiteral(local_name.clone()), false),
        TsProperty::new(local_name.clone(), ty.clone(), *optional),
      ]),
      OneofVariant::Empty => TsType::Record(vec![TsProperty::new(
        discriminator,
        TsType::primitive(TsPrimitive::Undefined),
        false,
      )]),
    }
  }
}

impl OneofAdt {
  pub fn to_ts_type(&self) -> TsType {
    TsType::Union(
      self.variants
        .iter()
        .map(|variant| variant.to_ts_type(&self.discriminator))
        .collect(),
    )
  }
}
