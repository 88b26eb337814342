//! Resolved per-field metadata.
//!
//! A `MessageMeta` is derived once from a message descriptor: type names are
//! resolved to identities, local property names are allocated, and the
//! repeated / optional flags are normalized so the generator never has to look
//! at labels or syntax again.

use super::names::LocalNameAllocator;
use super::pool::{DescriptorPool, SchemaIdentity};
use crate::error::{GenError, GenResult};
use indexmap::IndexMap;
use proto_types::{FieldDescriptor, FieldType, Label, LongRepresentation, ScalarKind, Syntax};
use serde_derive::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    Scalar(ScalarKind),
    Enum(SchemaIdentity),
    Message(SchemaIdentity),
    Map {
        key: ScalarKind,
        value: Box<FieldKind>,
    },
    /// Legacy proto2 group, carried through so the generator can reject it.
    Group(String),
}

impl FieldKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Scalar(_) => "scalar",
            FieldKind::Enum(_) => "enum",
            FieldKind::Message(_) => "message",
            FieldKind::Map { .. } => "map",
            FieldKind::Group(_) => "group",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMeta {
    pub tag: u32,
    pub name: String,
    pub local_name: String,
    pub kind: FieldKind,
    pub repeated: bool,
    pub optional: bool,
    /// Schema name of the oneof this field belongs to.
    pub oneof: Option<String>,
    /// `jstype` override for 64-bit integers.
    pub long_override: Option<LongRepresentation>,
}

impl FieldMeta {
    pub fn long_representation(&self, default: LongRepresentation) -> LongRepresentation {
        self.long_override.unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OneofMeta {
    pub name: String,
    pub local_name: String,
    /// Member tags in declaration order.
    pub members: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageMeta {
    pub identity: SchemaIdentity,
    pub name: String,
    pub ts_name: String,
    pub origin_file: String,
    pub fields: Vec<FieldMeta>,
    pub oneofs: Vec<OneofMeta>,
    #[serde(skip)]
    by_tag: IndexMap<u32, usize>,
}

impl MessageMeta {
    pub fn new(
        identity: SchemaIdentity,
        name: impl Into<String>,
        ts_name: impl Into<String>,
        origin_file: impl Into<String>,
        fields: Vec<FieldMeta>,
        oneofs: Vec<OneofMeta>,
    ) -> Self {
        let by_tag = fields
            .iter()
            .enumerate()
            .map(|(idx, field)| (field.tag, idx))
            .collect();
        Self {
            identity,
            name: name.into(),
            ts_name: ts_name.into(),
            origin_file: origin_file.into(),
            fields,
            oneofs,
            by_tag,
        }
    }

    pub fn field_by_tag(&self, tag: u32) -> GenResult<&FieldMeta> {
        self.by_tag
            .get(&tag)
            .map(|idx| &self.fields[*idx])
            .ok_or_else(|| GenError::FieldMetaNotFound {
                message: self.identity.to_string(),
                tag,
            })
    }

    pub fn oneof(&self, name: &str) -> Option<&OneofMeta> {
        self.oneofs.iter().find(|oneof| oneof.name == name)
    }
}

/// Resolves the metadata of one message from the pool.
///
/// `discriminator` is the tag property of generated oneof unions; no oneof
/// member is given that local name.
pub fn resolve_message(
    pool: &DescriptorPool<'_>,
    identity: &SchemaIdentity,
    discriminator: &str,
) -> GenResult<MessageMeta> {
    let entry = pool.message(identity)?;
    let descriptor = entry.descriptor;
    let syntax = entry.file.syntax;

    let mut names = LocalNameAllocator::default();
    let mut oneof_names: IndexMap<String, String> = IndexMap::new();
    let mut fields = Vec::with_capacity(descriptor.fields.len());

    for field in &descriptor.fields {
        let kind = resolve_kind(pool, identity, &field.field_type)?;
        let is_map = matches!(kind, FieldKind::Map { .. });
        let repeated = field.label == Label::Repeated && !is_map;
        let oneof = if field.proto3_optional {
            None
        } else {
            field.oneof.clone()
        };

        /* The oneof property takes the position of its first member */
        if let Some(group) = &oneof {
            if descriptor.oneof_by_name(group).is_some() && !oneof_names.contains_key(group) {
                let local = names.allocate(group);
                oneof_names.insert(group.clone(), local);
            }
        }

        let optional = !repeated && !is_map && oneof.is_none() && has_presence(field, &kind, syntax);
        let reserved = oneof.as_ref().map(|_| discriminator);

        fields.push(FieldMeta {
            tag: field.number,
            name: field.name.clone(),
            local_name: names.allocate_avoiding(&field.name, reserved),
            kind,
            repeated,
            optional,
            oneof,
            long_override: field.jstype,
        });
    }

    let oneofs = descriptor
        .oneofs
        .iter()
        .map(|oneof| OneofMeta {
            name: oneof.name.clone(),
            local_name: oneof_names
                .get(&oneof.name)
                .cloned()
                .unwrap_or_else(|| names.allocate(&oneof.name)),
            members: fields
                .iter()
                .filter(|field| field.oneof.as_deref() == Some(oneof.name.as_str()))
                .map(|field| field.tag)
                .collect(),
        })
        .collect();

    let ts_name = pool
        .ts_name(identity)
        .map(str::to_string)
        .unwrap_or_else(|| descriptor.name.clone());

    Ok(MessageMeta::new(
        identity.clone(),
        descriptor.name.clone(),
        ts_name,
        entry.file.name.clone(),
        fields,
        oneofs,
    ))
}

/* Presence-tracked singular fields: explicit proto3 `optional`, proto2 and
 * editions `optional`, and singular message references. */
fn has_presence(field: &FieldDescriptor, kind: &FieldKind, syntax: Syntax) -> bool {
    field.proto3_optional
        || (field.label == Label::Optional && syntax != Syntax::Proto3)
        || matches!(kind, FieldKind::Message(_))
}

fn resolve_kind(
    pool: &DescriptorPool<'_>,
    scope: &SchemaIdentity,
    field_type: &FieldType,
) -> GenResult<FieldKind> {
    Ok(match field_type {
        FieldType::Scalar(scalar) => FieldKind::Scalar(*scalar),
        FieldType::Enum(name) => FieldKind::Enum(pool.resolve_enum_name(scope, name)?),
        FieldType::Message(name) => FieldKind::Message(pool.resolve_message_name(scope, name)?),
        FieldType::Map(map) => FieldKind::Map {
            key: map.key,
            value: Box::new(resolve_kind(pool, scope, &map.value)?),
        },
        FieldType::Group(name) => FieldKind::Group(name.clone()),
    })
}
