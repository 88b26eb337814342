use crate::scalar::{LongRepresentation, ScalarKind};
use serde_derive::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Syntax {
    Proto2,
    #[default]
    Proto3,
    /// Protobuf editions; singular fields carry `Label::Optional` when they
    /// track presence.
    Editions,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Label {
    #[default]
    Singular,
    Optional,
    Required,
    Repeated,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct MapType {
    pub key: ScalarKind,
    pub value: Box<FieldType>,
}

/// Kind of a field as written in the schema. Enum and message references carry
/// the type name as written (relative or fully-qualified).
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Scalar(ScalarKind),
    Enum(String),
    Message(String),
    Map(MapType),
    /// Legacy proto2 delimited group.
    Group(String),
}

impl FieldType {
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldType::Scalar(_) => "scalar",
            FieldType::Enum(_) => "enum",
            FieldType::Message(_) => "message",
            FieldType::Map(_) => "map",
            FieldType::Group(_) => "group",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct FieldDescriptor {
    pub name: String,
    pub number: u32,
    #[serde(default)]
    pub label: Label,
    #[serde(rename = "type", with = "serde_yml::with::singleton_map_recursive")]
    pub field_type: FieldType,
    /// Name of the oneof this field belongs to.
    #[serde(default)]
    pub oneof: Option<String>,
    /// Explicit `optional` keyword on a proto3 field.
    #[serde(default)]
    pub proto3_optional: bool,
    /// Per-field override of the 64-bit integer representation (`jstype`).
    #[serde(default)]
    pub jstype: Option<LongRepresentation>,
    #[serde(default)]
    pub json_name: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub trailing_comment: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct OneofDescriptor {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct EnumValueDescriptor {
    pub name: String,
    pub number: i32,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct EnumDescriptor {
    pub name: String,
    pub values: Vec<EnumValueDescriptor>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct MessageDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub oneofs: Vec<OneofDescriptor>,
    #[serde(default)]
    pub nested_messages: Vec<MessageDescriptor>,
    #[serde(default)]
    pub nested_enums: Vec<EnumDescriptor>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub trailing_comment: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
}

impl MessageDescriptor {
    pub fn field_by_number(&self, number: u32) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.number == number)
    }

    pub fn oneof_by_name(&self, name: &str) -> Option<&OneofDescriptor> {
        self.oneofs.iter().find(|oneof| oneof.name == name)
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct FileDescriptor {
    pub name: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub syntax: Syntax,
    #[serde(default)]
    pub messages: Vec<MessageDescriptor>,
    #[serde(default)]
    pub enums: Vec<EnumDescriptor>,
}

/// A set of schema files handed to the generator in one invocation.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Default)]
#[serde(rename_all = "kebab-case")]
pub struct SchemaSet {
    pub files: Vec<FileDescriptor>,
}

impl SchemaSet {
    pub fn extend(&mut self, other: SchemaSet) {
        self.files.extend(other.files);
    }
}
