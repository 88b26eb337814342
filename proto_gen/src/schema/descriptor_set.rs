//! Adapter from a compiled `FileDescriptorSet` (`protoc --descriptor_set_out`,
//! `buf build -o`) to the schema model.
//!
//! Map fields arrive as repeated references to synthetic `*Entry` messages and
//! proto3 `optional` fields arrive inside synthetic oneofs; both are folded back
//! into their schema-level form here.
//!
//! Singular fields of editions files get the editions default, explicit
//! presence. `prost-types` does not decode `FeatureSet`, so a
//! `field_presence = IMPLICIT` override is not visible here and such fields are
//! still emitted as optional.

use super::loader::LoadError;
use prost::Message;
use prost_types::field_descriptor_proto::{Label as ProtoLabel, Type as ProtoType};
use prost_types::field_options::JsType;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, FieldDescriptorProto, FileDescriptorProto,
    FileDescriptorSet, SourceCodeInfo,
};
use proto_types::{
    EnumDescriptor, EnumValueDescriptor, FieldDescriptor, FieldType, FileDescriptor, Label,
    LongRepresentation, MapType, MessageDescriptor, OneofDescriptor, ScalarKind, SchemaSet, Syntax,
};
use std::collections::HashMap;

/* Field numbers inside descriptor.proto used by SourceCodeInfo paths */
const FILE_MESSAGE_TYPE: i32 = 4;
const FILE_ENUM_TYPE: i32 = 5;
const MESSAGE_FIELD: i32 = 2;
const MESSAGE_NESTED_TYPE: i32 = 3;
const MESSAGE_ENUM_TYPE: i32 = 4;
const MESSAGE_ONEOF_DECL: i32 = 8;
const ENUM_VALUE: i32 = 2;

pub fn decode_descriptor_set(bytes: &[u8]) -> Result<SchemaSet, LoadError> {
    let set = FileDescriptorSet::decode(bytes)?;
    from_file_descriptor_set(&set)
}

pub fn from_file_descriptor_set(set: &FileDescriptorSet) -> Result<SchemaSet, LoadError> {
    let files = set
        .file
        .iter()
        .map(convert_file)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaSet { files })
}

#[derive(Default)]
struct Comments {
    by_path: HashMap<Vec<i32>, (Option<String>, Option<String>)>,
}

impl Comments {
    fn new(info: Option<&SourceCodeInfo>) -> Self {
        let mut by_path = HashMap::new();
        if let Some(info) = info {
            for location in &info.location {
                let leading = location.leading_comments.as_deref().and_then(clean_comment);
                let trailing = location.trailing_comments.as_deref().and_then(clean_comment);
                if leading.is_some() || trailing.is_some() {
                    by_path.insert(location.path.clone(), (leading, trailing));
                }
            }
        }
        Self { by_path }
    }

    fn leading(&self, path: &[i32]) -> Option<String> {
        self.by_path.get(path).and_then(|(leading, _)| leading.clone())
    }

    fn trailing(&self, path: &[i32]) -> Option<String> {
        self.by_path.get(path).and_then(|(_, trailing)| trailing.clone())
    }
}

/* protoc keeps the space after '//' and the final newline */
fn clean_comment(raw: &str) -> Option<String> {
    let text = raw
        .lines()
        .map(|line| line.strip_prefix(' ').unwrap_or(line).trim_end())
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim_matches('\n').to_string();
    if text.is_empty() { None } else { Some(text) }
}

struct FileContext<'a> {
    syntax: Syntax,
    comments: &'a Comments,
}

fn convert_file(file: &FileDescriptorProto) -> Result<FileDescriptor, LoadError> {
    let syntax = match file.syntax() {
        "proto3" => Syntax::Proto3,
        "editions" => Syntax::Editions,
        _ => Syntax::Proto2,
    };
    let comments = Comments::new(file.source_code_info.as_ref());
    let ctx = FileContext {
        syntax,
        comments: &comments,
    };

    let package = file.package.clone().filter(|p| !p.is_empty());
    let scope = package.as_deref().map(|p| format!(".{}", p)).unwrap_or_default();

    let messages = file
        .message_type
        .iter()
        .enumerate()
        .map(|(idx, message)| convert_message(&ctx, &scope, vec![FILE_MESSAGE_TYPE, idx as i32], message))
        .collect::<Result<Vec<_>, _>>()?;
    let enums = file
        .enum_type
        .iter()
        .enumerate()
        .map(|(idx, enum_desc)| convert_enum(&ctx, vec![FILE_ENUM_TYPE, idx as i32], enum_desc))
        .collect();

    Ok(FileDescriptor {
        name: file.name().to_string(),
        package,
        syntax,
        messages,
        enums,
    })
}

fn convert_message(
    ctx: &FileContext<'_>,
    scope: &str,
    path: Vec<i32>,
    message: &DescriptorProto,
) -> Result<MessageDescriptor, LoadError> {
    let full_name = format!("{}.{}", scope, message.name());

    /* Map entry messages are folded into their fields */
    let mut map_entries: HashMap<String, MapType> = HashMap::new();
    let mut nested_messages = Vec::new();
    for (idx, nested) in message.nested_type.iter().enumerate() {
        let is_map_entry = nested.options.as_ref().is_some_and(|o| o.map_entry());
        if is_map_entry {
            let entry_name = format!("{}.{}", full_name, nested.name());
            map_entries.insert(entry_name, map_entry_type(nested)?);
        } else {
            let mut nested_path = path.clone();
            nested_path.extend([MESSAGE_NESTED_TYPE, idx as i32]);
            nested_messages.push(convert_message(ctx, &full_name, nested_path, nested)?);
        }
    }

    let nested_enums = message
        .enum_type
        .iter()
        .enumerate()
        .map(|(idx, enum_desc)| {
            let mut enum_path = path.clone();
            enum_path.extend([MESSAGE_ENUM_TYPE, idx as i32]);
            convert_enum(ctx, enum_path, enum_desc)
        })
        .collect();

    /* Synthetic oneofs hold exactly one proto3 `optional` field */
    let synthetic: Vec<bool> = (0..message.oneof_decl.len())
        .map(|idx| {
            message
                .field
                .iter()
                .any(|f| f.proto3_optional() && f.oneof_index == Some(idx as i32))
        })
        .collect();

    let oneofs = message
        .oneof_decl
        .iter()
        .enumerate()
        .filter(|(idx, _)| !synthetic[*idx])
        .map(|(idx, oneof)| {
            let mut oneof_path = path.clone();
            oneof_path.extend([MESSAGE_ONEOF_DECL, idx as i32]);
            OneofDescriptor {
                name: oneof.name().to_string(),
                comment: ctx.comments.leading(&oneof_path),
            }
        })
        .collect();

    let fields = message
        .field
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let mut field_path = path.clone();
            field_path.extend([MESSAGE_FIELD, idx as i32]);
            convert_field(ctx, message, &map_entries, &synthetic, field_path, field)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MessageDescriptor {
        name: message.name().to_string(),
        fields,
        oneofs,
        nested_messages,
        nested_enums,
        comment: ctx.comments.leading(&path),
        trailing_comment: ctx.comments.trailing(&path),
        deprecated: message.options.as_ref().is_some_and(|o| o.deprecated()),
    })
}

fn convert_field(
    ctx: &FileContext<'_>,
    message: &DescriptorProto,
    map_entries: &HashMap<String, MapType>,
    synthetic: &[bool],
    path: Vec<i32>,
    field: &FieldDescriptorProto,
) -> Result<FieldDescriptor, LoadError> {
    let number = u32::try_from(field.number()).map_err(|_| {
        LoadError::MalformedDescriptor(format!(
            "field '{}.{}' has invalid number {}",
            message.name(),
            field.name(),
            field.number()
        ))
    })?;

    let map_type = match field.r#type() {
        ProtoType::Message => map_entries.get(field.type_name()).cloned(),
        _ => None,
    };

    let (field_type, label) = match map_type {
        Some(map) => (FieldType::Map(map), Label::Singular),
        None => {
            let label = match field.label() {
                ProtoLabel::Repeated => Label::Repeated,
                ProtoLabel::Required => Label::Required,
                ProtoLabel::Optional if ctx.syntax == Syntax::Proto3 => Label::Singular,
                ProtoLabel::Optional => Label::Optional,
            };
            (convert_type(field)?, label)
        }
    };

    let oneof = match field.oneof_index {
        Some(idx) if !field.proto3_optional() => {
            let idx = usize::try_from(idx).ok().filter(|i| *i < synthetic.len());
            let oneof = idx.and_then(|i| message.oneof_decl.get(i)).ok_or_else(|| {
                LoadError::MalformedDescriptor(format!(
                    "field '{}.{}' references a missing oneof",
                    message.name(),
                    field.name()
                ))
            })?;
            Some(oneof.name().to_string())
        }
        _ => None,
    };

    let jstype = field.options.as_ref().and_then(|options| match options.jstype() {
        JsType::JsNormal => None,
        JsType::JsString => Some(LongRepresentation::String),
        JsType::JsNumber => Some(LongRepresentation::Number),
    });

    Ok(FieldDescriptor {
        name: field.name().to_string(),
        number,
        label,
        field_type,
        oneof,
        proto3_optional: field.proto3_optional(),
        jstype,
        json_name: field.json_name.clone(),
        comment: ctx.comments.leading(&path),
        trailing_comment: ctx.comments.trailing(&path),
        deprecated: field.options.as_ref().is_some_and(|o| o.deprecated()),
    })
}

fn convert_type(field: &FieldDescriptorProto) -> Result<FieldType, LoadError> {
    let kind = match field.r#type() {
        ProtoType::Double => ScalarKind::Double,
        ProtoType::Float => ScalarKind::Float,
        ProtoType::Int64 => ScalarKind::Int64,
        ProtoType::Uint64 => ScalarKind::Uint64,
        ProtoType::Int32 => ScalarKind::Int32,
        ProtoType::Fixed64 => ScalarKind::Fixed64,
        ProtoType::Fixed32 => ScalarKind::Fixed32,
        ProtoType::Bool => ScalarKind::Bool,
        ProtoType::String => ScalarKind::String,
        ProtoType::Bytes => ScalarKind::Bytes,
        ProtoType::Uint32 => ScalarKind::Uint32,
        ProtoType::Sfixed32 => ScalarKind::Sfixed32,
        ProtoType::Sfixed64 => ScalarKind::Sfixed64,
        ProtoType::Sint32 => ScalarKind::Sint32,
        ProtoType::Sint64 => ScalarKind::Sint64,
        ProtoType::Enum => return Ok(FieldType::Enum(field.type_name().to_string())),
        ProtoType::Message => return Ok(FieldType::Message(field.type_name().to_string())),
        ProtoType::Group => return Ok(FieldType::Group(field.type_name().to_string())),
    };
    Ok(FieldType::Scalar(kind))
}

fn map_entry_type(entry: &DescriptorProto) -> Result<MapType, LoadError> {
    let find = |number: i32| {
        entry
            .field
            .iter()
            .find(|f| f.number() == number)
            .ok_or_else(|| {
                LoadError::MalformedDescriptor(format!(
                    "map entry '{}' is missing field {}",
                    entry.name(),
                    number
                ))
            })
    };
    let key = match convert_type(find(1)?)? {
        FieldType::Scalar(kind) => kind,
        other => {
            return Err(LoadError::MalformedDescriptor(format!(
                "map entry '{}' has non-scalar key of kind '{}'",
                entry.name(),
                other.kind_name()
            )));
        }
    };
    let value = convert_type(find(2)?)?;
    Ok(MapType {
        key,
        value: Box::new(value),
    })
}

fn convert_enum(ctx: &FileContext<'_>, path: Vec<i32>, enum_desc: &EnumDescriptorProto) -> EnumDescriptor {
    let values = enum_desc
        .value
        .iter()
        .enumerate()
        .map(|(idx, value)| {
            let mut value_path = path.clone();
            value_path.extend([ENUM_VALUE, idx as i32]);
            EnumValueDescriptor {
                name: value.name().to_string(),
                number: value.number(),
                comment: ctx.comments.leading(&value_path),
                deprecated: value.options.as_ref().is_some_and(|o| o.deprecated()),
            }
        })
        .collect();

    EnumDescriptor {
        name: enum_desc.name().to_string(),
        values,
        comment: ctx.comments.leading(&path),
        deprecated: enum_desc.options.as_ref().is_some_and(|o| o.deprecated()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::source_code_info::Location;
    use prost_types::{FieldOptions, MessageOptions, OneofDescriptorProto};

    fn proto_field(name: &str, number: i32, ty: ProtoType, label: ProtoLabel) -> FieldDescriptorProto {
        FieldDescriptorProto {
            name: Some(name.to_string()),
            number: Some(number),
            label: Some(label as i32),
            r#type: Some(ty as i32),
            ..Default::default()
        }
    }

    fn shapes_file() -> FileDescriptorProto {
        let mut area = proto_field("area", 2, ProtoType::Uint64, ProtoLabel::Optional);
        area.options = Some(FieldOptions {
            jstype: Some(JsType::JsNumber as i32),
            ..Default::default()
        });

        let mut label = proto_field("label", 3, ProtoType::String, ProtoLabel::Optional);
        label.oneof_index = Some(0);
        let mut anchor = proto_field("anchor", 4, ProtoType::Message, ProtoLabel::Optional);
        anchor.type_name = Some(".demo.Point".to_string());
        anchor.oneof_index = Some(0);

        let mut note = proto_field("note", 5, ProtoType::String, ProtoLabel::Optional);
        note.oneof_index = Some(1);
        note.proto3_optional = Some(true);

        let mut tags = proto_field("tags", 6, ProtoType::Message, ProtoLabel::Repeated);
        tags.type_name = Some(".demo.Shape.TagsEntry".to_string());

        let tags_entry = DescriptorProto {
            name: Some("TagsEntry".to_string()),
            field: vec![
                proto_field("key", 1, ProtoType::Bool, ProtoLabel::Optional),
                proto_field("value", 2, ProtoType::Int64, ProtoLabel::Optional),
            ],
            options: Some(MessageOptions {
                map_entry: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };

        let shape = DescriptorProto {
            name: Some("Shape".to_string()),
            field: vec![
                proto_field("width", 1, ProtoType::Int32, ProtoLabel::Optional),
                area,
                label,
                anchor,
                note,
                tags,
            ],
            nested_type: vec![tags_entry],
            oneof_decl: vec![
                OneofDescriptorProto {
                    name: Some("selector".to_string()),
                    options: None,
                },
                OneofDescriptorProto {
                    name: Some("_note".to_string()),
                    options: None,
                },
            ],
            ..Default::default()
        };

        FileDescriptorProto {
            name: Some("demo/shapes.proto".to_string()),
            package: Some("demo".to_string()),
            message_type: vec![
                DescriptorProto {
                    name: Some("Point".to_string()),
                    ..Default::default()
                },
                shape,
            ],
            syntax: Some("proto3".to_string()),
            source_code_info: Some(SourceCodeInfo {
                location: vec![
                    Location {
                        path: vec![4, 1],
                        leading_comments: Some(" A drawable shape.\n".to_string()),
                        ..Default::default()
                    },
                    Location {
                        path: vec![4, 1, 2, 0],
                        trailing_comments: Some(" in pixels\n".to_string()),
                        ..Default::default()
                    },
                ],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn converts_descriptor_set() {
        let set = FileDescriptorSet {
            file: vec![shapes_file()],
        };
        let bytes = set.encode_to_vec();
        let schema = decode_descriptor_set(&bytes).unwrap();

        let file = &schema.files[0];
        assert_eq!(file.package.as_deref(), Some("demo"));
        assert_eq!(file.syntax, Syntax::Proto3);

        let shape = &file.messages[1];
        assert_eq!(shape.comment.as_deref(), Some("A drawable shape."));
        assert!(shape.nested_messages.is_empty(), "map entries are folded away");

        /* synthetic oneof dropped, real one kept */
        let oneofs: Vec<&str> = shape.oneofs.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(oneofs, ["selector"]);

        let width = &shape.fields[0];
        assert_eq!(width.label, Label::Singular);
        assert_eq!(width.trailing_comment.as_deref(), Some("in pixels"));

        assert_eq!(shape.fields[1].jstype, Some(LongRepresentation::Number));
        assert_eq!(shape.fields[3].oneof.as_deref(), Some("selector"));
        assert_eq!(shape.fields[3].field_type, FieldType::Message(".demo.Point".to_string()));

        let note = &shape.fields[4];
        assert!(note.proto3_optional);
        assert_eq!(note.oneof, None);

        let tags = &shape.fields[5];
        assert_eq!(tags.label, Label::Singular);
        assert_eq!(
            tags.field_type,
            FieldType::Map(MapType {
                key: ScalarKind::Bool,
                value: Box::new(FieldType::Scalar(ScalarKind::Int64)),
            })
        );
    }

    #[test]
    fn proto2_files_keep_optional_labels() {
        let file = FileDescriptorProto {
            name: Some("legacy.proto".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Legacy".to_string()),
                field: vec![proto_field("count", 1, ProtoType::Int32, ProtoLabel::Optional)],
                ..Default::default()
            }],
            ..Default::default()
        };
        let schema = from_file_descriptor_set(&FileDescriptorSet { file: vec![file] }).unwrap();
        assert_eq!(schema.files[0].syntax, Syntax::Proto2);
        assert_eq!(schema.files[0].messages[0].fields[0].label, Label::Optional);
    }

    #[test]
    fn editions_singular_fields_track_presence() {
        let mut anchor = proto_field("anchor", 2, ProtoType::Message, ProtoLabel::Optional);
        anchor.type_name = Some(".modern.Modern".to_string());
        let file = FileDescriptorProto {
            name: Some("modern.proto".to_string()),
            package: Some("modern".to_string()),
            syntax: Some("editions".to_string()),
            message_type: vec![DescriptorProto {
                name: Some("Modern".to_string()),
                field: vec![
                    proto_field("count", 1, ProtoType::Int32, ProtoLabel::Optional),
                    anchor,
                    proto_field("ids", 3, ProtoType::Int64, ProtoLabel::Repeated),
                ],
                ..Default::default()
            }],
            ..Default::default()
        };
        let schema = from_file_descriptor_set(&FileDescriptorSet { file: vec![file] }).unwrap();
        assert_eq!(schema.files[0].syntax, Syntax::Editions);

        let labels: Vec<Label> = schema.files[0].messages[0].fields.iter().map(|f| f.label).collect();
        assert_eq!(labels, [Label::Optional, Label::Optional, Label::Repeated]);
    }

    #[test]
    fn rejects_garbage_bytes() {
        assert!(matches!(
            decode_descriptor_set(&[0xff, 0xff, 0xff]),
            Err(LoadError::Decode(_))
        ));
    }
}
