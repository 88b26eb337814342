//! Class Shape Builder.
//!
//! Walks a message's fields in declaration order and produces the constructor
//! parameter list of its generated class. A oneof contributes one parameter at
//! the position of its first member; later members are skipped.

use super::field_type::{TypeContext, resolve_field_type};
use super::helpers::write_doc_block;
use super::oneof::{OneofAdt, resolve_group, synthesize_oneof};
use super::ts_type::TsType;
use crate::codegen::collab::{
  CommentAttacher, Docs, NameResolver, Placement, SchemaElement, SymbolKind,
};
use crate::config::GeneratorConfig;
use crate::error::{GenError, GenResult};
use crate::schema::meta::MessageMeta;
use crate::schema::pool::SchemaIdentity;
use proto_types::MessageDescriptor;
use serde_derive::Serialize;
use std::collections::HashSet;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "source")]
pub enum ParamSource {
  Field { tag: u32 },
  Oneof { adt: OneofAdt },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CtorParam {
  pub name: String,
  #[serde(rename = "type")]
  pub ty: TsType,
  pub optional: bool,
  #[serde(skip_serializing_if = "Docs::is_empty")]
  pub docs: Docs,
  #[serde(flatten)]
  pub source: ParamSource,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassDecl {
  pub identity: SchemaIdentity,
  pub class_name: String,
  #[serde(skip_serializing_if = "Docs::is_empty")]
  pub docs: Docs,
  pub params: Vec<CtorParam>,
}

pub struct ClassShapeBuilder<'a> {
  ctx: TypeContext<'a>,
  comments: &'a dyn CommentAttacher,
}

impl<'a> ClassShapeBuilder<'a> {
  pub fn new(
    names: &'a dyn NameResolver,
    comments: &'a dyn CommentAttacher,
    config: &'a GeneratorConfig,
  ) -> Self {
    Self {
      ctx: TypeContext::new(names, config),
      comments,
    }
  }

  /// Builds the class declaration of `message`. `descriptor` is the schema
  /// message it was resolved from and supplies documentation.
  pub fn build(&self, message: &MessageMeta, descriptor: &MessageDescriptor) -> GenResult<ClassDecl> {
    let class_name = self
      .ctx
      .names
      .resolve(&message.identity, SymbolKind::ConstructorClass)?;

    let mut processed_groups: HashSet<&str> = HashSet::new();
    let mut params = Vec::with_capacity(message.fields.len());

    for field in &message.fields {
      let source_field =
        descriptor
          .field_by_number(field.tag)
          .ok_or_else(|| GenError::FieldMetaNotFound {
            message: message.identity.to_string(),
            tag: field.tag,
          })?;

      match field.oneof.as_deref() {
        Some(group_name) if processed_groups.contains(group_name) => continue,
        Some(group_name) => {
          let group = resolve_group(message, field)?;
          let oneof_descriptor = descriptor.oneof_by_name(group_name).ok_or_else(|| {
            GenError::MissingOneofGroup {
              message: message.identity.to_string(),
              field: field.name.clone(),
              oneof: group_name.to_string(),
            }
          })?;
          let adt = synthesize_oneof(&self.ctx, &group)?;

          let mut docs = Docs::default();
          self.comments
            .attach(&mut docs, SchemaElement::Oneof(oneof_descriptor), Placement::Leading);

          params.push(CtorParam {
            name: group.local_name.to_string(),
            ty: adt.to_ts_type(),
            optional: false,
            docs,
            source: ParamSource::Oneof { adt },
          });
          processed_groups.insert(group_name);
        }
        None => {
          let mut docs = Docs::default();
          self.comments
            .attach(&mut docs, SchemaElement::Field(source_field), Placement::Leading);
          self.comments
            .attach(&mut docs, SchemaElement::Field(source_field), Placement::Trailing);

          params.push(CtorParam {
            name: field.local_name.clone(),
            ty: resolve_field_type(&self.ctx, message, field)?,
            optional: field.optional,
            docs,
            source: ParamSource::Field { tag: field.tag },
          });
        }
      }
    }

    let mut docs = Docs::default();
    self.comments
      .attach(&mut docs, SchemaElement::Message(descriptor), Placement::Leading);
    self.comments
      .attach(&mut docs, SchemaElement::Message(descriptor), Placement::Trailing);

    Ok(ClassDecl {
      identity: message.identity.clone(),
      class_name,
      docs,
      params,
    })
  }
}

impl ClassDecl {
  pub fn render(&self) -> String {
    let mut output = String::new();
    write_doc_block(&mut output, &self.docs.lines(), "");
    writeln!(output, "export class {} {{", self.class_name).unwrap();

    if self.params.is_empty() {
      output.push_str("  constructor() {}\n");
      output.push_str("}\n");
      return output;
    }

    output.push_str("  constructor(\n");
    for (idx, param) in self.params.iter().enumerate() {
      write_doc_block(&mut output, &param.docs.lines(), "    ");

      /* `?` is only legal when nothing required follows */
      let tail_optional = self.params[idx..].iter().all(|p| p.optional);
      if param.optional && tail_optional {
        writeln!(output, "    public readonly {}?: {},", param.name, param.ty).unwrap();
      } else if param.optional {
        writeln!(
          output,
          "    public readonly {}: {},",
          param.name,
          param.ty.clone().or_undefined()
        )
        .unwrap();
      } else {
        writeln!(output, "    public readonly {}: {},", param.name, param.ty).unwrap();
      }
    }
    output.push_str("  ) {}\n");
    output.push_str("}\n");
    output
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::codegen::collab::SymbolRegistry;
  use crate::codegen::symbols::{DescriptorComments, SymbolTable};
  use crate::schema::meta::resolve_message;
  use crate::schema::pool::DescriptorPool;
  use proto_types::{
    FieldDescriptor, FieldType, FileDescriptor, Label, LongRepresentation, OneofDescriptor,
    ScalarKind, SchemaSet,
  };

  fn field(name: &str, number: u32, field_type: FieldType) -> FieldDescriptor {
    FieldDescriptor {
      name: name.to_string(),
      number,
      label: Label::Singular,
      field_type,
      oneof: None,
      proto3_optional: false,
      jstype: None,
      json_name: None,
      comment: None,
      trailing_comment: None,
      deprecated: false,
    }
  }

  fn in_selector(mut field: FieldDescriptor) -> FieldDescriptor {
    field.oneof = Some("selector".to_string());
    field
  }

  fn schema(fields: Vec<FieldDescriptor>) -> SchemaSet {
    SchemaSet {
      files: vec![FileDescriptor {
        name: "shapes.proto".to_string(),
        package: Some("demo".to_string()),
        messages: vec![
          MessageDescriptor {
            name: "Shape".to_string(),
            fields,
            oneofs: vec![OneofDescriptor {
              name: "selector".to_string(),
              comment: Some("What the shape is attached to.".to_string()),
            }],
            comment: Some("A drawable shape.".to_string()),
            ..Default::default()
          },
          MessageDescriptor {
            name: "Point".to_string(),
            ..Default::default()
          },
        ],
        ..Default::default()
      }],
    }
  }

  fn build(set: &SchemaSet, config: &GeneratorConfig) -> GenResult<ClassDecl> {
    let pool = DescriptorPool::build(set);
    let table = SymbolTable::new();
    for (identity, entry) in pool.messages() {
      let ts_name = pool.ts_name(identity).unwrap();
      table
        .register(ts_name, identity, &entry.file.name, SymbolKind::Message)
        .unwrap();
      table
        .register(
          &format!("{}Class", ts_name),
          identity,
          &entry.file.name,
          SymbolKind::ConstructorClass,
        )
        .unwrap();
    }

    let identity = SchemaIdentity::new("demo.Shape");
    let meta = resolve_message(&pool, &identity, &config.discriminator_field_name)?;
    let descriptor = pool.message(&identity)?.descriptor;
    ClassShapeBuilder::new(&table, &DescriptorComments, config).build(&meta, descriptor)
  }

  fn shape_fields() -> Vec<FieldDescriptor> {
    vec![
      field("width", 1, FieldType::Scalar(ScalarKind::Int32)),
      field("area", 2, FieldType::Scalar(ScalarKind::Uint64)),
      in_selector(field("label", 3, FieldType::Scalar(ScalarKind::String))),
      in_selector(field("anchor", 4, FieldType::Message("Point".to_string()))),
    ]
  }

  #[test]
  fn shape_scenario() {
    let set = schema(shape_fields());
    let decl = build(&set, &GeneratorConfig::default()).unwrap();

    assert_eq!(decl.class_name, "ShapeClass");
    let params: Vec<(String, String, bool)> = decl
      .params
      .iter()
      .map(|p| (p.name.clone(), p.ty.to_string(), p.optional))
      .collect();
    assert_eq!(
      params,
      [
        ("width".to_string(), "number".to_string(), false),
        ("area".to_string(), "string".to_string(), false),
        (
          "selector".to_string(),
          r#"{kind:"label",label:string}|{kind:"anchor",anchor:Point}|{kind:undefined}"#
            .to_string(),
          false
        ),
      ]
    );
    assert_eq!(decl.params[2].docs.leading, ["What the shape is attached to."]);
  }

  #[test]
  fn building_twice_is_identical() {
    let set = schema(shape_fields());
    let config = GeneratorConfig::new("kind", LongRepresentation::Number);
    let first = build(&set, &config).unwrap();
    let second = build(&set, &config).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.render(), second.render());
  }

  #[test]
  fn renders_class_with_optional_markers() {
    let mut note = field("note", 5, FieldType::Scalar(ScalarKind::String));
    note.proto3_optional = true;
    let anchor = field("anchor", 6, FieldType::Message("Point".to_string()));
    let mut tags = field("tags", 7, FieldType::Scalar(ScalarKind::String));
    tags.label = Label::Repeated;
    tags.comment = Some("Free-form labels.".to_string());

    let set = schema(vec![note, tags, anchor]);
    let rendered = build(&set, &GeneratorConfig::default()).unwrap().render();

    let expected = "\
/**
 * A drawable shape.
 */
export class ShapeClass {
  constructor(
    public readonly note: string|undefined,
    /**
     * Free-form labels.
     */
    public readonly tags: string[],
    public readonly anchor?: Point,
  ) {}
}
";
    assert_eq!(rendered, expected);
  }

  #[test]
  fn oneof_member_named_like_discriminator_is_escaped() {
    let set = schema(vec![
      in_selector(field("kind", 3, FieldType::Scalar(ScalarKind::String))),
      in_selector(field("anchor", 4, FieldType::Message("Point".to_string()))),
    ]);
    let decl = build(&set, &GeneratorConfig::default()).unwrap();
    assert_eq!(
      decl.params[0].ty.to_string(),
      r#"{kind:"kind_",kind_:string}|{kind:"anchor",anchor:Point}|{kind:undefined}"#
    );

    let custom = GeneratorConfig::new("anchor", LongRepresentation::String);
    let decl = build(&set, &custom).unwrap();
    assert_eq!(
      decl.params[0].ty.to_string(),
      r#"{anchor:"kind",kind:string}|{anchor:"anchor_",anchor_:Point}|{anchor:undefined}"#
    );
  }

  #[test]
  fn group_fields_abort_the_message() {
    let set = schema(vec![
      field("width", 1, FieldType::Scalar(ScalarKind::Int32)),
      field("legacy", 2, FieldType::Group("Legacy".to_string())),
    ]);
    assert!(matches!(
      build(&set, &GeneratorConfig::default()),
      Err(GenError::UnsupportedFieldKind { ref field, .. }) if field == "legacy"
    ));
  }

  #[test]
  fn empty_message_renders_empty_constructor() {
    let set = schema(vec![]);
    let decl = build(&set, &GeneratorConfig::default()).unwrap();
    assert!(decl.params.is_empty());
    assert!(decl.render().ends_with("export class ShapeClass {\n  constructor() {}\n}\n"));
  }
}
