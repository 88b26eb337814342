//! TypeScript type expressions produced by the field, map and oneof
//! synthesizers.
//!
//! Expressions render in a compact single-line form, e.g.
//! `{kind:"label",label:string}|{kind:undefined}`, so that the same type always
//! renders to the same text.

use serde_derive::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TsPrimitive {
  Boolean,
  Number,
  String,
  #[serde(rename = "bigint")]
  BigInt,
  Uint8Array,
  Undefined,
}

impl TsPrimitive {
  pub fn as_str(self) -> &'static str {
    match self {
      TsPrimitive::Boolean => "boolean",
      TsPrimitive::Number => "number",
      TsPrimitive::String => "string",
      TsPrimitive::BigInt => "bigint",
      TsPrimitive::Uint8Array => "Uint8Array",
      TsPrimitive::Undefined => "undefined",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TsType {
  Primitive(TsPrimitive),
  /// Named type resolved through the symbol table.
  Reference(String),
  StringLiteral(String),
  Array(Box<TsType>),
  /// Structural `{[key:K]:V}` mapping.
  IndexSignature { key: Box<TsType>, value: Box<TsType> },
  /// Anonymous object type.
  Record(Vec<TsProperty>),
  Union(Vec<TsType>),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TsProperty {
  pub name: String,
  #[serde(rename = "type")]
  pub ty: TsType,
  pub optional: bool,
}

impl TsProperty {
  pub fn new(name: impl Into<String>, ty: TsType, optional: bool) -> Self {
    Self {
      name: name.into(),
      ty,
      optional,
    }
  }
}

impl TsType {
  pub fn primitive(prim: TsPrimitive) -> Self {
    TsType::Primitive(prim)
  }

  pub fn reference(name: impl Into<String>) -> Self {
    TsType::Reference(name.into())
  }

  pub fn array_of(element: TsType) -> Self {
    TsType::Array(Box::new(element))
  }

  pub fn index_signature(key: TsType, value: TsType) -> Self {
    TsType::IndexSignature {
      key: Box::new(key),
      value: Box::new(value),
    }
  }

  /// Union with `undefined`, used for optional parameters that cannot take
  /// the `?` marker.
  pub fn or_undefined(self) -> Self {
    match self {
      TsType::Union(mut members) => {
        members.push(TsType::Primitive(TsPrimitive::Undefined));
        TsType::Union(members)
      }
      other => TsType::Union(vec![other, TsType::Primitive(TsPrimitive::Undefined)]),
    }
  }
}

impl fmt::Display for TsProperty {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let marker = if self.optional { "?" } else { "" };
    write!(f, "{}{}:{}", self.name, marker, self.ty)
  }
}

impl fmt::Display for TsType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TsType::Primitive(prim) => f.write_str(prim.as_str()),
      TsType::Reference(name) => f.write_str(name),
      TsType::StringLiteral(value) => {
        f.write_str(&super::helpers::ts_string_literal(value))
      }
      TsType::Array(element) => match element.as_ref() {
        TsType::Union(_) => write!(f, "({})[]", element),
        _ => write!(f, "{}[]", element),
      },
      TsType::IndexSignature { key, value } => write!(f, "{{[key:{}]:{}}}", key, value),
      TsType::Record(properties) => {
        f.write_str("{")?;
        for (idx, property) in properties.iter().enumerate() {
          if idx > 0 {
            f.write_str(",")?;
          }
          write!(f, "{}", property)?;
        }
        f.write_str("}")
      }
      TsType::Union(members) => {
        for (idx, member) in members.iter().enumerate() {
          if idx > 0 {
            f.write_str("|")?;
          }
          write!(f, "{}", member)?;
        }
        Ok(())
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_compact_records_and_unions() {
    let union = TsType::Union(vec![
      TsType::Record(vec![
        TsProperty::new("kind", TsType::StringLiteral("label".into()), false),
        TsProperty::new("label", TsType::primitive(TsPrimitive::String), false),
      ]),
      TsType::Record(vec![TsProperty::new(
        "kind",
        TsType::primitive(TsPrimitive::Undefined),
        false,
      )]),
    ]);
    assert_eq!(union.to_string(), r#"{kind:"label",label:string}|{kind:undefined}"#);
  }

  #[test]
  fn arrays_parenthesize_unions() {
    let plain = TsType::array_of(TsType::reference("Point"));
    assert_eq!(plain.to_string(), "Point[]");

    let union = TsType::array_of(TsType::Union(vec![
      TsType::primitive(TsPrimitive::String),
      TsType::primitive(TsPrimitive::Number),
    ]));
    assert_eq!(union.to_string(), "(string|number)[]");
  }

  #[test]
  fn index_signature_and_optional_properties() {
    let map = TsType::index_signature(
      TsType::primitive(TsPrimitive::String),
      TsType::primitive(TsPrimitive::BigInt),
    );
    assert_eq!(map.to_string(), "{[key:string]:bigint}");

    let record = TsType::Record(vec![TsProperty::new("note", map, true)]);
    assert_eq!(record.to_string(), "{note?:{[key:string]:bigint}}");
  }

  #[test]
  fn or_undefined_flattens_unions() {
    let single = TsType::primitive(TsPrimitive::Number).or_undefined();
    assert_eq!(single.to_string(), "number|undefined");

    let union = TsType::Union(vec![TsType::reference("A"), TsType::reference("B")]).or_undefined();
    assert_eq!(union.to_string(), "A|B|undefined");
  }
}
