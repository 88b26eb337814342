//! Naming rules for generated declarations and properties.

use crate::codegen::ts_gen::helpers::escape_ts_keyword;
use convert_case::{Case, Casing};
use std::collections::HashSet;

/// Suffix appended to a message's TypeScript name for its constructor class.
pub const CONSTRUCTOR_CLASS_SUFFIX: &str = "Class";

/* Nested declarations are flattened: Outer.Inner -> Outer_Inner */
pub fn nested_ts_name(path: &[&str]) -> String {
    path.join("_")
}

pub fn constructor_class_name(ts_name: &str) -> String {
    format!("{}{}", ts_name, CONSTRUCTOR_CLASS_SUFFIX)
}

/// lowerCamelCase property name for a schema field or oneof, with reserved words
/// escaped.
pub fn local_property_name(schema_name: &str) -> String {
    let camel = schema_name.to_case(Case::Camel);
    let camel = if camel.is_empty() {
        schema_name.to_string()
    } else {
        camel
    };
    escape_ts_keyword(&camel)
}

/// Hands out property names that are unique within one message.
#[derive(Debug, Default)]
pub struct LocalNameAllocator {
    used: HashSet<String>,
}

impl LocalNameAllocator {
    pub fn allocate(&mut self, schema_name: &str) -> String {
        self.allocate_avoiding(schema_name, None)
    }

    /// Like `allocate`, but also treats `reserved` as taken.
    pub fn allocate_avoiding(&mut self, schema_name: &str, reserved: Option<&str>) -> String {
        let mut name = local_property_name(schema_name);
        while self.used.contains(&name) || reserved == Some(name.as_str()) {
            name.push('_');
        }
        self.used.insert(name.clone());
        name
    }
}
