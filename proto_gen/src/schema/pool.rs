//! Index of every message and enum in a schema set, keyed by fully-qualified
//! identity.

use super::names::nested_ts_name;
use crate::error::{GenError, GenResult};
use indexmap::IndexMap;
use proto_types::{EnumDescriptor, FileDescriptor, MessageDescriptor, SchemaSet};
use serde_derive::Serialize;
use std::fmt;

/// Fully-qualified schema name without a leading dot, e.g. `demo.shapes.Point`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SchemaIdentity(String);

impl SchemaIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix('.') {
            Some(stripped) => Self(stripped.to_string()),
            None => Self(name),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_string())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }
}

impl fmt::Display for SchemaIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MessageEntry<'a> {
    pub descriptor: &'a MessageDescriptor,
    pub file: &'a FileDescriptor,
}

#[derive(Debug, Clone, Copy)]
pub struct EnumEntry<'a> {
    pub descriptor: &'a EnumDescriptor,
    pub file: &'a FileDescriptor,
}

/// Declaration-ordered lookup tables over a borrowed `SchemaSet`.
pub struct DescriptorPool<'a> {
    messages: IndexMap<SchemaIdentity, MessageEntry<'a>>,
    enums: IndexMap<SchemaIdentity, EnumEntry<'a>>,
    ts_names: IndexMap<SchemaIdentity, String>,
}

impl<'a> DescriptorPool<'a> {
    pub fn build(set: &'a SchemaSet) -> Self {
        let mut pool = Self {
            messages: IndexMap::new(),
            enums: IndexMap::new(),
            ts_names: IndexMap::new(),
        };
        for file in &set.files {
            let root = SchemaIdentity::new(file.package.clone().unwrap_or_default());
            for message in &file.messages {
                pool.add_message(file, &root, &[], message);
            }
            for enum_desc in &file.enums {
                pool.add_enum(file, &root, &[], enum_desc);
            }
        }
        pool
    }

    fn add_message(
        &mut self,
        file: &'a FileDescriptor,
        scope: &SchemaIdentity,
        outer: &[&str],
        message: &'a MessageDescriptor,
    ) {
        let identity = scope.child(&message.name);
        let mut path: Vec<&str> = outer.to_vec();
        path.push(&message.name);

        self.ts_names
            .entry(identity.clone())
            .or_insert_with(|| nested_ts_name(&path));
        self.messages.entry(identity.clone()).or_insert(MessageEntry {
            descriptor: message,
            file,
        });

        for nested in &message.nested_messages {
            self.add_message(file, &identity, &path, nested);
        }
        for nested in &message.nested_enums {
            self.add_enum(file, &identity, &path, nested);
        }
    }

    fn add_enum(
        &mut self,
        file: &'a FileDescriptor,
        scope: &SchemaIdentity,
        outer: &[&str],
        enum_desc: &'a EnumDescriptor,
    ) {
        let identity = scope.child(&enum_desc.name);
        let mut path: Vec<&str> = outer.to_vec();
        path.push(&enum_desc.name);

        self.ts_names
            .entry(identity.clone())
            .or_insert_with(|| nested_ts_name(&path));
        self.enums.entry(identity).or_insert(EnumEntry {
            descriptor: enum_desc,
            file,
        });
    }

    pub fn message(&self, identity: &SchemaIdentity) -> GenResult<MessageEntry<'a>> {
        self.messages
            .get(identity)
            .copied()
            .ok_or_else(|| GenError::UnknownType {
                identity: identity.to_string(),
            })
    }

    pub fn enum_type(&self, identity: &SchemaIdentity) -> GenResult<EnumEntry<'a>> {
        self.enums
            .get(identity)
            .copied()
            .ok_or_else(|| GenError::UnknownType {
                identity: identity.to_string(),
            })
    }

    /// TypeScript declaration name for a message or enum (`Outer_Inner`).
    pub fn ts_name(&self, identity: &SchemaIdentity) -> Option<&str> {
        self.ts_names.get(identity).map(String::as_str)
    }

    pub fn messages(&self) -> impl Iterator<Item = (&SchemaIdentity, &MessageEntry<'a>)> {
        self.messages.iter()
    }

    pub fn enums(&self) -> impl Iterator<Item = (&SchemaIdentity, &EnumEntry<'a>)> {
        self.enums.iter()
    }

    pub fn resolve_message_name(&self, scope: &SchemaIdentity, name: &str) -> GenResult<SchemaIdentity> {
        self.resolve_in_scope(scope, name, |id| self.messages.contains_key(id))
    }

    pub fn resolve_enum_name(&self, scope: &SchemaIdentity, name: &str) -> GenResult<SchemaIdentity> {
        self.resolve_in_scope(scope, name, |id| self.enums.contains_key(id))
    }

    /* Protobuf scoping: a leading '.' means fully-qualified, otherwise search from
     * the innermost scope outward. */
    fn resolve_in_scope(
        &self,
        scope: &SchemaIdentity,
        name: &str,
        exists: impl Fn(&SchemaIdentity) -> bool,
    ) -> GenResult<SchemaIdentity> {
        if name.starts_with('.') {
            let identity = SchemaIdentity::new(name);
            return if exists(&identity) {
                Ok(identity)
            } else {
                Err(GenError::UnknownType {
                    identity: identity.to_string(),
                })
            };
        }

        let mut current = scope.as_str();
        loop {
            let candidate = SchemaIdentity::new(current).child(name);
            if exists(&candidate) {
                return Ok(candidate);
            }
            if current.is_empty() {
                break;
            }
            current = match current.rfind('.') {
                Some(idx) => &current[..idx],
                None => "",
            };
        }

        Err(GenError::UnknownType {
            identity: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_types::EnumValueDescriptor;

    fn schema() -> SchemaSet {
        let inner = MessageDescriptor {
            name: "Inner".to_string(),
            ..Default::default()
        };
        let outer = MessageDescriptor {
            name: "Outer".to_string(),
            nested_messages: vec![inner],
            nested_enums: vec![EnumDescriptor {
                name: "Mode".to_string(),
                values: vec![EnumValueDescriptor {
                    name: "MODE_UNSPECIFIED".to_string(),
                    number: 0,
                    comment: None,
                    deprecated: false,
                }],
                comment: None,
                deprecated: false,
            }],
            ..Default::default()
        };
        let point = MessageDescriptor {
            name: "Point".to_string(),
            ..Default::default()
        };
        SchemaSet {
            files: vec![FileDescriptor {
                name: "shapes.proto".to_string(),
                package: Some("demo.shapes".to_string()),
                messages: vec![outer, point],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn indexes_nested_declarations() {
        let set = schema();
        let pool = DescriptorPool::build(&set);

        let inner = SchemaIdentity::new("demo.shapes.Outer.Inner");
        assert!(pool.message(&inner).is_ok());
        assert_eq!(pool.ts_name(&inner), Some("Outer_Inner"));

        let mode = SchemaIdentity::new(".demo.shapes.Outer.Mode");
        assert_eq!(pool.enum_type(&mode).unwrap().descriptor.name, "Mode");
        assert_eq!(pool.ts_name(&mode), Some("Outer_Mode"));

        let order: Vec<&str> = pool.messages().map(|(id, _)| id.as_str()).collect();
        assert_eq!(order, ["demo.shapes.Outer", "demo.shapes.Outer.Inner", "demo.shapes.Point"]);
    }

    #[test]
    fn resolves_relative_names_innermost_first() {
        let set = schema();
        let pool = DescriptorPool::build(&set);
        let scope = SchemaIdentity::new("demo.shapes.Outer");

        assert_eq!(
            pool.resolve_message_name(&scope, "Inner").unwrap().as_str(),
            "demo.shapes.Outer.Inner"
        );
        assert_eq!(
            pool.resolve_message_name(&scope, "Point").unwrap().as_str(),
            "demo.shapes.Point"
        );
        assert_eq!(
            pool.resolve_enum_name(&scope, "Mode").unwrap().as_str(),
            "demo.shapes.Outer.Mode"
        );
        assert_eq!(
            pool.resolve_message_name(&scope, ".demo.shapes.Point").unwrap().as_str(),
            "demo.shapes.Point"
        );
    }

    #[test]
    fn unknown_names_are_errors() {
        let set = schema();
        let pool = DescriptorPool::build(&set);
        let scope = SchemaIdentity::new("demo.shapes.Outer");

        let err = pool.resolve_message_name(&scope, "Missing").unwrap_err();
        assert_eq!(
            err,
            GenError::UnknownType {
                identity: "Missing".to_string()
            }
        );
        /* enums are not messages */
        assert!(pool.resolve_message_name(&scope, "Mode").is_err());
    }
}
