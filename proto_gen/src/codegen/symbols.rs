//! Default collaborators: the symbol table and descriptor-backed comments.

use super::collab::{
    CommentAttacher, Docs, NameResolver, Placement, SchemaElement, SymbolKind, SymbolRegistry,
};
use crate::error::{GenError, GenResult};
use crate::schema::pool::SchemaIdentity;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// Name declared in the origin file.
    pub name: String,
    /// Name the caller asked for.
    pub requested: String,
    pub identity: SchemaIdentity,
    pub origin_file: String,
    pub kind: SymbolKind,
}

/* Names one output file pulls in from other files */
#[derive(Default)]
struct FileImports {
    local_names: HashMap<(SchemaIdentity, SymbolKind), String>,
    taken: HashSet<String>,
    /* origin file -> import specifiers (`Point` or `Point as Point$1`) */
    by_origin: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Default)]
struct SymbolTableInner {
    by_key: HashMap<(SchemaIdentity, SymbolKind), Symbol>,
    declared: HashMap<String, HashSet<String>>,
    imports: HashMap<String, FileImports>,
}

/// Table of generated TypeScript names.
///
/// Every output file is its own namespace. A declaration whose preferred name
/// is taken in its file gets a `$N` suffix, and a name imported into a file
/// that already uses it locally is aliased the same way.
#[derive(Default)]
pub struct SymbolTable {
    inner: RwLock<SymbolTableInner>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, identity: &SchemaIdentity, kind: SymbolKind) -> GenResult<Symbol> {
        self.inner
            .read()
            .by_key
            .get(&(identity.clone(), kind))
            .cloned()
            .ok_or_else(|| GenError::UnknownType {
                identity: format!("{} ({})", identity, kind),
            })
    }

    pub fn len(&self) -> usize {
        self.inner.read().by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolver that records every reference leaving `file` as an import.
    pub fn scope<'a>(&'a self, file: &str) -> FileScope<'a> {
        FileScope {
            table: self,
            file: file.to_string(),
        }
    }

    /// Import specifiers `file` needs, grouped by the file that declares them.
    pub fn imports_for(&self, file: &str) -> BTreeMap<String, BTreeSet<String>> {
        self.inner
            .read()
            .imports
            .get(file)
            .map(|imports| imports.by_origin.clone())
            .unwrap_or_default()
    }

    /* Local name of `symbol` inside `file`, allocated on first use */
    fn import(&self, file: &str, symbol: &Symbol) -> String {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let key = (symbol.identity.clone(), symbol.kind);

        let declared = inner.declared.get(file);
        let imports = inner.imports.entry(file.to_string()).or_default();
        if let Some(local) = imports.local_names.get(&key) {
            return local.clone();
        }

        let local = unique_name(&symbol.name, |candidate| {
            declared.is_some_and(|names| names.contains(candidate)) || imports.taken.contains(candidate)
        });
        let specifier = if local == symbol.name {
            local.clone()
        } else {
            format!("{} as {}", symbol.name, local)
        };

        imports.taken.insert(local.clone());
        imports.local_names.insert(key, local.clone());
        imports
            .by_origin
            .entry(symbol.origin_file.clone())
            .or_default()
            .insert(specifier);
        local
    }
}

/* `base`, or the first of `base$1`, `base$2`, ... that is free */
fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{}${}", base, n))
        .find(|candidate| !taken(candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

impl SymbolRegistry for SymbolTable {
    fn register(
        &self,
        name: &str,
        identity: &SchemaIdentity,
        origin_file: &str,
        kind: SymbolKind,
    ) -> GenResult<String> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let key = (identity.clone(), kind);

        if let Some(existing) = inner.by_key.get(&key) {
            if existing.requested == name && existing.origin_file == origin_file {
                return Ok(existing.name.clone());
            }
            return Err(GenError::SymbolConflict {
                name: name.to_string(),
                existing: format!("{} in {}", existing.name, existing.origin_file),
                identity: format!("{} ({})", identity, kind),
            });
        }

        let declared = inner.declared.entry(origin_file.to_string()).or_default();
        let allocated = unique_name(name, |candidate| declared.contains(candidate));
        declared.insert(allocated.clone());

        inner.by_key.insert(
            key,
            Symbol {
                name: allocated.clone(),
                requested: name.to_string(),
                identity: identity.clone(),
                origin_file: origin_file.to_string(),
                kind,
            },
        );
        Ok(allocated)
    }
}

impl NameResolver for SymbolTable {
    fn resolve(&self, identity: &SchemaIdentity, kind: SymbolKind) -> GenResult<String> {
        self.lookup(identity, kind).map(|symbol| symbol.name)
    }
}

/// Name resolution on behalf of one output file.
pub struct FileScope<'a> {
    table: &'a SymbolTable,
    file: String,
}

impl NameResolver for FileScope<'_> {
    fn resolve(&self, identity: &SchemaIdentity, kind: SymbolKind) -> GenResult<String> {
        let symbol = self.table.lookup(identity, kind)?;
        if symbol.origin_file == self.file {
            return Ok(symbol.name);
        }
        Ok(self.table.import(&self.file, &symbol))
    }
}

/// Copies descriptor comments into docs and flags deprecated elements.
#[derive(Debug, Default, Clone, Copy)]
pub struct DescriptorComments;

impl CommentAttacher for DescriptorComments {
    fn attach(&self, docs: &mut Docs, element: SchemaElement<'_>, placement: Placement) {
        let (leading, trailing, deprecated) = match element {
            SchemaElement::Message(m) => (
                m.comment.as_deref(),
                m.trailing_comment.as_deref(),
                m.deprecated,
            ),
            SchemaElement::Field(f) => (
                f.comment.as_deref(),
                f.trailing_comment.as_deref(),
                f.deprecated,
            ),
            SchemaElement::Oneof(o) => (o.comment.as_deref(), None, false),
            SchemaElement::Enum(e) => (e.comment.as_deref(), None, e.deprecated),
            SchemaElement::EnumValue(v) => (v.comment.as_deref(), None, v.deprecated),
        };

        match placement {
            Placement::Leading => {
                push_lines(&mut docs.leading, leading);
                if deprecated {
                    docs.leading.push("@deprecated".to_string());
                }
            }
            Placement::Trailing => push_lines(&mut docs.trailing, trailing),
        }
    }
}

fn push_lines(target: &mut Vec<String>, text: Option<&str>) {
    if let Some(text) = text {
        target.extend(text.lines().map(|line| line.trim_end().to_string()));
    }
}
