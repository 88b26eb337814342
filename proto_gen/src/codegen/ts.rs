use crate::codegen::collab::{
  CommentAttacher, Docs, NameResolver, Placement, SchemaElement, SymbolKind, SymbolRegistry,
};
use crate::codegen::symbols::{DescriptorComments, SymbolTable};
use crate::codegen::ts_gen::helpers::write_doc_block;
use crate::codegen::ts_gen::{ClassDecl, ClassShapeBuilder};
use crate::config::GeneratorConfig;
use crate::error::{EmitError, GenError, GenResult};
use crate::schema::meta::{MessageMeta, resolve_message};
use crate::schema::names::constructor_class_name;
use crate::schema::pool::{DescriptorPool, EnumEntry, SchemaIdentity};
use proto_types::{FileDescriptor, SchemaSet};
use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub struct TypeScriptCodeGeneratorOptions {
  pub output_dir: PathBuf,
  pub config: GeneratorConfig,
}

impl Default for TypeScriptCodeGeneratorOptions {
  fn default() -> Self {
    Self {
      output_dir: PathBuf::from("generated"),
      config: GeneratorConfig::default(),
    }
  }
}

/// One rendered `<stem>_pb.ts` module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
  /// Path relative to the output directory.
  pub path: String,
  pub source_file: String,
  pub contents: String,
}

pub struct TypeScriptCodeGenerator<'a> {
  schema: &'a SchemaSet,
  pool: DescriptorPool<'a>,
  symbols: SymbolTable,
  comments: DescriptorComments,
  options: TypeScriptCodeGeneratorOptions,
}

impl<'a> TypeScriptCodeGenerator<'a> {
  pub fn new(schema: &'a SchemaSet, options: TypeScriptCodeGeneratorOptions) -> Self {
    Self {
      schema,
      pool: DescriptorPool::build(schema),
      symbols: SymbolTable::new(),
      comments: DescriptorComments,
      options,
    }
  }

  /// Registers every enum, message alias and constructor class name. Must run
  /// before any class is built; repeated calls are no-ops.
  ///
  /// Schema-facing names go first so that a generated class name never pushes
  /// a message or enum off its own name.
  pub fn reserve_symbols(&self) -> GenResult<()> {
    for (identity, entry) in self.pool.enums() {
      let name = self.declared_name(identity)?;
      self.symbols
        .register(name, identity, &entry.file.name, SymbolKind::Enum)?;
    }
    for (identity, entry) in self.pool.messages() {
      let name = self.declared_name(identity)?;
      self.symbols
        .register(name, identity, &entry.file.name, SymbolKind::Message)?;
    }
    for (identity, entry) in self.pool.messages() {
      let preferred = constructor_class_name(self.declared_name(identity)?);
      let class_name = self.symbols.register(
        &preferred,
        identity,
        &entry.file.name,
        SymbolKind::ConstructorClass,
      )?;
      if class_name != preferred {
        debug!(message = %identity, class = %class_name, "constructor class renamed");
      }
    }
    debug!(symbols = self.symbols.len(), "reserved symbols");
    Ok(())
  }

  fn message_meta(&self, identity: &SchemaIdentity) -> GenResult<MessageMeta> {
    resolve_message(&self.pool, identity, &self.options.config.discriminator_field_name)
  }

  fn declared_name(&self, identity: &SchemaIdentity) -> GenResult<&str> {
    self.pool.ts_name(identity).ok_or_else(|| GenError::UnknownType {
      identity: identity.to_string(),
    })
  }

  /// Class declarations for every message in the schema set, in declaration
  /// order.
  pub fn build_classes(&self) -> GenResult<Vec<ClassDecl>> {
    self.reserve_symbols()?;
    let builder = ClassShapeBuilder::new(&self.symbols, &self.comments, &self.options.config);
    self.pool
      .messages()
      .map(|(identity, entry)| {
        let meta = self.message_meta(identity)?;
        builder.build(&meta, entry.descriptor)
      })
      .collect()
  }

  /// Renders one module per schema file. Files without declarations are
  /// skipped.
  pub fn render_files(&self) -> GenResult<Vec<GeneratedFile>> {
    self.reserve_symbols()?;
    let mut files = Vec::new();
    for file in &self.schema.files {
      if file.messages.is_empty() && file.enums.is_empty() {
        warn!(file = %file.name, "schema file declares no messages or enums, skipping");
        continue;
      }
      files.push(self.render_file(file)?);
    }
    Ok(files)
  }

  fn render_file(&self, file: &FileDescriptor) -> GenResult<GeneratedFile> {
    let scope = self.symbols.scope(&file.name);
    let builder = ClassShapeBuilder::new(&scope, &self.comments, &self.options.config);
    let mut body = String::new();

    for (identity, entry) in self.pool.enums().filter(|(_, e)| std::ptr::eq(e.file, file)) {
      body.push_str(&self.render_enum(&scope, identity, entry)?);
      body.push('\n');
    }

    for (identity, entry) in self.pool.messages().filter(|(_, e)| std::ptr::eq(e.file, file)) {
      debug!(message = %identity, "building constructor class");
      let meta = self.message_meta(identity)?;
      let decl = builder.build(&meta, entry.descriptor)?;
      let alias = scope.resolve(identity, SymbolKind::Message)?;

      body.push_str(&decl.render());
      writeln!(body, "export type {} = {};", alias, decl.class_name).unwrap();
      body.push('\n');
    }

    let mut output = String::new();
    output.push_str("/* Auto-generated TypeScript code */\n");
    writeln!(
      output,
      "/* WARNING: Do not modify this file directly. It is generated from {}. */",
      file.name
    )
    .unwrap();
    output.push('\n');

    /* Imports are known only after every reference in the body resolved */
    let imports = self.symbols.imports_for(&file.name);
    for (origin, names) in &imports {
      let names: Vec<&str> = names.iter().map(String::as_str).collect();
      writeln!(
        output,
        "import type {{ {} }} from \"{}\";",
        names.join(", "),
        module_specifier(&file.name, origin)
      )
      .unwrap();
    }
    if !imports.is_empty() {
      output.push('\n');
    }

    output.push_str(body.trim_end());
    output.push('\n');

    Ok(GeneratedFile {
      path: output_path(&file.name),
      source_file: file.name.clone(),
      contents: output,
    })
  }

  fn render_enum(
    &self,
    names: &dyn NameResolver,
    identity: &SchemaIdentity,
    entry: &EnumEntry<'_>,
  ) -> GenResult<String> {
    let descriptor = entry.descriptor;
    let name = names.resolve(identity, SymbolKind::Enum)?;
    let mut output = String::new();

    let mut docs = Docs::default();
    self.comments
      .attach(&mut docs, SchemaElement::Enum(descriptor), Placement::Leading);
    write_doc_block(&mut output, &docs.lines(), "");

    writeln!(output, "export enum {} {{", name).unwrap();
    for value in &descriptor.values {
      let mut docs = Docs::default();
      self.comments
        .attach(&mut docs, SchemaElement::EnumValue(value), Placement::Leading);
      write_doc_block(&mut output, &docs.lines(), "  ");
      writeln!(output, "  {} = {},", value.name, value.number).unwrap();
    }
    output.push_str("}\n");
    Ok(output)
  }

  /// Renders every module and writes it under the output directory.
  pub fn emit_code(&self) -> Result<Vec<PathBuf>, EmitError> {
    let mut written = Vec::new();
    for file in self.render_files()? {
      let path = self.options.output_dir.join(&file.path);
      write_file(&path, &file.contents)?;
      info!(source = %file.source_file, path = %path.display(), "wrote TypeScript module");
      written.push(path);
    }
    Ok(written)
  }
}

fn write_file(path: &Path, contents: &str) -> Result<(), EmitError> {
  let to_error = |source| EmitError::Write {
    path: path.display().to_string(),
    source,
  };
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).map_err(to_error)?;
  }
  fs::write(path, contents).map_err(to_error)
}

/// `demo/shapes.proto` -> `demo/shapes_pb.ts`
pub fn output_path(schema_file: &str) -> String {
  format!("{}.ts", module_stem(schema_file))
}

fn module_stem(schema_file: &str) -> String {
  let stem = schema_file.strip_suffix(".proto").unwrap_or(schema_file);
  format!("{}_pb", stem)
}

/* Relative ES module path from one generated file to another */
fn module_specifier(from_file: &str, to_file: &str) -> String {
  let mut from_dirs: Vec<&str> = from_file.split('/').collect();
  from_dirs.pop();
  let to_stem = module_stem(to_file);
  let mut to_parts: Vec<&str> = to_stem.split('/').collect();
  let module = to_parts.pop().unwrap_or_default();

  let common = from_dirs
    .iter()
    .zip(to_parts.iter())
    .take_while(|(a, b)| a == b)
    .count();

  let mut parts: Vec<&str> = vec![".."; from_dirs.len() - common];
  parts.extend(&to_parts[common..]);
  parts.push(module);

  let joined = parts.join("/");
  if joined.starts_with("..") {
    joined
  } else {
    format!("./{}", joined)
  }
}
