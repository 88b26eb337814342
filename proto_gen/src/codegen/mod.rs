pub mod collab;
pub mod symbols;
pub mod ts;
pub mod ts_gen;

pub use collab::{CommentAttacher, Docs, NameResolver, Placement, SchemaElement, SymbolKind, SymbolRegistry};
pub use symbols::{DescriptorComments, SymbolTable};
pub use ts::{GeneratedFile, TypeScriptCodeGenerator, TypeScriptCodeGeneratorOptions};
