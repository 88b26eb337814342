//! Schema inputs and their resolution into generator metadata.

pub mod descriptor_set;
pub mod loader;
pub mod meta;
pub mod names;
pub mod pool;

pub use loader::{LoadError, load_schema_file, load_schema_files};
pub use meta::{FieldKind, FieldMeta, MessageMeta, OneofMeta, resolve_message};
pub use pool::{DescriptorPool, SchemaIdentity};
