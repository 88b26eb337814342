//! Loading schema inputs from disk.
//!
//! YAML and JSON files deserialize directly into `SchemaSet`; binary
//! descriptor sets go through the `descriptor_set` adapter.

use super::descriptor_set::decode_descriptor_set;
use proto_types::SchemaSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML schema in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yml::Error,
    },

    #[error("invalid JSON schema in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode descriptor set: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("malformed descriptor: {0}")]
    MalformedDescriptor(String),

    #[error("unsupported schema input '{0}' (expected .yaml, .yml, .json, .binpb, .pb or .desc)")]
    UnsupportedExtension(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Yaml,
    Json,
    DescriptorSet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yaml" | "yml" => Some(InputFormat::Yaml),
            "json" => Some(InputFormat::Json),
            "binpb" | "pb" | "desc" => Some(InputFormat::DescriptorSet),
            _ => None,
        }
    }
}

pub fn load_schema_file(path: &Path) -> Result<SchemaSet, LoadError> {
    let shown = path.display().to_string();
    let format = InputFormat::from_path(path)
        .ok_or_else(|| LoadError::UnsupportedExtension(shown.clone()))?;

    debug!(path = %shown, ?format, "loading schema input");

    match format {
        InputFormat::Yaml => {
            let source = read_text(path)?;
            serde_yml::from_str(&source).map_err(|source| LoadError::Yaml {
                path: shown,
                source,
            })
        }
        InputFormat::Json => {
            let source = read_text(path)?;
            serde_json::from_str(&source).map_err(|source| LoadError::Json {
                path: shown,
                source,
            })
        }
        InputFormat::DescriptorSet => {
            let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
                path: shown,
                source,
            })?;
            decode_descriptor_set(&bytes)
        }
    }
}

/// Loads every input and merges them into one set, preserving input order.
pub fn load_schema_files(paths: &[impl AsRef<Path>]) -> Result<SchemaSet, LoadError> {
    let mut set = SchemaSet::default();
    for path in paths {
        set.extend(load_schema_file(path.as_ref())?);
    }
    Ok(set)
}

fn read_text(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn detects_formats_by_extension() {
        assert_eq!(InputFormat::from_path(Path::new("a.yaml")), Some(InputFormat::Yaml));
        assert_eq!(InputFormat::from_path(Path::new("a.YML")), Some(InputFormat::Yaml));
        assert_eq!(InputFormat::from_path(Path::new("a.json")), Some(InputFormat::Json));
        assert_eq!(InputFormat::from_path(Path::new("a.binpb")), Some(InputFormat::DescriptorSet));
        assert_eq!(InputFormat::from_path(Path::new("a.proto")), None);
    }

    #[test]
    fn loads_and_merges_yaml_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let yaml_path = dir.path().join("a.yaml");
        let mut yaml = std::fs::File::create(&yaml_path).unwrap();
        write!(yaml, "files:\n  - name: \"a.proto\"\n    package: \"a\"\n").unwrap();

        let json_path = dir.path().join("b.json");
        std::fs::write(
            &json_path,
            r#"{"files":[{"name":"b.proto","messages":[{"name":"B","fields":[{"name":"x","number":1,"type":{"scalar":"int32"}}]}]}]}"#,
        )
        .unwrap();

        let set = load_schema_files(&[yaml_path, json_path]).unwrap();
        let names: Vec<&str> = set.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["a.proto", "b.proto"]);
        assert_eq!(set.files[1].messages[0].fields[0].number, 1);
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = load_schema_file(Path::new("schema.proto")).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(_)));
    }
}
