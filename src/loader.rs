//! Loads a directory of YAML documents into one aggregate tree.
//!
//! Each document becomes a top-level key named after its file stem, so
//! `src/grayscale.yml` is reachable at `grayscale.*`. Documents are read in
//! file-name order, which makes the aggregate tree (and everything generated
//! from it) independent of how the filesystem enumerates the directory.

use crate::error::LoadError;
use crate::tree::{format_number, Map, Node};
use miette::NamedSource;
use serde_yaml::value::TaggedValue;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Recognised source document extensions.
pub const SOURCE_EXTENSIONS: &[&str] = &["yml", "yaml"];

/// The YAML tag marking a string as a literal rather than a reference.
pub const LITERAL_TAG: &str = "literal";

/// Loads every source document in `dir` into an aggregate tree keyed by document name.
pub fn load_dir(dir: &Path) -> Result<Node, LoadError> {
    let mut root = Map::new();
    for path in source_files(dir)? {
        let (name, document) = load_file(&path)?;
        if root.contains_key(&name) {
            return Err(LoadError::DuplicateDocument { name });
        }
        log::debug!("Loaded document `{}` from {}", name, path.display());
        root.insert(name, document);
    }
    Ok(Node::Map(root))
}

/// Reads and parses a single document, returning its name and content.
pub fn load_file(path: &Path) -> Result<(String, Node), LoadError> {
    let source = fs::read_to_string(path).map_err(|source| LoadError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let name = document_name(path);
    let file_name = path.to_string_lossy().to_string();
    let document = parse_document(&name, &file_name, &source)?;
    Ok((name, document))
}

/// Parses YAML source text into a tree. `file_name` only appears in diagnostics.
pub fn parse_document(name: &str, file_name: &str, source: &str) -> Result<Node, LoadError> {
    let value: Value = serde_yaml::from_str(source).map_err(|err| {
        let offset = err.location().map_or(0, |loc| loc.index());
        LoadError::Parse {
            document: name.to_string(),
            message: err.to_string(),
            src: NamedSource::new(file_name, source.to_string()),
            span: (offset, usize::from(offset < source.len())).into(),
        }
    })?;
    to_node(value, name)
}

/// The document name of a source file: its file name without extension.
pub fn document_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn source_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let read_dir_err = |source| LoadError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if path.is_file() && has_source_extension(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

fn to_node(value: Value, document: &str) -> Result<Node, LoadError> {
    Ok(match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Boolean(b),
        Value::Number(n) => Node::Number(n.as_f64().unwrap_or(f64::NAN)),
        Value::String(s) => Node::String(s),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(|item| to_node(item, document))
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(key_to_string(key, document)?, to_node(value, document)?);
            }
            Node::Map(map)
        }
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            match value {
                Value::String(s) if tag == LITERAL_TAG => Node::Literal(s),
                _ => {
                    return Err(LoadError::UnsupportedTag {
                        document: document.to_string(),
                        tag: tag.to_string(),
                    })
                }
            }
        }
    })
}

// YAML allows any value as a key; dotted paths can only address scalars.
// Numeric keys are written the way numeric values are, so `1.0: x` is found by `1.0`.
fn key_to_string(key: Value, document: &str) -> Result<String, LoadError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.as_f64().map_or_else(|| n.to_string(), format_number)),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(LoadError::UnsupportedKey {
            document: document.to_string(),
            found: yaml_kind(&other).to_string(),
        }),
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged",
    }
}
