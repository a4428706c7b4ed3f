use crate::config::{BuildConfig, COLOR_PATH, DISPLAY_PATH};
use crate::display::normalize_display;
use crate::error::{ExportError, ResolveError, ThemeError};
use crate::loader::{load_dir, load_file};
use crate::output::replace_output;
use crate::resolver::resolve_references;
use crate::serialization::to_sass_variables;
use crate::tree::{Map, Node};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};

/// A fully resolved theme together with its rendered stylesheet variables.
///
/// Both are produced in memory, so nothing is written unless the whole build
/// succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildResult {
    pub tree: Node,
    pub scss: String,
}

impl Serialize for BuildResult {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.tree.serialize(serializer)
    }
}

impl BuildResult {
    /// The generated Sass variables.
    #[must_use]
    pub fn to_scss(&self) -> &str {
        &self.scss
    }

    /// Serializes the resolved tree into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self)
    }

    /// Serializes the resolved tree into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self)
    }
}

/// Resolves theme color references, then validates and resolves the typography
/// display presets against the resolved colors.
pub fn transform(root: &Node) -> Result<Node, ResolveError> {
    let resolved = resolve_references(root, COLOR_PATH)?;
    normalize_display(&resolved, DISPLAY_PATH)
}

/// Transforms an aggregate tree and renders it as Sass variables.
pub fn build(root: &Node) -> Result<BuildResult, ThemeError> {
    let tree = transform(root)?;
    let scss = to_sass_variables(&tree)?;
    Ok(BuildResult { tree, scss })
}

/// Runs a complete build: load the source directory, resolve, render, and
/// replace the output directory with the generated file.
///
/// # Errors
/// Returns the first failure; the output directory is only touched after the
/// stylesheet has been rendered successfully.
pub fn generate(config: &BuildConfig) -> Result<PathBuf, ThemeError> {
    let root = load_dir(config.source_dir())?;
    let result = build(&root)?;
    let path = replace_output(&config.output_dir, &config.output_file, result.to_scss())?;
    log::info!("Generated {}", path.display());
    Ok(path)
}

/// A single document after export.
#[derive(Debug, Clone, PartialEq)]
pub struct Export {
    pub name: String,
    pub data: Node,
}

impl Export {
    /// Serializes the exported data into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.data)
    }
}

/// Loads one document and resolves it on its own.
///
/// The document is placed in a one-document aggregate tree under its name.
/// Color and display resolution apply when the corresponding sections exist,
/// so any document can be exported, not only the theme.
pub fn export(path: &Path) -> Result<Export, ExportError> {
    export_document(path).map_err(|source| ExportError {
        path: path.to_path_buf(),
        source,
    })
}

fn export_document(path: &Path) -> Result<Export, ThemeError> {
    let (name, document) = load_file(path)?;
    let mut root = Map::new();
    root.insert(name.clone(), document);
    let mut root = Node::Map(root);

    if root.get_path(COLOR_PATH).is_some() {
        root = resolve_references(&root, COLOR_PATH)?;
    }
    if root.get_path(DISPLAY_PATH).is_some() {
        root = normalize_display(&root, DISPLAY_PATH)?;
    }

    let data = root
        .as_map()
        .and_then(|map| map.get(&name))
        .cloned()
        .unwrap_or(Node::Null);
    Ok(Export { name, data })
}
