use std::path::{Path, PathBuf};

/// Where the color references to resolve live.
pub const COLOR_PATH: &str = "theme.color";

/// Where the typography display presets live.
pub const DISPLAY_PATH: &str = "theme.typography.display";

pub const DEFAULT_SOURCE_DIR: &str = "src";
pub const DEFAULT_OUTPUT_DIR: &str = "sass";
pub const DEFAULT_OUTPUT_FILE: &str = "variables.scss";

/// Settings for one build run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    /// Directory holding the `.yml`/`.yaml` source documents.
    pub source_dir: PathBuf,
    /// Directory that is cleared and recreated to hold the generated file.
    pub output_dir: PathBuf,
    pub output_file: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl BuildConfig {
    pub fn new(source_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_output_file(mut self, output_file: impl Into<String>) -> Self {
        self.output_file = output_file.into();
        self
    }

    /// Full path of the generated artifact.
    #[must_use]
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_file)
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}
