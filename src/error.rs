use miette::{Diagnostic, NamedSource, SourceSpan};
use std::path::PathBuf;
use thiserror::Error;

/// Any failure of a theme build. Every variant is fatal to the build.
#[derive(Error, Debug, Diagnostic)]
pub enum ThemeError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Serialize(#[from] SerializeError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Output(#[from] OutputError),
}

/// Source documents could not be discovered, read or parsed.
#[derive(Error, Debug, Diagnostic)]
pub enum LoadError {
    #[error("Failed to read source directory {}", .path.display())]
    #[diagnostic(
        code(load::read_dir),
        help("Check that the source directory exists and is readable.")
    )]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read document {}", .path.display())]
    #[diagnostic(code(load::read_file))]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in document `{document}`: {message}")]
    #[diagnostic(
        code(load::parse),
        help("The document must be valid YAML whose top level is a mapping or a scalar.")
    )]
    Parse {
        document: String,
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("Document `{name}` is defined more than once")]
    #[diagnostic(
        code(load::duplicate_document),
        help("Keep only one of `{name}.yml` and `{name}.yaml`.")
    )]
    DuplicateDocument { name: String },

    #[error("Unsupported {found} key in document `{document}`")]
    #[diagnostic(
        code(load::unsupported_key),
        help("Mapping keys must be strings, numbers or booleans.")
    )]
    UnsupportedKey { document: String, found: String },

    #[error("Unsupported tag `{tag}` in document `{document}`")]
    #[diagnostic(
        code(load::unsupported_tag),
        help("Only `!literal` is recognised, and only on strings.")
    )]
    UnsupportedTag { document: String, tag: String },
}

/// A reference or display preset could not be resolved.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Failed to discover {path} in configuration")]
    #[diagnostic(
        code(resolver::reference_not_found),
        help("Every reference must name a value that exists in one of the loaded documents.")
    )]
    ReferenceNotFound { path: String },

    #[error("Circular reference: {chain}")]
    #[diagnostic(
        code(resolver::circular_reference),
        help("A reference chain leads back to itself. Tag literal values with `!literal`.")
    )]
    CircularReference { chain: String },

    #[error("Unexpected key {property} in display setting {preset}")]
    #[diagnostic(
        code(resolver::unknown_display_property),
        help("Allowed display properties: font-family, font-weight, font-size, color, line-height, letter-spacing.")
    )]
    UnknownDisplayProperty { preset: String, property: String },

    #[error("Missing required section {path}")]
    #[diagnostic(code(resolver::missing_subtree))]
    MissingSubtree { path: String },

    #[error("Expected {path} to be a map, found {found}")]
    #[diagnostic(code(resolver::not_a_map))]
    NotAMap { path: String, found: &'static str },

    #[error("Value of {path} must be a string or number to be looked up, found {found}")]
    #[diagnostic(code(resolver::not_a_reference))]
    NotAReference { path: String, found: &'static str },
}

/// The resolved tree contains something that has no stylesheet representation.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SerializeError {
    #[error("Value at {path} is {found}, not a string or number")]
    #[diagnostic(
        code(serialization::unsupported_value_type),
        help("Only strings, numbers and nested maps can be written as Sass values.")
    )]
    UnsupportedValueType { path: String, found: &'static str },
}

/// The output directory or artifact could not be written.
#[derive(Error, Debug, Diagnostic)]
pub enum OutputError {
    #[error("Failed to prepare output directory {}", .path.display())]
    #[diagnostic(code(output::prepare))]
    Prepare {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}", .path.display())]
    #[diagnostic(code(output::write))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of the single-document export path.
#[derive(Error, Debug, Diagnostic)]
#[error("Failed to export {}", .path.display())]
#[diagnostic(code(export::failed))]
pub struct ExportError {
    pub path: PathBuf,
    #[diagnostic_source]
    pub source: ThemeError,
}

/// One link of a diagnostic chain: its message and, when the diagnostic points
/// into a source document, the excerpt it points at.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainLink {
    pub message: String,
    pub excerpt: Option<String>,
}

/// Walks a diagnostic from the outermost error to its innermost cause.
///
/// Transparent wrappers contribute no link of their own since they share the
/// message of what they wrap. Once no diagnostic cause is left, plain error
/// causes such as the `io::Error` behind a failed read are followed.
pub fn error_chain(diagnostic: &dyn Diagnostic) -> Vec<ChainLink> {
    let mut links = Vec::new();
    let mut innermost = diagnostic;
    let mut current = Some(diagnostic);
    while let Some(diag) = current {
        links.push(ChainLink {
            message: diag.to_string(),
            excerpt: source_excerpt(diag),
        });
        innermost = diag;
        current = diag.diagnostic_source();
    }

    let mut cause = std::error::Error::source(innermost);
    while let Some(err) = cause {
        links.push(ChainLink {
            message: err.to_string(),
            excerpt: None,
        });
        cause = err.source();
    }
    links
}

fn source_excerpt(diag: &dyn Diagnostic) -> Option<String> {
    let source = diag.source_code()?;
    let label = diag.labels()?.next()?;
    let contents = source.read_span(label.inner(), 2, 1).ok()?;
    Some(String::from_utf8_lossy(contents.data()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_chain_includes_source_excerpt() {
        let source = "color:\n  text: [unclosed\n";
        let err = ExportError {
            path: PathBuf::from("theme.yml"),
            source: ThemeError::Load(LoadError::Parse {
                document: "theme".to_string(),
                message: "did not find expected ',' or ']'".to_string(),
                src: NamedSource::new("theme.yml", source.to_string()),
                span: (15, 1).into(),
            }),
        };

        let chain = error_chain(&err);

        assert_eq!(chain.len(), 2);
        assert_eq!(chain[0].message, "Failed to export theme.yml");
        assert_eq!(chain[0].excerpt, None);
        assert!(chain[1].message.starts_with("Invalid YAML in document `theme`"));
        let excerpt = chain[1].excerpt.as_deref().unwrap();
        assert!(excerpt.contains("text: [unclosed"));
    }

    #[test]
    fn test_error_chain_follows_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ExportError {
            path: PathBuf::from("theme.yml"),
            source: ThemeError::Load(LoadError::ReadFile {
                path: PathBuf::from("theme.yml"),
                source: io,
            }),
        };

        let messages: Vec<_> = error_chain(&err).into_iter().map(|link| link.message).collect();
        assert_eq!(
            messages,
            vec![
                "Failed to export theme.yml",
                "Failed to read document theme.yml",
                "no such file",
            ]
        );
    }

    #[test]
    fn test_reference_not_found_message_names_path() {
        let err = ResolveError::ReferenceNotFound {
            path: "theme.color.does.not.exist".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to discover theme.color.does.not.exist in configuration"
        );
    }
}
