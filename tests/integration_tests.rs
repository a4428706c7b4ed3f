// Integration tests for themevars using fixture theme directories
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;
use themevars::error::{error_chain, LoadError, ResolveError};
use themevars::{export, generate, BuildConfig, Node, ThemeError};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn read_expected(name: &str) -> String {
    let path = fixture("expected").join(name);
    fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to read expected output: {:?}", path))
}

mod ok_tests {
    use super::*;

    #[test]
    fn test_basic_theme_matches_expected_output() {
        let out = tempdir().unwrap();
        let config = BuildConfig::new(fixture("basic"), out.path().join("sass"));

        let path = generate(&config).unwrap();

        assert_eq!(path, config.output_path());
        assert_eq!(fs::read_to_string(&path).unwrap(), read_expected("basic.scss"));
    }

    #[test]
    fn test_output_is_identical_across_runs() {
        let out = tempdir().unwrap();
        let config = BuildConfig::new(fixture("basic"), out.path().join("sass"));

        let first = fs::read_to_string(generate(&config).unwrap()).unwrap();
        let second = fs::read_to_string(generate(&config).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_custom_output_file_name() {
        let out = tempdir().unwrap();
        let config = BuildConfig::new(fixture("basic"), out.path().join("dist"))
            .with_output_file("_tokens.scss");

        let path = generate(&config).unwrap();
        assert!(path.ends_with("dist/_tokens.scss"));
        assert!(path.is_file());
    }

    #[test]
    fn test_export_document_without_theme_sections() {
        let exported = export(&fixture("basic").join("grayscale.yml")).unwrap();

        assert_eq!(exported.name, "grayscale");
        assert_eq!(exported.data.get_path("darkest"), Some(&Node::from("#111111")));
        assert!(exported.to_yaml().unwrap().contains("lightest:"));
    }
}

// Tests for theme directories that must abort the build
mod err_tests {
    use super::*;

    fn build_err(name: &str) -> (ThemeError, tempfile::TempDir) {
        let out = tempdir().unwrap();
        let config = BuildConfig::new(fixture(name), out.path().join("sass"));
        let err = generate(&config).unwrap_err();
        (err, out)
    }

    #[test]
    fn test_unknown_display_property() {
        let (err, _out) = build_err("unknown_display");
        match err {
            ThemeError::Resolve(ResolveError::UnknownDisplayProperty { preset, property }) => {
                assert_eq!(preset, "heading");
                assert_eq!(property, "margin");
            }
            other => panic!("Expected UnknownDisplayProperty, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_reference() {
        let (err, _out) = build_err("missing_reference");
        match err {
            ThemeError::Resolve(ResolveError::ReferenceNotFound { path }) => {
                assert_eq!(path, "grayscale.does.not.exist");
            }
            other => panic!("Expected ReferenceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_broken_yaml() {
        let (err, _out) = build_err("broken_yaml");
        assert!(
            matches!(err, ThemeError::Load(LoadError::Parse { ref document, .. }) if document == "theme"),
            "Expected a parse error, got {err:?}"
        );
    }

    #[test]
    fn test_failed_build_leaves_existing_output_untouched() {
        let out = tempdir().unwrap();
        let sass = out.path().join("sass");
        fs::create_dir_all(&sass).unwrap();
        fs::write(sass.join("variables.scss"), "$previous: 1;\n").unwrap();

        let config = BuildConfig::new(fixture("missing_reference"), &sass);
        assert!(generate(&config).is_err());

        assert_eq!(
            fs::read_to_string(sass.join("variables.scss")).unwrap(),
            "$previous: 1;\n"
        );
    }

    #[test]
    fn test_export_theme_alone_cannot_reach_other_documents() {
        let err = export(&fixture("basic").join("theme.yml")).unwrap_err();
        let chain = error_chain(&err);

        assert_eq!(chain.len(), 2);
        assert!(chain[0].message.starts_with("Failed to export"));
        assert_eq!(
            chain[1].message,
            "Failed to discover grayscale.darkest in configuration"
        );
        assert_eq!(chain[1].excerpt, None);
    }

    #[test]
    fn test_export_broken_yaml_reports_source_excerpt() {
        let err = export(&fixture("broken_yaml").join("theme.yml")).unwrap_err();
        let chain = error_chain(&err);

        let excerpt = chain
            .iter()
            .find_map(|link| link.excerpt.clone())
            .expect("parse errors carry a source excerpt");
        assert!(excerpt.contains("unclosed"));
    }

    #[test]
    fn test_export_missing_document_reports_os_reason() {
        let missing = tempdir().unwrap().path().join("theme.yml");
        let io = fs::read_to_string(&missing).unwrap_err();

        let err = export(&missing).unwrap_err();
        let chain = error_chain(&err);

        assert_eq!(chain.len(), 3);
        assert!(chain[1].message.starts_with("Failed to read document"));
        assert_eq!(chain[2].message, io.to_string());
    }

    #[test]
    fn test_missing_source_directory() {
        let (err, _out) = build_err("does_not_exist");
        assert!(matches!(err, ThemeError::Load(LoadError::ReadDir { .. })));
    }
}
