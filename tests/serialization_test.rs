use themevars::error::SerializeError;
use themevars::loader::parse_document;
use themevars::serialization::{sass_value, to_sass_variables};
use themevars::{build, Map, Node};

fn render(yaml: &str) -> Result<String, SerializeError> {
    let document = parse_document("doc", "doc.yml", yaml).unwrap();
    to_sass_variables(&document)
}

#[test]
fn test_quoting_rule() {
    let cases = [
        (Node::from("Helvetica Neue"), "'Helvetica Neue'"),
        (Node::from("sans-serif"), "sans-serif"),
        (Node::from("O'Hare Sans"), "\"O'Hare Sans\""),
        (Node::Number(16.0), "16"),
    ];
    for (value, expected) in cases {
        assert_eq!(sass_value(&value, "x").unwrap(), expected);
    }
}

#[test]
fn test_nesting_fidelity() {
    let output = render("a:\n  b:\n    c: 1\n").unwrap();
    assert_eq!(output, "$a: (\n  b: (\n    c: 1,\n  ),\n);\n");
}

#[test]
fn test_keys_keep_insertion_order() {
    let output = render("z:\n  beta: 2\n  alpha: 1\na:\n  only: x\n").unwrap();
    assert_eq!(
        output,
        "$z: (\n  beta: 2,\n  alpha: 1,\n);\n$a: (\n  only: x,\n);\n"
    );
}

#[test]
fn test_booleans_nulls_and_sequences_are_rejected() {
    for (yaml, found) in [
        ("a:\n  flag: true\n", "boolean"),
        ("a:\n  nothing: null\n", "null"),
        ("a:\n  list: [1, 2]\n", "sequence"),
    ] {
        let err = render(yaml).unwrap_err();
        let SerializeError::UnsupportedValueType { found: kind, .. } = err;
        assert_eq!(kind, found, "for {yaml:?}");
    }
}

#[test]
fn test_end_to_end_declaration() {
    let mut root = Map::new();
    root.insert(
        "theme",
        parse_document("theme", "theme.yml", "color:\n  text:\n    primary: grayscale.darkest\ntypography:\n  display: {}\n")
            .unwrap(),
    );
    root.insert(
        "grayscale",
        parse_document("grayscale", "grayscale.yml", "darkest: '#111111'\n").unwrap(),
    );

    let result = build(&Node::Map(root)).unwrap();
    assert!(result.to_scss().starts_with(
        "$theme: (\n  color: (\n    text: (\n      primary: #111111,\n    ),\n  ),\n"
    ));
}
