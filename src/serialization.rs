//! Writes a resolved tree as Sass variables.
//!
//! Each top-level key becomes one `$variable`, and nested maps become Sass map
//! literals:
//!
//! ```scss
//! $theme: (
//!   color: (
//!     primary: #111111,
//!   ),
//! );
//! ```

use crate::error::SerializeError;
use crate::tree::{format_number, join_path, Map, Node};
use std::borrow::Cow;

/// Columns added per nesting level.
pub const INDENT_STEP: usize = 2;

/// Renders one variable declaration per top-level entry of `root`.
pub fn to_sass_variables(root: &Node) -> Result<String, SerializeError> {
    let map = root
        .as_map()
        .ok_or_else(|| SerializeError::UnsupportedValueType {
            path: String::new(),
            found: root.kind(),
        })?;

    let mut output = String::new();
    for (name, value) in map.iter() {
        output.push('$');
        output.push_str(name);
        output.push_str(": ");
        match value {
            Node::Map(inner) => output.push_str(&sass_map(inner, INDENT_STEP, name)?),
            scalar => output.push_str(&sass_value(scalar, name)?),
        }
        output.push_str(";\n");
    }
    Ok(output)
}

/// Renders a map literal whose entries are indented by `indent` columns. The
/// closing parenthesis sits one step to the left of the entries.
pub fn sass_map(map: &Map, indent: usize, path: &str) -> Result<String, SerializeError> {
    let prefix = " ".repeat(indent);
    let mut output = String::from("(\n");
    for (key, value) in map.iter() {
        let value_path = join_path(path, key);
        output.push_str(&prefix);
        output.push_str(key);
        output.push_str(": ");
        match value {
            Node::Map(inner) => {
                output.push_str(&sass_map(inner, indent + INDENT_STEP, &value_path)?);
            }
            scalar => output.push_str(&sass_value(scalar, &value_path)?),
        }
        output.push_str(",\n");
    }
    output.push_str(&" ".repeat(indent.saturating_sub(INDENT_STEP)));
    output.push(')');
    Ok(output)
}

/// Renders a scalar. Numbers and strings without spaces are written as-is;
/// strings with a space are quoted, with double quotes if they contain a single
/// quote. Quotes inside the value are not escaped.
pub fn sass_value<'a>(value: &'a Node, path: &str) -> Result<Cow<'a, str>, SerializeError> {
    match value {
        Node::Number(n) if n.is_finite() => Ok(Cow::Owned(format_number(*n))),
        Node::Number(_) => Err(SerializeError::UnsupportedValueType {
            path: path.to_string(),
            found: "non-finite number",
        }),
        Node::String(s) | Node::Literal(s) => Ok(quote(s)),
        other => Err(SerializeError::UnsupportedValueType {
            path: path.to_string(),
            found: other.kind(),
        }),
    }
}

fn quote(s: &str) -> Cow<'_, str> {
    if !s.contains(' ') {
        Cow::Borrowed(s)
    } else if s.contains('\'') {
        Cow::Owned(format!("\"{s}\""))
    } else {
        Cow::Owned(format!("'{s}'"))
    }
}
