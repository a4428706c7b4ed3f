//! Validation and resolution of typography display presets.
//!
//! A display preset is a named bundle of text properties under
//! `theme.typography.display`:
//!
//! ```yaml
//! display:
//!   heading:
//!     font-family: sans
//!     font-size: large
//!     color: text.primary
//!     letter-spacing: 0.05em
//! ```
//!
//! Each property is checked against [`DisplayProperty`], which doubles as the
//! dispatch table: properties with a [`Lookup`] have their value replaced by the
//! value it names, while `letter-spacing` is a raw CSS value and passes through.
//! A value tagged `!literal` passes through whatever its property.

use crate::error::ResolveError;
use crate::resolver::Lookup;
use crate::tree::{format_number, join_path, Map, Node};

pub const THEME_COLOR: Lookup = Lookup::new("theme.color");
pub const FONT_FAMILY: Lookup = Lookup::new("theme.typography.font-family");
pub const FONT_WEIGHT: Lookup = Lookup::new("theme.typography.font-weight");
pub const FONT_SIZE: Lookup = Lookup::new("theme.typography.font-size");
pub const LINE_HEIGHT: Lookup = Lookup::new("theme.typography.line-height");

/// The properties a display preset may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayProperty {
    FontFamily,
    FontWeight,
    FontSize,
    Color,
    LineHeight,
    LetterSpacing,
}

impl DisplayProperty {
    pub const ALL: [DisplayProperty; 6] = [
        DisplayProperty::FontFamily,
        DisplayProperty::FontWeight,
        DisplayProperty::FontSize,
        DisplayProperty::Color,
        DisplayProperty::LineHeight,
        DisplayProperty::LetterSpacing,
    ];

    /// The CSS property name as written in source documents.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DisplayProperty::FontFamily => "font-family",
            DisplayProperty::FontWeight => "font-weight",
            DisplayProperty::FontSize => "font-size",
            DisplayProperty::Color => "color",
            DisplayProperty::LineHeight => "line-height",
            DisplayProperty::LetterSpacing => "letter-spacing",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|property| property.name() == name)
    }

    /// Where values of this property are looked up, or `None` if they are used verbatim.
    #[must_use]
    pub fn lookup(self) -> Option<Lookup> {
        match self {
            DisplayProperty::FontFamily => Some(FONT_FAMILY),
            DisplayProperty::FontWeight => Some(FONT_WEIGHT),
            DisplayProperty::FontSize => Some(FONT_SIZE),
            DisplayProperty::Color => Some(THEME_COLOR),
            DisplayProperty::LineHeight => Some(LINE_HEIGHT),
            DisplayProperty::LetterSpacing => None,
        }
    }
}

/// Returns a copy of `root` with every preset under `display_path` validated and
/// resolved. Color lookups read the tree as given, so theme colors must already
/// be resolved.
pub fn normalize_display(root: &Node, display_path: &str) -> Result<Node, ResolveError> {
    let display = expect_map(root, display_path)?;

    let mut normalized = Map::new();
    for (preset, record) in display.iter() {
        let record_path = join_path(display_path, preset);
        let record = record.as_map().ok_or_else(|| ResolveError::NotAMap {
            path: record_path.clone(),
            found: record.kind(),
        })?;
        normalized.insert(preset, Node::Map(normalize_preset(root, preset, &record_path, record)?));
    }
    log::debug!("Normalized {} display presets", normalized.len());

    let mut output = root.clone();
    if let Some(slot) = output.get_path_mut(display_path) {
        *slot = Node::Map(normalized);
    }
    Ok(output)
}

fn normalize_preset(
    root: &Node,
    preset: &str,
    record_path: &str,
    record: &Map,
) -> Result<Map, ResolveError> {
    let mut normalized = Map::new();
    for (key, value) in record.iter() {
        let property =
            DisplayProperty::from_name(key).ok_or_else(|| ResolveError::UnknownDisplayProperty {
                preset: preset.to_string(),
                property: key.to_string(),
            })?;
        let value = match property.lookup() {
            Some(lookup) if !matches!(value, Node::Literal(_)) => {
                let reference = reference_key(value, &join_path(record_path, key))?;
                lookup.resolve(&reference, root)?.clone()
            }
            _ => value.clone(),
        };
        normalized.insert(key, value);
    }
    Ok(normalized)
}

// Numeric values name numeric keys, e.g. `font-weight: 700`.
fn reference_key(value: &Node, path: &str) -> Result<String, ResolveError> {
    match value {
        Node::String(s) => Ok(s.clone()),
        Node::Number(n) => Ok(format_number(*n)),
        other => Err(ResolveError::NotAReference {
            path: path.to_string(),
            found: other.kind(),
        }),
    }
}

fn expect_map<'a>(root: &'a Node, path: &str) -> Result<&'a Map, ResolveError> {
    let node = root
        .get_path(path)
        .ok_or_else(|| ResolveError::MissingSubtree {
            path: path.to_string(),
        })?;
    node.as_map().ok_or_else(|| ResolveError::NotAMap {
        path: path.to_string(),
        found: node.kind(),
    })
}
