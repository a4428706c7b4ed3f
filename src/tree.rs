use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Separator between the segments of a dotted path such as `theme.color.text.primary`.
pub const PATH_SEPARATOR: char = '.';

/// A node of the aggregate tree.
///
/// Every loaded document is converted into this closed set of variants. Only
/// strings, literals, numbers and maps survive serialization; the remaining
/// variants exist so that the serializer can reject them with a precise error.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A plain string. Inside a resolved subtree this is a dotted-path reference.
    String(String),
    /// A string explicitly tagged `!literal` in the source; never looked up.
    Literal(String),
    Number(f64),
    Boolean(bool),
    Null,
    Sequence(Vec<Node>),
    Map(Map),
}

impl Node {
    /// A short name for the kind of value, used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Node::String(_) => "string",
            Node::Literal(_) => "literal string",
            Node::Number(_) => "number",
            Node::Boolean(_) => "boolean",
            Node::Null => "null",
            Node::Sequence(_) => "sequence",
            Node::Map(_) => "map",
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up a single path segment: a key of a map, or a decimal index into a sequence.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(segment),
            Node::Sequence(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    fn child_mut(&mut self, segment: &str) -> Option<&mut Node> {
        match self {
            Node::Map(map) => map.get_mut(segment),
            Node::Sequence(items) => segment
                .parse::<usize>()
                .ok()
                .and_then(move |i| items.get_mut(i)),
            _ => None,
        }
    }

    /// Follows a dotted path from this node.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Node> {
        path.split(PATH_SEPARATOR)
            .try_fold(self, |node, segment| node.child(segment))
    }

    pub fn get_path_mut(&mut self, path: &str) -> Option<&mut Node> {
        let mut current = self;
        for segment in path.split(PATH_SEPARATOR) {
            current = current.child_mut(segment)?;
        }
        Some(current)
    }
}

impl From<Map> for Node {
    fn from(map: Map) -> Self {
        Node::Map(map)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl From<f64> for Node {
    fn from(n: f64) -> Self {
        Node::Number(n)
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::String(s) | Node::Literal(s) => serializer.serialize_str(s),
            Node::Number(n) => match integral(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Node::Boolean(b) => serializer.serialize_bool(*b),
            Node::Null => serializer.serialize_unit(),
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(map) => map.serialize(serializer),
        }
    }
}

/// An insertion-ordered mapping from keys to nodes.
///
/// Source documents are small, so lookups are linear scans; what matters is
/// that entries come back out in the order they were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Node)>,
}

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Inserts a value. An existing key keeps its position and gets the new value,
    /// and the previous value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl FromIterator<(String, Node)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Serialize for Map {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral(n: f64) -> Option<i64> {
    // Above 2^53 not every integer is representable, so fall back to float output.
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Some(n as i64)
    } else {
        None
    }
}

/// Renders a number the way it appears in a stylesheet: integral values without
/// a fractional part (`16`, not `16.0`), very large or very small magnitudes in
/// exponent form (`1e21`), everything else in shortest form.
///
/// Infinity and NaN have no stylesheet numeral and come out as `inf` and `NaN`;
/// the serializer rejects them before they are written.
#[must_use]
pub fn format_number(n: f64) -> String {
    if let Some(i) = integral(n) {
        return i.to_string();
    }
    let magnitude = n.abs();
    if n.is_finite() && (magnitude >= 1e21 || magnitude < 1e-6) {
        format!("{n:e}")
    } else {
        n.to_string()
    }
}

/// Joins a parent path and a key into a dotted path.
#[must_use]
pub fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}{PATH_SEPARATOR}{key}")
    }
}
