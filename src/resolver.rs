use crate::error::ResolveError;
use crate::tree::{join_path, Map, Node, PATH_SEPARATOR};

/// Looks up a dotted path against the aggregate tree root.
pub fn lookup<'a>(root: &'a Node, path: &str) -> Result<&'a Node, ResolveError> {
    root.get_path(path)
        .ok_or_else(|| ResolveError::ReferenceNotFound {
            path: path.to_string(),
        })
}

/// A lookup rooted at a fixed namespace, e.g. `theme.typography.font-size`.
///
/// `Lookup::new("theme.color").resolve("text.primary", root)` reads
/// `theme.color.text.primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    prefix: &'static str,
}

impl Lookup {
    #[must_use]
    pub const fn new(prefix: &'static str) -> Self {
        Self { prefix }
    }

    pub fn resolve<'a>(&self, key: &str, root: &'a Node) -> Result<&'a Node, ResolveError> {
        lookup(root, &join_path(self.prefix, key))
    }
}

/// Returns a copy of `root` in which every string leaf below `subtree` has been
/// replaced by the value its dotted path names.
///
/// References into the subtree itself are followed until they reach a value,
/// also when a path runs through another reference, so the result does not
/// depend on the order keys appear in. Values found
/// outside the subtree are taken as they are. Numbers, empty strings and
/// `!literal` strings are left untouched.
pub fn resolve_references(root: &Node, subtree: &str) -> Result<Node, ResolveError> {
    let target = root
        .get_path(subtree)
        .ok_or_else(|| ResolveError::MissingSubtree {
            path: subtree.to_string(),
        })?;

    let mut walker = ReferenceWalker {
        root,
        subtree,
        following: Vec::new(),
    };
    let resolved = walker.resolve_node(target)?;
    log::debug!("Resolved references under {subtree}");

    let mut output = root.clone();
    // The path was found above, so it is still present in the copy.
    if let Some(slot) = output.get_path_mut(subtree) {
        *slot = resolved;
    }
    Ok(output)
}

struct ReferenceWalker<'a> {
    root: &'a Node,
    subtree: &'a str,
    // References currently being followed, outermost first.
    following: Vec<String>,
}

impl<'a> ReferenceWalker<'a> {
    fn resolve_node(&mut self, node: &Node) -> Result<Node, ResolveError> {
        match node {
            Node::String(reference) if !reference.is_empty() => self.follow(reference),
            Node::Map(map) => {
                let mut resolved = Map::new();
                for (key, value) in map.iter() {
                    resolved.insert(key, self.resolve_node(value)?);
                }
                Ok(Node::Map(resolved))
            }
            Node::Sequence(items) => items
                .iter()
                .map(|item| self.resolve_node(item))
                .collect::<Result<_, _>>()
                .map(Node::Sequence),
            other => Ok(other.clone()),
        }
    }

    fn follow(&mut self, reference: &str) -> Result<Node, ResolveError> {
        // A reference to the subtree or one of its ancestors would contain itself.
        let encloses_subtree = contains(reference, self.subtree);
        if encloses_subtree || self.following.iter().any(|r| r == reference) {
            let mut chain = self.following.clone();
            chain.push(reference.to_string());
            if encloses_subtree {
                chain.push(self.subtree.to_string());
            }
            return Err(ResolveError::CircularReference {
                chain: chain.join(" -> "),
            });
        }

        if !contains(self.subtree, reference) {
            return lookup(self.root, reference).cloned();
        }

        self.following.push(reference.to_string());
        let resolved = self.resolve_path(reference);
        self.following.pop();
        resolved
    }

    /// Walks `reference` from the root and resolves what it reaches. A
    /// reference met partway along the path is resolved first and the walk
    /// continues inside its value.
    fn resolve_path(&mut self, reference: &str) -> Result<Node, ResolveError> {
        let not_found = || ResolveError::ReferenceNotFound {
            path: reference.to_string(),
        };
        let segments: Vec<&str> = reference.split(PATH_SEPARATOR).collect();

        let mut node: &'a Node = self.root;
        let mut path = String::new();
        for (i, segment) in segments.iter().enumerate() {
            node = node.child(segment).ok_or_else(not_found)?;
            path = join_path(&path, segment);

            let rest = &segments[i + 1..];
            let is_reference = matches!(node, Node::String(s) if !s.is_empty());
            if !rest.is_empty() && is_reference && contains(self.subtree, &path) {
                let through = self.follow(&path)?;
                let separator = PATH_SEPARATOR.to_string();
                return through
                    .get_path(&rest.join(separator.as_str()))
                    .cloned()
                    .ok_or_else(not_found);
            }
        }
        self.resolve_node(node)
    }
}

/// Whether `inner` is `outer` itself or lies below it.
fn contains(outer: &str, inner: &str) -> bool {
    inner == outer
        || inner
            .strip_prefix(outer)
            .is_some_and(|rest| rest.starts_with(PATH_SEPARATOR))
}
