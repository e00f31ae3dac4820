//! Lazily resolved locations within a value tree.
//!
//! A [`LazyPath`] is a linked chain from leaf to root. Appending is O(1) and shares the
//! parent; the ordered parts and the canonical string are only built when an error is
//! reported or an unknown-keys entry is indexed, and are memoized per node.

use std::fmt;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathComponent {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => {
                let quoted = serde_json::to_string(key).map_err(|_| fmt::Error)?;
                write!(f, "[{quoted}]")
            }
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl From<&str> for PathComponent {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathComponent {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathComponent {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// The concrete form of a path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedPath {
    /// Canonical form, e.g. `["a"][3]`; empty for the root.
    pub string: String,
    pub parts: Vec<PathComponent>,
}

static ROOT: ResolvedPath = ResolvedPath {
    string: String::new(),
    parts: Vec::new(),
};

struct PathNode {
    parent: LazyPath,
    component: PathComponent,
    resolved: OnceLock<ResolvedPath>,
}

#[derive(Clone, Default)]
pub struct LazyPath {
    node: Option<Arc<PathNode>>,
}

impl LazyPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn append(&self, component: impl Into<PathComponent>) -> Self {
        Self {
            node: Some(Arc::new(PathNode {
                parent: self.clone(),
                component: component.into(),
                resolved: OnceLock::new(),
            })),
        }
    }

    pub fn is_root(&self) -> bool {
        self.node.is_none()
    }

    pub fn resolve(&self) -> &ResolvedPath {
        match &self.node {
            None => &ROOT,
            Some(node) => node.resolved.get_or_init(|| {
                let parent = node.parent.resolve();
                let mut parts = Vec::with_capacity(parent.parts.len() + 1);
                parts.extend_from_slice(&parent.parts);
                parts.push(node.component.clone());
                ResolvedPath {
                    string: format!("{}{}", parent.string, node.component),
                    parts,
                }
            }),
        }
    }

    /// Human-readable suffix for error messages: ` @ ["a"][3]`, or empty at the root.
    pub fn at_path(&self) -> String {
        if self.is_root() {
            return String::new();
        }
        format!(" @ {}", self.resolve().string)
    }
}

impl fmt::Debug for LazyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LazyPath({})", self.resolve().string)
    }
}

impl fmt::Display for LazyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.resolve().string)
    }
}
