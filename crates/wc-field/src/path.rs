// SPDX-License-Identifier: MIT OR Apache-2.0
//! Immutable field paths.

use std::fmt;
use std::sync::Arc;

/// A path to a field inside a nested value, e.g. `spec.containers[0].name`.
///
/// Paths share their parents, so deriving a child is cheap and never
/// changes the path it was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Path(Arc<Node>);

#[derive(Debug, PartialEq, Eq, Hash)]
struct Node {
    name: String,
    index: Option<String>,
    parent: Option<Path>,
}

impl Path {
    /// A root path.
    pub fn new(name: impl Into<String>) -> Self {
        Self(Arc::new(Node {
            name: name.into(),
            index: None,
            parent: None,
        }))
    }

    /// A root path followed by `more` child segments.
    pub fn new_many<I, S>(name: impl Into<String>, more: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name).child_many(more)
    }

    /// A named child of this path.
    pub fn child(&self, name: impl Into<String>) -> Self {
        Self(Arc::new(Node {
            name: name.into(),
            index: None,
            parent: Some(self.clone()),
        }))
    }

    /// Several nested named children.
    pub fn child_many<I, S>(&self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names
            .into_iter()
            .fold(self.clone(), |path, name| path.child(name))
    }

    /// A list element of this path.
    pub fn index(&self, index: usize) -> Self {
        self.subscript(index.to_string())
    }

    /// A map entry of this path.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.subscript(key.into())
    }

    fn subscript(&self, index: String) -> Self {
        Self(Arc::new(Node {
            name: String::new(),
            index: Some(index),
            parent: Some(self.clone()),
        }))
    }

    /// The enclosing path, `None` at the root.
    pub fn parent(&self) -> Option<&Path> {
        self.0.parent.as_ref()
    }

    /// The outermost ancestor; a root is its own root.
    pub fn root(&self) -> &Path {
        let mut path = self;
        while let Some(parent) = path.parent() {
            path = parent;
        }
        path
    }

    fn segments(&self) -> Vec<&Node> {
        let mut nodes = Vec::new();
        let mut path = Some(self);
        while let Some(p) = path {
            nodes.push(&*p.0);
            path = p.parent();
        }
        nodes.reverse();
        nodes
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.segments() {
            if node.parent.is_some() && !node.name.is_empty() {
                f.write_str(".")?;
            }
            match &node.index {
                Some(index) => write!(f, "[{index}]")?,
                None => f.write_str(&node.name)?,
            }
        }
        Ok(())
    }
}
