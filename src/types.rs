//! Core type definitions for compile-time safety.
//!
//! This module provides newtype wrappers around string identifiers to prevent
//! accidental mixing of different ID types at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a diagram registered on the board (`cluster-glyphs`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DiagramId(pub String);

impl DiagramId {
    /// Create a new `DiagramId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for DiagramId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DiagramId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for DiagramId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier of an element inside a rendered scene.
///
/// These ids are the contract between renderers and their hover/click
/// cross-references, e.g. `dendrogram-node-17` or `highlight-rect-2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    /// Create a new `ElementId` from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of a dendrogram node circle.
    pub fn dendrogram_node(node: u32) -> Self {
        Self(format!("dendrogram-node-{node}"))
    }

    /// Id of a dendrogram link path between two nodes.
    pub fn dendrogram_link(source: u32, target: u32) -> Self {
        Self(format!("dendrogram-link-{source}-{target}"))
    }

    /// Id of a heatmap highlight rectangle.
    pub fn highlight_rect(n: usize) -> Self {
        Self(format!("highlight-rect-{n}"))
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ElementId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
