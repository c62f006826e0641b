//! Shared types used across pipeline stages.
//!
//! [`NavItem`] is serialized into the sidebar data module consumed by the
//! static site generator, so its field names are part of the output format.

use serde::{Deserialize, Serialize};

/// Navigation sidebar node.
///
/// Serialized as `{ text, link, items?, collapsed? }`. Absent children and
/// an absent collapsed flag are omitted rather than written as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    /// Display label.
    pub text: String,
    /// Site-relative path, optionally with an in-page `#anchor`.
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NavItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

impl NavItem {
    /// A leaf item with no children.
    pub fn leaf(text: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            link: link.into(),
            items: None,
            collapsed: None,
        }
    }

    /// Attach children and mark the item collapsed.
    ///
    /// An empty child list leaves the item a leaf.
    pub fn with_children(mut self, children: Vec<NavItem>) -> Self {
        if !children.is_empty() {
            self.items = Some(children);
            self.collapsed = Some(true);
        }
        self
    }

    /// Children, or an empty slice for leaves.
    pub fn children(&self) -> &[NavItem] {
        self.items.as_deref().unwrap_or(&[])
    }
}
