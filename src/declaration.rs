//! Declaration tree produced by the TypeScript doc extractor.
//!
//! Mirrors the subset of TypeDoc's JSON project reflection that the JS page
//! needs. Unknown fields are ignored and every field has a default, so trees
//! from newer extractor versions still load.
//!
//! ```text
//! project (kind 1)
//! ├── runtimeVersion (kind 32, variable)   type, comment
//! └── load (kind 64, function)
//!     └── signature (kind 4096)            parameters, type, comment
//!         └── assemblyName (kind 32768)    type, comment
//! ```

use serde::Deserialize;

/// Symbol kinds the renderer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Other,
}

impl SymbolKind {
    pub const VARIABLE: u32 = 32;
    pub const FUNCTION: u32 = 64;

    pub fn from_raw(kind: u32) -> Self {
        match kind {
            Self::VARIABLE => SymbolKind::Variable,
            Self::FUNCTION => SymbolKind::Function,
            _ => SymbolKind::Other,
        }
    }
}

/// A node of the declaration tree: the project, a symbol, a signature, or a parameter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reflection {
    pub id: u64,
    pub name: String,
    pub kind: u32,
    pub flags: ReflectionFlags,
    pub comment: Option<Comment>,
    pub children: Vec<Reflection>,
    pub signatures: Vec<Reflection>,
    pub parameters: Vec<Reflection>,
    #[serde(rename = "type")]
    pub type_node: Option<TypeNode>,
}

impl Reflection {
    pub fn symbol_kind(&self) -> SymbolKind {
        SymbolKind::from_raw(self.kind)
    }

    /// Top-level children of the given kind, in tree order.
    pub fn children_of(&self, kind: SymbolKind) -> impl Iterator<Item = &Reflection> {
        self.children
            .iter()
            .filter(move |child| child.symbol_kind() == kind)
    }

    /// Summary text of the doc comment, empty when undocumented.
    pub fn summary(&self) -> String {
        self.comment
            .as_ref()
            .map(Comment::summary_text)
            .unwrap_or_default()
    }

    /// Content of a block tag such as `@returns`.
    pub fn block_tag(&self, tag: &str) -> Option<String> {
        self.comment.as_ref().and_then(|c| c.tag_text(tag))
    }

    /// Whether the doc comment carries `tag`, even with no content.
    pub fn has_block_tag(&self, tag: &str) -> bool {
        self.comment.as_ref().is_some_and(|c| c.has_tag(tag))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReflectionFlags {
    pub is_optional: bool,
    pub is_rest: bool,
    pub is_const: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
    pub summary: Vec<CommentPart>,
    pub block_tags: Vec<CommentTag>,
}

impl Comment {
    pub fn summary_text(&self) -> String {
        join_parts(&self.summary)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.block_tags.iter().any(|t| t.tag == tag)
    }

    /// First block tag named `tag` (with its `@`), if it has any content.
    pub fn tag_text(&self, tag: &str) -> Option<String> {
        self.block_tags
            .iter()
            .find(|t| t.tag == tag)
            .map(|t| join_parts(&t.content))
            .filter(|text| !text.is_empty())
    }
}

/// A run of comment text: plain text, inline code, or an inline tag.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentPart {
    pub kind: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CommentTag {
    pub tag: String,
    pub content: Vec<CommentPart>,
}

fn join_parts(parts: &[CommentPart]) -> String {
    parts
        .iter()
        .map(|p| p.text.as_str())
        .collect::<String>()
        .trim()
        .to_string()
}

/// A type annotation.
///
/// Only the fields the renderer's fallback chain consults are modeled:
/// literal `value`, `name` for named types, and `declaration` for inline
/// object/function types.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TypeNode {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: Option<String>,
    pub value: serde_json::Value,
    pub declaration: Option<Box<Reflection>>,
}
