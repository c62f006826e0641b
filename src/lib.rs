//! # interop-docs
//!
//! Generates the API reference for a hybrid JavaScript/.NET interop library
//! as Markdown for a VitePress site. Two external documentation tools do the
//! heavy lifting; this crate drives them, renders or stitches their output,
//! and derives the sidebar navigation.
//!
//! # Architecture: Two Pipelines
//!
//! ```text
//! js       index.d.ts  →  typedoc JSON  →  js-api.md
//! dotnet   projects    →  build + xmldocmd  →  index.md + pages  →  nav.mjs
//! ```
//!
//! The JS pipeline renders a single page from the declaration tree. The .NET
//! pipeline builds each project with XML docs enabled, converts each assembly,
//! stitches a combined index, post-processes every page, and writes the
//! sidebar tree. `nav` re-derives the sidebar from an existing output tree.
//!
//! External tools sit behind the [`toolchain`] traits so both pipelines run
//! against recording fakes in tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`js`] | JS page: extraction, type rendering, property and function sections |
//! | [`dotnet`] | .NET pipeline: builds, conversions, combined index, post-processing, nav |
//! | [`markdown`] | Table-cell escaping and front matter for generated pages |
//! | [`nav`] | Sidebar tree from the Markdown heading structure |
//! | [`toolchain`] | Extractor/build/converter traits, argument rendering, process runner |
//! | [`declaration`] | Declaration tree model deserialized from the extractor's JSON |
//! | [`config`] | `interop-docs.toml` loading, merging over defaults, validation |
//! | [`types`] | Shared types written to output files (`NavItem`) |
//! | [`error`] | Top-level error and process exit status |
//! | [`output`] | CLI summaries of pipeline results |

pub mod config;
pub mod declaration;
pub mod dotnet;
pub mod error;
pub mod js;
pub mod markdown;
pub mod nav;
pub mod output;
pub mod toolchain;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
