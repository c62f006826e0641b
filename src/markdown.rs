//! Markdown post-processing for generated reference pages.
//!
//! Two text transformations are applied to every generated file:
//!
//! - **Table-cell escaping**: `;`, `{` and `}` inside table cells become
//!   `&semi;`, `&lbrace;` and `&rbrace;`. The site renderer misparses them raw
//!   inside tables. Text outside table rows is never touched.
//! - **Front matter**: a fixed YAML block turns off edit links, prev/next
//!   links, and the outline for reference pages.
//!
//! Both steps are idempotent: a semicolon that already terminates a character
//! reference is left alone, and a file that already starts with the front
//! matter block is not prefixed again. Running the post-processor over an
//! output directory twice produces the same files as running it once.

use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

/// Prepended to every generated page.
pub const FRONT_MATTER: &str = "---\neditLink: false\nprev: false\nnext: false\noutline: false\n---\n";

/// Matches a character reference missing only its terminating `;`.
///
/// Named references are limited to the ones the escaper and the converter
/// emit, so text such as `R&D;` still has its semicolon escaped.
static ENTITY_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:semi|lbrace|rbrace|lt|gt|amp|quot|apos|nbsp|#[0-9]+|#[xX][0-9A-Fa-f]+)$")
        .expect("valid regex")
});

#[derive(Error, Debug)]
pub enum MarkdownError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Escape `;`, `{`, `}` inside table cells; other lines pass through unchanged.
pub fn escape_table_cells(text: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if is_table_row(line) {
                escape_row(line)
            } else {
                line.to_string()
            }
        })
        .collect()
}

fn is_table_row(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Everything after the row's leading `|` is cell content or a delimiter.
fn escape_row(line: &str) -> String {
    let mut out = String::with_capacity(line.len() + 16);
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            // `\|` is a literal pipe inside a cell, not a delimiter.
            '\\' if chars.peek().is_some_and(|&(_, next)| next == '|') => {
                out.push('\\');
                out.push('|');
                chars.next();
            }
            ';' if ENTITY_PREFIX.is_match(&line[..i]) => out.push(';'),
            ';' => out.push_str("&semi;"),
            '{' => out.push_str("&lbrace;"),
            '}' => out.push_str("&rbrace;"),
            _ => out.push(c),
        }
    }
    out
}

/// Prefix the fixed front matter block unless it is already there.
pub fn add_front_matter(text: &str) -> String {
    if text.starts_with(FRONT_MATTER) {
        return text.to_string();
    }
    format!("{FRONT_MATTER}\n{text}")
}

/// Full post-processing of a single page's text.
pub fn postprocess(text: &str) -> String {
    add_front_matter(&escape_table_cells(text))
}

/// Post-process one file in place.
pub fn postprocess_file(path: &Path) -> Result<(), MarkdownError> {
    let content = fs::read_to_string(path)?;
    let processed = postprocess(&content);
    if processed != content {
        fs::write(path, processed)?;
    }
    Ok(())
}

/// Post-process every `.md` file under `dir`. Returns the number of files.
pub fn postprocess_dir(dir: &Path) -> Result<usize, MarkdownError> {
    let mut count = 0;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "md") {
            postprocess_file(path)?;
            count += 1;
        }
    }
    tracing::debug!(dir = %dir.display(), count, "post-processed markdown");
    Ok(count)
}
