//! JavaScript API page generation.
//!
//! Runs the declaration extractor against the package's `.d.ts` entry point
//! and renders the resulting tree as one Markdown page. Top-level variables
//! become property sections and top-level functions become function sections:
//!
//! ````text
//! ## dotnet.runtimeVersion
//!
//! ```ts
//! const dotnet.runtimeVersion: string
//! ```
//!
//! ## dotnet.load()
//!
//! ::: code-group
//! ```ts [TypeScript]
//! dotnet.load(assemblyNameOrFilePath: string): void
//! ```
//! ```js [JavaScript]
//! dotnet.load(assemblyNameOrFilePath)
//! ```
//! :::
//! ````
//!
//! ## Type rendering
//!
//! [`render_type`] tries, in order: literal value, type name, single-signature
//! function type as an arrow signature. Anything else renders as `unknown`.

use crate::config::JsConfig;
use crate::declaration::{Reflection, SymbolKind, TypeNode};
use crate::toolchain::{DeclarationExtractor, ExtractParams, ToolError};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rendered for any type the fallback chain cannot resolve.
pub const UNKNOWN_TYPE: &str = "unknown";

#[derive(Error, Debug)]
pub enum JsDocsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Declaration entry point not found: {0}")]
    MissingInput(PathBuf),
    #[error("Declaration extraction failed: {0}")]
    Tool(#[from] ToolError),
    #[error("Declaration extraction produced no result")]
    NoConversionResult,
}

/// Summary of a generated JS page.
#[derive(Debug, Clone, PartialEq)]
pub struct JsReport {
    pub output: PathBuf,
    pub json_output: PathBuf,
    pub properties: Vec<String>,
    pub functions: Vec<String>,
}

/// Extract the declaration tree and write the rendered page.
pub fn run_js_docs(
    extractor: &impl DeclarationExtractor,
    root: &Path,
    config: &JsConfig,
) -> Result<JsReport, JsDocsError> {
    let entry_point = root.join(&config.entry_point);
    if !entry_point.exists() {
        return Err(JsDocsError::MissingInput(entry_point));
    }

    let params = ExtractParams {
        entry_point,
        tsconfig: root.join(&config.tsconfig),
        json_output: root.join(&config.json_output),
    };
    let tree = extractor
        .extract(&params)?
        .ok_or(JsDocsError::NoConversionResult)?;

    let markdown = render_document(&tree, &config.namespace, &config.title);
    let output = root.join(&config.output);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, markdown)?;
    tracing::info!(path = %output.display(), "wrote JS API page");

    Ok(JsReport {
        output,
        json_output: params.json_output,
        properties: symbol_names(&tree, SymbolKind::Variable),
        functions: symbol_names(&tree, SymbolKind::Function),
    })
}

fn symbol_names(tree: &Reflection, kind: SymbolKind) -> Vec<String> {
    tree.children_of(kind).map(|c| c.name.clone()).collect()
}

/// Render the whole page: title, then properties, then functions.
pub fn render_document(tree: &Reflection, namespace: &str, title: &str) -> String {
    let mut md = format!("# {title}\n\n");
    for property in tree.children_of(SymbolKind::Variable) {
        md.push_str(&render_property(namespace, property));
    }
    for function in tree.children_of(SymbolKind::Function) {
        md.push_str(&render_function(namespace, function));
    }
    format!("{}\n", md.trim_end())
}

pub fn render_property(namespace: &str, property: &Reflection) -> String {
    let qualified = format!("{namespace}.{}", property.name);
    let mut md = String::new();
    let _ = writeln!(md, "## {qualified}\n");
    let _ = writeln!(
        md,
        "```ts\nconst {qualified}: {}\n```\n",
        render_type(property.type_node.as_ref())
    );
    push_paragraph(&mut md, &property.summary());
    md
}

pub fn render_function(namespace: &str, function: &Reflection) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "## {namespace}.{}()\n", function.name);

    for signature in &function.signatures {
        let typed: Vec<String> = signature.parameters.iter().map(render_parameter).collect();
        let untyped: Vec<String> = signature
            .parameters
            .iter()
            .map(|p| parameter_label(p, false))
            .collect();
        let returns = render_type(signature.type_node.as_ref());

        md.push_str("::: code-group\n");
        let _ = writeln!(
            md,
            "```ts [TypeScript]\n{}\n```",
            call_example(namespace, &function.name, &typed, Some(&returns))
        );
        let _ = writeln!(
            md,
            "```js [JavaScript]\n{}\n```",
            call_example(namespace, &function.name, &untyped, None)
        );
        md.push_str(":::\n\n");

        push_paragraph(&mut md, &signature.summary());

        let documented: Vec<(&str, String)> = signature
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), p.summary()))
            .filter(|(_, text)| !text.is_empty())
            .collect();
        if !documented.is_empty() {
            md.push_str("**Parameters:**\n\n");
            for (name, text) in documented {
                let _ = writeln!(md, "- `{name}` - {text}");
            }
            md.push('\n');
        }

        if signature.has_block_tag("@returns") {
            let returns = signature.block_tag("@returns").unwrap_or_default();
            push_paragraph(&mut md, format!("**Returns:** {returns}").trim_end());
        }
        if let Some(description) = signature.block_tag("@description") {
            push_paragraph(&mut md, &description);
        }
    }
    md
}

fn push_paragraph(md: &mut String, text: &str) {
    if !text.is_empty() {
        md.push_str(text);
        md.push_str("\n\n");
    }
}

/// `dotnet.fn(a)`; more than one parameter goes one per line.
fn call_example(namespace: &str, name: &str, params: &[String], returns: Option<&str>) -> String {
    let mut call = format!("{namespace}.{name}(");
    if params.len() <= 1 {
        call.push_str(&params.concat());
    } else {
        call.push('\n');
        for param in params {
            let _ = writeln!(call, "    {param},");
        }
    }
    call.push(')');
    if let Some(returns) = returns {
        let _ = write!(call, ": {returns}");
    }
    call
}

fn parameter_label(param: &Reflection, typed: bool) -> String {
    let rest = if param.flags.is_rest { "..." } else { "" };
    let optional = if typed && param.flags.is_optional { "?" } else { "" };
    format!("{rest}{}{optional}", param.name)
}

fn render_parameter(param: &Reflection) -> String {
    format!(
        "{}: {}",
        parameter_label(param, true),
        render_type(param.type_node.as_ref())
    )
}

/// Render a type annotation: literal → name → arrow signature → `unknown`.
pub fn render_type(node: Option<&TypeNode>) -> String {
    let Some(node) = node else {
        return UNKNOWN_TYPE.to_string();
    };
    if node.kind == "literal" {
        return render_literal(&node.value);
    }
    if let Some(name) = &node.name {
        return name.clone();
    }
    if node.kind == "reflection"
        && let Some(declaration) = &node.declaration
        && let [signature] = declaration.signatures.as_slice()
    {
        let params: Vec<String> = signature.parameters.iter().map(render_parameter).collect();
        return format!(
            "({}) => {}",
            params.join(", "),
            render_type(signature.type_node.as_ref())
        );
    }
    UNKNOWN_TYPE.to_string()
}

fn render_literal(value: &serde_json::Value) -> String {
    // Bigint literals are serialized as { value, negative }.
    if let Some(digits) = value.get("value").and_then(|v| v.as_str()) {
        let negative = value
            .get("negative")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        return format!("{}{digits}n", if negative { "-" } else { "" });
    }
    value.to_string()
}
