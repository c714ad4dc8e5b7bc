//! HTML page rendering.
//!
//! The flame tree is serialized to JSON and embedded as a script literal in a
//! bundled template that draws it with d3-flame-graph. The template uses
//! `{{title}}` and `{{data}}` placeholders.

use std::io::{self, Write};

use thiserror::Error;

use crate::flame::{FlameNode, build_flame, detail::escape_html};
use crate::plan::Plan;

const TEMPLATE: &str = include_str!("template.html");

/// Errors that can occur while rendering output.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to serialize flame data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Page-level rendering options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageOptions {
    /// Page title, shown in the browser tab and above the chart.
    pub title: String,
}

impl PageOptions {
    /// The title used when none is configured.
    pub const DEFAULT_TITLE: &str = "pg_flame";

    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl Default for PageOptions {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TITLE)
    }
}

/// Serialize a flame tree to JSON that is safe to place inside a `<script>`
/// element.
///
/// `<`, `>` and `&` only occur inside JSON strings, where they are replaced
/// by their `\u` escapes; the decoded value is unchanged.
pub fn script_json(flame: &FlameNode) -> Result<String, RenderError> {
    let json = serde_json::to_string(flame)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}

/// Write the flame tree as pretty-printed JSON.
pub fn write_json<W: Write>(flame: &FlameNode, writer: &mut W) -> Result<(), RenderError> {
    serde_json::to_writer_pretty(&mut *writer, flame)?;
    writer.write_all(b"\n")?;
    Ok(())
}

/// Render the full HTML page for a flame tree.
pub fn render_html<W: Write>(
    flame: &FlameNode,
    options: &PageOptions,
    writer: &mut W,
) -> Result<(), RenderError> {
    let data = script_json(flame)?;
    let title = escape_html(&options.title);

    let mut rest = TEMPLATE;
    while let Some(start) = rest.find("{{") {
        writer.write_all(rest[..start].as_bytes())?;
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            rest = &rest[start..];
            break;
        };
        match &after[..end] {
            "title" => writer.write_all(title.as_bytes())?,
            "data" => writer.write_all(data.as_bytes())?,
            other => write!(writer, "{{{{{other}}}}}")?,
        }
        rest = &after[end + 2..];
    }
    writer.write_all(rest.as_bytes())?;

    tracing::debug!(
        data_bytes = data.len(),
        title = %options.title,
        "rendered flame graph page"
    );

    Ok(())
}

/// Build the flame tree for `plan` and render it as an HTML page.
pub fn generate<W: Write>(
    plan: &Plan,
    options: &PageOptions,
    writer: &mut W,
) -> Result<(), RenderError> {
    let flame = build_flame(plan);
    render_html(&flame, options, writer)
}
