//! `pg-flame render` command: turn EXPLAIN JSON into a flame graph page.

use std::io::{BufWriter, Read, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;

use pgflame_core::html::{render_html, write_json};
use pgflame_core::{PageOptions, Plan, build_flame, parse_plan_json};

/// What `render` writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page.
    Html,
    /// The flame tree as JSON.
    Json,
}

/// Read the plan document from `input`, or stdin when `None`.
pub fn read_input(input: Option<&str>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("cannot read plan file: {path}")),
        None => {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .context("failed to read plan from stdin")?;
            Ok(content)
        }
    }
}

/// Read and parse the plan from `input`, or stdin when `None`.
pub fn load_plan(input: Option<&str>) -> Result<Plan> {
    let content = read_input(input)?;
    parse_plan_json(&content).with_context(|| match input {
        Some(path) => format!("failed to parse plan in {path}"),
        None => "failed to parse plan from stdin".to_owned(),
    })
}

/// Run the render command.
pub fn run_render(
    input: Option<&str>,
    output: Option<&str>,
    format: OutputFormat,
    page: &PageOptions,
) -> Result<()> {
    let plan = load_plan(input)?;
    let flame = build_flame(&plan);

    let mut writer: Box<dyn Write> = if let Some(path) = output {
        Box::new(BufWriter::new(
            std::fs::File::create(path)
                .with_context(|| format!("cannot create output file: {path}"))?,
        ))
    } else {
        Box::new(BufWriter::new(std::io::stdout().lock()))
    };

    let written = match format {
        OutputFormat::Html => render_html(&flame, page, &mut writer),
        OutputFormat::Json => write_json(&flame, &mut writer),
    };
    written.context("failed to write flame graph")?;
    writer.flush().context("failed to flush output")?;

    tracing::info!(
        ?format,
        nodes = flame.node_count(),
        total_ms = flame.value,
        "rendered plan"
    );

    if let Some(path) = output {
        println!("Wrote flame graph to {path}");
    }

    Ok(())
}
