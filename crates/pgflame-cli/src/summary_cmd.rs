//! `pg-flame summary` command: print the flame tree as an indented table.

use std::io::{self, Write};

use anyhow::{Context, Result};

use pgflame_core::{FlameNode, build_flame};

const NAME_WIDTH: usize = 50;

/// Run the summary command.
pub fn run_summary(input: Option<&str>) -> Result<()> {
    let plan = crate::render_cmd::load_plan(input)?;
    let flame = build_flame(&plan);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_summary(&flame, &mut out).context("failed to write summary")?;

    if let Some(exec) = plan.execution_time {
        writeln!(out)?;
        writeln!(out, "Server-reported execution time: {exec:.3} ms")?;
    }

    Ok(())
}

/// Write one row per flame node, children indented under their parent.
pub fn write_summary<W: Write>(flame: &FlameNode, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "{:<NAME_WIDTH$} {:>12} {:>12}  {}",
        "NODE", "VALUE (ms)", "TIME (ms)", "INIT"
    )?;
    writeln!(out, "{}", "-".repeat(NAME_WIDTH + 32))?;
    write_rows(flame, 0, out)
}

fn write_rows<W: Write>(node: &FlameNode, depth: usize, out: &mut W) -> io::Result<()> {
    let name = format!("{}{}", "  ".repeat(depth), node.name);
    let name_display = if name.chars().count() > NAME_WIDTH {
        let truncated: String = name.chars().take(NAME_WIDTH - 3).collect();
        format!("{truncated}...")
    } else {
        name
    };
    let init = if node.is_init_plan { "yes" } else { "" };

    writeln!(
        out,
        "{:<NAME_WIDTH$} {:>12.3} {:>12.3}  {}",
        name_display, node.value, node.time, init
    )?;

    for child in &node.children {
        write_rows(child, depth + 1, out)?;
    }
    Ok(())
}
