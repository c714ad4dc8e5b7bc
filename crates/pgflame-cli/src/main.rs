mod config;
mod render_cmd;
mod summary_cmd;
#[cfg(test)]
mod test_util;

use clap::{Parser, Subcommand};

use config::FlameConfig;
use render_cmd::OutputFormat;

#[derive(Parser)]
#[command(
    name = "pg-flame",
    about = "Flame graphs for PostgreSQL EXPLAIN ANALYZE plans",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a plan as an HTML flame graph (reads `EXPLAIN (ANALYZE, BUFFERS, FORMAT JSON)` output)
    Render {
        /// Plan JSON file (defaults to stdin)
        #[arg(long, short)]
        input: Option<String>,
        /// Output file path (defaults to stdout)
        #[arg(long, short)]
        output: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
        /// Page title (overrides PG_FLAME_TITLE env var and config file)
        #[arg(long)]
        title: Option<String>,
    },
    /// Print the flame tree as an indented table
    Summary {
        /// Plan JSON file (defaults to stdin)
        #[arg(long, short)]
        input: Option<String>,
    },
    /// Write a pg-flame config file
    Init {
        /// Default page title
        #[arg(long)]
        title: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the `pg-flame init` command: write config file.
fn cmd_init(title: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        page: config::PageSection { title },
    };
    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if let Some(title) = &cfg.page.title {
        println!("  page.title = {title}");
    }

    Ok(())
}

fn main() {
    // Logs go to stderr so rendered output on stdout stays clean.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Render {
            input,
            output,
            format,
            title,
        } => {
            let resolved = FlameConfig::resolve(title.as_deref())?;
            render_cmd::run_render(
                input.as_deref(),
                output.as_deref(),
                format,
                &resolved.page,
            )
        }
        Commands::Summary { input } => summary_cmd::run_summary(input.as_deref()),
        Commands::Init { title, force } => cmd_init(title, force),
    }
}
