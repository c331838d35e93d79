use std::fs;
use std::path::{Path, PathBuf};

use child_support::core::TieredNeedTable;
use child_support::{AppError, Result, api};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "child-support",
    about = "Child support calculator (income-tiered need table, proportional liability split)"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "CHILD_SUPPORT_TABLE",
        help = "TOML file with the need table edition; defaults to the built-in 2025 edition"
    )]
    table: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API over HTTP
    Serve {
        #[arg(long, env = "CHILD_SUPPORT_PORT", default_value_t = 8080)]
        port: u16,
    },
    /// Calculate one household from a JSON request file and print the result
    Calculate {
        #[arg(long, help = "Request JSON file, '-' reads stdin")]
        input: PathBuf,
        #[arg(long, help = "Print compact instead of pretty JSON")]
        compact: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let table = load_table(cli.table.as_deref())?;
    info!(edition = table.edition(), "need table loaded");

    match cli.command {
        Command::Serve { port } => api::run_http_server(port, table).await?,
        Command::Calculate { input, compact } => {
            let json = read_input(&input)?;
            let response = api::calculate_from_json(&table, &json)?;
            let rendered = if compact {
                serde_json::to_string(&response)?
            } else {
                serde_json::to_string_pretty(&response)?
            };
            println!("{rendered}");
        }
    }
    Ok(())
}

fn load_table(path: Option<&Path>) -> Result<TieredNeedTable> {
    let Some(path) = path else {
        return Ok(TieredNeedTable::edition_2025());
    };
    let source = fs::read_to_string(path)?;
    TieredNeedTable::from_toml_str(&source).map_err(AppError::from)
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        return Ok(std::io::read_to_string(std::io::stdin())?);
    }
    Ok(fs::read_to_string(path)?)
}
