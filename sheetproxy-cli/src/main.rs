//! sheetproxy CLI
//!
//! Runs the API server, or reshapes a sheet once and prints the JSON.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use sheetproxy_api::{ApiConfig, ApiServer};
use sheetproxy_core::types::FormatMapping;
use sheetproxy_sheets::{SheetsClient, SheetsConfig};

/// sheetproxy - cached JSON façade over Google Sheets
#[derive(Parser)]
#[command(name = "sheetproxy")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Port to listen on (defaults to $PORT, then 3000)
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0")]
        bind: String,
    },

    /// Print a sheet's data rows as objects keyed by header
    Array(SheetArgs),

    /// Print a sheet's label/value rows as one object
    Object(SheetArgs),
}

#[derive(Args)]
struct SheetArgs {
    /// Google Sheets URL
    spreadsheet_url: String,
    /// Tab name (first tab if omitted)
    #[arg(short, long)]
    sheet: Option<String>,
    /// Format mapping, e.g. '[{"name": "Full name"}]'
    #[arg(short, long)]
    format: Option<String>,
    /// Google API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
    /// Sheets API base URL
    #[arg(long, env = "SHEETS_API_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "sheetproxy=debug,info"
    } else {
        "sheetproxy=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Serve { port, bind } => cmd_serve(port, &bind).await,
        Commands::Array(args) => cmd_array(args).await,
        Commands::Object(args) => cmd_object(args).await,
    }
}

/// Run the API server
async fn cmd_serve(port: Option<u16>, bind: &str) -> Result<()> {
    let config = ApiConfig::from_env();
    let port = port.unwrap_or(config.port);

    println!("{}", "🚀 Starting sheetproxy API server...".cyan().bold());
    println!("   {} http://{}:{}", "Listening on:".green(), bind, port);
    println!("   {} http://{}:{}/health", "Health check:".dimmed(), bind, port);
    if config.google_api_key.is_none() {
        println!("   {}", "⚠️  GOOGLE_API_KEY is not set; sheet routes will fail.".yellow());
    }
    println!("\n   Press Ctrl+C to stop.\n");

    let server = ApiServer::new(config).context("Failed to build API server")?;

    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .context("Invalid bind address")?;
    server.run(addr).await?;

    Ok(())
}

/// Print a sheet as an array of objects
async fn cmd_array(args: SheetArgs) -> Result<()> {
    let (client, format) = prepare(&args)?;

    let value = client
        .array_data_from_sheet(&args.spreadsheet_url, args.sheet.as_deref(), &format)
        .await
        .context("Failed to fetch sheet")?;

    print_json(&value)
}

/// Print a sheet as a single object
async fn cmd_object(args: SheetArgs) -> Result<()> {
    let (client, format) = prepare(&args)?;

    let value = client
        .object_from_sheet(&args.spreadsheet_url, args.sheet.as_deref(), &format)
        .await
        .context("Failed to fetch sheet")?;

    print_json(&value)
}

fn prepare(args: &SheetArgs) -> Result<(SheetsClient, FormatMapping)> {
    let mut config = SheetsConfig {
        api_key: args.api_key.clone(),
        ..SheetsConfig::default()
    };
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }

    let client = SheetsClient::with_config(config).context("Failed to create Sheets client")?;

    let format = match &args.format {
        Some(raw) => FormatMapping::from_json_str(raw).context("Invalid --format")?,
        None => FormatMapping::new(),
    };

    Ok((client, format))
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_object_command() {
        let cli = Cli::try_parse_from([
            "sheetproxy",
            "object",
            "https://docs.google.com/spreadsheets/d/1",
            "--sheet",
            "sheet1",
            "--format",
            r#"[{"zgst": "ZGST"}]"#,
            "--api-key",
            "k",
        ])
        .unwrap();

        let Commands::Object(args) = cli.command else {
            panic!("expected object command");
        };
        assert_eq!(args.sheet.as_deref(), Some("sheet1"));

        let (client, format) = prepare(&args).unwrap();
        assert_eq!(client.config().api_key.as_deref(), Some("k"));
        assert_eq!(format.output_key_for("ZGST"), Some("zgst"));
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["sheetproxy", "serve"]).unwrap();

        let Commands::Serve { port, bind } = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(port, None);
        assert_eq!(bind, "0.0.0.0");
    }

    #[test]
    fn test_bad_format_is_rejected() {
        let cli = Cli::try_parse_from([
            "sheetproxy",
            "array",
            "https://docs.google.com/spreadsheets/d/1",
            "--format",
            "nope",
        ])
        .unwrap();

        let Commands::Array(args) = cli.command else {
            panic!("expected array command");
        };
        assert!(prepare(&args).is_err());
    }
}
