//! Valuta devserver CLI - local stand-in for the conversion endpoint
//!
//! ```bash
//! valuta-devserver serve                    # Listen on 127.0.0.1:8000
//! valuta-devserver serve --fail-status 500  # Exercise the frontend error path
//! valuta-devserver check report.xlsx        # Would this file be accepted?
//! ```

use axum::http::StatusCode;
use clap::{Parser, Subcommand};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use valuta_devserver::api::logs::{log_error, log_success};
use valuta_devserver::{check_workbook, start_server, ServerConfig};

#[derive(Parser)]
#[command(name = "valuta-devserver")]
#[command(about = "Local development stub of the Valuta Convert upload endpoint", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "8000")]
        port: u16,

        /// Address to bind
        #[arg(long, env = "HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// Largest accepted upload, in megabytes
        #[arg(long, default_value = "20")]
        max_upload_mb: usize,

        /// Answer every upload with this HTTP status instead of echoing it
        #[arg(long, value_parser = parse_status)]
        fail_status: Option<StatusCode>,
    },

    /// Check whether a local file would be accepted as a workbook
    Check {
        /// Input .xlsx file
        input: PathBuf,
    },
}

fn parse_status(value: &str) -> Result<StatusCode, String> {
    let code: u16 = value.parse().map_err(|e| format!("{}", e))?;
    StatusCode::from_u16(code).map_err(|e| e.to_string())
}

fn megabytes(mb: usize) -> usize {
    mb.saturating_mul(1024 * 1024)
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Serve {
            port,
            host,
            max_upload_mb,
            fail_status,
        } => {
            let config = ServerConfig {
                host,
                port,
                max_upload_bytes: megabytes(max_upload_mb),
                fail_status,
            };
            start_server(config).await.map_err(Into::into)
        }

        Commands::Check { input } => cmd_check(&input),
    };

    if let Err(e) = result {
        log_error(format!("Error: {}", e));
        std::process::exit(1);
    }
}

fn cmd_check(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(input)?;
    check_workbook(&bytes)?;
    log_success(format!("{} looks like an .xlsx workbook ({} bytes)", input.display(), bytes.len()));
    Ok(())
}
