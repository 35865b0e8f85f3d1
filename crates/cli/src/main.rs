//! `gophic` -- command-line client for the Gophic image-resize service.
//!
//! Submits resize jobs, polls them to completion and saves the results.
//! Configuration comes from the environment (a `.env` file is honoured).
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                | Description                     |
//! |------------------------|----------|------------------------|---------------------------------|
//! | `GOPHIC_API_URL`       | yes      | --                     | Backend base URL                |
//! | `GOPHIC_SESSION_FILE`  | no       | `.gophic-session.json` | Persisted sign-in state         |
//! | `POLL_INTERVAL_MS`     | no       | `2000`                 | Delay between status queries    |
//! | `POLL_TIMEOUT_MS`      | no       | `300000`               | Give up on a job after this     |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                   | Per-request HTTP timeout        |
//! | `DOWNLOAD_DIR`         | no       | `.`                    | Where results are saved         |

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::Cli;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gophic=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
