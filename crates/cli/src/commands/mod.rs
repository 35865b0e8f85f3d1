//! CLI command definitions and dispatch.

pub mod auth;
pub mod download;
pub mod resize;
pub mod status;

use std::sync::Arc;

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use gophic_client::config::ClientConfig;
use gophic_client::http::{ApiClient, Navigator, UnauthorizedReset};
use gophic_client::session::{FileSessionStore, SessionStore};
use gophic_client::ResizeApi;

/// Gophic: resize images on the remote job service
#[derive(Debug, Parser)]
#[command(name = "gophic", version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the Google sign-in URL
    Login,
    /// Store the identity carried by the sign-in redirect URL
    Callback(auth::CallbackArgs),
    /// Forget the stored identity
    Logout,
    /// Show who is signed in
    Whoami,
    /// Resize one or more images and save the results
    Resize(resize::ResizeArgs),
    /// Query the status of a job once
    Status(status::StatusArgs),
    /// Save the result of a completed job
    Download(download::DownloadArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> anyhow::Result<()> {
        let ctx = Context::load()?;
        match &self.command {
            Commands::Login => auth::login(&ctx).await,
            Commands::Callback(args) => auth::callback(&ctx, args),
            Commands::Logout => auth::logout(&ctx),
            Commands::Whoami => auth::whoami(&ctx),
            Commands::Resize(args) => resize::execute(&ctx, args).await,
            Commands::Status(args) => status::execute(&ctx, args).await,
            Commands::Download(args) => download::execute(&ctx, args).await,
        }
    }
}

/// Everything a command needs: configuration, the session store and the
/// backend client.
pub struct Context {
    pub config: ClientConfig,
    pub session: Arc<dyn SessionStore>,
    pub api: Arc<ResizeApi>,
}

impl Context {
    fn load() -> anyhow::Result<Self> {
        let config = ClientConfig::from_env()?;

        let session: Arc<dyn SessionStore> = Arc::new(
            FileSessionStore::open(&config.session_file).with_context(|| {
                format!("Failed to open session file {}", config.session_file.display())
            })?,
        );

        let client = ApiClient::new(&config, session.clone())?.with_inspector(Arc::new(
            UnauthorizedReset::new(session.clone(), Arc::new(SignInPrompt)),
        ));

        tracing::debug!(api_url = %config.api_url, "Client configured");

        Ok(Self {
            config,
            session,
            api: Arc::new(ResizeApi::new(client)),
        })
    }
}

/// Sends the user back to the sign-in step after the session was dropped.
struct SignInPrompt;

impl Navigator for SignInPrompt {
    fn go_home(&self) {
        eprintln!("Session expired or rejected. Run `gophic login` to sign in again.");
    }
}
