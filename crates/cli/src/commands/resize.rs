//! `gophic resize`: one card per input file, all driven concurrently.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::Args;

use gophic_client::board::JobBoard;
use gophic_client::card::{CardImage, JobCard};
use gophic_client::error::ClientError;
use gophic_client::JobApi;
use gophic_core::algorithm::Algorithm;
use gophic_core::dimensions::{clamp_percentage, ResizeMode};

use super::Context;

/// Arguments for `gophic resize`
#[derive(Debug, Args)]
pub struct ResizeArgs {
    /// Image files to resize
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Resampling algorithm (nearest, bilinear, bicubic, lanczos2, lanczos3)
    #[arg(short, long, default_value = "bilinear")]
    pub algorithm: Algorithm,

    /// Target width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Target height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Derive the missing side from the original aspect ratio
    #[arg(long)]
    pub keep_aspect: bool,

    /// Scale both sides by this percentage (1-99), used when no pixel size
    /// is given
    #[arg(short, long, conflicts_with_all = ["width", "height"])]
    pub percent: Option<i64>,

    /// Directory to save results into (defaults to `DOWNLOAD_DIR`)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

impl ResizeArgs {
    fn mode(&self) -> ResizeMode {
        if self.width.is_some() || self.height.is_some() {
            return ResizeMode::Pixels {
                width: self.width,
                height: self.height,
                keep_aspect_ratio: self.keep_aspect,
            };
        }
        self.percent
            .map(|p| ResizeMode::Percentage(clamp_percentage(p)))
            .unwrap_or_default()
    }
}

pub async fn execute(ctx: &Context, args: &ResizeArgs) -> anyhow::Result<()> {
    let api: Arc<dyn JobApi> = ctx.api.clone();
    let mode = args.mode();
    let dest = args.out.clone().unwrap_or_else(|| ctx.config.download_dir.clone());

    let mut board = JobBoard::new();
    for file in &args.files {
        let image = load_image(file).await?;
        let mut card = JobCard::new(api.clone(), ctx.config.poll, image);
        card.apply_mode(mode)
            .with_context(|| format!("Cannot resize {}", file.display()))?;
        card.set_algorithm(args.algorithm)?;
        println!(
            "{}: {} -> {} ({})",
            card.file_name(),
            card.original(),
            card.target(),
            card.algorithm().label(),
        );
        board.add(card);
    }

    let cancel = board.cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling all jobs");
            cancel.cancel();
        }
    });

    let total = board.len();
    let outcomes = futures::future::join_all(board.iter_mut().map(|card| {
        let dest = dest.as_path();
        async move {
            let outcome = run_card(card, dest).await;
            (card.file_name().to_string(), outcome)
        }
    }))
    .await;

    let mut failed = 0;
    for (file, outcome) in outcomes {
        match outcome {
            Ok(path) => println!("{file}: saved {}", path.display()),
            Err(e) => {
                failed += 1;
                println!("{file}: failed: {e}");
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {total} jobs failed");
    }
    Ok(())
}

async fn run_card(card: &mut JobCard, dest: &Path) -> Result<PathBuf, ClientError> {
    card.send().await?;
    card.download(dest).await
}

async fn load_image(path: &Path) -> anyhow::Result<CardImage> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    CardImage::from_bytes(file_name, &bytes)
        .with_context(|| format!("Not a readable image: {}", path.display()))
}
