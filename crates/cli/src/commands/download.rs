//! Save the result of a job once it has completed.

use std::path::PathBuf;

use clap::Args;
use tokio_util::sync::CancellationToken;

use gophic_client::fetcher::ResultFetcher;
use gophic_client::poller::JobPoller;
use gophic_core::types::JobId;

use super::Context;

/// Arguments for `gophic download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// Job identifier returned at submission
    pub job_id: String,

    /// Directory to save into (defaults to `DOWNLOAD_DIR`)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Poll until the job completes instead of refusing an unfinished job
    #[arg(short, long)]
    pub wait: bool,
}

pub async fn execute(ctx: &Context, args: &DownloadArgs) -> anyhow::Result<()> {
    let job_id = JobId::new(args.job_id.as_str());
    let dest = args.out.as_ref().unwrap_or(&ctx.config.download_dir);
    let fetcher = ResultFetcher::new(ctx.api.as_ref());

    let result = if args.wait {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });
        JobPoller::new(ctx.api.as_ref(), ctx.config.poll)
            .wait_for_completion(&job_id, &cancel)
            .await?;
        fetcher.fetch(&job_id).await?
    } else {
        fetcher.fetch_completed(&job_id).await?
    };

    let path = fetcher.materialize(&result, dest).await?;
    println!("Saved {}", path.display());
    Ok(())
}
