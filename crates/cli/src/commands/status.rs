//! One-shot job status query.

use clap::Args;

use gophic_client::JobApi;
use gophic_core::types::JobId;

use super::Context;

/// Arguments for `gophic status`
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Job identifier returned at submission
    pub job_id: String,
}

pub async fn execute(ctx: &Context, args: &StatusArgs) -> anyhow::Result<()> {
    let job_id = JobId::new(args.job_id.as_str());
    let status = ctx.api.job_status(&job_id).await?;
    println!("{job_id}: {status}");
    Ok(())
}
