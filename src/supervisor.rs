//! Runs every configured group as its own task and keeps one group's death
//! away from the others.

use tokio::task::JoinSet;
use tracing::{error, info};

use crate::runner::PipelineRunner;

/// Drive all runners to completion. A group that hits a fatal error (or
/// panics) is logged and halted without restart; the remaining groups keep
/// cycling. Returns once every group has halted.
pub async fn run_groups(runners: Vec<PipelineRunner>) {
    let mut tasks = JoinSet::new();
    for runner in runners {
        let group = runner.group().to_string();
        info!(group = %group, "starting pipeline");
        tasks.spawn(async move { (group, runner.run().await) });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((group, Err(e))) => error!(group = %group, error = ?e, "pipeline halted"),
            Ok((group, Ok(()))) => info!(group = %group, "pipeline finished"),
            Err(e) => error!(error = ?e, "pipeline task panicked"),
        }
    }
}
