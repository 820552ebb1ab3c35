mod demo;
mod observability;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use handoff_core::impls::InMemoryJob;
use handoff_core::{AttemptRunner, JobId, Outcome, RunnerConfig};
use tracing::info;

use crate::demo::StepConsumer;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutcomeArg {
    Succeeded,
    Failed,
    Cancelled,
}

impl From<OutcomeArg> for Outcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Succeeded => Outcome::Succeeded,
            OutcomeArg::Failed => Outcome::Failed,
            OutcomeArg::Cancelled => Outcome::Cancelled,
        }
    }
}

/// Run one demo job attempt and print how it ended.
#[derive(Debug, Parser)]
#[command(name = "handoff", version)]
struct Args {
    /// Number of progress steps the demo job walks.
    #[arg(long, default_value_t = 5)]
    steps: u64,

    /// Delay per step, in milliseconds.
    #[arg(long, default_value_t = 100)]
    step_ms: u64,

    /// Outcome reported when the job is not stopped.
    #[arg(long, value_enum, default_value_t = OutcomeArg::Succeeded)]
    outcome: OutcomeArg,

    /// Finish from a separate thread through the async completion path.
    #[arg(long = "async")]
    run_async: bool,

    /// Request a stop this many milliseconds after the attempt starts.
    #[arg(long)]
    stop_after_ms: Option<u64>,

    /// Give up waiting for async completion after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Emit logs as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    observability::init(args.json);

    // (A) job and runner
    let job = Arc::new(InMemoryJob::new(JobId::generate()));
    let runner = AttemptRunner::new(RunnerConfig {
        consumer_name: "step-demo".to_string(),
        completion_timeout_ms: args.timeout_ms,
    });
    let consumer = Arc::new(StepConsumer {
        steps: args.steps,
        step_delay: Duration::from_millis(args.step_ms),
        outcome: args.outcome.into(),
        run_async: args.run_async,
    });

    // (B) optional supervisor that requests a stop
    if let Some(ms) = args.stop_after_ms {
        let stop = job.stop_signal();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(ms)).await;
            info!("requesting stop");
            stop.request();
        });
    }

    // (C) run one attempt and wait for its state
    let report = runner
        .run(consumer, job.clone())
        .await
        .context("attempt did not produce a terminal state")?;

    // (D) print the result
    let props = job.properties();
    info!(
        state = %report.state,
        is_final = report.state.is_final(),
        percent_done = ?props.progress.percent_done(),
        "attempt done"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    println!("{}", serde_json::to_string_pretty(&props)?);
    Ok(())
}
