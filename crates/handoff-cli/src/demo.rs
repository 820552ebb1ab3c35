use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{TimeDelta, Utc};
use handoff_core::{ExecutionContext, ExecutionResult, JobConsumer, Outcome, Processing};
use serde_json::json;

/// Demo work: walks `steps` steps, reporting progress, and ends with
/// `outcome` unless a stop arrives first.
#[derive(Debug, Clone, Copy)]
pub struct StepConsumer {
    pub steps: u64,
    pub step_delay: Duration,
    pub outcome: Outcome,
    /// Finish on a spawned thread via `finish_async` instead of returning.
    pub run_async: bool,
}

impl StepConsumer {
    /// Time `steps` more steps take, saturating.
    fn time_for(&self, steps: u64) -> Duration {
        let steps = u32::try_from(steps).unwrap_or(u32::MAX);
        self.step_delay.saturating_mul(steps)
    }

    fn walk(&self, ctx: &ExecutionContext) -> ExecutionResult {
        ctx.init_progress(self.steps, eta_after(self.time_for(self.steps)));
        ctx.log("walking {} steps", vec![json!(self.steps)]);

        for step in 1..=self.steps {
            if ctx.is_stopped() {
                ctx.log("stop requested at step {}", vec![json!(step)]);
                return ExecutionResult::cancelled().with_message("stopped by request");
            }
            thread::sleep(self.step_delay);
            ctx.increment_progress_count(1);
            ctx.update_progress(eta_after(self.time_for(self.steps - step)));
        }

        match self.outcome {
            Outcome::Succeeded => ExecutionResult::succeeded(),
            Outcome::Failed => ExecutionResult::failed()
                .with_message("demo failure")
                .with_retry_delay(Duration::from_secs(2)),
            Outcome::Cancelled => ExecutionResult::cancelled(),
        }
    }
}

impl JobConsumer for StepConsumer {
    fn process(&self, ctx: Arc<ExecutionContext>) -> Processing {
        if !self.run_async {
            return Processing::Done(self.walk(&ctx));
        }

        let worker = *self;
        thread::spawn(move || {
            let result = worker.walk(&ctx);
            if let Err(e) = ctx.finish_async(result) {
                tracing::error!(error = %e, "demo could not finish");
            }
        });
        Processing::Async
    }
}

/// Epoch millis `d` from now.
fn eta_after(d: Duration) -> i64 {
    let delta = TimeDelta::from_std(d).unwrap_or(TimeDelta::zero());
    (Utc::now() + delta).timestamp_millis()
}
