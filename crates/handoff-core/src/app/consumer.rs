//! JobConsumer - the unit of work the runner executes.

use std::sync::Arc;

use crate::context::ExecutionContext;
use crate::domain::ExecutionResult;

/// What `process` hands back to the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processing {
    /// Finished on the worker thread with this result.
    Done(ExecutionResult),

    /// The work continues elsewhere and will call
    /// [`ExecutionContext::finish_async`] exactly once.
    Async,
}

/// Executes one attempt of a job.
///
/// `process` runs on a blocking worker thread. Long loops should poll
/// `ctx.is_stopped()` and return `Cancelled` when it flips; nothing interrupts
/// the work.
///
/// # Example
/// ```ignore
/// struct Resize;
///
/// impl JobConsumer for Resize {
///     fn process(&self, ctx: Arc<ExecutionContext>) -> Processing {
///         ctx.init_progress(3, 0);
///         // ...
///         Processing::Done(ExecutionResult::succeeded())
///     }
/// }
/// ```
pub trait JobConsumer: Send + Sync + 'static {
    fn process(&self, ctx: Arc<ExecutionContext>) -> Processing;
}

impl<F> JobConsumer for F
where
    F: Fn(Arc<ExecutionContext>) -> Processing + Send + Sync + 'static,
{
    fn process(&self, ctx: Arc<ExecutionContext>) -> Processing {
        self(ctx)
    }
}
