//! Ports - the abstraction layer
//!
//! Boundaries to the collaborators this crate does not own: the job and its
//! persistence, the dispatcher's completion callback, and wall-clock time.

pub mod clock;
pub mod completion;
pub mod job_handle;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::completion::CompletionSink;
pub use self::job_handle::JobHandle;
