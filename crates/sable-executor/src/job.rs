//! Jobs and execution contexts

use crate::priority::JobPriority;
use std::fmt;

/// Identifies where a job believes it is running.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExecutorContext {
    /// The generic concurrent context
    Generic,
    /// The main/exclusive context
    Main,
}

/// An opaque, run-once schedulable unit of work with a priority.
///
/// The job owns its body; enqueueing moves the job into a queue and claiming
/// moves it back out, so a job is a member of at most one queue at any
/// instant. `run` consumes the job, which is what makes "exactly once" hold:
/// there is nothing left to run a second time. The scheduler never inspects,
/// retries, or reports on what the body does.
pub struct Job {
    /// Priority level, fixed at creation
    priority: JobPriority,

    /// One-shot body, invoked with the context it is running on
    body: Box<dyn FnOnce(ExecutorContext) + Send>,
}

impl Job {
    /// Create a job from a priority and a one-shot body.
    pub fn new(priority: JobPriority, body: impl FnOnce(ExecutorContext) + Send + 'static) -> Self {
        Self {
            priority,
            body: Box::new(body),
        }
    }

    /// The job's priority level.
    pub fn priority(&self) -> JobPriority {
        self.priority
    }

    /// Run the job to completion on the given context, consuming it.
    pub fn run(self, context: ExecutorContext) {
        (self.body)(context);
    }
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("priority", &self.priority)
            .finish_non_exhaustive()
    }
}
