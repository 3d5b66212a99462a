//! Delegated-mode dispatcher contract
//!
//! In delegated mode the executor holds no queues of its own: every enqueue
//! is forwarded to an external priority-classed concurrent dispatch service
//! that owns all synchronization for its queues. This crate specifies the
//! contract only; the OS binding lives with the embedder.

use crate::job::Job;
use crate::priority::JobPriority;
use std::time::Duration;

/// External concurrent dispatch service backing delegated mode.
///
/// Implementations must run each submitted job exactly once. `submit_main`
/// must target a distinct, strictly serial queue tied to the main/exclusive
/// context; the other two may run jobs concurrently at the given priority
/// class.
pub trait Dispatcher: Send + Sync {
    /// Submit a job for immediate execution at a priority class.
    fn submit_now(&self, priority: JobPriority, job: Job);

    /// Submit a job for execution no earlier than `delay` from now, at a
    /// priority class.
    fn submit_after(&self, delay: Duration, priority: JobPriority, job: Job);

    /// Submit a job to the serial main-context queue.
    fn submit_main(&self, job: Job);
}
