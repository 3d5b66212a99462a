//! Process-wide executor slot
//!
//! The rest of the runtime enqueues work through free functions rather than
//! threading an executor handle everywhere. The slot is write-once during
//! process configuration, then read without further synchronization cost for
//! the life of the process.

use crate::error::ExecutorError;
use crate::executor::GlobalExecutor;
use crate::job::Job;
use once_cell::sync::OnceCell;
use std::time::Duration;
use tracing::debug;

static GLOBAL: OnceCell<GlobalExecutor> = OnceCell::new();

/// Install the process-wide executor.
///
/// Must happen once, during configuration, before any enqueue traffic.
/// A second install is rejected rather than silently replacing the first.
pub fn install_global_executor(executor: GlobalExecutor) -> Result<(), ExecutorError> {
    debug!(
        cooperative = executor.is_cooperative(),
        "installing global executor"
    );
    GLOBAL
        .set(executor)
        .map_err(|_| ExecutorError::AlreadyInstalled)
}

/// The installed executor, if any.
pub fn try_global_executor() -> Option<&'static GlobalExecutor> {
    GLOBAL.get()
}

/// The installed executor.
///
/// # Panics
///
/// Panics if no executor has been installed; calling into the scheduler
/// before configuration is a startup-ordering bug, not a runtime condition.
pub fn global_executor() -> &'static GlobalExecutor {
    GLOBAL
        .get()
        .expect("global executor not installed; call install_global_executor first")
}

/// Enqueue a job on the process-wide executor for immediate scheduling.
pub fn enqueue_global(job: Job) {
    global_executor().enqueue_global(job);
}

/// Enqueue a job on the process-wide executor, not before `delay` from now.
pub fn enqueue_global_with_delay(delay: Duration, job: Job) {
    global_executor().enqueue_global_with_delay(delay, job);
}

/// Enqueue a job onto the process-wide executor's main/exclusive context.
pub fn enqueue_main(job: Job) {
    global_executor().enqueue_main(job);
}

/// Donate the calling thread to the process-wide executor until
/// `should_stop` returns true or no work remains.
pub fn donate_thread_until(should_stop: impl FnMut() -> bool) {
    global_executor().donate_thread_until(should_stop);
}
