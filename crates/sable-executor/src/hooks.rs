//! Enqueue override hooks
//!
//! Embedders that supply their own scheduling replace the default enqueue
//! routing entirely by installing hooks at executor construction time. When a
//! hook is set, the matching facade operation calls it with the same
//! arguments and returns; neither the cooperative queues nor a delegated
//! dispatcher see the job.

use crate::job::Job;
use std::time::Duration;

/// Override for immediate enqueue.
pub type EnqueueHook = Box<dyn Fn(Job) + Send + Sync>;

/// Override for delayed enqueue.
pub type DelayedEnqueueHook = Box<dyn Fn(Duration, Job) + Send + Sync>;

/// The two optional enqueue overrides, fixed once the executor is built.
#[derive(Default)]
pub struct EnqueueHooks {
    /// Override consulted by `enqueue_global`
    pub(crate) on_enqueue: Option<EnqueueHook>,

    /// Override consulted by `enqueue_global_with_delay`
    pub(crate) on_enqueue_delayed: Option<DelayedEnqueueHook>,
}

impl EnqueueHooks {
    /// Whether either hook is set.
    pub fn any_set(&self) -> bool {
        self.on_enqueue.is_some() || self.on_enqueue_delayed.is_some()
    }
}
