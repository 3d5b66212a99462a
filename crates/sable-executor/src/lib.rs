//! Sable Runtime Global Executor
//!
//! The execution side of Sable's concurrency model centers around scheduling
//! opaque, run-once jobs onto execution services. Most of the runtime should
//! not own dedicated threads; it funnels work into one global executor that
//! ultimately schedules most of the work in the process. This crate is that
//! executor, in two flavors chosen once at construction time:
//!
//! - **Delegated**: a thin adapter over an external priority-classed
//!   concurrent dispatch service. Only the [`Dispatcher`] contract lives
//!   here; the OS binding lives with the embedder.
//! - **Cooperative**: a self-contained scheduler with no dedicated worker
//!   threads, for environments without an OS thread pool. Jobs wait in a
//!   priority queue (strict priority across bands, FIFO within a band) plus
//!   a deadline-ordered delayed queue, and run only when some thread donates
//!   itself via [`GlobalExecutor::donate_thread_until`], for example a
//!   thread that would otherwise idle while awaiting a result.
//!
//! Enqueue is fire-and-forget: there is no cancellation, no retry, and no
//! fairness guarantee across priority bands (sustained high-band load may
//! starve lower bands). Embedders that bring their own scheduling can
//! replace enqueue routing entirely with construction-time hooks.
//!
//! # Example
//!
//! ```rust,ignore
//! use sable_executor::{GlobalExecutor, Job, JobPriority};
//!
//! let executor = GlobalExecutor::cooperative().build();
//! executor.enqueue_global(Job::new(JobPriority::Default, |_ctx| {
//!     println!("hello from the executor");
//! }));
//! executor.donate_thread_until(|| false);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod delayed;
mod dispatch;
mod error;
mod executor;
mod global;
mod hooks;
mod job;
mod priority;
mod queue;

pub use delayed::DelayedJobQueue;
pub use dispatch::Dispatcher;
pub use error::ExecutorError;
pub use executor::{ExecutorStats, GlobalExecutor, GlobalExecutorBuilder, MainRouting};
pub use global::{
    donate_thread_until, enqueue_global, enqueue_global_with_delay, enqueue_main,
    global_executor, install_global_executor, try_global_executor,
};
pub use hooks::{DelayedEnqueueHook, EnqueueHook, EnqueueHooks};
pub use job::{ExecutorContext, Job};
pub use priority::JobPriority;
pub use queue::JobQueue;
