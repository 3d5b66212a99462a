//! Global executor: enqueue facade, cooperative claim loop, thread donation
//!
//! Two backends, chosen once at build time and never switched:
//!
//! - **Cooperative**: no dedicated worker threads. Jobs wait in a priority
//!   queue plus a deadline-ordered delayed queue; work runs only when some
//!   thread donates itself through [`GlobalExecutor::donate_thread_until`].
//! - **Delegated**: every enqueue forwards to an external [`Dispatcher`]
//!   which owns all queues and threads.

use crate::delayed::DelayedJobQueue;
use crate::dispatch::Dispatcher;
use crate::hooks::EnqueueHooks;
use crate::job::{ExecutorContext, Job};
use crate::queue::JobQueue;
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// How cooperative mode routes jobs bound for the main/exclusive context.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MainRouting {
    /// Main-context jobs share the generic priority queue and run with the
    /// generic context tag. This matches the original single-queue behavior.
    #[default]
    SharedWithGlobal,

    /// Main-context jobs wait in their own strict FIFO, drained after ready
    /// delayed work but before generic work, and run with the main context
    /// tag.
    DedicatedQueue,
}

/// Snapshot of cooperative queue depths.
///
/// All zero in delegated mode, where the external dispatcher owns the queues.
#[derive(Debug, Clone, Default)]
pub struct ExecutorStats {
    /// Jobs waiting in the generic priority queue
    pub pending: usize,

    /// Jobs waiting on a deadline
    pub pending_delayed: usize,

    /// Jobs waiting in the dedicated main FIFO
    pub pending_main: usize,
}

/// Cooperative queue state, guarded by one lock
struct CoopState {
    /// Generic priority queue
    jobs: JobQueue,
    /// Deadline-ordered delayed jobs
    delayed: DelayedJobQueue,
    /// Dedicated main-context FIFO (used only with `MainRouting::DedicatedQueue`)
    main: VecDeque<Job>,
}

/// Cooperative scheduler core: the two queues plus the wake signal.
struct CooperativeCore {
    /// Queue state
    state: Mutex<CoopState>,
    /// Signaled on every enqueue so a claim waiting on a far deadline
    /// re-checks immediately
    work_available: Condvar,
    /// Main-context routing policy
    main_routing: MainRouting,
}

impl CooperativeCore {
    fn new(main_routing: MainRouting) -> Self {
        Self {
            state: Mutex::new(CoopState {
                jobs: JobQueue::new(),
                delayed: DelayedJobQueue::new(),
                main: VecDeque::new(),
            }),
            work_available: Condvar::new(),
            main_routing,
        }
    }

    fn push_global(&self, job: Job) {
        trace!(priority = ?job.priority(), "enqueue global");
        self.state.lock().jobs.insert(job);
        self.work_available.notify_one();
    }

    fn push_delayed(&self, delay: Duration, job: Job) {
        trace!(priority = ?job.priority(), ?delay, "enqueue delayed");
        self.state.lock().delayed.insert(delay, job);
        self.work_available.notify_one();
    }

    fn push_main(&self, job: Job) {
        trace!(priority = ?job.priority(), routing = ?self.main_routing, "enqueue main");
        {
            let mut state = self.state.lock();
            match self.main_routing {
                MainRouting::SharedWithGlobal => state.jobs.insert(job),
                MainRouting::DedicatedQueue => state.main.push_back(job),
            }
        }
        self.work_available.notify_one();
    }

    /// Claim the next runnable job, or `None` when both queues are empty.
    ///
    /// Ready delayed work always preempts the plain queues so time-sensitive
    /// jobs are never starved by a flood of immediate submissions. When only
    /// not-yet-ready delayed work remains, the caller blocks until the
    /// nearest deadline or an enqueue signal, whichever comes first, then
    /// restarts. That wait is the sole blocking point in the executor.
    fn claim_next(&self) -> Option<(Job, ExecutorContext)> {
        let mut state = self.state.lock();
        loop {
            let now = Instant::now();
            if let Some(job) = state.delayed.peek_ready(now) {
                trace!("claimed delayed job");
                return Some((job, ExecutorContext::Generic));
            }
            if let Some(job) = state.main.pop_front() {
                trace!("claimed main job");
                return Some((job, ExecutorContext::Main));
            }
            if let Some(job) = state.jobs.pop_front() {
                trace!("claimed global job");
                return Some((job, ExecutorContext::Generic));
            }
            let deadline = state.delayed.next_deadline()?;
            self.work_available.wait_until(&mut state, deadline);
        }
    }

    fn stats(&self) -> ExecutorStats {
        let state = self.state.lock();
        ExecutorStats {
            pending: state.jobs.len(),
            pending_delayed: state.delayed.len(),
            pending_main: state.main.len(),
        }
    }
}

enum Backend {
    Cooperative(CooperativeCore),
    Delegated(Arc<dyn Dispatcher>),
}

/// The runtime's global execution service.
///
/// The three enqueue operations are fire-and-forget: once accepted, a job
/// runs exactly once, or is discarded only by process termination. There is
/// no cancellation. Job-body failures are the job's own concern; the
/// executor never inspects or retries what a body does.
pub struct GlobalExecutor {
    /// Construction-time enqueue overrides, consulted before any routing
    hooks: EnqueueHooks,

    /// Cooperative queues or the external dispatcher
    backend: Backend,
}

impl GlobalExecutor {
    /// Start building a cooperative executor (no dedicated worker threads).
    pub fn cooperative() -> GlobalExecutorBuilder {
        GlobalExecutorBuilder {
            backend: BuilderBackend::Cooperative,
            main_routing: MainRouting::default(),
            hooks: EnqueueHooks::default(),
        }
    }

    /// Start building an executor that delegates all scheduling to an
    /// external dispatch service.
    pub fn delegated(dispatcher: Arc<dyn Dispatcher>) -> GlobalExecutorBuilder {
        GlobalExecutorBuilder {
            backend: BuilderBackend::Delegated(dispatcher),
            main_routing: MainRouting::default(),
            hooks: EnqueueHooks::default(),
        }
    }

    /// Enqueue a job for immediate scheduling at its own priority.
    pub fn enqueue_global(&self, job: Job) {
        if let Some(hook) = &self.hooks.on_enqueue {
            hook(job);
            return;
        }
        match &self.backend {
            Backend::Cooperative(core) => core.push_global(job),
            Backend::Delegated(dispatcher) => dispatcher.submit_now(job.priority(), job),
        }
    }

    /// Enqueue a job that must not run before `delay` from now.
    pub fn enqueue_global_with_delay(&self, delay: Duration, job: Job) {
        if let Some(hook) = &self.hooks.on_enqueue_delayed {
            hook(delay, job);
            return;
        }
        match &self.backend {
            Backend::Cooperative(core) => core.push_delayed(delay, job),
            Backend::Delegated(dispatcher) => dispatcher.submit_after(delay, job.priority(), job),
        }
    }

    /// Enqueue a job onto the main/exclusive execution context.
    ///
    /// Cooperative routing follows the builder's [`MainRouting`]; delegated
    /// mode targets the dispatcher's serial main queue.
    pub fn enqueue_main(&self, job: Job) {
        match &self.backend {
            Backend::Cooperative(core) => core.push_main(job),
            Backend::Delegated(dispatcher) => dispatcher.submit_main(job),
        }
    }

    /// Lend the calling thread to the executor until `should_stop` returns
    /// true or no work remains.
    ///
    /// The predicate is re-evaluated before every claim, never after running
    /// a job, so a predicate turning true mid-drain leaves remaining jobs
    /// queued. When both queues are empty the call returns without blocking;
    /// when only not-yet-ready delayed work remains it sleeps until the
    /// nearest deadline. A no-op in delegated mode.
    pub fn donate_thread_until(&self, mut should_stop: impl FnMut() -> bool) {
        let Backend::Cooperative(core) = &self.backend else {
            return;
        };
        while !should_stop() {
            match core.claim_next() {
                Some((job, context)) => job.run(context),
                None => return,
            }
        }
    }

    /// Current cooperative queue depths (all zero in delegated mode).
    pub fn stats(&self) -> ExecutorStats {
        match &self.backend {
            Backend::Cooperative(core) => core.stats(),
            Backend::Delegated(_) => ExecutorStats::default(),
        }
    }

    /// Whether this executor runs in cooperative mode.
    pub fn is_cooperative(&self) -> bool {
        matches!(self.backend, Backend::Cooperative(_))
    }
}

impl Default for GlobalExecutor {
    fn default() -> Self {
        Self::cooperative().build()
    }
}

enum BuilderBackend {
    Cooperative,
    Delegated(Arc<dyn Dispatcher>),
}

/// Builder for [`GlobalExecutor`].
///
/// Mode, main-context routing, and enqueue hooks are all fixed at `build`;
/// nothing is reconfigurable afterwards.
pub struct GlobalExecutorBuilder {
    backend: BuilderBackend,
    main_routing: MainRouting,
    hooks: EnqueueHooks,
}

impl GlobalExecutorBuilder {
    /// Set the cooperative main-context routing policy. Ignored in delegated
    /// mode, where the dispatcher always provides the serial main queue.
    pub fn main_routing(mut self, routing: MainRouting) -> Self {
        self.main_routing = routing;
        self
    }

    /// Replace immediate enqueue routing entirely with `hook`.
    pub fn on_enqueue(mut self, hook: impl Fn(Job) + Send + Sync + 'static) -> Self {
        self.hooks.on_enqueue = Some(Box::new(hook));
        self
    }

    /// Replace delayed enqueue routing entirely with `hook`.
    pub fn on_enqueue_delayed(
        mut self,
        hook: impl Fn(Duration, Job) + Send + Sync + 'static,
    ) -> Self {
        self.hooks.on_enqueue_delayed = Some(Box::new(hook));
        self
    }

    /// Build the executor.
    pub fn build(self) -> GlobalExecutor {
        let backend = match self.backend {
            BuilderBackend::Cooperative => {
                Backend::Cooperative(CooperativeCore::new(self.main_routing))
            }
            BuilderBackend::Delegated(dispatcher) => Backend::Delegated(dispatcher),
        };
        GlobalExecutor {
            hooks: self.hooks,
            backend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::priority::JobPriority;
    use parking_lot::Mutex as PMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn logging_job(priority: JobPriority, tag: &'static str, log: &Arc<PMutex<Vec<String>>>) -> Job {
        let log = log.clone();
        Job::new(priority, move |_| log.lock().push(tag.to_string()))
    }

    #[test]
    fn test_claim_order_matches_priority_then_fifo() {
        let executor = GlobalExecutor::cooperative().build();
        let log = Arc::new(PMutex::new(Vec::new()));

        executor.enqueue_global(logging_job(JobPriority::Background, "bg", &log));
        executor.enqueue_global(logging_job(JobPriority::High, "hi-1", &log));
        executor.enqueue_global(logging_job(JobPriority::Default, "def", &log));
        executor.enqueue_global(logging_job(JobPriority::High, "hi-2", &log));

        executor.donate_thread_until(|| false);

        assert_eq!(*log.lock(), vec!["hi-1", "hi-2", "def", "bg"]);
        assert_eq!(executor.stats().pending, 0);
    }

    #[test]
    fn test_donate_returns_immediately_when_empty() {
        let executor = GlobalExecutor::cooperative().build();
        let polls = AtomicUsize::new(0);

        let start = Instant::now();
        executor.donate_thread_until(|| {
            polls.fetch_add(1, Ordering::SeqCst);
            false
        });

        // One predicate check, zero claims, no blocking.
        assert_eq!(polls.load(Ordering::SeqCst), 1);
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_predicate_checked_before_every_claim() {
        let executor = GlobalExecutor::cooperative().build();
        let ran = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let ran = ran.clone();
            executor.enqueue_global(Job::new(JobPriority::Default, move |_| {
                ran.fetch_add(1, Ordering::SeqCst);
            }));
        }

        // Stop once two jobs have run: the third must stay queued.
        let seen = ran.clone();
        executor.donate_thread_until(move || seen.load(Ordering::SeqCst) >= 2);

        assert_eq!(ran.load(Ordering::SeqCst), 2);
        assert_eq!(executor.stats().pending, 1);
    }

    #[test]
    fn test_ready_delayed_preempts_plain_queue() {
        let executor = GlobalExecutor::cooperative().build();
        let log = Arc::new(PMutex::new(Vec::new()));

        executor.enqueue_global_with_delay(
            Duration::from_millis(10),
            logging_job(JobPriority::Background, "delayed", &log),
        );
        executor.enqueue_global(logging_job(JobPriority::High, "plain", &log));

        // Immediate claim: the delayed job is not ready, the plain one runs.
        let first = log.clone();
        executor.donate_thread_until(move || !first.lock().is_empty());
        assert_eq!(*log.lock(), vec!["plain"]);

        std::thread::sleep(Duration::from_millis(20));
        executor.enqueue_global(logging_job(JobPriority::High, "late-plain", &log));

        // Past the deadline the delayed job preempts even a high-priority
        // plain job.
        executor.donate_thread_until(|| false);
        assert_eq!(*log.lock(), vec!["plain", "delayed", "late-plain"]);
    }

    #[test]
    fn test_claim_blocks_until_nearest_deadline() {
        let executor = GlobalExecutor::cooperative().build();
        let log = Arc::new(PMutex::new(Vec::new()));

        executor.enqueue_global_with_delay(
            Duration::from_millis(30),
            logging_job(JobPriority::Default, "due", &log),
        );

        let start = Instant::now();
        executor.donate_thread_until(|| false);

        assert_eq!(*log.lock(), vec!["due"]);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_enqueue_hook_bypasses_queue() {
        let hooked = Arc::new(PMutex::new(Vec::new()));
        let sink = hooked.clone();
        let executor = GlobalExecutor::cooperative()
            .on_enqueue(move |job| sink.lock().push(job.priority()))
            .build();

        executor.enqueue_global(Job::new(JobPriority::High, |_| {}));
        executor.enqueue_global(Job::new(JobPriority::Utility, |_| {}));

        // The hook saw every job; the queue was never touched.
        assert_eq!(*hooked.lock(), vec![JobPriority::High, JobPriority::Utility]);
        assert_eq!(executor.stats().pending, 0);
    }

    #[test]
    fn test_delayed_hook_bypasses_queue() {
        let hooked = Arc::new(PMutex::new(Vec::new()));
        let sink = hooked.clone();
        let executor = GlobalExecutor::cooperative()
            .on_enqueue_delayed(move |delay, _job| sink.lock().push(delay))
            .build();

        executor.enqueue_global_with_delay(
            Duration::from_millis(7),
            Job::new(JobPriority::Default, |_| {}),
        );

        assert_eq!(*hooked.lock(), vec![Duration::from_millis(7)]);
        assert_eq!(executor.stats().pending_delayed, 0);
    }

    #[test]
    fn test_main_routing_shared_aliases_global_queue() {
        let executor = GlobalExecutor::cooperative().build();
        let contexts = Arc::new(PMutex::new(Vec::new()));

        let sink = contexts.clone();
        executor.enqueue_main(Job::new(JobPriority::Default, move |ctx| {
            sink.lock().push(ctx)
        }));

        assert_eq!(executor.stats().pending, 1);
        assert_eq!(executor.stats().pending_main, 0);

        executor.donate_thread_until(|| false);
        assert_eq!(*contexts.lock(), vec![ExecutorContext::Generic]);
    }

    #[test]
    fn test_main_routing_dedicated_runs_on_main_context() {
        let executor = GlobalExecutor::cooperative()
            .main_routing(MainRouting::DedicatedQueue)
            .build();
        let log = Arc::new(PMutex::new(Vec::new()));

        executor.enqueue_global(logging_job(JobPriority::High, "generic", &log));
        let sink = log.clone();
        executor.enqueue_main(Job::new(JobPriority::Default, move |ctx| {
            assert_eq!(ctx, ExecutorContext::Main);
            sink.lock().push("main".to_string());
        }));

        assert_eq!(executor.stats().pending_main, 1);

        // Dedicated main work drains ahead of generic work.
        executor.donate_thread_until(|| false);
        assert_eq!(*log.lock(), vec!["main", "generic"]);
    }

    #[test]
    fn test_donation_is_noop_in_delegated_mode() {
        struct NullDispatcher;
        impl Dispatcher for NullDispatcher {
            fn submit_now(&self, _priority: JobPriority, _job: Job) {}
            fn submit_after(&self, _delay: Duration, _priority: JobPriority, _job: Job) {}
            fn submit_main(&self, _job: Job) {}
        }

        let executor = GlobalExecutor::delegated(Arc::new(NullDispatcher)).build();
        assert!(!executor.is_cooperative());

        let polls = AtomicUsize::new(0);
        executor.donate_thread_until(|| {
            polls.fetch_add(1, Ordering::SeqCst);
            false
        });

        // The predicate is never consulted: there is nothing to drain.
        assert_eq!(polls.load(Ordering::SeqCst), 0);
    }
}
