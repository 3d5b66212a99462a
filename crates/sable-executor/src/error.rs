//! Executor error types.

/// Errors reported at the executor configuration boundary.
///
/// Scheduling itself is infallible by construction: enqueue is
/// fire-and-forget, and caller bugs (such as consulting the process-wide
/// executor before installing one) fail fast instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// A process-wide executor was already installed
    #[error("global executor already installed")]
    AlreadyInstalled,
}
