//! Priority-ordered queue of jobs awaiting a claim

use crate::job::Job;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Entry in the job heap
struct QueuedJob {
    /// The queued job
    job: Job,
    /// Insertion sequence number, for FIFO order within a priority band
    seq: u64,
}

// Max-heap by priority; among equal priorities the lower sequence number
// (earlier insertion) wins.
impl Ord for QueuedJob {
    fn cmp(&self, other: &Self) -> Ordering {
        self.job
            .priority()
            .cmp(&other.job.priority())
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedJob {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedJob {
    fn eq(&self, other: &Self) -> bool {
        self.job.priority() == other.job.priority() && self.seq == other.seq
    }
}

impl Eq for QueuedJob {}

/// Queue of jobs not yet claimed, ordered by non-increasing priority with
/// FIFO order inside each priority band.
///
/// The sequence counter makes the heap stable: re-inserting equal-priority
/// jobs preserves their relative insertion order under any interleaving of
/// insert and claim.
#[derive(Default)]
pub struct JobQueue {
    /// Pending jobs (max-heap on priority, min on sequence)
    heap: BinaryHeap<QueuedJob>,
    /// Next insertion sequence number
    next_seq: u64,
}

impl JobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job at its own priority, after any already-queued job of the
    /// same priority.
    pub fn insert(&mut self, job: Job) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(QueuedJob { job, seq });
    }

    /// Remove and return the highest-priority job, oldest among ties.
    pub fn pop_front(&mut self) -> Option<Job> {
        self.heap.pop().map(|entry| entry.job)
    }

    /// Number of queued jobs.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
