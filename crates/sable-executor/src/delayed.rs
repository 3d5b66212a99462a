//! Deadline-ordered queue of delayed jobs

use crate::job::Job;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Entry in the delayed-job heap. Owns exactly one job plus its deadline;
/// discarded when the job is claimed.
struct DelayedEntry {
    /// Earliest instant at which the job may run
    deadline: Instant,
    /// Insertion sequence number, for FIFO order among equal deadlines
    seq: u64,
    /// The delayed job
    job: Job,
}

// Reverse ordering for min-heap (earliest deadline first); among equal
// deadlines the earlier insertion wins.
impl Ord for DelayedEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for DelayedEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DelayedEntry {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl Eq for DelayedEntry {}

/// Queue of jobs that must not run before a monotonic-clock deadline,
/// ordered by non-decreasing deadline with FIFO order among equal deadlines.
#[derive(Default)]
pub struct DelayedJobQueue {
    /// Pending entries (min-heap on deadline, then sequence)
    heap: BinaryHeap<DelayedEntry>,
    /// Next insertion sequence number
    next_seq: u64,
}

impl DelayedJobQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a job that becomes claimable `delay` from now.
    pub fn insert(&mut self, delay: Duration, job: Job) {
        self.insert_at(Instant::now() + delay, job);
    }

    /// Insert a job with an explicit deadline.
    pub fn insert_at(&mut self, deadline: Instant, job: Job) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(DelayedEntry { deadline, seq, job });
    }

    /// Remove and return the head job if its deadline has passed; otherwise
    /// leave the queue untouched.
    pub fn peek_ready(&mut self, now: Instant) -> Option<Job> {
        if self.heap.peek()?.deadline <= now {
            self.heap.pop().map(|entry| entry.job)
        } else {
            None
        }
    }

    /// Deadline of the head entry, used to size a wait when nothing else is
    /// runnable.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|entry| entry.deadline)
    }

    /// Number of pending delayed jobs.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
