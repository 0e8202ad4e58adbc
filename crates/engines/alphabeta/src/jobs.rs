//! Bookkeeping for concurrent search jobs.
//!
//! A job is *running* from the moment it is submitted until its result is
//! delivered. Cancelling marks every running job *ignored* and stops every
//! active search; an ignored job's result is dropped instead of delivered.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use checkers_core::TimeControl;
use serde::{Deserialize, Serialize};

/// Caller-visible identifier of a search job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for a registered stop token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StopTicket(u64);

/// What to do with a finished job's result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    Deliver,
    Discard,
}

#[derive(Debug, Default)]
struct JobTable {
    next_job: u64,
    next_ticket: u64,
    running: HashSet<JobId>,
    ignored: HashSet<JobId>,
    stops: HashMap<StopTicket, TimeControl>,
}

impl JobTable {
    fn add_stop(&mut self, tc: TimeControl) -> StopTicket {
        self.next_ticket += 1;
        let ticket = StopTicket(self.next_ticket);
        self.stops.insert(ticket, tc);
        ticket
    }
}

#[derive(Debug, Default)]
pub struct JobCoordinator {
    table: Mutex<JobTable>,
}

impl JobCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JobTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A fresh id, distinct from every id handed out before.
    pub fn next_id(&self) -> JobId {
        let mut table = self.lock();
        table.next_job += 1;
        JobId(table.next_job)
    }

    /// Mark `job` as running and register its stop token.
    ///
    /// Both happen under one lock, so a cancel either sees the job with its
    /// token or neither.
    pub fn start(&self, job: JobId, tc: TimeControl) -> StopTicket {
        let mut table = self.lock();
        table.running.insert(job);
        table.add_stop(tc)
    }

    /// Register the stop token of a search that is not a job.
    pub fn register_stop(&self, tc: TimeControl) -> StopTicket {
        self.lock().add_stop(tc)
    }

    pub fn unregister_stop(&self, ticket: StopTicket) {
        self.lock().stops.remove(&ticket);
    }

    /// Ignore every running job and stop every active search.
    /// Returns the jobs whose results will be dropped.
    pub fn cancel_all_running(&self) -> Vec<JobId> {
        let mut table = self.lock();
        let cancelled: Vec<JobId> = table.running.iter().copied().collect();
        table.ignored.extend(cancelled.iter().copied());
        for tc in table.stops.values() {
            tc.stop();
        }
        cancelled
    }

    /// Retire `job` and decide whether its result reaches the caller.
    pub fn finish(&self, job: JobId) -> Delivery {
        let mut table = self.lock();
        table.running.remove(&job);
        if table.ignored.remove(&job) {
            Delivery::Discard
        } else {
            Delivery::Deliver
        }
    }

    pub fn running(&self) -> Vec<JobId> {
        let mut jobs: Vec<JobId> = self.lock().running.iter().copied().collect();
        jobs.sort_unstable();
        jobs
    }

    pub fn is_running(&self, job: JobId) -> bool {
        self.lock().running.contains(&job)
    }

    pub fn active_searches(&self) -> usize {
        self.lock().stops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(jobs: &JobCoordinator, job: JobId) -> StopTicket {
        jobs.start(job, TimeControl::new(None))
    }

    #[test]
    fn test_finished_job_is_delivered() {
        let jobs = JobCoordinator::new();
        let id = jobs.next_id();
        let ticket = start(&jobs, id);
        assert!(jobs.is_running(id));
        assert_eq!(jobs.active_searches(), 1);
        jobs.unregister_stop(ticket);
        assert_eq!(jobs.finish(id), Delivery::Deliver);
        assert!(!jobs.is_running(id));
    }

    #[test]
    fn test_cancel_discards_running_and_stops_searches() {
        let jobs = JobCoordinator::new();
        let a = jobs.next_id();
        let b = jobs.next_id();
        assert_ne!(a, b);
        let tc = TimeControl::new(None);
        let ticket = jobs.start(a, tc.clone());
        let other = start(&jobs, b);

        let mut cancelled = jobs.cancel_all_running();
        cancelled.sort_unstable();
        assert_eq!(cancelled, vec![a, b]);
        assert!(tc.is_stopped());

        assert_eq!(jobs.finish(a), Delivery::Discard);
        assert_eq!(jobs.finish(b), Delivery::Discard);
        jobs.unregister_stop(ticket);
        jobs.unregister_stop(other);
        assert_eq!(jobs.active_searches(), 0);
    }

    #[test]
    fn test_job_started_after_cancel_is_delivered() {
        let jobs = JobCoordinator::new();
        let old = jobs.next_id();
        start(&jobs, old);
        jobs.cancel_all_running();

        let new = jobs.next_id();
        start(&jobs, new);
        assert_eq!(jobs.running(), vec![old, new]);
        assert_eq!(jobs.finish(new), Delivery::Deliver);
        assert_eq!(jobs.finish(old), Delivery::Discard);
        assert!(jobs.running().is_empty());
    }

    #[test]
    fn test_ignored_flag_is_cleared_on_delivery() {
        let jobs = JobCoordinator::new();
        let id = JobId(42);
        start(&jobs, id);
        jobs.cancel_all_running();
        assert_eq!(jobs.finish(id), Delivery::Discard);
        // The same caller-chosen id can be reused.
        start(&jobs, id);
        assert_eq!(jobs.finish(id), Delivery::Deliver);
    }

    #[test]
    fn test_cancel_right_after_start_stops_the_search() {
        let jobs = JobCoordinator::new();
        let id = jobs.next_id();
        let tc = TimeControl::new(None);
        jobs.start(id, tc.clone());
        assert_eq!(jobs.cancel_all_running(), vec![id]);
        assert!(tc.is_stopped());
        assert_eq!(jobs.finish(id), Delivery::Discard);
    }

    #[test]
    fn test_cancel_with_nothing_running() {
        let jobs = JobCoordinator::new();
        let tc = TimeControl::new(None);
        jobs.register_stop(tc.clone());
        assert!(jobs.cancel_all_running().is_empty());
        assert!(tc.is_stopped());
    }
}
