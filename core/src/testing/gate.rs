use std::{
    collections::HashMap,
    sync::{Arc, Mutex, PoisonError},
};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::runner::RunError;

type Slots = Arc<Mutex<HashMap<String, Arc<Semaphore>>>>;

fn lock(slots: &Slots) -> std::sync::MutexGuard<'_, HashMap<String, Arc<Semaphore>>> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Allows at most one execution in flight per problem.
///
/// A second request for a busy problem is rejected rather than queued.
/// Only problems with a run in flight occupy an entry.
#[derive(Debug, Default)]
pub struct ExecutionGate {
    slots: Slots,
}

/// Held for the duration of a run; dropping it frees the problem.
#[derive(Debug)]
pub struct RunPermit {
    problem_id: String,
    permit: Option<OwnedSemaphorePermit>,
    slots: Slots,
}

impl RunPermit {
    pub fn problem_id(&self) -> &str {
        &self.problem_id
    }
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        let mut slots = lock(&self.slots);
        drop(self.permit.take());
        // The map's own reference is the last one once no permit is out.
        if slots
            .get(&self.problem_id)
            .map_or(false, |s| Arc::strong_count(s) == 1)
        {
            slots.remove(&self.problem_id);
        }
    }
}

impl ExecutionGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_acquire(&self, problem_id: &str) -> Result<RunPermit, RunError> {
        let mut slots = lock(&self.slots);
        let semaphore = slots
            .entry(problem_id.to_owned())
            .or_insert_with(|| Arc::new(Semaphore::new(1)))
            .clone();
        match semaphore.try_acquire_owned() {
            Ok(permit) => Ok(RunPermit {
                problem_id: problem_id.to_owned(),
                permit: Some(permit),
                slots: self.slots.clone(),
            }),
            Err(_) => Err(RunError::AlreadyRunning {
                problem_id: problem_id.to_owned(),
            }),
        }
    }

    pub fn is_running(&self, problem_id: &str) -> bool {
        lock(&self.slots)
            .get(problem_id)
            .map_or(false, |s| s.available_permits() == 0)
    }
}
