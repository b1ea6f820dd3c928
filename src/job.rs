//! A schedule bound to a callback reference with a stable identity.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::invoker::CallbackRef;
use crate::schedule::Schedule;

/// A registered recurring task.
///
/// Runtime state (last and next run times) is owned exclusively by the
/// scheduler loop, not stored on the job; a job is immutable once built.
#[derive(Debug, Clone)]
pub struct CronJob {
    id: String,
    callback: CallbackRef,
    schedule: Schedule,
}

impl CronJob {
    /// Create a job with a derived id: the content hash of the callback
    /// reference and the canonical schedule text. Registering two jobs
    /// built from semantically identical definitions therefore collides
    /// predictably.
    pub fn new(callback: CallbackRef, schedule: Schedule) -> Self {
        let id = derive_id(&callback, &schedule);
        Self {
            id,
            callback,
            schedule,
        }
    }

    /// Create a job with a caller-chosen id.
    pub fn with_id(id: impl Into<String>, callback: CallbackRef, schedule: Schedule) -> Self {
        Self {
            id: id.into(),
            callback,
            schedule,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn callback(&self) -> &CallbackRef {
        &self.callback
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

impl fmt::Display for CronJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.callback, self.schedule)
    }
}

/// SHA-256 hex digest of the job's textual form.
fn derive_id(callback: &CallbackRef, schedule: &Schedule) -> String {
    let mut hasher = Sha256::new();
    hasher.update(callback.as_str().as_bytes());
    hasher.update(b" (");
    hasher.update(schedule.to_string().as_bytes());
    hasher.update(b")");
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
