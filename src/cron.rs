//! Scheduler: owns registered jobs and drives the dispatch loop.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{CronError, CronResult};
use crate::invoker::{CallbackRef, Invoker};
use crate::job::CronJob;
use crate::schedule::Schedule;

/// One entry of the due ordering: a job id and its next run time.
type RunOrder = Vec<(String, DateTime<Utc>)>;

/// Cron scheduler: registers jobs and executes them when due.
///
/// Dispatch is strictly serial. Each pass walks the due ordering in
/// ascending next-run-time order (ties broken by insertion order), executes
/// every due job in turn and recomputes its next run time. A long-running
/// callback therefore delays every job due after it, and a job can never
/// run concurrently with itself.
pub struct Cron {
    invoker: Arc<dyn Invoker>,
    jobs: HashMap<String, CronJob>,
    insertion_order: Vec<String>,
}

impl Cron {
    pub fn new(invoker: Arc<dyn Invoker>) -> Self {
        Self {
            invoker,
            jobs: HashMap::new(),
            insertion_order: Vec::new(),
        }
    }

    /// Registered jobs, keyed by id.
    pub fn jobs(&self) -> &HashMap<String, CronJob> {
        &self.jobs
    }

    /// Build and register a minute-granularity job from field expressions,
    /// with a derived id. Empty fields are wildcards.
    pub fn register_job(
        &mut self,
        callback: CallbackRef,
        minute: &str,
        hour: &str,
        day_of_month: &str,
        month: &str,
        day_of_week: &str,
    ) -> CronResult<String> {
        let schedule = Schedule::new(minute, hour, day_of_month, month, day_of_week)?;
        self.register(CronJob::new(callback, schedule))
    }

    /// Register a job, returning its id.
    ///
    /// Fails with [`CronError::DuplicateJob`] when the id is already in
    /// use; the existing job is left untouched.
    pub fn register(&mut self, job: CronJob) -> CronResult<String> {
        let id = job.id().to_string();
        if self.jobs.contains_key(&id) {
            return Err(CronError::DuplicateJob(id));
        }

        debug!(job = %job, id = %id, "job registered");
        self.insertion_order.push(id.clone());
        self.jobs.insert(id.clone(), job);

        Ok(id)
    }

    /// Remove a job by id. Returns false when no such job exists.
    pub fn remove_job(&mut self, id: &str) -> bool {
        if self.jobs.remove(id).is_none() {
            return false;
        }
        self.insertion_order.retain(|existing| existing != id);
        true
    }

    /// Run the dispatch loop for exactly `max_passes` passes, or until
    /// cancelled when `max_passes` is 0. Returns immediately when no jobs
    /// are registered.
    pub async fn run(&mut self, max_passes: u64) -> CronResult<()> {
        self.run_until(max_passes, CancellationToken::new()).await
    }

    /// Run the dispatch loop, stopping early when `cancel` fires.
    ///
    /// Cancellation is cooperative: the token is checked at the top of each
    /// pass and raced against the sleep between passes. It never interrupts
    /// a job mid-execution.
    pub async fn run_until(&mut self, max_passes: u64, cancel: CancellationToken) -> CronResult<()> {
        debug!("initializing cron");

        if self.jobs.is_empty() {
            debug!("no jobs registered, returning");
            return Ok(());
        }

        let mut last_run: HashMap<String, DateTime<Utc>> = HashMap::new();
        let mut run_order = self.run_order(Utc::now())?;

        for (id, next_run) in &run_order {
            if let Some(job) = self.jobs.get(id) {
                debug!(job = %job, next_run = %next_run, "registered job");
            }
        }

        let mut pass = 0u64;
        loop {
            pass += 1;
            if cancel.is_cancelled() {
                debug!("cancelled, stopping");
                break;
            }
            if max_passes != 0 {
                debug!(pass, "pass");
            }

            let now = Utc::now();
            let mut executed = false;
            let mut sleep_until = None;

            for entry in run_order.iter_mut() {
                if entry.1 > now {
                    if !executed {
                        sleep_until = Some(entry.1);
                    }
                    break;
                }

                executed = true;
                let Some(job) = self.jobs.get(&entry.0) else {
                    continue;
                };

                debug!(
                    job = %job,
                    last_run = ?last_run.get(&entry.0),
                    "executing job"
                );

                if let Err(error) = self.invoker.invoke(job.callback()).await {
                    warn!(job = %job, %error, "job execution failed");
                }

                last_run.insert(entry.0.clone(), now);
                entry.1 = job.schedule().next_after(&now)?;

                debug!(job = %job, next_run = %entry.1, "job done");
            }

            if let Some(wake_at) = sleep_until {
                let wait = (wake_at - now).to_std().unwrap_or_default();
                debug!(?wait, wake_at = %wake_at, "sleeping until next due job");
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("cancelled during sleep");
                        break;
                    }
                    _ = tokio::time::sleep(wait) => {}
                }
            } else {
                // stable sort keeps tied jobs in their current order
                run_order.sort_by_key(|entry| entry.1);
            }

            if max_passes != 0 && pass >= max_passes {
                break;
            }
        }

        Ok(())
    }

    /// Due ordering ascending by next run time, ties in insertion order.
    fn run_order(&self, now: DateTime<Utc>) -> CronResult<RunOrder> {
        let mut order = Vec::with_capacity(self.jobs.len());
        for id in &self.insertion_order {
            if let Some(job) = self.jobs.get(id) {
                order.push((id.clone(), job.schedule().next_after(&now)?));
            }
        }
        order.sort_by_key(|entry| entry.1);
        Ok(order)
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
