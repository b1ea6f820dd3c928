//! # cronloop
//!
//! Cron-style recurring schedules and a serial dispatch loop.
//!
//! A [`Schedule`] is parsed from classic cron field expressions — five
//! fields for minute granularity, or six with a leading seconds field — and
//! can compute the next matching instant strictly after any reference time,
//! using real calendar rules (month lengths, leap years, weekday
//! derivation). A [`Cron`] owns a set of [`CronJob`]s and runs them in
//! due-time order, one at a time, through an [`Invoker`].
//!
//! Two semantics worth calling out:
//!
//! - The next run time is always strictly later than the reference, even
//!   when the reference itself matches every field.
//! - Day-of-month and day-of-week are conjunctive when both are
//!   restricted, unlike traditional cron's either-or day matching.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use cronloop::{CallbackRef, CallbackRegistry, Cron, CronJob, Schedule};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cronloop::CronError> {
//!     let mut registry = CallbackRegistry::new();
//!     registry.insert("report", || async {
//!         println!("generating report");
//!         Ok(())
//!     });
//!
//!     let mut cron = Cron::new(Arc::new(registry));
//!     let schedule: Schedule = "*/5 * * * *".parse()?;
//!     cron.register(CronJob::new(CallbackRef::new("report")?, schedule))?;
//!
//!     // run until externally terminated
//!     cron.run(0).await
//! }
//! ```

pub mod cron;
pub mod error;
pub mod field;
pub mod invoker;
pub mod job;
pub mod schedule;

pub use cron::Cron;
pub use error::{CronError, CronResult};
pub use field::Field;
pub use invoker::{CallbackRef, CallbackRegistry, InvokeError, Invoker};
pub use job::CronJob;
pub use schedule::Schedule;

// Re-export CancellationToken for convenience
pub use tokio_util::sync::CancellationToken;
