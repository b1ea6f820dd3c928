//! Recurring schedule: parsed fields plus the next-run-time evaluator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Timelike};

use crate::error::{CronError, CronResult};
use crate::field::Field;

/// Evaluator search bound, in days. Roughly eight years: a valid schedule
/// always matches within one leap cycle, so exceeding the bound means a
/// broken invariant rather than a rare schedule.
const MAX_SEARCH_DAYS: u64 = 366 * 8;

/// An immutable recurring pattern over six calendar fields.
///
/// A schedule has minute granularity (five fields) or second granularity
/// (six fields, finest first). Day-of-month and day-of-week constraints are
/// conjunctive: when both are restricted, a matching day must satisfy both.
/// This intentionally differs from traditional cron's either-or day
/// semantics and is relied upon by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    has_seconds: bool,
    second: Field,
    minute: Field,
    hour: Field,
    day_of_month: Field,
    month: Field,
    day_of_week: Field,
}

impl Schedule {
    /// Build a minute-granularity schedule from five field expressions.
    ///
    /// Empty or `*` fields match every value of their domain.
    pub fn new(
        minute: &str,
        hour: &str,
        day_of_month: &str,
        month: &str,
        day_of_week: &str,
    ) -> CronResult<Self> {
        Ok(Self {
            has_seconds: false,
            second: Field::Any,
            minute: Field::parse(minute, 0, 59)?,
            hour: Field::parse(hour, 0, 23)?,
            day_of_month: Field::parse(day_of_month, 1, 31)?,
            month: Field::parse(month, 1, 12)?,
            day_of_week: parse_day_of_week(day_of_week)?,
        })
    }

    /// Build a second-granularity schedule from six field expressions,
    /// finest unit first.
    pub fn with_seconds(
        second: &str,
        minute: &str,
        hour: &str,
        day_of_month: &str,
        month: &str,
        day_of_week: &str,
    ) -> CronResult<Self> {
        let mut schedule = Self::new(minute, hour, day_of_month, month, day_of_week)?;
        schedule.has_seconds = true;
        schedule.second = Field::parse(second, 0, 59)?;
        Ok(schedule)
    }

    /// Whether the schedule carries a seconds field.
    pub fn has_seconds(&self) -> bool {
        self.has_seconds
    }

    /// Compute the next instant strictly after `after` that satisfies every
    /// field of the schedule, in `after`'s timezone.
    ///
    /// The result is always strictly later than `after`, even when `after`
    /// itself matches every field; a fully-wildcard schedule therefore
    /// yields `after` advanced by one finest unit. Minute-granularity
    /// results always carry second zero.
    ///
    /// Fails with [`CronError::NoSolution`] only when no match exists
    /// within the eight-year search bound, which no well-formed schedule
    /// can trigger.
    pub fn next_after<Tz: TimeZone>(&self, after: &DateTime<Tz>) -> CronResult<DateTime<Tz>> {
        let tz = after.timezone();
        let local = after.naive_local();
        let after_secs = local.time().num_seconds_from_midnight();

        for offset in 0..=MAX_SEARCH_DAYS {
            let Some(date) = local.date().checked_add_days(Days::new(offset)) else {
                break;
            };
            if !self.matches_date(date) {
                continue;
            }

            // Candidates on the reference day must be strictly later than
            // the reference; later days take their earliest allowed time.
            let bound = if offset == 0 { Some(after_secs) } else { None };

            for hour in self.hour.iter(0, 23) {
                for minute in self.minute.iter(0, 59) {
                    for second in self.seconds_iter() {
                        let time_of_day = hour * 3600 + minute * 60 + second;
                        if bound.is_some_and(|bound| time_of_day <= bound) {
                            continue;
                        }
                        let Some(naive) = date.and_hms_opt(hour, minute, second) else {
                            continue;
                        };
                        // skip local times that do not exist (DST gaps)
                        if let Some(instant) = tz.from_local_datetime(&naive).earliest() {
                            return Ok(instant);
                        }
                    }
                }
            }
        }

        Err(CronError::NoSolution(format!(
            "no run time within {MAX_SEARCH_DAYS} days for schedule {self}"
        )))
    }

    /// Whether a calendar day satisfies the month, day-of-month and
    /// day-of-week fields together.
    fn matches_date(&self, date: NaiveDate) -> bool {
        self.month.contains(date.month())
            && self.day_of_month.contains(date.day())
            && self.day_of_week.contains(date.weekday().num_days_from_sunday())
    }

    fn seconds_iter(&self) -> Box<dyn Iterator<Item = u32> + '_> {
        if self.has_seconds {
            self.second.iter(0, 59)
        } else {
            Box::new(std::iter::once(0))
        }
    }
}

/// Fold day-of-week value 7 into 0; both denote Sunday.
fn parse_day_of_week(text: &str) -> CronResult<Field> {
    match Field::parse(text, 0, 7)? {
        Field::Values(values) if values.contains(&7) => {
            let mut values: Vec<u32> = values
                .into_iter()
                .map(|value| if value == 7 { 0 } else { value })
                .collect();
            values.sort_unstable();
            values.dedup();
            Ok(Field::Values(values))
        }
        field => Ok(field),
    }
}

impl FromStr for Schedule {
    type Err = CronError;

    /// Parse a full whitespace-separated expression: five fields for minute
    /// granularity, six for second granularity.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = text.split_whitespace().collect();
        match fields.as_slice() {
            [minute, hour, day_of_month, month, day_of_week] => {
                Self::new(minute, hour, day_of_month, month, day_of_week)
            }
            [second, minute, hour, day_of_month, month, day_of_week] => {
                Self::with_seconds(second, minute, hour, day_of_month, month, day_of_week)
            }
            _ => Err(CronError::InvalidSyntax(format!(
                "expected 5 or 6 fields, got {} in {text:?}",
                fields.len()
            ))),
        }
    }
}

impl fmt::Display for Schedule {
    /// Canonical space-joined text with every field present, wildcards
    /// rendered as `*`. Identical semantics produce identical text, and
    /// therefore identical derived job ids.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_seconds {
            write!(f, "{} ", self.second)?;
        }
        write!(
            f,
            "{} {} {} {} {}",
            self.minute, self.hour, self.day_of_month, self.month, self.day_of_week
        )
    }
}

#[cfg(test)]
#[path = "schedule_tests.rs"]
mod tests;
