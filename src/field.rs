//! Parsing of a single schedule field expression.
//!
//! A field expression is a comma-separated list of terms; the parsed field
//! is the union of all terms' values. Each term is one of `*`, `*/N` (or
//! the shorthand `/N`), a single value `a`, a range `a-b`, a stepped range
//! `a-b/N`, or a stepped value `a/N` running up to the domain maximum.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CronError, CronResult};

const SEPARATOR_LIST: char = ',';
const SEPARATOR_INCREMENT: char = '/';
const SEPARATOR_RANGE: char = '-';

/// One constrained dimension of a recurring schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// Matches every value in the field's domain.
    Any,

    /// Strictly ascending set of distinct allowed values within the domain.
    /// Never empty after a successful parse.
    Values(Vec<u32>),
}

impl Field {
    /// Parse a field expression over the domain `min..=max`.
    ///
    /// An absent, empty or `*` expression becomes [`Field::Any`]. Values
    /// are deduplicated and returned ascending.
    pub fn parse(text: &str, min: u32, max: u32) -> CronResult<Field> {
        let text = text.trim();
        if text.is_empty() || text == "*" {
            return Ok(Field::Any);
        }

        let mut values = BTreeSet::new();
        for term in text.split(SEPARATOR_LIST) {
            parse_term(term, min, max, &mut values)?;
        }

        Ok(Field::Values(values.into_iter().collect()))
    }

    /// Whether the field matches every value in its domain.
    pub fn is_any(&self) -> bool {
        matches!(self, Field::Any)
    }

    /// Whether `value` satisfies the field.
    pub fn contains(&self, value: u32) -> bool {
        match self {
            Field::Any => true,
            Field::Values(values) => values.binary_search(&value).is_ok(),
        }
    }

    /// First allowed value, or `default` for a wildcard.
    pub fn first(&self, default: u32) -> u32 {
        match self {
            Field::Any => default,
            Field::Values(values) => values.first().copied().unwrap_or(default),
        }
    }

    /// Iterate the allowed values over the domain `min..=max`, ascending.
    pub fn iter(&self, min: u32, max: u32) -> Box<dyn Iterator<Item = u32> + '_> {
        match self {
            Field::Any => Box::new(min..=max),
            Field::Values(values) => Box::new(values.iter().copied()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Any => f.write_str("*"),
            Field::Values(values) => {
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

/// Parse one comma-separated term into `values`.
fn parse_term(term: &str, min: u32, max: u32, values: &mut BTreeSet<u32>) -> CronResult<()> {
    let term = term.trim();

    // Split off the step. A term starting with the step separator has no
    // left-hand value and is shorthand for `*/N`.
    let (value_part, step) = match term.find(SEPARATOR_INCREMENT) {
        Some(0) => ("*", Some(&term[1..])),
        Some(pos) => (&term[..pos], Some(&term[pos + 1..])),
        None => (term, None),
    };

    let step = match step {
        Some(raw) => {
            let step = raw
                .parse::<i64>()
                .map_err(|_| CronError::InvalidSyntax(format!("invalid increment value: {raw}")))?;
            if step <= 0 {
                return Err(CronError::InvalidSyntax(format!(
                    "invalid increment value: {raw}"
                )));
            }
            Some(step as u64)
        }
        None => None,
    };

    // Resolve the term to a start value and an optional inclusive end.
    let (start, end) = if value_part == "*" {
        match step {
            Some(_) => (min, Some(max)),
            // a bare `*` only stands alone, never inside a list
            None => return Err(CronError::InvalidSyntax(term.to_string())),
        }
    } else if let Some(pos) = value_part.find(SEPARATOR_RANGE).filter(|&pos| pos > 0) {
        let start = parse_value(&value_part[..pos], min, max)?;
        let end = parse_value(&value_part[pos + 1..], min, max)?;
        if start > end {
            return Err(CronError::InvalidSyntax(format!(
                "{start} is greater than {end} in {term}"
            )));
        }
        (start, Some(end))
    } else {
        let start = parse_value(value_part, min, max)?;
        (start, step.map(|_| max))
    };

    match end {
        Some(end) => {
            let step = step.unwrap_or(1);
            let mut value = u64::from(start);
            while value <= u64::from(end) {
                values.insert(value as u32);
                value += step;
            }
        }
        None => {
            values.insert(start);
        }
    }

    Ok(())
}

/// Parse and range-check a numeric field value.
fn parse_value(raw: &str, min: u32, max: u32) -> CronResult<u32> {
    let raw = raw.trim();
    let value = raw
        .parse::<i64>()
        .map_err(|_| CronError::InvalidSyntax(format!("invalid value: {raw}")))?;

    if value < i64::from(min) || value > i64::from(max) {
        return Err(CronError::OutOfRange { value, min, max });
    }

    Ok(value as u32)
}

#[cfg(test)]
#[path = "field_tests.rs"]
mod tests;
