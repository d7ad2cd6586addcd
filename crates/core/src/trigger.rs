// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger model: declarative recurrence rules for scheduled jobs.
//!
//! A trigger is parsed once from the manifest's `scheduler` mapping and
//! stored on the job record. Fire-time math always moves forward from a
//! reference time so backlogged firings are not collapsed.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use cron::Schedule;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

/// Errors from parsing a trigger specification.
#[derive(Debug, Error)]
pub enum TriggerError {
    #[error("unknown trigger kind: {0}")]
    UnknownKind(String),
    #[error("interval trigger must specify a positive duration")]
    EmptyInterval,
    #[error("invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },
    #[error("invalid run_date '{value}': expected RFC 3339 or 'YYYY-MM-DD HH:MM:SS'")]
    InvalidDate { value: String },
    #[error("date trigger requires a run_date")]
    MissingDate,
    #[error("trigger option '{0}' must be a number")]
    BadOption(String),
}

/// Declarative recurrence rule controlling when a job next fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Trigger {
    /// Fires every `secs` seconds.
    Interval { secs: u64 },
    /// Fires per a 6-field cron expression (seconds first).
    Cron { expr: String },
    /// Fires once at a fixed point in time, then exhausts.
    Date { run_at: DateTime<Utc> },
}

/// Interval option fields and their weight in seconds.
const INTERVAL_FIELDS: &[(&str, u64)] = &[
    ("weeks", 604_800),
    ("days", 86_400),
    ("hours", 3_600),
    ("minutes", 60),
    ("seconds", 1),
];

/// Cron option fields, in expression order after the seconds field.
const CRON_FIELDS: &[&str] = &["minute", "hour", "day", "month", "day_of_week"];

impl Trigger {
    /// Parse a trigger of the given kind from its options mapping.
    ///
    /// The mapping is the manifest's `scheduler` object minus the `trigger`
    /// key itself; unrecognized options are ignored.
    pub fn parse(kind: &str, options: &Map<String, Value>) -> Result<Self, TriggerError> {
        match kind {
            "interval" => Self::parse_interval(options),
            "cron" => Self::parse_cron(options),
            "date" => Self::parse_date(options),
            other => Err(TriggerError::UnknownKind(other.to_string())),
        }
    }

    fn parse_interval(options: &Map<String, Value>) -> Result<Self, TriggerError> {
        let mut secs = 0u64;
        for (field, weight) in INTERVAL_FIELDS {
            if let Some(n) = opt_u64(options, field)? {
                secs += n * weight;
            }
        }
        if secs == 0 {
            return Err(TriggerError::EmptyInterval);
        }
        Ok(Self::Interval { secs })
    }

    fn parse_cron(options: &Map<String, Value>) -> Result<Self, TriggerError> {
        let expr = match options.get("expr").and_then(Value::as_str) {
            Some(e) => e.to_string(),
            None => {
                // Assemble from individual fields, defaulting each to "*".
                let fields: Vec<String> = CRON_FIELDS
                    .iter()
                    .map(|f| opt_field(options, f).unwrap_or_else(|| "*".to_string()))
                    .collect();
                format!("0 {}", fields.join(" "))
            }
        };
        Schedule::from_str(&expr).map_err(|e| TriggerError::InvalidCron {
            expr: expr.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self::Cron { expr })
    }

    fn parse_date(options: &Map<String, Value>) -> Result<Self, TriggerError> {
        let value = options
            .get("run_date")
            .and_then(Value::as_str)
            .ok_or(TriggerError::MissingDate)?;
        let run_at = parse_date_value(value)?;
        Ok(Self::Date { run_at })
    }

    /// Next fire time strictly after `after`, or `None` if the trigger is
    /// exhausted (a one-shot date already past).
    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Self::Interval { secs } => Some(after + chrono::Duration::seconds(*secs as i64)),
            Self::Cron { expr } => Schedule::from_str(expr).ok()?.after(&after).next(),
            Self::Date { run_at } => (*run_at > after).then_some(*run_at),
        }
    }
}

fn parse_date_value(value: &str) -> Result<DateTime<Utc>, TriggerError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| TriggerError::InvalidDate {
            value: value.to_string(),
        })
}

fn opt_u64(options: &Map<String, Value>, key: &str) -> Result<Option<u64>, TriggerError> {
    match options.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| TriggerError::BadOption(key.to_string())),
        Some(Value::String(s)) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| TriggerError::BadOption(key.to_string())),
        Some(_) => Err(TriggerError::BadOption(key.to_string())),
    }
}

/// Cron fields may be written as numbers or strings; both become strings.
fn opt_field(options: &Map<String, Value>, key: &str) -> Option<String> {
    match options.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
