//! Per-run sync configuration built from trigger parameters.

use std::collections::HashMap;
use std::fmt;

use regex_lite::{Regex, RegexBuilder};

use crate::error::{CalMirrorError, CalMirrorResult};

pub const SOURCE_CALENDAR: &str = "sourceCalendar";
pub const TARGET_CALENDAR: &str = "targetCalendar";
pub const EVENT_PREFIX: &str = "eventPrefix";
pub const EVENT_FILTER: &str = "eventFilter";
pub const PUBLIC_ONLY: &str = "publicOnly";

/// Immutable description of one mirroring run.
#[derive(Clone)]
pub struct SyncConfig {
    pub source_calendar: String,
    pub target_calendar: String,
    /// Tag prepended to every mirrored summary
    pub event_prefix: String,
    event_filter: Option<Regex>,
    pub public_only: bool,
}

impl SyncConfig {
    pub fn new(
        source_calendar: impl Into<String>,
        target_calendar: impl Into<String>,
        event_prefix: impl Into<String>,
        event_filter: &str,
        public_only: bool,
    ) -> CalMirrorResult<Self> {
        let event_prefix = event_prefix.into();

        // An empty prefix would claim every event of the target calendar.
        if event_prefix.trim().is_empty() {
            return Err(CalMirrorError::Config(format!(
                "{} must not be empty",
                EVENT_PREFIX
            )));
        }

        let event_filter = if event_filter.is_empty() {
            None
        } else {
            let regex = RegexBuilder::new(event_filter)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    CalMirrorError::Config(format!("{} is not a valid pattern: {}", EVENT_FILTER, e))
                })?;
            Some(regex)
        };

        Ok(SyncConfig {
            source_calendar: source_calendar.into(),
            target_calendar: target_calendar.into(),
            event_prefix,
            event_filter,
            public_only,
        })
    }

    /// Build a config from request parameters. Every parameter is required.
    pub fn from_params(params: &HashMap<String, String>) -> CalMirrorResult<Self> {
        let get = |name: &str| {
            params
                .get(name)
                .map(String::as_str)
                .ok_or_else(|| CalMirrorError::Config(format!("Missing configuration: {}", name)))
        };

        let source = get(SOURCE_CALENDAR)?;
        let target = get(TARGET_CALENDAR)?;
        let prefix = get(EVENT_PREFIX)?;
        let filter = get(EVENT_FILTER)?;
        let public_only = parse_bool(get(PUBLIC_ONLY)?);

        SyncConfig::new(source, target, prefix, filter, public_only)
    }

    /// Whether a summary is excluded by the configured filter.
    pub fn is_filtered(&self, summary: &str) -> bool {
        self.event_filter
            .as_ref()
            .is_some_and(|regex| regex.is_match(summary))
    }

    pub fn event_filter(&self) -> &str {
        self.event_filter.as_ref().map_or("", Regex::as_str)
    }
}

impl fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncConfig")
            .field("source_calendar", &self.source_calendar)
            .field("target_calendar", &self.target_calendar)
            .field("event_prefix", &self.event_prefix)
            .field("event_filter", &self.event_filter())
            .field("public_only", &self.public_only)
            .finish()
    }
}

/// Only "true" (any case) is true; everything else is false.
fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
