//! Turns source events into the shape they take in the target calendar.

use tracing::debug;

use crate::config::SyncConfig;
use crate::event::{CalendarEvent, EventStatus, Visibility};

/// Which source fields survive the copy into the target calendar.
///
/// Versioned so a change in what gets copied is a deliberate, visible
/// decision rather than a side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationPolicy {
    pub version: u32,
    /// Replaces the source description, which is never copied
    pub description_placeholder: &'static str,
    pub clear_location: bool,
}

impl NormalizationPolicy {
    pub const V1: NormalizationPolicy = NormalizationPolicy {
        version: 1,
        description_placeholder: "see details in original event",
        clear_location: true,
    };

    /// Keeps the location and compares it during reconciliation.
    pub const V2: NormalizationPolicy = NormalizationPolicy {
        version: 2,
        description_placeholder: "see details in original event",
        clear_location: false,
    };

    pub const CURRENT: NormalizationPolicy = Self::V2;
}

impl Default for NormalizationPolicy {
    fn default() -> Self {
        Self::CURRENT
    }
}

/// Whether a source event is excluded from mirroring.
///
/// Cancelled events are never copied: their copies would not be owned,
/// so they could never be matched or removed again.
pub fn is_excluded(event: &CalendarEvent, config: &SyncConfig) -> bool {
    event.status == EventStatus::Cancelled
        || (config.public_only && event.visibility == Visibility::Private)
        || config.is_filtered(&event.summary)
}

/// Normalize one source event, or `None` if it must not be mirrored.
pub fn normalize(
    event: &CalendarEvent,
    config: &SyncConfig,
    policy: &NormalizationPolicy,
) -> Option<CalendarEvent> {
    if is_excluded(event, config) {
        debug!(summary = %event.summary, "Skipping excluded source event");
        return None;
    }

    Some(CalendarEvent {
        id: None,
        summary: format!("{} {}", config.event_prefix, event.summary),
        description: Some(policy.description_placeholder.to_string()),
        location: if policy.clear_location {
            None
        } else {
            event.location.clone()
        },
        start: event.start.clone(),
        end: event.end.clone(),
        status: event.status,
        visibility: Visibility::Default,
        sequence: None,
        // The copy must not reuse the source UID, the target would reject it as a duplicate
        ical_uid: None,
        correlation_key: event.ical_uid.clone(),
        recurrence: event.recurrence.clone(),
        attendees: Vec::new(),
    })
}

/// Normalize every source event, preserving order.
pub fn normalize_all(
    events: &[CalendarEvent],
    config: &SyncConfig,
    policy: &NormalizationPolicy,
) -> Vec<CalendarEvent> {
    events
        .iter()
        .filter_map(|event| normalize(event, config, policy))
        .collect()
}
