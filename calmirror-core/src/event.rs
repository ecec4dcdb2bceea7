//! Provider-neutral event types.
//!
//! Gateways convert their API payloads into these types, and the
//! normalizer, reconciler and executor work exclusively with them.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    /// Remote-assigned id, `None` until the event has been created
    pub id: Option<String>,
    pub summary: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    pub status: EventStatus,
    pub visibility: Visibility,
    /// Revision sequence number (SEQUENCE)
    pub sequence: Option<i64>,

    /// Calendar-standard UID shared by all copies of an invitation
    pub ical_uid: Option<String>,
    /// Identity of the mirrored source event, stored in a hidden property
    pub correlation_key: Option<String>,

    /// RRULE, EXDATE lines for recurring series
    pub recurrence: Vec<String>,
    pub attendees: Vec<Attendee>,
}

impl CalendarEvent {
    /// A confirmed event with every optional field empty.
    pub fn new(summary: impl Into<String>, start: EventTime, end: EventTime) -> Self {
        CalendarEvent {
            id: None,
            summary: summary.into(),
            description: None,
            location: None,
            start,
            end,
            status: EventStatus::Confirmed,
            visibility: Visibility::Default,
            sequence: None,
            ical_uid: None,
            correlation_key: None,
            recurrence: Vec::new(),
            attendees: Vec::new(),
        }
    }

    /// The correlation key, if present and non-empty.
    pub fn key(&self) -> Option<&str> {
        self.correlation_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }

    /// Compares the fields a mirrored copy is expected to reproduce.
    ///
    /// Identity (`id`, `sequence`), visibility and attendees are ignored:
    /// they are either administrative or cleared during normalization.
    pub fn same_content(&self, other: &CalendarEvent) -> bool {
        self.summary == other.summary
            && self.start == other.start
            && self.end == other.end
            && self.description == other.description
            && self.location == other.location
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.start)
    }
}

/// An event attendee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendee {
    pub name: Option<String>,
    pub email: String,
    /// Response status: "accepted", "declined", "tentative", "needsAction"
    pub response_status: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day event
    Date(NaiveDate),
    /// Timed event, optionally pinned to an IANA zone
    DateTime {
        at: DateTime<FixedOffset>,
        time_zone: Option<String>,
    },
}

// chrono compares instants only; a mirrored time must also keep its offset and zone.
impl PartialEq for EventTime {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (EventTime::Date(a), EventTime::Date(b)) => a == b,
            (
                EventTime::DateTime {
                    at: a,
                    time_zone: zone_a,
                },
                EventTime::DateTime {
                    at: b,
                    time_zone: zone_b,
                },
            ) => a == b && a.offset() == b.offset() && zone_a == zone_b,
            _ => false,
        }
    }
}

impl Eq for EventTime {}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::DateTime { at, .. } => write!(f, "{}", at.format("%Y-%m-%d %H:%M %:z")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    Confirmed,
    Tentative,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Inherit the calendar's default visibility
    #[default]
    Default,
    Public,
    Private,
    Confidential,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> EventTime {
        EventTime::DateTime {
            at: DateTime::parse_from_rfc3339(s).unwrap(),
            time_zone: None,
        }
    }

    #[test]
    fn test_event_time_equality_includes_offset() {
        // Same instant, different offsets
        assert_ne!(at("2025-03-20T09:00:00+00:00"), at("2025-03-20T10:00:00+01:00"));
        assert_eq!(at("2025-03-20T09:00:00+01:00"), at("2025-03-20T09:00:00+01:00"));
    }

    #[test]
    fn test_event_time_equality_includes_zone() {
        let zoned = EventTime::DateTime {
            at: DateTime::parse_from_rfc3339("2025-03-20T09:00:00+01:00").unwrap(),
            time_zone: Some("Europe/Budapest".to_string()),
        };
        assert_ne!(zoned, at("2025-03-20T09:00:00+01:00"));
    }

    #[test]
    fn test_same_content_ignores_identity_and_visibility() {
        let a = CalendarEvent::new("Standup", at("2025-03-20T09:00:00Z"), at("2025-03-20T09:15:00Z"));
        let mut b = a.clone();
        b.id = Some("remote-1".to_string());
        b.sequence = Some(4);
        b.visibility = Visibility::Private;
        b.attendees.push(Attendee {
            name: None,
            email: "bob@example.com".to_string(),
            response_status: None,
        });
        assert!(a.same_content(&b));

        b.location = Some("Room 4".to_string());
        assert!(!a.same_content(&b));
    }

    #[test]
    fn test_empty_correlation_key_is_no_key() {
        let mut event = CalendarEvent::new("x", at("2025-03-20T09:00:00Z"), at("2025-03-20T10:00:00Z"));
        assert_eq!(event.key(), None);
        event.correlation_key = Some(String::new());
        assert_eq!(event.key(), None);
        event.correlation_key = Some("uid-1".to_string());
        assert_eq!(event.key(), Some("uid-1"));
    }
}
