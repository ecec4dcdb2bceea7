use anyhow::{Result, bail};
use calmirror_core::event::{Attendee, CalendarEvent, EventStatus, EventTime, Visibility};

use crate::google_event::CORRELATION_PROPERTY;
use crate::google_event::wire::{GoogleDateTime, GoogleEvent};

pub trait FromGoogle {
    fn from_google(event: GoogleEvent) -> Result<Self>
    where
        Self: Sized;
}

impl FromGoogle for CalendarEvent {
    fn from_google(event: GoogleEvent) -> Result<Self> {
        let Some(start) = event.start.as_ref().and_then(google_to_event_time) else {
            bail!("Event {} has no start time", event.id.as_deref().unwrap_or("?"));
        };

        let Some(end) = event.end.as_ref().and_then(google_to_event_time) else {
            bail!("Event {} has no end time", event.id.as_deref().unwrap_or("?"));
        };

        let status = match event.status.as_deref() {
            Some("tentative") => EventStatus::Tentative,
            Some("cancelled") => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        };

        let visibility = match event.visibility.as_deref() {
            Some("public") => Visibility::Public,
            Some("private") => Visibility::Private,
            Some("confidential") => Visibility::Confidential,
            _ => Visibility::Default,
        };

        // Earlier deployments stored the key as a shared property
        let correlation_key = event.extended_properties.as_ref().and_then(|props| {
            props
                .private
                .get(CORRELATION_PROPERTY)
                .or_else(|| props.shared.get(CORRELATION_PROPERTY))
                .cloned()
        });

        let attendees = event
            .attendees
            .into_iter()
            .map(|a| Attendee {
                name: a.display_name.filter(|n| !n.is_empty()),
                email: a.email,
                response_status: a.response_status,
            })
            .collect();

        Ok(CalendarEvent {
            id: event.id,
            summary: event.summary,
            description: event.description.filter(|d| !d.is_empty()),
            location: event.location.filter(|l| !l.is_empty()),
            start,
            end,
            status,
            visibility,
            sequence: event.sequence,
            ical_uid: event.ical_uid,
            correlation_key,
            recurrence: event.recurrence,
            attendees,
        })
    }
}

fn google_to_event_time(time: &GoogleDateTime) -> Option<EventTime> {
    if let Some(at) = time.date_time {
        Some(EventTime::DateTime {
            at,
            time_zone: time.time_zone.clone().filter(|tz| !tz.is_empty()),
        })
    } else {
        time.date.map(EventTime::Date)
    }
}
