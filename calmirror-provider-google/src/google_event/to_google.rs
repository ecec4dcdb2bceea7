use std::collections::HashMap;

use calmirror_core::event::{Attendee, CalendarEvent, EventStatus, EventTime, Visibility};

use crate::google_event::CORRELATION_PROPERTY;
use crate::google_event::wire::{ExtendedProperties, GoogleAttendee, GoogleDateTime, GoogleEvent};

pub trait ToGoogle {
    fn to_google(&self) -> GoogleEvent;
}

impl ToGoogle for CalendarEvent {
    fn to_google(&self) -> GoogleEvent {
        let status = match self.status {
            EventStatus::Confirmed => "confirmed",
            EventStatus::Tentative => "tentative",
            EventStatus::Cancelled => "cancelled",
        };

        let visibility = match self.visibility {
            Visibility::Default => "default",
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Confidential => "confidential",
        };

        let extended_properties = self.key().map(|key| ExtendedProperties {
            private: HashMap::from([(CORRELATION_PROPERTY.to_string(), key.to_string())]),
            shared: HashMap::new(),
        });

        GoogleEvent {
            id: self.id.clone(),
            status: Some(status.to_string()),
            summary: self.summary.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start: Some(event_time_to_google(&self.start)),
            end: Some(event_time_to_google(&self.end)),
            visibility: Some(visibility.to_string()),
            ical_uid: self.ical_uid.clone(),
            sequence: self.sequence,
            recurrence: self.recurrence.clone(),
            attendees: self.attendees.iter().map(attendee_to_google).collect(),
            extended_properties,
        }
    }
}

fn event_time_to_google(time: &EventTime) -> GoogleDateTime {
    match time {
        EventTime::Date(d) => GoogleDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: None,
        },
        EventTime::DateTime { at, time_zone } => GoogleDateTime {
            date: None,
            date_time: Some(*at),
            time_zone: time_zone.clone(),
        },
    }
}

fn attendee_to_google(attendee: &Attendee) -> GoogleAttendee {
    GoogleAttendee {
        email: attendee.email.clone(),
        display_name: attendee.name.clone(),
        response_status: attendee.response_status.clone(),
    }
}
