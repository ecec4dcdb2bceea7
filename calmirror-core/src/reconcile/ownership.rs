use serde::{Deserialize, Serialize};

use crate::event::CalendarEvent;

/// Rule deciding which target events this mirror manages.
///
/// Only owned events are ever updated or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// Not cancelled, carries a correlation key and the summary starts with the prefix
    #[default]
    Marker,
    /// Not cancelled and the summary contains the prefix anywhere.
    /// Also claims hand-written events that happen to mention the prefix.
    PrefixSubstring,
}

impl Ownership {
    pub fn owns(&self, event: &CalendarEvent, prefix: &str) -> bool {
        if event.is_cancelled() {
            return false;
        }

        match self {
            Ownership::Marker => event.key().is_some() && event.summary.starts_with(prefix),
            Ownership::PrefixSubstring => event.summary.contains(prefix),
        }
    }

    /// Keep the owned events, preserving order.
    pub fn filter(&self, events: Vec<CalendarEvent>, prefix: &str) -> Vec<CalendarEvent> {
        events
            .into_iter()
            .filter(|event| self.owns(event, prefix))
            .collect()
    }
}
