//! Remote calendar operations.
//!
//! The executor only ever talks to a calendar service through this trait,
//! so a provider (or a fake in tests) is chosen where the executor is built.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CalMirrorResult;
use crate::event::CalendarEvent;

/// A resolved remote calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRef {
    pub id: String,
    pub name: String,
}

#[async_trait]
pub trait CalendarGateway: Send + Sync {
    /// Look up a calendar by display name.
    ///
    /// Fails with `CalMirrorError::CalendarNotFound` when no calendar matches.
    /// That is a caller error: the name came from the trigger, so the run is
    /// answered with 400 and not retried.
    async fn resolve_calendar(&self, name: &str) -> CalMirrorResult<CalendarRef>;

    /// Every event that has not ended yet, all pages materialized.
    async fn list_future_events(&self, calendar: &CalendarRef)
    -> CalMirrorResult<Vec<CalendarEvent>>;

    /// Insert a new event, returning the id the remote assigned.
    async fn create_event(
        &self,
        calendar: &CalendarRef,
        event: &CalendarEvent,
    ) -> CalMirrorResult<String>;

    /// Replace the event addressed by `event.id`.
    async fn update_event(&self, calendar: &CalendarRef, event: &CalendarEvent)
    -> CalMirrorResult<()>;

    /// Remove the event addressed by `event.id`.
    async fn delete_event(&self, calendar: &CalendarRef, event: &CalendarEvent)
    -> CalMirrorResult<()>;
}
