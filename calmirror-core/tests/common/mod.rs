//! In-memory calendar service used by the executor tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use calmirror_core::{
    CalMirrorError, CalMirrorResult, CalendarEvent, CalendarGateway, CalendarRef, EventTime,
    Visibility,
};
use chrono::DateTime;

#[derive(Default)]
struct State {
    /// calendar id -> events
    events: HashMap<String, Vec<CalendarEvent>>,
    next_id: usize,
    failing_creates: usize,
    fail_everything: bool,
    calls: HashMap<&'static str, usize>,
    /// Successful mutations as "<operation> <summary>", in call order
    mutations: Vec<String>,
}

#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<State>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_calendar(self, name: &str, events: Vec<CalendarEvent>) -> Self {
        self.state
            .lock()
            .unwrap()
            .events
            .insert(calendar_id(name), events);
        self
    }

    pub fn events(&self, name: &str) -> Vec<CalendarEvent> {
        self.state.lock().unwrap().events[&calendar_id(name)].clone()
    }

    pub fn set_events(&self, name: &str, events: Vec<CalendarEvent>) {
        self.state
            .lock()
            .unwrap()
            .events
            .insert(calendar_id(name), events);
    }

    /// The next `n` inserts fail.
    pub fn fail_creates(&self, n: usize) {
        self.state.lock().unwrap().failing_creates = n;
    }

    pub fn fail_everything(&self) {
        self.state.lock().unwrap().fail_everything = true;
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    /// Drain the mutation log.
    pub fn take_mutations(&self) -> Vec<String> {
        std::mem::take(&mut self.state.lock().unwrap().mutations)
    }

    fn enter(&self, operation: &'static str) -> CalMirrorResult<std::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_default() += 1;
        if state.fail_everything {
            return Err(CalMirrorError::Remote(format!("{operation}: 503 Service Unavailable")));
        }
        Ok(state)
    }
}

fn calendar_id(name: &str) -> String {
    format!("{}@group.calendar.example.com", name.to_lowercase())
}

#[async_trait]
impl CalendarGateway for MemoryGateway {
    async fn resolve_calendar(&self, name: &str) -> CalMirrorResult<CalendarRef> {
        let state = self.enter("resolve")?;
        let id = calendar_id(name);
        if state.events.contains_key(&id) {
            Ok(CalendarRef {
                id,
                name: name.to_string(),
            })
        } else {
            Err(CalMirrorError::CalendarNotFound(name.to_string()))
        }
    }

    async fn list_future_events(&self, calendar: &CalendarRef) -> CalMirrorResult<Vec<CalendarEvent>> {
        let state = self.enter("list")?;
        Ok(state.events[&calendar.id].clone())
    }

    async fn create_event(&self, calendar: &CalendarRef, event: &CalendarEvent) -> CalMirrorResult<String> {
        let mut state = self.enter("create")?;
        if state.failing_creates > 0 {
            state.failing_creates -= 1;
            return Err(CalMirrorError::Remote("insert: 500 Backend Error".to_string()));
        }

        state.next_id += 1;
        let id = format!("gen-{}", state.next_id);
        let mut stored = event.clone();
        stored.id = Some(id.clone());
        stored.sequence = Some(0);
        state
            .events
            .get_mut(&calendar.id)
            .expect("calendar exists")
            .push(stored);
        state.mutations.push(format!("create {}", event.summary));
        Ok(id)
    }

    async fn update_event(&self, calendar: &CalendarRef, event: &CalendarEvent) -> CalMirrorResult<()> {
        let mut state = self.enter("update")?;
        let events = state.events.get_mut(&calendar.id).expect("calendar exists");
        let existing = events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or_else(|| CalMirrorError::Remote("update: 404 Not Found".to_string()))?;

        let mut stored = event.clone();
        stored.sequence = Some(existing.sequence.unwrap_or(0) + 1);
        *existing = stored;
        state.mutations.push(format!("update {}", event.summary));
        Ok(())
    }

    async fn delete_event(&self, calendar: &CalendarRef, event: &CalendarEvent) -> CalMirrorResult<()> {
        let mut state = self.enter("delete")?;
        let events = state.events.get_mut(&calendar.id).expect("calendar exists");
        events.retain(|e| e.id != event.id);
        state.mutations.push(format!("delete {}", event.summary));
        Ok(())
    }
}

pub fn at(s: &str) -> EventTime {
    EventTime::DateTime {
        at: DateTime::parse_from_rfc3339(s).unwrap(),
        time_zone: None,
    }
}

/// A public source event as the remote would return it.
pub fn source_event(summary: &str, uid: &str, start: &str, end: &str) -> CalendarEvent {
    let mut event = CalendarEvent::new(summary, at(start), at(end));
    event.id = Some(format!("src-{uid}"));
    event.ical_uid = Some(uid.to_string());
    event.description = Some("Agenda: quarterly numbers".to_string());
    event.visibility = Visibility::Public;
    event.sequence = Some(1);
    event
}
