use std::fmt;

use serde::Serialize;

use crate::event::CalendarEvent;
use crate::reconcile::DiffKind;

/// A changed event, addressed by the target copy it replaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventUpdate {
    /// The target event as currently stored
    pub previous: CalendarEvent,
    /// New content, carrying the target's id and sequence
    pub updated: CalendarEvent,
}

/// The mutations that bring a target calendar in line with its source.
///
/// The three sets are disjoint by correlation key and by target id.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconcilePlan {
    pub to_create: Vec<CalendarEvent>,
    pub to_delete: Vec<CalendarEvent>,
    pub to_update: Vec<EventUpdate>,
    /// Source events whose target copy is already up to date
    pub unchanged: usize,
    /// Correlation keys found on more than one target event
    pub duplicate_keys: Vec<String>,
}

impl ReconcilePlan {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_delete.is_empty() && self.to_update.is_empty()
    }

    /// (created, updated, deleted)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.to_create.len(),
            self.to_update.len(),
            self.to_delete.len(),
        )
    }

    /// Every planned mutation in application order: creates, deletes, updates.
    pub fn entries(&self) -> impl Iterator<Item = PlanEntry<'_>> {
        let creates = self.to_create.iter().map(|event| PlanEntry {
            kind: DiffKind::Create,
            event,
        });
        let deletes = self.to_delete.iter().map(|event| PlanEntry {
            kind: DiffKind::Delete,
            event,
        });
        let updates = self.to_update.iter().map(|update| PlanEntry {
            kind: DiffKind::Update,
            event: &update.updated,
        });

        creates.chain(deletes).chain(updates)
    }
}

/// One line of a plan, for display.
#[derive(Debug, Clone, Copy)]
pub struct PlanEntry<'a> {
    pub kind: DiffKind,
    pub event: &'a CalendarEvent,
}

impl fmt::Display for PlanEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.event)
    }
}
