use std::collections::HashMap;

use tracing::warn;

use crate::event::CalendarEvent;
use crate::reconcile::{EventUpdate, ReconcilePlan};

/// Classify normalized source events against the owned target events.
///
/// Events are matched on correlation key only; events without a key never
/// match anything. On duplicate target keys the last event wins. On
/// duplicate source keys the recurring series wins over its modified
/// instances, which share its UID, otherwise the first one wins. Both
/// cases are logged and reported in `ReconcilePlan::duplicate_keys`.
pub fn reconcile(source: &[CalendarEvent], target: &[CalendarEvent]) -> ReconcilePlan {
    let mut plan = ReconcilePlan::default();

    let mut target_by_key: HashMap<&str, &CalendarEvent> = HashMap::new();
    for event in target {
        let Some(key) = event.key() else {
            continue;
        };
        if target_by_key.insert(key, event).is_some() {
            warn!(key, "Correlation key found on more than one target event, using the last one");
            note_duplicate(&mut plan, key);
        }
    }

    let (chosen, source_slots) = pick_source_events(source, &mut plan);

    for event in chosen {
        let Some(key) = event.key() else {
            // Nothing to correlate with, always new
            plan.to_create.push(event.clone());
            continue;
        };

        match target_by_key.get(key) {
            None => plan.to_create.push(event.clone()),
            Some(existing) if existing.same_content(event) => plan.unchanged += 1,
            Some(existing) => {
                let mut updated = event.clone();
                updated.id = existing.id.clone();
                updated.sequence = existing.sequence;

                plan.to_update.push(EventUpdate {
                    previous: (*existing).clone(),
                    updated,
                });
            }
        }
    }

    plan.to_delete = target
        .iter()
        .filter(|event| event.key().is_none_or(|key| !source_slots.contains_key(key)))
        .cloned()
        .collect();

    plan
}

/// One source event per correlation key, in order of first appearance.
///
/// Returns the chosen events and the slot each key occupies.
fn pick_source_events<'a>(
    source: &'a [CalendarEvent],
    plan: &mut ReconcilePlan,
) -> (Vec<&'a CalendarEvent>, HashMap<&'a str, usize>) {
    let mut chosen: Vec<&CalendarEvent> = Vec::new();
    let mut slots: HashMap<&str, usize> = HashMap::new();

    for event in source {
        let Some(key) = event.key() else {
            chosen.push(event);
            continue;
        };

        let Some(&slot) = slots.get(key) else {
            slots.insert(key, chosen.len());
            chosen.push(event);
            continue;
        };

        note_duplicate(plan, key);
        if chosen[slot].recurrence.is_empty() && !event.recurrence.is_empty() {
            warn!(key, summary = %event.summary, "Recurring series listed after one of its instances, mirroring the series");
            chosen[slot] = event;
        } else {
            warn!(key, summary = %event.summary, "Correlation key repeated in source, skipping event");
        }
    }

    (chosen, slots)
}

fn note_duplicate(plan: &mut ReconcilePlan, key: &str) {
    if !plan.duplicate_keys.iter().any(|k| k == key) {
        plan.duplicate_keys.push(key.to_string());
    }
}
