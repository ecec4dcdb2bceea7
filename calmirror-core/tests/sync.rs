mod common;

use std::sync::Arc;
use std::time::Duration;

use calmirror_core::normalize::NormalizationPolicy;
use calmirror_core::reconcile::Ownership;
use calmirror_core::retry::RetryPolicy;
use calmirror_core::{
    CalMirrorError, CalendarEvent, EventStatus, SyncConfig, SyncExecutor, SyncReport, Visibility,
};
use common::{MemoryGateway, at, source_event};
use tokio::time::Instant;

fn config() -> SyncConfig {
    SyncConfig::new("Work", "Family", "[Synced]", "lunch", true).unwrap()
}

fn standup() -> CalendarEvent {
    source_event("Standup", "uid-a", "2025-03-20T09:00:00Z", "2025-03-20T09:15:00Z")
}

fn setup(source: Vec<CalendarEvent>, target: Vec<CalendarEvent>) -> (Arc<MemoryGateway>, SyncExecutor) {
    let gateway = Arc::new(
        MemoryGateway::new()
            .with_calendar("Work", source)
            .with_calendar("Family", target),
    );
    let executor = SyncExecutor::new(gateway.clone());
    (gateway, executor)
}

#[tokio::test]
async fn test_first_run_mirrors_source_event() {
    let (gateway, executor) = setup(vec![standup()], vec![]);

    let report = executor.run_once(&config()).await.unwrap();

    assert_eq!(
        report,
        SyncReport {
            created: 1,
            ..SyncReport::default()
        }
    );

    let target = gateway.events("Family");
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].summary, "[Synced] Standup");
    assert_eq!(
        target[0].description.as_deref(),
        Some("see details in original event")
    );
    assert_eq!(target[0].correlation_key.as_deref(), Some("uid-a"));
    assert_eq!(target[0].ical_uid, None);
    assert_eq!(target[0].start, at("2025-03-20T09:00:00Z"));
}

#[tokio::test]
async fn test_second_run_is_a_no_op() {
    let (gateway, executor) = setup(
        vec![
            standup(),
            source_event("Review", "uid-b", "2025-03-21T14:00:00Z", "2025-03-21T15:00:00Z"),
        ],
        vec![],
    );

    executor.run_once(&config()).await.unwrap();
    let (_, plan) = executor.plan(&config()).await.unwrap();
    assert!(plan.is_empty());

    let report = executor.run_once(&config()).await.unwrap();
    assert_eq!(
        report,
        SyncReport {
            unchanged: 2,
            ..SyncReport::default()
        }
    );
    assert_eq!(gateway.calls("create"), 2);
    assert_eq!(gateway.calls("update"), 0);
    assert_eq!(gateway.calls("delete"), 0);
}

#[tokio::test]
async fn test_moved_source_event_updates_mirrored_copy_in_place() {
    let (gateway, executor) = setup(vec![standup()], vec![]);
    executor.run_once(&config()).await.unwrap();
    let original_id = gateway.events("Family")[0].id.clone();

    let mut moved = standup();
    moved.start = at("2025-03-20T10:00:00Z");
    moved.end = at("2025-03-20T10:15:00Z");
    gateway.set_events("Work", vec![moved]);

    let report = executor.run_once(&config()).await.unwrap();
    assert_eq!(report.updated, 1);

    let target = gateway.events("Family");
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].id, original_id);
    assert_eq!(target[0].start, at("2025-03-20T10:00:00Z"));
    assert_eq!(target[0].sequence, Some(1));
}

#[tokio::test]
async fn test_removed_source_event_deletes_only_owned_copy() {
    let mut dentist = CalendarEvent::new(
        "Dentist",
        at("2025-03-22T08:00:00Z"),
        at("2025-03-22T09:00:00Z"),
    );
    dentist.id = Some("family-1".to_string());

    let (gateway, executor) = setup(vec![standup()], vec![dentist]);
    executor.run_once(&config()).await.unwrap();
    assert_eq!(gateway.events("Family").len(), 2);

    gateway.set_events("Work", vec![]);
    let report = executor.run_once(&config()).await.unwrap();
    assert_eq!(report.deleted, 1);

    let target = gateway.events("Family");
    assert_eq!(target.len(), 1);
    assert_eq!(target[0].summary, "Dentist");
}

#[tokio::test]
async fn test_private_and_filtered_events_are_not_mirrored() {
    let mut one_on_one = source_event("1:1", "uid-p", "2025-03-20T11:00:00Z", "2025-03-20T11:30:00Z");
    one_on_one.visibility = Visibility::Private;
    let lunch = source_event("Team Lunch", "uid-l", "2025-03-20T12:00:00Z", "2025-03-20T13:00:00Z");

    let (gateway, executor) = setup(vec![standup(), one_on_one, lunch], vec![]);
    executor.run_once(&config()).await.unwrap();

    let keys: Vec<_> = gateway
        .events("Family")
        .iter()
        .filter_map(|e| e.correlation_key.clone())
        .collect();
    assert_eq!(keys, vec!["uid-a".to_string()]);
}

#[tokio::test]
async fn test_cancelled_source_event_is_never_mirrored() {
    let mut cancelled = standup();
    cancelled.status = EventStatus::Cancelled;

    let (gateway, executor) = setup(vec![cancelled], vec![]);
    executor.run_once(&config()).await.unwrap();
    executor.run_once(&config()).await.unwrap();

    let (_, plan) = executor.plan(&config()).await.unwrap();
    assert!(plan.is_empty());
    assert!(gateway.events("Family").is_empty());
    assert_eq!(gateway.calls("create"), 0);
}

#[tokio::test]
async fn test_mutations_apply_creates_then_deletes_then_updates() {
    let review = source_event("Review", "uid-b", "2025-03-21T14:00:00Z", "2025-03-21T15:00:00Z");
    let (gateway, executor) = setup(vec![standup(), review], vec![]);
    executor.run_once(&config()).await.unwrap();
    assert_eq!(
        gateway.take_mutations(),
        vec!["create [Synced] Standup", "create [Synced] Review"]
    );

    let mut moved = standup();
    moved.start = at("2025-03-20T10:00:00Z");
    moved.end = at("2025-03-20T10:15:00Z");
    let planning = source_event("Planning", "uid-c", "2025-03-24T09:00:00Z", "2025-03-24T10:00:00Z");
    gateway.set_events("Work", vec![moved, planning]);

    executor.run_once(&config()).await.unwrap();

    assert_eq!(
        gateway.take_mutations(),
        vec![
            "create [Synced] Planning",
            "delete [Synced] Review",
            "update [Synced] Standup",
        ]
    );
}

#[tokio::test]
async fn test_legacy_ownership_claims_prefix_anywhere() {
    let mut note = CalendarEvent::new(
        "Notes about [Synced] events",
        at("2025-03-22T08:00:00Z"),
        at("2025-03-22T09:00:00Z"),
    );
    note.id = Some("family-1".to_string());

    let (gateway, executor) = setup(vec![], vec![note.clone()]);
    executor.run_once(&config()).await.unwrap();
    assert_eq!(gateway.events("Family").len(), 1, "marker rule leaves it alone");

    let legacy = SyncExecutor::new(gateway.clone()).with_ownership(Ownership::PrefixSubstring);
    legacy.run_once(&config()).await.unwrap();
    assert!(gateway.events("Family").is_empty());
}

#[tokio::test]
async fn test_location_clearing_policy_is_applied() {
    let mut offsite = standup();
    offsite.location = Some("Budapest office".to_string());

    let (gateway, executor) = setup(vec![offsite], vec![]);
    let executor = executor.with_policy(NormalizationPolicy::V1);
    executor.run_once(&config()).await.unwrap();

    assert_eq!(gateway.events("Family")[0].location, None);
}

#[tokio::test(start_paused = true)]
async fn test_retry_exhaustion_makes_three_attempts() {
    let (gateway, executor) = setup(vec![standup()], vec![]);
    gateway.fail_everything();
    let started = Instant::now();

    let err = executor.run_with_retry(&config()).await.unwrap_err();

    assert!(matches!(err, CalMirrorError::Remote(_)));
    assert_eq!(gateway.calls("resolve"), 3);
    assert_eq!(started.elapsed(), Duration::from_secs(7));
}

#[tokio::test(start_paused = true)]
async fn test_partial_failure_recovers_without_duplicates() {
    let review = source_event("Review", "uid-b", "2025-03-21T14:00:00Z", "2025-03-21T15:00:00Z");
    let (gateway, executor) = setup(vec![standup(), review], vec![]);
    gateway.fail_creates(1);

    let report = executor.run_with_retry(&config()).await.unwrap();

    // Second attempt only creates what the first one missed
    assert_eq!(report.created, 1);
    assert_eq!(report.unchanged, 1);
    assert_eq!(gateway.calls("create"), 3);

    let mut keys: Vec<_> = gateway
        .events("Family")
        .iter()
        .filter_map(|e| e.correlation_key.clone())
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["uid-a".to_string(), "uid-b".to_string()]);
}

#[tokio::test]
async fn test_failed_mutation_does_not_block_the_rest() {
    let review = source_event("Review", "uid-b", "2025-03-21T14:00:00Z", "2025-03-21T15:00:00Z");
    let (gateway, executor) = setup(vec![standup(), review], vec![]);
    gateway.fail_creates(1);

    let err = executor.run_once(&config()).await.unwrap_err();

    match err {
        CalMirrorError::MutationsFailed {
            failed, attempted, ..
        } => {
            assert_eq!(failed, 1);
            assert_eq!(attempted, 2);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(gateway.events("Family").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_calendar_is_not_retried() {
    let (gateway, executor) = setup(vec![standup()], vec![]);
    let executor = executor.with_retry_policy(RetryPolicy::default());
    let config = SyncConfig::new("Nope", "Family", "[Synced]", "", false).unwrap();

    let err = executor.run_with_retry(&config).await.unwrap_err();

    assert_eq!(err, CalMirrorError::CalendarNotFound("Nope".to_string()));
    assert_eq!(gateway.calls("resolve"), 1);
}
