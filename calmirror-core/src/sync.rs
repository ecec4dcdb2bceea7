//! Drives a reconciliation plan through a calendar gateway.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info};

use crate::config::SyncConfig;
use crate::error::{CalMirrorError, CalMirrorResult};
use crate::gateway::{CalendarGateway, CalendarRef};
use crate::normalize::{NormalizationPolicy, normalize_all};
use crate::reconcile::{Ownership, ReconcilePlan, reconcile};
use crate::retry::{RetryPolicy, retry};

/// Outcome of one successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub created: usize,
    pub deleted: usize,
    pub updated: usize,
    pub unchanged: usize,
}

pub struct SyncExecutor {
    gateway: Arc<dyn CalendarGateway>,
    policy: NormalizationPolicy,
    ownership: Ownership,
    retry_policy: RetryPolicy,
}

impl SyncExecutor {
    pub fn new(gateway: Arc<dyn CalendarGateway>) -> Self {
        SyncExecutor {
            gateway,
            policy: NormalizationPolicy::default(),
            ownership: Ownership::default(),
            retry_policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: NormalizationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Fetch both calendars and compute what would change, without writing.
    pub async fn plan(&self, config: &SyncConfig) -> CalMirrorResult<(CalendarRef, ReconcilePlan)> {
        let source = self.gateway.resolve_calendar(&config.source_calendar).await?;
        let target = self.gateway.resolve_calendar(&config.target_calendar).await?;

        let source_events = self.gateway.list_future_events(&source).await?;
        let target_events = self.gateway.list_future_events(&target).await?;

        debug!(
            source = %source.name,
            target = %target.name,
            source_events = source_events.len(),
            target_events = target_events.len(),
            "Fetched events"
        );

        let normalized = normalize_all(&source_events, config, &self.policy);
        let owned = self.ownership.filter(target_events, &config.event_prefix);

        let plan = reconcile(&normalized, &owned);

        let (create, update, delete) = plan.counts();
        info!(
            create,
            delete,
            update,
            unchanged = plan.unchanged,
            "Computed sync plan"
        );

        Ok((target, plan))
    }

    /// One full fetch, reconcile and apply pass.
    ///
    /// Every planned mutation is attempted even after a failure; the run
    /// fails afterwards if any of them did.
    pub async fn run_once(&self, config: &SyncConfig) -> CalMirrorResult<SyncReport> {
        let (target, plan) = self.plan(config).await?;
        let mut outcome = Outcome::default();

        for event in &plan.to_create {
            debug!(event = %event, calendar = %target.name, "Creating event");
            match self.gateway.create_event(&target, event).await {
                Ok(id) => {
                    debug!(id, "Event created");
                    outcome.created += 1;
                }
                Err(e) => outcome.fail("create", event.summary.as_str(), e),
            }
        }

        for event in &plan.to_delete {
            debug!(event = %event, calendar = %target.name, "Deleting event");
            match self.gateway.delete_event(&target, event).await {
                Ok(()) => outcome.deleted += 1,
                Err(e) => outcome.fail("delete", event.summary.as_str(), e),
            }
        }

        for update in &plan.to_update {
            debug!(event = %update.updated, calendar = %target.name, "Updating event");
            match self.gateway.update_event(&target, &update.updated).await {
                Ok(()) => outcome.updated += 1,
                Err(e) => outcome.fail("update", update.updated.summary.as_str(), e),
            }
        }

        if let Some(first) = outcome.first_error {
            return Err(CalMirrorError::MutationsFailed {
                failed: outcome.failed,
                attempted: plan.to_create.len() + plan.to_delete.len() + plan.to_update.len(),
                first,
            });
        }

        Ok(SyncReport {
            created: outcome.created,
            deleted: outcome.deleted,
            updated: outcome.updated,
            unchanged: plan.unchanged,
        })
    }

    /// `run_once` under the retry policy.
    ///
    /// Each attempt re-reads both calendars, so mutations that landed
    /// before a failure are recognized as unchanged on the next attempt.
    pub async fn run_with_retry(&self, config: &SyncConfig) -> CalMirrorResult<SyncReport> {
        retry(
            &self.retry_policy,
            "calendar sync",
            CalMirrorError::is_retryable,
            || self.run_once(config),
        )
        .await
    }
}

#[derive(Default)]
struct Outcome {
    created: usize,
    deleted: usize,
    updated: usize,
    failed: usize,
    first_error: Option<String>,
}

impl Outcome {
    fn fail(&mut self, action: &str, summary: &str, err: CalMirrorError) {
        error!(action, summary, error = %err, "Calendar mutation failed");
        self.failed += 1;
        if self.first_error.is_none() {
            self.first_error = Some(format!("{} '{}': {}", action, summary, err));
        }
    }
}
