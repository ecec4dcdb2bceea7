//! Diffing normalized source events against the events a target calendar
//! already holds.

mod diff_kind;
mod ownership;
mod plan;
mod reconciler;

pub use diff_kind::DiffKind;
pub use ownership::Ownership;
pub use plan::{EventUpdate, PlanEntry, ReconcilePlan};
pub use reconciler::reconcile;
