//! Colored terminal output for plans and reports.

use calmirror_core::SyncReport;
use calmirror_core::reconcile::{DiffKind, PlanEntry, ReconcilePlan};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for DiffKind {
    fn render(&self) -> String {
        let symbol = self.to_string();
        match self {
            DiffKind::Create => symbol.green().to_string(),
            DiffKind::Update => symbol.yellow().to_string(),
            DiffKind::Delete => symbol.red().to_string(),
        }
    }
}

impl Render for PlanEntry<'_> {
    fn render(&self) -> String {
        let summary = match self.kind {
            DiffKind::Create => self.event.summary.green().to_string(),
            DiffKind::Update => self.event.summary.yellow().to_string(),
            DiffKind::Delete => self.event.summary.red().to_string(),
        };

        format!(
            "{} {} {}",
            self.kind.render(),
            summary,
            self.event.start.to_string().dimmed()
        )
    }
}

impl Render for ReconcilePlan {
    fn render(&self) -> String {
        if self.is_empty() {
            return format!("{} ({} unchanged)", "Up to date".dimmed(), self.unchanged);
        }

        let mut lines: Vec<String> = self.entries().map(|e| format!("   {}", e.render())).collect();

        let (create, update, delete) = self.counts();
        lines.push(format!(
            "{} to create, {} to update, {} to delete, {} unchanged",
            create, update, delete, self.unchanged
        ));

        for key in &self.duplicate_keys {
            lines.push(format!("{} duplicate copies of {}", "warning:".yellow(), key));
        }

        lines.join("\n")
    }
}

impl Render for SyncReport {
    fn render(&self) -> String {
        format!(
            "{} {} created, {} updated, {} deleted, {} unchanged",
            "Done:".green(),
            self.created,
            self.updated,
            self.deleted,
            self.unchanged
        )
    }
}
