//! Per-container outcomes collected by a launch or clean pass

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::FleetError;

/// What a launched container can be reached with
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagedContainer {
    pub name: String,
    pub port: u16,
    pub password: String,
    pub url: String,
}

/// Result for one configured render id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Launched { record: ManagedContainer },
    Removed,
    Skipped { reason: String },
    Failed {
        kind: String,
        error: String,
        /// Port of a container that was created but never finished
        /// provisioning; it keeps running until the next clean pass.
        #[serde(skip_serializing_if = "Option::is_none")]
        left_running_on: Option<u16>,
    },
}

impl Outcome {
    pub fn failed(err: &FleetError) -> Self {
        Outcome::Failed {
            kind: err.kind().to_string(),
            error: err.to_string(),
            left_running_on: None,
        }
    }

    /// Failure after the container was created and is still running
    pub fn failed_left_running(err: &FleetError, port: u16) -> Self {
        Outcome::Failed {
            kind: err.kind().to_string(),
            error: err.to_string(),
            left_running_on: Some(port),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Launched { .. } => "launched",
            Outcome::Removed => "removed",
            Outcome::Skipped { .. } => "skipped",
            Outcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Launch,
    Clean,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Launch => "launch",
            Operation::Clean => "clean",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub name: String,
    pub render_id: u32,
    pub outcome: Outcome,
}

/// Ordered outcomes of one pass over the fleet
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub operation: Operation,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub items: Vec<ItemReport>,
}

/// Exit codes of the `devfleet` binary
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// At least one container failed
    pub const PARTIAL_FAILURE: i32 = 1;
    /// Nothing was attempted: bad config, no runtime, unwritable output
    pub const FATAL: i32 = 2;
}

impl Report {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            started_at: Utc::now(),
            finished_at: None,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, render_id: u32, outcome: Outcome) {
        self.items.push(ItemReport {
            name: name.into(),
            render_id,
            outcome,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Records of every successfully launched container, in launch order
    pub fn launched(&self) -> Vec<&ManagedContainer> {
        self.items
            .iter()
            .filter_map(|item| match &item.outcome {
                Outcome::Launched { record } => Some(record),
                _ => None,
            })
            .collect()
    }

    pub fn succeeded(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Launched { .. } | Outcome::Removed))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.outcome, Outcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.items.iter().filter(|i| i.outcome.is_failure()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Process exit code for this report. Skips never fail a run;
    /// `tolerate_failures` keeps the exit code at zero regardless.
    pub fn exit_code(&self, tolerate_failures: bool) -> i32 {
        if self.has_failures() && !tolerate_failures {
            exit_code::PARTIAL_FAILURE
        } else {
            exit_code::SUCCESS
        }
    }
}
