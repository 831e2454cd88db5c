//! Per-item results of best-effort lifecycle work.
//!
//! Install, activate and clear never abort on a single failed item; they
//! record what happened to each one instead.

/// What happened to one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Failed(String),
}

/// An item (path, bucket name, client id) and its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    pub item: String,
    pub outcome: Outcome,
}

impl ItemOutcome {
    pub fn done(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            outcome: Outcome::Done,
        }
    }

    pub fn failed(item: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            item: item.into(),
            outcome: Outcome::Failed(reason.to_string()),
        }
    }

    pub fn is_done(&self) -> bool {
        self.outcome == Outcome::Done
    }
}

fn items_where(outcomes: &[ItemOutcome], done: bool) -> Vec<&str> {
    outcomes
        .iter()
        .filter(|o| o.is_done() == done)
        .map(|o| o.item.as_str())
        .collect()
}

/// Result of precaching the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Static bucket that was populated.
    pub bucket: String,
    /// One entry per manifest path.
    pub precached: Vec<ItemOutcome>,
    pub skipped_waiting: bool,
}

impl InstallReport {
    pub fn cached(&self) -> Vec<&str> {
        items_where(&self.precached, true)
    }

    pub fn failed(&self) -> Vec<&str> {
        items_where(&self.precached, false)
    }
}

/// Result of activating a version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivateReport {
    /// One entry per stale bucket.
    pub deleted: Vec<ItemOutcome>,
    pub claimed: bool,
    /// One entry per open page.
    pub notified: Vec<ItemOutcome>,
}

impl ActivateReport {
    pub fn deleted_buckets(&self) -> Vec<&str> {
        items_where(&self.deleted, true)
    }
}

/// Result of a manual cache clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearReport {
    pub deleted: Vec<ItemOutcome>,
}

impl ClearReport {
    pub fn deleted_buckets(&self) -> Vec<&str> {
        items_where(&self.deleted, true)
    }
}
