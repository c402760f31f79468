//! Optimistic label selection for a single issue.
//!
//! The local selection is replaced as soon as `on_change` is called; the store is
//! told about each added and removed label afterwards. Every call is stamped with a
//! generation so that a failure arriving after a newer selection was applied never
//! rolls that newer selection back.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::store::{LabelStore, StoreError};
use crate::database::models::Label;

/// What to do with the local selection when persisting a change fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Keep the optimistic selection even though the store disagrees
    Keep,
    /// Undo only the failed changes locally, unless superseded
    #[default]
    Revert,
}

impl FailurePolicy {
    pub fn from_config() -> Self {
        if crate::config::config().labels.revert_on_failure {
            FailurePolicy::Revert
        } else {
            FailurePolicy::Keep
        }
    }
}

/// One side-effect call issued to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "label_id", rename_all = "snake_case")]
pub enum LabelChange {
    Add(i32),
    Remove(i32),
}

impl LabelChange {
    pub fn label_id(&self) -> i32 {
        match self {
            LabelChange::Add(id) | LabelChange::Remove(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncFailure {
    pub change: LabelChange,
    pub error: StoreError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    /// Every call succeeded (or there was nothing to do)
    Synced,
    /// A call failed and the optimistic selection was kept
    Kept,
    /// A call failed and the failed changes were undone locally
    Reverted,
    /// A call failed but a newer selection had already been applied
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub generation: u64,
    pub applied: Vec<LabelChange>,
    pub failures: Vec<SyncFailure>,
    pub resolution: Resolution,
}

impl SyncOutcome {
    pub fn is_synced(&self) -> bool {
        self.resolution == Resolution::Synced
    }
}

/// Labels present on one side of a selection change but not the other
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionDiff {
    /// In the order they appear in the new selection
    pub added: Vec<Label>,
    /// In the order they appeared in the previous selection
    pub removed: Vec<Label>,
}

impl SelectionDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compare two selections by label id.
pub fn diff_selection(previous: &[Label], next: &[Label]) -> SelectionDiff {
    let previous_ids: HashSet<i32> = previous.iter().map(|l| l.id).collect();
    let next_ids: HashSet<i32> = next.iter().map(|l| l.id).collect();

    SelectionDiff {
        added: next.iter().filter(|l| !previous_ids.contains(&l.id)).cloned().collect(),
        removed: previous.iter().filter(|l| !next_ids.contains(&l.id)).cloned().collect(),
    }
}

struct SelectionState {
    selected: Vec<Label>,
    generation: u64,
}

/// Client-side cache of an issue's labels, kept ahead of the authoritative store.
pub struct LabelAssignmentSync<S> {
    issue_id: i32,
    store: S,
    policy: FailurePolicy,
    state: Mutex<SelectionState>,
}

impl<S: LabelStore> LabelAssignmentSync<S> {
    pub fn new(issue_id: i32, initial: Vec<Label>, store: S) -> Self {
        Self {
            issue_id,
            store,
            policy: FailurePolicy::default(),
            state: Mutex::new(SelectionState {
                selected: dedup_by_id(initial),
                generation: 0,
            }),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn issue_id(&self) -> i32 {
        self.issue_id
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Current local selection, including changes not yet confirmed by the store
    pub fn selected(&self) -> Vec<Label> {
        self.lock().selected.clone()
    }

    /// Number of selections applied so far
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Apply `new_selection` locally, then push the difference to the store.
    ///
    /// All adds are issued before all removes. Failed calls are logged and returned
    /// in the outcome; they never abort the remaining calls.
    pub async fn on_change(&self, new_selection: Vec<Label>) -> SyncOutcome {
        let new_selection = dedup_by_id(new_selection);

        // The lock is released before any store call is awaited
        let (generation, previous, diff) = {
            let mut state = self.lock();
            let diff = diff_selection(&state.selected, &new_selection);
            let previous = std::mem::replace(&mut state.selected, new_selection);
            state.generation += 1;
            (state.generation, previous, diff)
        };

        if diff.is_empty() {
            return SyncOutcome {
                generation,
                applied: Vec::new(),
                failures: Vec::new(),
                resolution: Resolution::Synced,
            };
        }

        debug!(
            issue_id = self.issue_id,
            generation,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "Applying label selection"
        );

        let changes = diff
            .added
            .iter()
            .map(|l| LabelChange::Add(l.id))
            .chain(diff.removed.iter().map(|l| LabelChange::Remove(l.id)));

        let mut applied = Vec::new();
        let mut failures = Vec::new();
        for change in changes {
            let result = match change {
                LabelChange::Add(label_id) => self.store.add_issue_label(self.issue_id, label_id).await,
                LabelChange::Remove(label_id) => self.store.remove_issue_label(self.issue_id, label_id).await,
            };
            match result {
                Ok(()) => applied.push(change),
                Err(error) => {
                    warn!(
                        "Label change {:?} failed for issue {} (generation {}): {}",
                        change, self.issue_id, generation, error
                    );
                    failures.push(SyncFailure { change, error });
                }
            }
        }

        let resolution = if failures.is_empty() {
            Resolution::Synced
        } else {
            self.resolve_failure(generation, &previous, &failures)
        };

        SyncOutcome {
            generation,
            applied,
            failures,
            resolution,
        }
    }

    /// Undo the failed changes in the local selection. Changes that reached the
    /// store stay applied so the cache keeps matching it.
    fn resolve_failure(&self, generation: u64, previous: &[Label], failures: &[SyncFailure]) -> Resolution {
        if self.policy == FailurePolicy::Keep {
            return Resolution::Kept;
        }

        let mut state = self.lock();
        if state.generation != generation {
            info!(
                "Not reverting labels for issue {}: generation {} superseded by {}",
                self.issue_id, generation, state.generation
            );
            return Resolution::Superseded;
        }

        let failed_adds: HashSet<i32> = failures
            .iter()
            .filter_map(|f| match f.change {
                LabelChange::Add(id) => Some(id),
                LabelChange::Remove(_) => None,
            })
            .collect();
        let failed_removes: HashSet<i32> = failures
            .iter()
            .filter_map(|f| match f.change {
                LabelChange::Remove(id) => Some(id),
                LabelChange::Add(_) => None,
            })
            .collect();

        state.selected.retain(|l| !failed_adds.contains(&l.id));
        for (index, label) in previous.iter().enumerate() {
            if failed_removes.contains(&label.id) {
                let at = index.min(state.selected.len());
                state.selected.insert(at, label.clone());
            }
        }

        info!(
            "Reverted {} failed label change(s) for issue {} (generation {})",
            failures.len(),
            self.issue_id,
            generation
        );
        Resolution::Reverted
    }

    fn lock(&self) -> MutexGuard<'_, SelectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Drop repeated ids, keeping the first occurrence and the original order
fn dedup_by_id(labels: Vec<Label>) -> Vec<Label> {
    let mut seen = HashSet::new();
    labels.into_iter().filter(|l| seen.insert(l.id)).collect()
}
