//! Issue label assignment: the store seam and the optimistic selection sync.

pub mod store;
pub mod sync;

pub use crate::database::models::Label;
pub use store::{LabelStore, StoreError};
pub use sync::{
    diff_selection, FailurePolicy, LabelAssignmentSync, LabelChange, Resolution, SelectionDiff, SyncFailure,
    SyncOutcome,
};
