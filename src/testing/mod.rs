//! Test utilities for exercising label selection without a database.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use crate::database::models::Label;
use crate::labels::{LabelStore, StoreError};

pub fn label(id: i32, name: &str) -> Label {
    Label::new(id, name, "gray")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Add(i32, i32),
    Remove(i32, i32),
}

/// In-memory label store that records every call it completes.
///
/// Calls are recorded after the optional delay, so a test can observe state
/// while a call is still in flight.
#[derive(Default)]
pub struct RecordingLabelStore {
    calls: Mutex<Vec<Call>>,
    failing: Mutex<HashSet<Call>>,
    delay: Option<Duration>,
}

impl RecordingLabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Make the given call fail every time it is issued
    pub fn fail_on(&self, call: Call) {
        self.failing.lock().unwrap().insert(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn complete(&self, call: Call) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.calls.lock().unwrap().push(call);
        if self.failing.lock().unwrap().contains(&call) {
            return Err(StoreError::Unavailable(format!("injected failure for {:?}", call)));
        }
        Ok(())
    }
}

#[async_trait]
impl LabelStore for RecordingLabelStore {
    async fn add_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        self.complete(Call::Add(issue_id, label_id)).await
    }

    async fn remove_issue_label(&self, issue_id: i32, label_id: i32) -> Result<(), StoreError> {
        self.complete(Call::Remove(issue_id, label_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_calls_and_injected_failures() {
        let store = RecordingLabelStore::new();
        store.fail_on(Call::Remove(1, 2));

        assert!(store.add_issue_label(1, 2).await.is_ok());
        assert!(store.remove_issue_label(1, 2).await.is_err());
        assert_eq!(store.calls(), vec![Call::Add(1, 2), Call::Remove(1, 2)]);
    }
}
