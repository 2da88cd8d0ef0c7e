//! Testing utilities: an in-memory destination importer.
//!
//! Lets pipeline and CLI tests run the real chunking code without a
//! management API behind it.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::pipeline::import::{ImportError, SpaceImporter};

/// Record of one call made to the mock importer.
#[derive(Debug, Clone)]
pub enum MockImporterCall {
    Entries { space_id: String, count: usize },
    Assets { space_id: String, count: usize },
}

/// A mock destination that records every submission and can be told to
/// reject specific calls (1-based, counted across both channels).
#[derive(Default, Clone)]
pub struct MockImporter {
    calls: Arc<RwLock<Vec<MockImporterCall>>>,
    fail_on: Arc<RwLock<HashSet<usize>>>,
    submitted: Arc<RwLock<Vec<Value>>>,
}

impl MockImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the n-th call (1-based) with a scripted error.
    pub fn fail_on_call(self, call_no: usize) -> Self {
        self.fail_on.write().unwrap().insert(call_no);
        self
    }

    /// All calls in submission order.
    pub fn calls(&self) -> Vec<MockImporterCall> {
        self.calls.read().unwrap().clone()
    }

    /// Batch sizes submitted on the entries channel.
    pub fn entry_batches(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockImporterCall::Entries { count, .. } => Some(count),
                _ => None,
            })
            .collect()
    }

    /// Batch sizes submitted on the assets channel.
    pub fn asset_batches(&self) -> Vec<usize> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockImporterCall::Assets { count, .. } => Some(count),
                _ => None,
            })
            .collect()
    }

    /// Every record that reached the destination, across all accepted
    /// and rejected calls, in submission order.
    pub fn submitted(&self) -> Vec<Value> {
        self.submitted.read().unwrap().clone()
    }

    fn record(&self, call: MockImporterCall, records: &[Value]) -> Result<(), ImportError> {
        let call_no = {
            let mut calls = self.calls.write().unwrap();
            calls.push(call);
            calls.len()
        };
        self.submitted
            .write()
            .unwrap()
            .extend(records.iter().cloned());
        if self.fail_on.read().unwrap().contains(&call_no) {
            return Err(format!("scripted failure on call {call_no}").into());
        }
        Ok(())
    }
}

#[async_trait]
impl SpaceImporter for MockImporter {
    async fn import_entries(
        &self,
        space_id: &str,
        entries: &[Value],
    ) -> Result<(), ImportError> {
        self.record(
            MockImporterCall::Entries {
                space_id: space_id.to_string(),
                count: entries.len(),
            },
            entries,
        )
    }

    async fn import_assets(&self, space_id: &str, assets: &[Value]) -> Result<(), ImportError> {
        self.record(
            MockImporterCall::Assets {
                space_id: space_id.to_string(),
                count: assets.len(),
            },
            assets,
        )
    }
}
