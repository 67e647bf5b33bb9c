//! Test utilities and mock implementations.
//!
//! In-memory stand-ins for the warehouse, the common-spec lookup and the
//! error sink, so the router can be exercised without MySQL or S3.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use sea_query::{MysqlQueryBuilder, SelectStatement};

use crate::error_sink::{ErrorSink, ErrorSinkError, Result as SinkResult};
use crate::storage::{ConfigStore, Database, QueryOutput, Result as StorageResult, StorageError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock database returning queued outputs in order.
///
/// Every executed statement is recorded as inlined MySQL SQL. Once queued
/// outputs run out, statements return an empty result.
#[derive(Default)]
pub struct MockDatabase {
    outputs: Mutex<VecDeque<QueryOutput>>,
    failure: Mutex<Option<String>>,
    executed: Mutex<Vec<String>>,
}

impl MockDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next statement.
    pub fn push_output(&self, output: QueryOutput) {
        lock(&self.outputs).push_back(output);
    }

    /// Fail every following statement with `message`.
    pub fn fail_with(&self, message: &str) {
        *lock(&self.failure) = Some(message.to_string());
    }

    /// SQL of every statement executed so far.
    pub fn executed(&self) -> Vec<String> {
        lock(&self.executed).clone()
    }
}

#[async_trait]
impl Database for MockDatabase {
    async fn execute(&self, statement: &SelectStatement) -> StorageResult<QueryOutput> {
        lock(&self.executed).push(statement.to_string(MysqlQueryBuilder));

        if let Some(message) = lock(&self.failure).clone() {
            return Err(StorageError::QueryFailed(message));
        }
        Ok(lock(&self.outputs).pop_front().unwrap_or_default())
    }
}

/// Mock common-spec lookup with a fixed member list.
pub struct MockConfigStore {
    customers: Vec<String>,
    failure: Option<String>,
    lookups: AtomicUsize,
}

impl MockConfigStore {
    pub fn new(customers: Vec<String>) -> Self {
        Self {
            customers,
            failure: None,
            lookups: AtomicUsize::new(0),
        }
    }

    /// A store whose lookup always fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::new(Vec::new())
        }
    }

    /// Number of lookups served or failed.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConfigStore for MockConfigStore {
    async fn common_spec_customers(&self) -> StorageResult<Vec<String>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(StorageError::QueryFailed(message.clone())),
            None => Ok(self.customers.clone()),
        }
    }
}

/// Mock error sink recording every write.
#[derive(Default)]
pub struct MockErrorSink {
    puts: Mutex<Vec<(String, String)>>,
    failure: Option<String>,
}

impl MockErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose writes always fail with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// `(key, body)` of every successful write, in order.
    pub fn puts(&self) -> Vec<(String, String)> {
        lock(&self.puts).clone()
    }
}

#[async_trait]
impl ErrorSink for MockErrorSink {
    async fn put(&self, key: &str, body: &[u8]) -> SinkResult<()> {
        if let Some(message) = &self.failure {
            return Err(ErrorSinkError::WriteFailed(message.clone()));
        }
        lock(&self.puts).push((
            key.to_string(),
            String::from_utf8_lossy(body).into_owned(),
        ));
        Ok(())
    }

    fn location(&self, key: &str) -> String {
        format!("mock://{key}")
    }
}
