//! The store boundary.
//!
//! The engine treats the underlying store purely as the operations on
//! [`Store`]; everything transport-related lives behind it. Requests carry
//! a rendered-on-demand [`Condition`] tree plus the pagination, index, and
//! ordering parameters of a single call. Pagination cursors are opaque key
//! maps from a previous page; `None` means start from the beginning.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_dynamo::AttributeValue;

use crate::error::Result;
use crate::expr::Condition;
use crate::schema::TableSchema;

/// A raw store row: attribute name to typed value.
pub type Item = HashMap<String, AttributeValue>;

/// One page of query or scan results.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub items: Vec<Item>,
    /// Cursor for the next page; absent on the last page.
    pub last_evaluated_key: Option<Item>,
}

/// Parameters of one query call.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub key_condition: Condition,
    pub filter: Option<Condition>,
    pub index_name: Option<String>,
    pub limit: Option<i32>,
    pub exclusive_start_key: Option<Item>,
    /// Ascending by range key when true (the default).
    pub scan_index_forward: bool,
}

impl QueryRequest {
    pub fn new(key_condition: Condition) -> Self {
        Self {
            key_condition,
            filter: None,
            index_name: None,
            limit: None,
            exclusive_start_key: None,
            scan_index_forward: true,
        }
    }

    pub fn filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_key(mut self, key: Item) -> Self {
        self.exclusive_start_key = Some(key);
        self
    }

    pub fn descending(mut self) -> Self {
        self.scan_index_forward = false;
        self
    }
}

/// Parameters of one scan call.
#[derive(Debug, Clone, Default)]
pub struct ScanRequest {
    pub filter: Option<Condition>,
    pub index_name: Option<String>,
    pub limit: Option<i32>,
    pub exclusive_start_key: Option<Item>,
}

impl ScanRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Condition) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn index(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    pub fn limit(mut self, limit: i32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn start_key(mut self, key: Item) -> Self {
        self.exclusive_start_key = Some(key);
        self
    }
}

/// One blocking (awaited) request per call; no batching, retrying, or
/// rate-limiting happens at this boundary. Implementations surface their
/// transport errors verbatim through [`crate::Error::Store`].
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_table(&self, schema: &TableSchema) -> Result<()>;

    async fn delete_table(&self, table: &str) -> Result<()>;

    async fn put_item(&self, table: &str, item: Item) -> Result<()>;

    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>>;

    async fn delete_item(&self, table: &str, key: Item) -> Result<()>;

    async fn query(&self, table: &str, request: QueryRequest) -> Result<Page>;

    async fn scan(&self, table: &str, request: ScanRequest) -> Result<Page>;
}
