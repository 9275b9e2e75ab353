use serde_dynamo::AttributeValue;
use tracing::debug;
use uuid::Uuid;

use dynamap_core::record::{CREATED_ATTRIBUTE, DELETED_ATTRIBUTE, ID_ATTRIBUTE, UPDATED_ATTRIBUTE};
use dynamap_core::{
    Condition, Error, Item, QueryRequest, Record, Result, ScanRequest, Store, TableSchema,
};

/// The mapping engine.
///
/// Holds the store handle and the table-name prefix, both immutable after
/// construction; one `Access` can be shared across concurrent callers.
/// Each operation issues a single store request and leaves no state behind.
pub struct Access<S> {
    store: S,
    table_prefix: String,
}

impl<S> Access<S> {
    pub fn new(store: S, table_prefix: impl Into<String>) -> Self {
        Self {
            store,
            table_prefix: table_prefix.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolves the table for a record type: configured prefix followed by
    /// the unqualified type name.
    pub fn table_name<T: Record>(&self) -> String {
        format!("{}{}", self.table_prefix, T::TYPE_NAME)
    }
}

impl<S: Store> Access<S> {
    /// Derives `T`'s schema and provisions its table. The schema builder
    /// runs only here; normal access never consults it.
    pub async fn create_table<T: Record>(&self) -> Result<()> {
        let schema = TableSchema::for_record::<T>(&self.table_name::<T>())?;

        debug!(table = %schema.name, "create table");
        self.store.create_table(&schema).await
    }

    pub async fn drop_table<T: Record>(&self) -> Result<()> {
        let table = self.table_name::<T>();

        debug!(table = %table, "drop table");
        self.store.delete_table(&table).await
    }

    /// Writes a new record. A missing identity gets a generated UUID and
    /// `created`/`updated` are stamped with the same current Unix time;
    /// the write is an unconditional overwrite. The stored attribute form
    /// is bound back into `record` so generated fields are visible to the
    /// caller.
    pub async fn create<T: Record>(&self, record: &mut T) -> Result<()> {
        let table = self.table_name::<T>();
        let mut item: Item = serde_dynamo::to_item(&*record)?;

        if identity_missing(&item) {
            item.insert(
                ID_ATTRIBUTE.to_string(),
                AttributeValue::S(Uuid::new_v4().to_string()),
            );
        }

        let now = unix_now();
        item.insert(
            CREATED_ATTRIBUTE.to_string(),
            AttributeValue::N(now.to_string()),
        );
        item.insert(
            UPDATED_ATTRIBUTE.to_string(),
            AttributeValue::N(now.to_string()),
        );

        debug!(table = %table, "create record");
        self.store.put_item(&table, item.clone()).await?;

        *record = serde_dynamo::from_item(item)?;
        Ok(())
    }

    /// Overwrites an existing record, stamping `updated` only. Keeping
    /// `id` and `created` intact is the caller's responsibility.
    pub async fn update<T: Record>(&self, record: &mut T) -> Result<()> {
        let table = self.table_name::<T>();
        let mut item: Item = serde_dynamo::to_item(&*record)?;

        item.insert(
            UPDATED_ATTRIBUTE.to_string(),
            AttributeValue::N(unix_now().to_string()),
        );

        debug!(table = %table, "update record");
        self.store.put_item(&table, item.clone()).await?;

        *record = serde_dynamo::from_item(item)?;
        Ok(())
    }

    /// Hard delete by exact key. No existence check and no soft-delete
    /// fallback; deleting an absent key succeeds.
    pub async fn delete<T: Record>(&self, key: &str, value: AttributeValue) -> Result<()> {
        let table = self.table_name::<T>();

        debug!(table = %table, key, "delete record");
        self.store.delete_item(&table, key_item(key, value)).await
    }

    /// Marks the record soft-deleted by stamping `deleted` with the
    /// current time. Fails with [`Error::NotFound`] if the key is absent
    /// or the record is already soft-deleted.
    ///
    /// This is a read-modify-write, not an atomic operation: a concurrent
    /// update between the read and the write back can be lost.
    pub async fn soft_delete<T: Record>(&self, key: &str, value: AttributeValue) -> Result<()> {
        let table = self.table_name::<T>();
        let mut item = self.fetch_live(&table, key, value).await?;

        item.insert(
            DELETED_ATTRIBUTE.to_string(),
            AttributeValue::N(unix_now().to_string()),
        );

        debug!(table = %table, key, "soft-delete record");
        self.store.put_item(&table, item).await
    }

    /// Fetches one record by exact key. A missing identity attribute and a
    /// non-zero deletion marker both fail with [`Error::NotFound`]:
    /// "never existed" and "soft-deleted" are indistinguishable here.
    pub async fn get<T: Record>(&self, key: &str, value: AttributeValue) -> Result<T> {
        let table = self.table_name::<T>();
        let item = self.fetch_live(&table, key, value).await?;

        Ok(serde_dynamo::from_item(item)?)
    }

    async fn fetch_live(&self, table: &str, key: &str, value: AttributeValue) -> Result<Item> {
        let Some(item) = self.store.get_item(table, key_item(key, value)).await? else {
            return Err(Error::NotFound);
        };

        if !has_identity(&item) || is_soft_deleted(&item) {
            return Err(Error::NotFound);
        }

        Ok(item)
    }

    /// Runs a query and binds every returned row. Soft-deleted rows are
    /// returned unless the request's filter excludes them
    /// ([`Condition::not_deleted`]).
    pub async fn query<T: Record>(&self, request: QueryRequest) -> Result<Vec<T>> {
        let table = self.table_name::<T>();

        debug!(table = %table, index = request.index_name.as_deref(), "query");
        let page = self.store.query(&table, request).await?;
        bind_items(page.items)
    }

    /// Runs a query and binds only the first returned row, if any.
    pub async fn query_first<T: Record>(&self, request: QueryRequest) -> Result<Option<T>> {
        let table = self.table_name::<T>();

        debug!(table = %table, index = request.index_name.as_deref(), "query first");
        let page = self.store.query(&table, request).await?;
        bind_first(page.items)
    }

    pub async fn scan<T: Record>(&self, request: ScanRequest) -> Result<Vec<T>> {
        let table = self.table_name::<T>();

        debug!(table = %table, "scan");
        let page = self.store.scan(&table, request).await?;
        bind_items(page.items)
    }

    pub async fn scan_first<T: Record>(&self, request: ScanRequest) -> Result<Option<T>> {
        let table = self.table_name::<T>();

        debug!(table = %table, "scan first");
        let page = self.store.scan(&table, request).await?;
        bind_first(page.items)
    }

    /// Queries by equality on one named attribute, automatically excluding
    /// soft-deleted records.
    pub async fn query_by_attribute<T: Record>(
        &self,
        key: &str,
        value: AttributeValue,
    ) -> Result<Vec<T>> {
        let request = QueryRequest::new(Condition::eq(key, value)).filter(Condition::not_deleted());
        self.query(request).await
    }

    /// Scans by equality on one named attribute. Unlike
    /// [`Access::query_by_attribute`], no soft-delete filter is applied;
    /// compose [`Condition::not_deleted`] explicitly where needed.
    pub async fn scan_by_attribute<T: Record>(
        &self,
        key: &str,
        value: AttributeValue,
    ) -> Result<Vec<T>> {
        let request = ScanRequest::new().filter(Condition::eq(key, value));
        self.scan(request).await
    }
}

fn key_item(key: &str, value: AttributeValue) -> Item {
    let mut item = Item::new();
    item.insert(key.to_string(), value);
    item
}

fn identity_missing(item: &Item) -> bool {
    match item.get(ID_ATTRIBUTE) {
        Some(AttributeValue::S(id)) => id.is_empty(),
        Some(AttributeValue::Null(_)) | None => true,
        Some(_) => false,
    }
}

fn has_identity(item: &Item) -> bool {
    match item.get(ID_ATTRIBUTE) {
        Some(AttributeValue::S(id)) => !id.is_empty(),
        _ => false,
    }
}

fn is_soft_deleted(item: &Item) -> bool {
    match item.get(DELETED_ATTRIBUTE) {
        Some(AttributeValue::N(marker)) => marker != "0",
        _ => false,
    }
}

fn bind_items<T: Record>(items: Vec<Item>) -> Result<Vec<T>> {
    items
        .into_iter()
        .map(|item| Ok(serde_dynamo::from_item(item)?))
        .collect()
}

fn bind_first<T: Record>(items: Vec<Item>) -> Result<Option<T>> {
    match items.into_iter().next() {
        Some(item) => Ok(Some(serde_dynamo::from_item(item)?)),
        None => Ok(None),
    }
}

fn unix_now() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or(0)
}
