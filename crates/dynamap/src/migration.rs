//! Dump and restore helpers.
//!
//! A dump is the JSON serialization of a table's raw items, deletion
//! markers and all; it is a byte-level snapshot, not a live-record view.
//! [`bind`] turns dump bytes back into typed records for reloading into
//! another table or store.

use std::path::Path;

use tracing::debug;

use dynamap_core::{Item, Record, Result, ScanRequest, Store};

use crate::Access;

impl<S: Store> Access<S> {
    /// Serializes every item of `T`'s table, following pagination cursors
    /// until the scan is exhausted. Soft-deleted items are included.
    pub async fn dump_table<T: Record>(&self) -> Result<Vec<u8>> {
        let table = self.table_name::<T>();
        let mut items: Vec<Item> = vec![];
        let mut start_key = None;

        loop {
            let mut request = ScanRequest::new();

            if let Some(key) = start_key.take() {
                request = request.start_key(key);
            }

            let page = self.store().scan(&table, request).await?;
            items.extend(page.items);

            match page.last_evaluated_key {
                Some(key) => start_key = Some(key),
                None => break,
            }
        }

        debug!(table = %table, items = items.len(), "dump table");
        Ok(serde_json::to_vec(&items)?)
    }

    /// Dumps `T`'s table and writes the bytes to `path`.
    pub async fn dump_table_to_path<T: Record>(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.dump_table::<T>().await?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }
}

/// Reads dump bytes back from a file.
pub async fn read_dump(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    Ok(tokio::fs::read(path).await?)
}

/// Binds dump bytes into typed records, in dump order.
pub fn bind<T: Record>(bytes: &[u8]) -> Result<Vec<T>> {
    let items: Vec<Item> = serde_json::from_slice(bytes)?;

    items
        .into_iter()
        .map(|item| Ok(serde_dynamo::from_item(item)?))
        .collect()
}
