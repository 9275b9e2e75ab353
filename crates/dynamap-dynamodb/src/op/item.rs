use super::{Error, Result};
use crate::{from_sdk_item, to_sdk_item, DynamoStore};

use dynamap_core::Item;

impl DynamoStore {
    pub(crate) async fn exec_put_item(&self, table: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table)
            .set_item(Some(to_sdk_item(item)))
            .send()
            .await
            .map_err(Error::store)?;

        Ok(())
    }

    pub(crate) async fn exec_get_item(&self, table: &str, key: Item) -> Result<Option<Item>> {
        let res = self
            .client
            .get_item()
            .table_name(table)
            .set_key(Some(to_sdk_item(key)))
            .send()
            .await
            .map_err(Error::store)?;

        res.item.map(from_sdk_item).transpose()
    }

    pub(crate) async fn exec_delete_item(&self, table: &str, key: Item) -> Result<()> {
        self.client
            .delete_item()
            .table_name(table)
            .set_key(Some(to_sdk_item(key)))
            .send()
            .await
            .map_err(Error::store)?;

        Ok(())
    }
}
