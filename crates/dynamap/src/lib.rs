//! dynamap maps annotated record types onto a DynamoDB-shaped store.
//!
//! A record type embeds a [`Base`] identity/timestamp block and registers
//! its key and index roles as field descriptors; [`Access`] derives table
//! schemas from those descriptors and runs create/update/delete/get/query/
//! scan against any [`Store`] implementation, injecting identity and
//! timestamps on writes and treating soft-deleted records as absent on
//! reads.
//!
//! ```no_run
//! use dynamap::{value, Access, Base, FieldSpec, Record};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct Order {
//!     #[serde(flatten)]
//!     base: Base,
//!     customer: String,
//!     placed: i64,
//! }
//!
//! impl Record for Order {
//!     const TYPE_NAME: &'static str = "Order";
//!
//!     fn fields() -> &'static [FieldSpec] {
//!         const FIELDS: &[FieldSpec] = &[
//!             FieldSpec::text("customer", "global_secondary_index(by_customer:hash)"),
//!             FieldSpec::integer("placed", "global_secondary_index(by_customer:range)"),
//!         ];
//!         FIELDS
//!     }
//!
//!     fn base(&self) -> &Base {
//!         &self.base
//!     }
//!
//!     fn base_mut(&mut self) -> &mut Base {
//!         &mut self.base
//!     }
//! }
//!
//! # async fn example(store: impl dynamap::Store) -> dynamap::Result<()> {
//! let access = Access::new(store, "prod_");
//! access.create_table::<Order>().await?;
//!
//! let mut order = Order {
//!     customer: "c-1".to_string(),
//!     placed: 1,
//!     ..Default::default()
//! };
//! access.create(&mut order).await?;
//!
//! let orders: Vec<Order> = access
//!     .query_by_attribute("customer", value::s("c-1"))
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod access;
pub mod migration;

pub use access::Access;

pub use dynamap_core::{
    annotation, async_trait, expr, record, schema, store, value, Base, Condition, Error, FieldKind,
    FieldSpec, Item, Page, QueryRequest, Record, Result, ScanRequest, Store, TableSchema,
};
