pub mod annotation;
mod error;
pub mod expr;
pub mod record;
pub mod schema;
pub mod store;
pub mod value;

pub use async_trait::async_trait;
pub use error::{Error, Result};
pub use expr::Condition;
pub use record::{Base, FieldKind, FieldSpec, Record};
pub use schema::TableSchema;
pub use store::{Item, Page, QueryRequest, ScanRequest, Store};
