//! Attribute value helpers.
//!
//! The store's typed value representation is `serde_dynamo`'s
//! [`AttributeValue`]; these helpers cover the two scalar shapes the
//! mapping layer deals in.

pub use serde_dynamo::AttributeValue;

/// A text attribute value.
pub fn s(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

/// A numeric attribute value.
pub fn n(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}
