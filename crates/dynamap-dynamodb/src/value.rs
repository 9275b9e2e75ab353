//! Codec between the core attribute representation and the SDK's
//! `AttributeValue`.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue as SdkValue;
use serde_dynamo::AttributeValue;

use dynamap_core::{Error, Item, Result};

pub(crate) fn to_sdk_value(value: AttributeValue) -> SdkValue {
    match value {
        AttributeValue::S(v) => SdkValue::S(v),
        AttributeValue::N(v) => SdkValue::N(v),
        AttributeValue::Bool(v) => SdkValue::Bool(v),
        AttributeValue::Null(v) => SdkValue::Null(v),
        AttributeValue::B(v) => SdkValue::B(Blob::new(v)),
        AttributeValue::L(vs) => SdkValue::L(vs.into_iter().map(to_sdk_value).collect()),
        AttributeValue::M(m) => {
            SdkValue::M(m.into_iter().map(|(k, v)| (k, to_sdk_value(v))).collect())
        }
        AttributeValue::Ss(vs) => SdkValue::Ss(vs),
        AttributeValue::Ns(vs) => SdkValue::Ns(vs),
        AttributeValue::Bs(vs) => SdkValue::Bs(vs.into_iter().map(Blob::new).collect()),
    }
}

pub(crate) fn from_sdk_value(value: SdkValue) -> Result<AttributeValue> {
    Ok(match value {
        SdkValue::S(v) => AttributeValue::S(v),
        SdkValue::N(v) => AttributeValue::N(v),
        SdkValue::Bool(v) => AttributeValue::Bool(v),
        SdkValue::Null(v) => AttributeValue::Null(v),
        SdkValue::B(v) => AttributeValue::B(v.into_inner()),
        SdkValue::L(vs) => {
            AttributeValue::L(vs.into_iter().map(from_sdk_value).collect::<Result<_>>()?)
        }
        SdkValue::M(m) => AttributeValue::M(
            m.into_iter()
                .map(|(k, v)| Ok((k, from_sdk_value(v)?)))
                .collect::<Result<_>>()?,
        ),
        SdkValue::Ss(vs) => AttributeValue::Ss(vs),
        SdkValue::Ns(vs) => AttributeValue::Ns(vs),
        SdkValue::Bs(vs) => AttributeValue::Bs(vs.into_iter().map(Blob::into_inner).collect()),
        other => {
            return Err(Error::store(anyhow::anyhow!(
                "attribute value has no core representation: {other:?}"
            )))
        }
    })
}

pub(crate) fn to_sdk_item(item: Item) -> HashMap<String, SdkValue> {
    item.into_iter().map(|(k, v)| (k, to_sdk_value(v))).collect()
}

pub(crate) fn from_sdk_item(item: HashMap<String, SdkValue>) -> Result<Item> {
    item.into_iter()
        .map(|(k, v)| Ok((k, from_sdk_value(v)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scalar_values_round_trip() {
        let values = vec![
            AttributeValue::S("abc".to_string()),
            AttributeValue::N("42".to_string()),
            AttributeValue::Bool(true),
            AttributeValue::Null(true),
            AttributeValue::B(vec![1, 2, 3]),
        ];

        for value in values {
            assert_eq!(from_sdk_value(to_sdk_value(value.clone())).unwrap(), value);
        }
    }

    #[test]
    fn nested_values_round_trip() {
        let value = AttributeValue::M(
            [
                (
                    "lines".to_string(),
                    AttributeValue::L(vec![AttributeValue::M(
                        [("sku".to_string(), AttributeValue::S("widget".to_string()))]
                            .into_iter()
                            .collect(),
                    )]),
                ),
                ("count".to_string(), AttributeValue::N("2".to_string())),
            ]
            .into_iter()
            .collect(),
        );

        assert_eq!(from_sdk_value(to_sdk_value(value.clone())).unwrap(), value);
    }

    #[test]
    fn set_values_round_trip() {
        let value = AttributeValue::Ss(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(from_sdk_value(to_sdk_value(value.clone())).unwrap(), value);
    }
}
