mod create_table;
mod item;
mod query;

use aws_sdk_dynamodb::types::{
    AttributeDefinition, GlobalSecondaryIndex, KeySchemaElement, KeyType, LocalSecondaryIndex,
    Projection, ProjectionType, ProvisionedThroughput, ScalarAttributeType,
};

use dynamap_core::schema::{KeyElement, KeyKind, ScalarType};
use dynamap_core::{Error, Result};

fn ddb_key_schema(key: &[KeyElement]) -> Vec<KeySchemaElement> {
    key.iter()
        .map(|element| {
            KeySchemaElement::builder()
                .attribute_name(&element.name)
                .key_type(match element.kind {
                    KeyKind::Hash => KeyType::Hash,
                    KeyKind::Range => KeyType::Range,
                })
                .build()
                .unwrap()
        })
        .collect()
}

fn ddb_attribute_type(scalar: ScalarType) -> ScalarAttributeType {
    match scalar {
        ScalarType::S => ScalarAttributeType::S,
        ScalarType::N => ScalarAttributeType::N,
    }
}
