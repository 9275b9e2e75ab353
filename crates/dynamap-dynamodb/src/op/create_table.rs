use super::{
    ddb_attribute_type, ddb_key_schema, AttributeDefinition, Error, GlobalSecondaryIndex,
    LocalSecondaryIndex, Projection, ProjectionType, ProvisionedThroughput, Result,
};
use crate::DynamoStore;

use dynamap_core::TableSchema;

impl DynamoStore {
    pub(crate) async fn exec_create_table(&self, schema: &TableSchema) -> Result<()> {
        let pt = ProvisionedThroughput::builder()
            .read_capacity_units(schema.throughput.read_units)
            .write_capacity_units(schema.throughput.write_units)
            .build()
            .unwrap();

        let attribute_definitions = schema
            .attributes
            .iter()
            .map(|attribute| {
                AttributeDefinition::builder()
                    .attribute_name(&attribute.name)
                    .attribute_type(ddb_attribute_type(attribute.scalar))
                    .build()
                    .unwrap()
            })
            .collect();

        let gsis: Vec<_> = schema
            .global_indexes
            .iter()
            .map(|index| {
                GlobalSecondaryIndex::builder()
                    .index_name(&index.name)
                    .set_key_schema(Some(ddb_key_schema(&index.key)))
                    .projection(
                        Projection::builder()
                            .projection_type(ProjectionType::All)
                            .build(),
                    )
                    .provisioned_throughput(pt.clone())
                    .build()
                    .unwrap()
            })
            .collect();

        let lsis: Vec<_> = schema
            .local_indexes
            .iter()
            .map(|index| {
                LocalSecondaryIndex::builder()
                    .index_name(&index.name)
                    .set_key_schema(Some(ddb_key_schema(&index.key)))
                    .projection(
                        Projection::builder()
                            .projection_type(ProjectionType::All)
                            .build(),
                    )
                    .build()
                    .unwrap()
            })
            .collect();

        self.client
            .create_table()
            .table_name(&schema.name)
            .set_attribute_definitions(Some(attribute_definitions))
            .set_key_schema(Some(ddb_key_schema(&schema.key)))
            .set_global_secondary_indexes(if gsis.is_empty() { None } else { Some(gsis) })
            .set_local_secondary_indexes(if lsis.is_empty() { None } else { Some(lsis) })
            .provisioned_throughput(pt)
            .send()
            .await
            .map_err(Error::store)?;

        Ok(())
    }

    pub(crate) async fn exec_delete_table(&self, table: &str) -> Result<()> {
        self.client
            .delete_table()
            .table_name(table)
            .send()
            .await
            .map_err(Error::store)?;

        Ok(())
    }
}
