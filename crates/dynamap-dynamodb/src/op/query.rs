use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue as SdkValue;

use super::{Error, Result};
use crate::{from_sdk_item, to_sdk_item, to_sdk_value, DynamoStore};

use dynamap_core::expr::ExprAttrs;
use dynamap_core::{Page, QueryRequest, ScanRequest};

impl DynamoStore {
    pub(crate) async fn exec_query(&self, table: &str, request: QueryRequest) -> Result<Page> {
        let mut attrs = ExprAttrs::new();
        let key_expression = request.key_condition.render(&mut attrs);
        let filter_expression = request.filter.as_ref().map(|filter| filter.render(&mut attrs));

        let (names, values) = sdk_expr_attrs(attrs);

        let res = self
            .client
            .query()
            .table_name(table)
            .key_condition_expression(key_expression)
            .set_filter_expression(filter_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_index_name(request.index_name)
            .set_limit(request.limit)
            .set_exclusive_start_key(request.exclusive_start_key.map(to_sdk_item))
            .scan_index_forward(request.scan_index_forward)
            .send()
            .await
            .map_err(Error::store)?;

        Ok(Page {
            items: res
                .items
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_item)
                .collect::<Result<_>>()?,
            last_evaluated_key: res.last_evaluated_key.map(from_sdk_item).transpose()?,
        })
    }

    pub(crate) async fn exec_scan(&self, table: &str, request: ScanRequest) -> Result<Page> {
        let mut attrs = ExprAttrs::new();
        let filter_expression = request.filter.as_ref().map(|filter| filter.render(&mut attrs));

        let (names, values) = sdk_expr_attrs(attrs);

        let res = self
            .client
            .scan()
            .table_name(table)
            .set_filter_expression(filter_expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .set_index_name(request.index_name)
            .set_limit(request.limit)
            .set_exclusive_start_key(request.exclusive_start_key.map(to_sdk_item))
            .send()
            .await
            .map_err(Error::store)?;

        Ok(Page {
            items: res
                .items
                .unwrap_or_default()
                .into_iter()
                .map(from_sdk_item)
                .collect::<Result<_>>()?,
            last_evaluated_key: res.last_evaluated_key.map(from_sdk_item).transpose()?,
        })
    }
}

/// The SDK rejects empty placeholder maps, so an expressionless request
/// must pass `None` rather than empty maps.
fn sdk_expr_attrs(
    attrs: ExprAttrs,
) -> (
    Option<HashMap<String, String>>,
    Option<HashMap<String, SdkValue>>,
) {
    let (names, values) = attrs.into_parts();

    let values: HashMap<String, SdkValue> = values
        .into_iter()
        .map(|(placeholder, value)| (placeholder, to_sdk_value(value)))
        .collect();

    (
        (!names.is_empty()).then_some(names),
        (!values.is_empty()).then_some(values),
    )
}
