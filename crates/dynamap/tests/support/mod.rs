//! In-memory [`Store`] used by the engine tests.
//!
//! The store honors the table schemas it is given: query results sort by
//! the selected index's range key, and pagination cursors carry the
//! primary key of the last returned item. Conditions are evaluated
//! directly against items, including nested `map.list[0].field` paths.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use dynamap::expr::Comparator;
use dynamap::schema::{KeyElement, KeyKind};
use dynamap::value::AttributeValue;
use dynamap::{
    async_trait, Condition, Error, Item, Page, QueryRequest, Result, ScanRequest, Store,
    TableSchema,
};

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, TableState>>,
}

struct TableState {
    schema: TableSchema,
    items: Vec<Item>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        self.tables.lock().unwrap().insert(
            schema.name.clone(),
            TableState {
                schema: schema.clone(),
                items: vec![],
            },
        );
        Ok(())
    }

    async fn delete_table(&self, table: &str) -> Result<()> {
        match self.tables.lock().unwrap().remove(table) {
            Some(_) => Ok(()),
            None => Err(unknown_table(table)),
        }
    }

    async fn put_item(&self, table: &str, item: Item) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let state = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;

        let key_names: Vec<&str> = state.schema.key.iter().map(|e| e.name.as_str()).collect();
        state
            .items
            .retain(|existing| !key_names.iter().all(|k| existing.get(*k) == item.get(*k)));
        state.items.push(item);

        Ok(())
    }

    async fn get_item(&self, table: &str, key: Item) -> Result<Option<Item>> {
        let tables = self.tables.lock().unwrap();
        let state = tables.get(table).ok_or_else(|| unknown_table(table))?;

        Ok(state
            .items
            .iter()
            .find(|item| matches_key(item, &key))
            .cloned())
    }

    async fn delete_item(&self, table: &str, key: Item) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let state = tables.get_mut(table).ok_or_else(|| unknown_table(table))?;

        state.items.retain(|item| !matches_key(item, &key));
        Ok(())
    }

    async fn query(&self, table: &str, request: QueryRequest) -> Result<Page> {
        let tables = self.tables.lock().unwrap();
        let state = tables.get(table).ok_or_else(|| unknown_table(table))?;

        let index_key = index_key(&state.schema, request.index_name.as_deref())?;

        let mut items: Vec<Item> = state
            .items
            .iter()
            .filter(|item| eval(&request.key_condition, item))
            .cloned()
            .collect();

        if let Some(range) = index_key.iter().find(|e| e.kind == KeyKind::Range) {
            items.sort_by(|a, b| compare_values(a.get(&range.name), b.get(&range.name)));
        }

        if !request.scan_index_forward {
            items.reverse();
        }

        if let Some(filter) = &request.filter {
            items.retain(|item| eval(filter, item));
        }

        Ok(page(
            items,
            &state.schema,
            request.exclusive_start_key,
            request.limit,
        ))
    }

    async fn scan(&self, table: &str, request: ScanRequest) -> Result<Page> {
        let tables = self.tables.lock().unwrap();
        let state = tables.get(table).ok_or_else(|| unknown_table(table))?;

        let mut items = state.items.clone();

        if let Some(filter) = &request.filter {
            items.retain(|item| eval(filter, item));
        }

        Ok(page(
            items,
            &state.schema,
            request.exclusive_start_key,
            request.limit,
        ))
    }
}

fn unknown_table(table: &str) -> Error {
    Error::store(anyhow::anyhow!("no such table: {table}"))
}

fn matches_key(item: &Item, key: &Item) -> bool {
    key.iter().all(|(name, value)| item.get(name) == Some(value))
}

fn index_key<'a>(schema: &'a TableSchema, index_name: Option<&str>) -> Result<&'a [KeyElement]> {
    match index_name {
        None => Ok(&schema.key),
        Some(name) => schema
            .global_indexes
            .iter()
            .chain(&schema.local_indexes)
            .find(|index| index.name == name)
            .map(|index| index.key.as_slice())
            .ok_or_else(|| Error::store(anyhow::anyhow!("no such index: {name}"))),
    }
}

fn page(mut items: Vec<Item>, schema: &TableSchema, start_key: Option<Item>, limit: Option<i32>) -> Page {
    if let Some(start) = start_key {
        match items.iter().position(|item| matches_key(item, &start)) {
            Some(pos) => {
                items.drain(..=pos);
            }
            None => items.clear(),
        }
    }

    let mut last_evaluated_key = None;

    if let Some(limit) = limit {
        let limit = limit as usize;

        if items.len() > limit {
            items.truncate(limit);

            let last = items.last().unwrap();
            last_evaluated_key = Some(
                schema
                    .key
                    .iter()
                    .filter_map(|e| last.get(&e.name).map(|v| (e.name.clone(), v.clone())))
                    .collect(),
            );
        }
    }

    Page {
        items,
        last_evaluated_key,
    }
}

fn eval(condition: &Condition, item: &Item) -> bool {
    match condition {
        Condition::Compare { path, op, value } => match resolve(item, path) {
            Some(actual) => compare(actual, *op, value),
            None => false,
        },
        Condition::BeginsWith { path, prefix } => {
            match (resolve(item, path), prefix) {
                (Some(AttributeValue::S(actual)), AttributeValue::S(prefix)) => {
                    actual.starts_with(prefix)
                }
                _ => false,
            }
        }
        Condition::And(operands) => operands.iter().all(|operand| eval(operand, item)),
    }
}

fn compare(actual: &AttributeValue, op: Comparator, value: &AttributeValue) -> bool {
    match op {
        Comparator::Eq => actual == value,
        Comparator::Ne => actual != value,
        op => {
            let Some(ord) = ordering(actual, value) else {
                return false;
            };

            match op {
                Comparator::Gt => ord == Ordering::Greater,
                Comparator::Ge => ord != Ordering::Less,
                Comparator::Lt => ord == Ordering::Less,
                Comparator::Le => ord != Ordering::Greater,
                Comparator::Eq | Comparator::Ne => unreachable!(),
            }
        }
    }
}

fn ordering(a: &AttributeValue, b: &AttributeValue) -> Option<Ordering> {
    match (a, b) {
        (AttributeValue::N(a), AttributeValue::N(b)) => {
            a.parse::<f64>().ok()?.partial_cmp(&b.parse::<f64>().ok()?)
        }
        (AttributeValue::S(a), AttributeValue::S(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare_values(a: Option<&AttributeValue>, b: Option<&AttributeValue>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => ordering(a, b).unwrap_or(Ordering::Equal),
        _ => Ordering::Equal,
    }
}

/// Resolves a dotted path with optional list indexes against an item.
fn resolve<'a>(item: &'a Item, path: &str) -> Option<&'a AttributeValue> {
    let mut current: Option<&AttributeValue> = None;

    for segment in path.split('.') {
        let (name, indexes) = split_indexes(segment);

        let mut value = match current {
            None => item.get(name)?,
            Some(AttributeValue::M(map)) => map.get(name)?,
            Some(_) => return None,
        };

        for index in indexes {
            match value {
                AttributeValue::L(list) => value = list.get(index)?,
                _ => return None,
            }
        }

        current = Some(value);
    }

    current
}

fn split_indexes(segment: &str) -> (&str, Vec<usize>) {
    match segment.find('[') {
        Some(bracket) => {
            let indexes = segment[bracket..]
                .split(['[', ']'])
                .filter(|part| !part.is_empty())
                .filter_map(|part| part.parse().ok())
                .collect();
            (&segment[..bracket], indexes)
        }
        None => (segment, vec![]),
    }
}
