//! Table schema derivation.
//!
//! [`TableSchema::for_record`] folds a record type's field descriptors into
//! the physical table description used at provisioning time: deduplicated
//! attribute definitions, the primary key schema, and grouped global/local
//! secondary indexes. Hash elements are prepended and range elements
//! appended wherever they land, so hash-before-range ordering holds no
//! matter the order fields declare their roles.

use crate::annotation::{self, Role};
use crate::error::{Error, Result};
use crate::record::{Base, FieldKind, FieldSpec, Record};

/// Scalar attribute classification of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    /// Text.
    S,
    /// Numeric.
    N,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Hash,
    Range,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeDefinition {
    pub name: String,
    pub scalar: ScalarType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyElement {
    pub name: String,
    pub kind: KeyKind,
}

/// A named secondary index and its ordered key schema (hash first).
/// Indexes are projected in full and, when global, provisioned with the
/// table's default throughput.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryIndex {
    pub name: String,
    pub key: Vec<KeyElement>,
}

impl SecondaryIndex {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key: vec![],
        }
    }

    pub fn hash_element(&self) -> Option<&KeyElement> {
        self.key.iter().find(|e| e.kind == KeyKind::Hash)
    }

    pub fn range_element(&self) -> Option<&KeyElement> {
        self.key.iter().find(|e| e.kind == KeyKind::Range)
    }
}

/// Static provisioning values, passed through to the store unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub read_units: i64,
    pub write_units: i64,
}

impl Default for Throughput {
    fn default() -> Self {
        Self {
            read_units: 10,
            write_units: 10,
        }
    }
}

/// Derived physical description of one record type's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub attributes: Vec<AttributeDefinition>,
    pub key: Vec<KeyElement>,
    pub global_indexes: Vec<SecondaryIndex>,
    pub local_indexes: Vec<SecondaryIndex>,
    pub throughput: Throughput,
}

impl TableSchema {
    /// Derives the schema for `T`, walking base fields first so identity
    /// and timestamp attributes register ahead of the record's own fields.
    ///
    /// Any failure (unparsable annotation, role on a field kind with no
    /// scalar mapping, violated key invariant) aborts the whole build.
    pub fn for_record<T: Record>(table_name: &str) -> Result<Self> {
        let mut schema = TableSchema {
            name: table_name.to_string(),
            attributes: vec![],
            key: vec![],
            global_indexes: vec![],
            local_indexes: vec![],
            throughput: Throughput::default(),
        };

        for field in Base::FIELDS.iter().chain(T::fields()) {
            schema.apply(field)?;
        }

        schema.finish()?;
        Ok(schema)
    }

    pub fn hash_key(&self) -> Option<&KeyElement> {
        self.key.iter().find(|e| e.kind == KeyKind::Hash)
    }

    pub fn range_key(&self) -> Option<&KeyElement> {
        self.key.iter().find(|e| e.kind == KeyKind::Range)
    }

    fn apply(&mut self, field: &FieldSpec) -> Result<()> {
        let roles = annotation::parse(field.roles)?;

        if roles.is_empty() {
            return Ok(());
        }

        let scalar = scalar_type(field)?;

        // Idempotent by name: a repeated attribute keeps its first
        // definition but still contributes all of its role tokens.
        if !self.attributes.iter().any(|a| a.name == field.name) {
            self.attributes.push(AttributeDefinition {
                name: field.name.to_string(),
                scalar,
            });
        }

        for role in roles {
            match role {
                Role::Key(kind) => {
                    push_key_element(&mut self.key, element(field.name, kind));
                }
                Role::GlobalIndex { index, key } => {
                    let index = locate(&mut self.global_indexes, &index);
                    push_key_element(&mut index.key, element(field.name, key));
                }
                Role::LocalIndex { index, key } => {
                    let index = locate(&mut self.local_indexes, &index);
                    push_key_element(&mut index.key, element(field.name, key));
                }
            }
        }

        Ok(())
    }

    /// Resolves local-index hash keys and validates the key invariants.
    ///
    /// Local indexes share the table's partition key; resolving it here,
    /// after every field has been applied, keeps the build independent of
    /// field declaration order.
    fn finish(&mut self) -> Result<()> {
        validate_key(&self.key, "primary key")?;

        let table_hash = self
            .hash_key()
            .cloned()
            .ok_or_else(|| Error::Schema("primary key has no hash element".to_string()))?;

        for index in &mut self.local_indexes {
            if index.hash_element().is_none() {
                index.key.insert(0, table_hash.clone());
            }
        }

        for index in self.global_indexes.iter().chain(&self.local_indexes) {
            validate_key(&index.key, &format!("index `{}`", index.name))?;
        }

        Ok(())
    }
}

fn element(name: &str, kind: KeyKind) -> KeyElement {
    KeyElement {
        name: name.to_string(),
        kind,
    }
}

/// Hash elements go first, range elements last, regardless of the order
/// roles were declared in.
fn push_key_element(key: &mut Vec<KeyElement>, element: KeyElement) {
    match element.kind {
        KeyKind::Hash => key.insert(0, element),
        KeyKind::Range => key.push(element),
    }
}

fn locate<'a>(indexes: &'a mut Vec<SecondaryIndex>, name: &str) -> &'a mut SecondaryIndex {
    let pos = match indexes.iter().position(|i| i.name == name) {
        Some(pos) => pos,
        None => {
            indexes.push(SecondaryIndex::new(name));
            indexes.len() - 1
        }
    };

    &mut indexes[pos]
}

fn scalar_type(field: &FieldSpec) -> Result<ScalarType> {
    match field.kind {
        FieldKind::Text => Ok(ScalarType::S),
        FieldKind::Integer => Ok(ScalarType::N),
        _ => Err(Error::UnsupportedType {
            attribute: field.name.to_string(),
        }),
    }
}

fn validate_key(key: &[KeyElement], what: &str) -> Result<()> {
    let hashes = key.iter().filter(|e| e.kind == KeyKind::Hash).count();
    let ranges = key.iter().filter(|e| e.kind == KeyKind::Range).count();

    if hashes != 1 {
        return Err(Error::Schema(format!(
            "{what} must have exactly one hash element, found {hashes}"
        )));
    }

    if ranges > 1 {
        return Err(Error::Schema(format!(
            "{what} may have at most one range element, found {ranges}"
        )));
    }

    Ok(())
}
