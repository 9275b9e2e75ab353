//! Record metadata: the `Record` trait, the shared `Base` block, and the
//! per-field descriptors the schema builder consumes.
//!
//! Field roles are registered explicitly per record type instead of being
//! reflected at runtime; the schema builder walks `Base::FIELDS` first so
//! that identity and timestamp attributes register ahead of the record's
//! own fields.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Attribute name of the record identity.
pub const ID_ATTRIBUTE: &str = "id";
/// Attribute name of the creation timestamp.
pub const CREATED_ATTRIBUTE: &str = "created";
/// Attribute name of the last-update timestamp.
pub const UPDATED_ATTRIBUTE: &str = "updated";
/// Attribute name of the soft-delete marker. Zero means live.
pub const DELETED_ATTRIBUTE: &str = "deleted";

/// Declared kind of a record field. Scalar-type inference maps `Text` to
/// the store's string type and `Integer` to its numeric type; every other
/// kind has no scalar mapping and may not carry key or index roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Boolean,
    Binary,
    List,
    Map,
}

/// Registration-time descriptor for one annotated field: serialization
/// name, declared kind, and the raw role annotation (parsed lazily by the
/// schema builder).
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub roles: &'static str,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind, roles: &'static str) -> Self {
        Self { name, kind, roles }
    }

    pub const fn text(name: &'static str, roles: &'static str) -> Self {
        Self::new(name, FieldKind::Text, roles)
    }

    pub const fn integer(name: &'static str, roles: &'static str) -> Self {
        Self::new(name, FieldKind::Integer, roles)
    }

    pub const fn list(name: &'static str, roles: &'static str) -> Self {
        Self::new(name, FieldKind::List, roles)
    }
}

/// Identity and timestamp block embedded in every record type, flattened
/// into the record's attribute map.
///
/// `deleted == 0` means live; any other value marks the record
/// soft-deleted, and reads treat it as absent unless explicitly requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Base {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub deleted: i64,
}

impl Base {
    /// Base field descriptors, spliced ahead of every record's own fields.
    /// The identity is the primary hash key by convention.
    pub const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::text(ID_ATTRIBUTE, "hash"),
        FieldSpec::integer(CREATED_ATTRIBUTE, ""),
        FieldSpec::integer(UPDATED_ATTRIBUTE, ""),
        FieldSpec::integer(DELETED_ATTRIBUTE, ""),
    ];

    pub fn is_deleted(&self) -> bool {
        self.deleted != 0
    }
}

/// A persistable record type.
///
/// Implementors embed a [`Base`] block with `#[serde(flatten)]` and list
/// their own annotated fields in declaration order. The table name is the
/// engine's configured prefix followed by [`Record::TYPE_NAME`].
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Unqualified type name, used to resolve the table.
    const TYPE_NAME: &'static str;

    /// Field descriptors declared by the record itself, in declaration
    /// order. Base fields are contributed by [`Base::FIELDS`] and must not
    /// be repeated here.
    fn fields() -> &'static [FieldSpec];

    /// The embedded identity/timestamp block.
    fn base(&self) -> &Base;

    fn base_mut(&mut self) -> &mut Base;
}
