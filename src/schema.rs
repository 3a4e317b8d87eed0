//! Immutable table/field metadata consulted by the translator for every field
//! reference. Lookup is exact-match and case-sensitive; misses degrade
//! gracefully to plain-column treatment rather than erroring at this layer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Element type of an array-typed field, or the scalar type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Int,
    UInt,
    Double,
    String,
    Bytes,
    Timestamp,
    Duration,
}

/// Semantic type of a field: plain scalar column, JSON column, or array
/// column. JSON fields additionally record whether storage is binary JSON
/// (affects PostgreSQL path-operator selection); array fields record their
/// element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldKind {
    Scalar(ScalarType),
    Json { binary: bool },
    Array { element: ScalarType },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    pub kind: FieldKind,
}

impl FieldSchema {
    pub fn scalar(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Scalar(ty),
        }
    }

    pub fn json(name: impl Into<String>, binary: bool) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Json { binary },
        }
    }

    pub fn array(name: impl Into<String>, element: ScalarType) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Array { element },
        }
    }
}

/// An ordered collection of fields for one table, plus a name index built
/// once at construction for O(1) lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<FieldSchema>,
    #[serde(skip, default = "Schema::build_index_placeholder")]
    index: HashMap<String, usize>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        let index = fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
        Self { fields, index }
    }

    fn build_index_placeholder() -> HashMap<String, usize> {
        HashMap::new()
    }

    /// Rebuilds the name index. Required after `Deserialize` skips it.
    pub fn reindex(&mut self) {
        self.index = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| (f.name.clone(), i))
            .collect();
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }
}

/// Mapping from table name to [`Schema`]. Borrowed read-only for the duration
/// of one translation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    tables: HashMap<String, Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.tables.insert(name.into(), schema);
        self
    }

    /// Exact-match, case-sensitive table lookup.
    pub fn table(&self, name: &str) -> Option<&Schema> {
        self.tables.get(name)
    }

    /// Rebuilds every table's field index. Call after deserializing a
    /// registry from an external introspection driver's JSON payload.
    pub fn reindex(&mut self) {
        for schema in self.tables.values_mut() {
            schema.reindex();
        }
    }
}
