//! The grid-side data-source declaration.
//!
//! Serializes to the shape a grid widget is configured with:
//!
//! ```json
//! { "pageSize": 100, "serverPaging": true, "serverFiltering": true, "serverSorting": true,
//!   "schema": { "data": "data", "total": "total",
//!               "model": { "fields": { "price": { "type": "number" } } } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::result::Field;

/// Declared type of a grid column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    String,
    Number,
    Boolean,
    Date,
}

impl FieldKind {
    /// Best-effort mapping from a dataset schema type (`DOUBLE`, `LONG`, ...).
    pub fn from_schema_type(field_type: &str) -> Self {
        match field_type.to_ascii_uppercase().as_str() {
            "INT" | "INTEGER" | "LONG" | "FLOAT" | "DOUBLE" | "DECIMAL" | "NUMBER" => {
                FieldKind::Number
            }
            "BOOL" | "BOOLEAN" => FieldKind::Boolean,
            "DATE" | "DATETIME" | "TIMESTAMP" => FieldKind::Date,
            _ => FieldKind::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaModel {
    pub fields: BTreeMap<String, FieldSpec>,
}

/// Where the records and the total count live in a [`crate::GridPage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub data: String,
    pub total: String,
    pub model: SchemaModel,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            data: "data".into(),
            total: "total".into(),
            model: SchemaModel::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceOptions {
    pub page_size: u32,
    pub server_paging: bool,
    pub server_filtering: bool,
    pub server_sorting: bool,
    pub schema: Schema,
}

impl Default for DataSourceOptions {
    fn default() -> Self {
        Self::new(100)
    }
}

impl DataSourceOptions {
    /// Server-side paging, filtering and sorting with the given page size.
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size,
            server_paging: true,
            server_filtering: true,
            server_sorting: true,
            schema: Schema::default(),
        }
    }

    pub fn with_fields(mut self, fields: BTreeMap<String, FieldKind>) -> Self {
        self.schema.model.fields = fields
            .into_iter()
            .map(|(id, kind)| (id, FieldSpec { kind }))
            .collect();
        self
    }

    pub fn with_field(mut self, id: impl Into<String>, kind: FieldKind) -> Self {
        self.schema.model.fields.insert(id.into(), FieldSpec { kind });
        self
    }

    /// Declare every result field not declared yet, typed from its schema type.
    pub fn with_schema_fields(mut self, fields: &[Field]) -> Self {
        for field in fields {
            self.schema
                .model
                .fields
                .entry(field.id.clone())
                .or_insert(FieldSpec {
                    kind: FieldKind::from_schema_type(&field.field_type),
                });
        }
        self
    }
}
