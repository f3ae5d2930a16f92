// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: Copyright The Lance Authors

//! Type mapping from DataStore (PostgreSQL) column types to the canonical
//! field vocabulary, and from canonical fields to Arrow.

use std::fmt;
use std::sync::Arc;

use arrow_schema::{DataType, Field as ArrowField, Schema, SchemaRef, TimeUnit};
use serde::{Deserialize, Serialize};

use crate::response::Field;

/// DataStore type names that have a canonical equivalent.
const CKAN_TYPES: &[(&str, FieldType)] = &[
    ("int4", FieldType::Integer),
    ("int8", FieldType::Integer),
    ("float8", FieldType::Float),
];

/// Canonical field type.
///
/// Integer and float columns are collapsed into one name each; any other
/// DataStore type keeps its original name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Integer,
    Float,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "integer" => Self::Integer,
            "float" => Self::Float,
            _ => Self::Other(name),
        }
    }
}

impl From<FieldType> for String {
    fn from(ty: FieldType) -> Self {
        match ty {
            FieldType::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a DataStore `type` label to its canonical [`FieldType`].
///
/// Labels without a canonical equivalent pass through unchanged.
pub fn ckan_type_to_canonical(type_name: &str) -> FieldType {
    CKAN_TYPES
        .iter()
        .find(|(ckan, _)| *ckan == type_name)
        .map(|(_, canonical)| canonical.clone())
        .unwrap_or_else(|| FieldType::Other(type_name.to_string()))
}

/// Map a canonical [`FieldType`] to an Arrow `DataType`.
///
/// Passthrough types are matched against the common DataStore names;
/// anything unrecognized is carried as a string.
pub fn field_type_to_arrow(ty: &FieldType) -> DataType {
    match ty {
        FieldType::Integer => DataType::Int64,
        FieldType::Float => DataType::Float64,
        FieldType::Other(name) => match name.to_lowercase().as_str() {
            "bool" | "boolean" => DataType::Boolean,
            "int2" => DataType::Int16,
            "float4" => DataType::Float32,
            "numeric" => DataType::Float64,
            "date" => DataType::Date32,
            "timestamp" => DataType::Timestamp(TimeUnit::Microsecond, None),
            // text, json, time, interval, arrays and anything else
            _ => DataType::Utf8,
        },
    }
}

/// Convert normalized fields to an Arrow [`Schema`], keeping field order.
///
/// DataStore columns carry no nullability information, so every Arrow
/// field is nullable.
pub fn fields_to_arrow_schema(fields: &[Field]) -> SchemaRef {
    let arrow_fields: Vec<ArrowField> = fields
        .iter()
        .map(|f| ArrowField::new(&f.id, field_type_to_arrow(&f.field_type), true))
        .collect();
    Arc::new(Schema::new(arrow_fields))
}
