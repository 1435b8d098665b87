//! Dataset model: cell values, rows and datasets.

use std::collections::HashMap;
use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::GridError;

/// A dynamic cell value.
///
/// Rows store their cells as `HashMap<String, Value>`; a key that is absent
/// reads as [`Value::Null`] so rendering stays total over arbitrary rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// 64-bit integer.
    Int(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }

    /// Numeric view of the value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The text a cell shows for this value. Null renders empty.
    pub fn display(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(v) => v.to_string(),
            Value::Int(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::String(v) => v.clone(),
        }
    }

    /// Convert an arbitrary JSON value. Arrays and objects are kept as
    /// their JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Null,
        }
    }
}

// =============================================================================
// Row
// =============================================================================

/// A leaf or group row.
///
/// A row with `sub_rows` is a group; it renders as its own line and, when
/// expanded, its children follow one level deeper.
///
/// # Example
///
/// ```
/// use datagrid::value::{Row, Value};
///
/// let row = Row::new().set("name", "Contoso").set("revenue", 1_000_000i64);
/// assert_eq!(row.get("name"), &Value::from("Contoso"));
/// assert!(row.get("missing").is_null());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Row {
    /// Cell values keyed by accessor field.
    #[serde(flatten)]
    pub values: HashMap<String, Value>,
    /// Child rows, empty for leaves.
    #[serde(rename = "subRows", skip_serializing_if = "Vec::is_empty")]
    pub sub_rows: Vec<Row>,
}

static NULL: Value = Value::Null;

impl Row {
    /// Creates an empty leaf row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a field value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Builder: append a child row, turning this row into a group.
    pub fn child(mut self, row: Row) -> Self {
        self.sub_rows.push(row);
        self
    }

    /// Builder: replace the child rows.
    pub fn children(mut self, rows: Vec<Row>) -> Self {
        self.sub_rows = rows;
        self
    }

    /// Get a field value, `Value::Null` when the key is absent.
    pub fn get(&self, field: &str) -> &Value {
        self.values.get(field).unwrap_or(&NULL)
    }

    /// Returns `true` when this row has children.
    pub fn is_group(&self) -> bool {
        !self.sub_rows.is_empty()
    }
}

impl<'de> Deserialize<'de> for Row {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut object = serde_json::Map::<String, serde_json::Value>::deserialize(deserializer)?;
        let children = object
            .remove("subRows")
            .or_else(|| object.remove("sub_rows"));
        let sub_rows = match children {
            Some(children) => {
                Vec::<Row>::deserialize(children).map_err(serde::de::Error::custom)?
            }
            None => Vec::new(),
        };
        let values = object
            .into_iter()
            .map(|(key, value)| (key, Value::from_json(value)))
            .collect();
        Ok(Row { values, sub_rows })
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// The row sequence handed to the grid, with nesting declared up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// Top-level rows in caller order.
    pub rows: Vec<Row>,
    /// Whether the dataset is hierarchical. Controls row striping.
    pub nested: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetRepr {
    Rows(Vec<Row>),
    Object {
        rows: Vec<Row>,
        #[serde(default)]
        nested: Option<bool>,
    },
}

impl Dataset {
    /// Build a dataset, marking it nested when any top-level row is a group.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let nested = rows.iter().any(Row::is_group);
        Self { rows, nested }
    }

    /// Override the nesting flag.
    pub fn nested(mut self, nested: bool) -> Self {
        self.nested = nested;
        self
    }

    /// Number of top-level rows in the caller's input.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse a JSON array of rows, or an object `{ "rows": [...], "nested": bool }`.
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        let repr: DatasetRepr = serde_json::from_str(json)?;
        Ok(Self::from_repr(repr))
    }

    /// Parse a dataset from a reader.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, GridError> {
        let repr: DatasetRepr = serde_json::from_reader(reader)?;
        Ok(Self::from_repr(repr))
    }

    fn from_repr(repr: DatasetRepr) -> Self {
        match repr {
            DatasetRepr::Rows(rows) => Self::from_rows(rows),
            DatasetRepr::Object { rows, nested } => {
                let dataset = Self::from_rows(rows);
                match nested {
                    Some(nested) => dataset.nested(nested),
                    None => dataset,
                }
            }
        }
    }
}

impl From<Vec<Row>> for Dataset {
    fn from(rows: Vec<Row>) -> Self {
        Self::from_rows(rows)
    }
}
