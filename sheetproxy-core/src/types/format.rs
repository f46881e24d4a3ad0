//! Format mappings from sheet labels to output keys.
//!
//! A mapping arrives as a JSON array of single-pair objects:
//!
//! ```text
//! [{ "name": "Full name" }, { "whereToFind": "where to find" }]
//! ```
//!
//! Each pair reads `output key -> sheet label`: the column (or row) labelled
//! `"Full name"` in the sheet is emitted under the key `"name"`.

use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Result, SheetError};

/// A single `output key -> sheet label` pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldMapping {
    /// Key used in the reshaped output
    pub output_key: String,
    /// Header cell (array shape) or first-column cell (object shape) in the sheet
    pub label: String,
}

impl FieldMapping {
    /// Creates a new mapping.
    pub fn new(output_key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            output_key: output_key.into(),
            label: label.into(),
        }
    }
}

/// Ordered list of field mappings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FormatMapping {
    fields: Vec<FieldMapping>,
}

impl FormatMapping {
    /// Creates an empty mapping (every label keeps its own name).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mapping from `(output_key, label)` pairs.
    pub fn from_pairs<K, L>(pairs: impl IntoIterator<Item = (K, L)>) -> Self
    where
        K: Into<String>,
        L: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, l)| FieldMapping::new(k, l))
                .collect(),
        }
    }

    /// Parses the JSON text of a `format` query parameter.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| SheetError::InvalidFormat(format!("not valid JSON: {}", e)))?;
        Self::try_from(value)
    }

    /// Returns the output key for a sheet label, if one is mapped.
    ///
    /// The first mapping for a label wins.
    pub fn output_key_for(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.output_key.as_str())
    }

    /// Iterates over the mappings in order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldMapping> {
        self.fields.iter()
    }

    /// Number of mappings.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no mappings.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Value> for FormatMapping {
    type Error = SheetError;

    fn try_from(value: Value) -> Result<Self> {
        let items = match value {
            Value::Array(items) => items,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(SheetError::InvalidFormat(format!(
                    "expected an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        let fields = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| field_from_value(i, item))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { fields })
    }
}

fn field_from_value(index: usize, item: Value) -> Result<FieldMapping> {
    let Value::Object(map) = item else {
        return Err(SheetError::InvalidFormat(format!(
            "entry {} must be an object",
            index
        )));
    };
    if map.len() != 1 {
        return Err(SheetError::InvalidFormat(format!(
            "entry {} must have exactly one key, got {}",
            index,
            map.len()
        )));
    }
    let Some((output_key, label)) = map.into_iter().next() else {
        return Err(SheetError::InvalidFormat(format!("entry {} is empty", index)));
    };
    match label {
        Value::String(label) => Ok(FieldMapping { output_key, label }),
        other => Err(SheetError::InvalidFormat(format!(
            "label for '{}' must be a string, got {}",
            output_key,
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for FormatMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.fields.len()))?;
        for field in &self.fields {
            let mut pair = Map::with_capacity(1);
            pair.insert(field.output_key.clone(), Value::String(field.label.clone()));
            seq.serialize_element(&pair)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for FormatMapping {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}
