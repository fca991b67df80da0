use serde_json::{Map, Value};

/// A field value after resolving Airtable's "one value or a list of values"
/// ambiguity. Nothing past this module sees raw JSON shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(String),
    Sequence(Vec<String>),
}

impl FieldValue {
    /// `None` for null, objects, empty strings and lists with no scalar items.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => {
                let items: Vec<String> = items.iter().filter_map(scalar_text).collect();
                if items.is_empty() {
                    None
                } else {
                    Some(FieldValue::Sequence(items))
                }
            }
            other => scalar_text(other)
                .filter(|s| !s.is_empty())
                .map(FieldValue::Scalar),
        }
    }

    pub fn joined(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.clone(),
            FieldValue::Sequence(items) => items.join(", "),
        }
    }

    /// Comma-containing items are split, pieces trimmed, blanks dropped.
    pub fn into_sequence(self) -> Vec<String> {
        let items = match self {
            FieldValue::Scalar(s) => vec![s],
            FieldValue::Sequence(items) => items,
        };
        items
            .iter()
            .flat_map(|item| item.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read-only view over a record's field map.
#[derive(Clone, Copy)]
pub struct Fields<'a>(pub &'a Map<String, Value>);

impl<'a> Fields<'a> {
    /// First present, non-empty value among `names`.
    pub fn value(&self, names: &[&str]) -> Option<FieldValue> {
        names
            .iter()
            .filter_map(|name| self.0.get(*name))
            .find_map(FieldValue::from_json)
    }

    /// Join mode: lists become one `", "`-separated string; missing is `""`.
    pub fn joined(&self, names: &[&str]) -> String {
        self.value(names).map(|v| v.joined()).unwrap_or_default()
    }

    /// Sequence mode: ordered, comma-flattened strings; missing is empty.
    pub fn sequence(&self, names: &[&str]) -> Vec<String> {
        self.value(names)
            .map(FieldValue::into_sequence)
            .unwrap_or_default()
    }

    /// URL of the first attachment descriptor among `names`; empty fields are skipped.
    pub fn attachment_url(&self, names: &[&str]) -> Option<String> {
        names
            .iter()
            .find_map(|name| self.0.get(*name).and_then(first_attachment_url))
    }

    /// Numeric field (numbers or numeric strings); 0 when absent.
    pub fn number(&self, names: &[&str]) -> f64 {
        names
            .iter()
            .filter_map(|name| self.0.get(*name))
            .find_map(|v| match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            })
            .unwrap_or(0.0)
    }

    /// Checkbox field; absent means unchecked.
    pub fn flag(&self, names: &[&str]) -> bool {
        names
            .iter()
            .filter_map(|name| self.0.get(*name))
            .any(|v| match v {
                Value::Bool(b) => *b,
                Value::String(s) => {
                    matches!(s.trim().to_lowercase().as_str(), "true" | "yes" | "checked")
                }
                _ => false,
            })
    }
}

/// Attachment fields are arrays of `{ "url": ..., ... }` descriptors.
pub fn first_attachment_url(value: &Value) -> Option<String> {
    value
        .as_array()?
        .first()?
        .get("url")?
        .as_str()
        .map(str::to_string)
}
