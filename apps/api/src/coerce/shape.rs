//! Schema descriptors and the permissive validator backing coercion.
//!
//! A `Shape` names the keys a completion must carry and the type each value
//! must have. The validator is deliberately tolerant: over-long arrays are
//! truncated rather than rejected, and keys the shape does not declare are
//! left in place untouched. Failures come back as a structured list of
//! violations so callers (and tests) can see exactly what was wrong.

use serde_json::Value;
use std::fmt;

/// Type expected for a single field value.
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Array {
        elem: Box<FieldType>,
        /// Arrays longer than this are truncated from the front, not rejected.
        max_len: Option<usize>,
    },
    Record(Vec<FieldSpec>),
}

impl FieldType {
    pub fn array_of(elem: FieldType) -> Self {
        FieldType::Array {
            elem: Box::new(elem),
            max_len: None,
        }
    }

    pub fn array_capped(elem: FieldType, max_len: usize) -> Self {
        FieldType::Array {
            elem: Box::new(elem),
            max_len: Some(max_len),
        }
    }

    pub fn record(fields: Vec<FieldSpec>) -> Self {
        FieldType::Record(fields)
    }

    fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Array { .. } => "array",
            FieldType::Record(_) => "record",
        }
    }
}

/// A required, named, typed field inside a record.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
}

impl FieldSpec {
    pub fn new(name: &'static str, ty: FieldType) -> Self {
        Self { name, ty }
    }
}

/// Root schema: a record of required fields. Every caller of `coerce`
/// supplies one of these alongside a fallback payload that satisfies it.
#[derive(Debug, Clone)]
pub struct Shape {
    fields: Vec<FieldSpec>,
}

impl Shape {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// Validates `value` against the shape, normalizing as it goes.
    ///
    /// On success returns the (possibly truncated) value. On failure returns
    /// every violation found, not just the first.
    pub fn conform(&self, mut value: Value) -> Result<Value, Vec<Violation>> {
        let mut violations = Vec::new();
        conform_record(&mut value, &self.fields, "$", &mut violations);
        if violations.is_empty() {
            Ok(value)
        } else {
            Err(violations)
        }
    }
}

/// Why a value failed validation at a given path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    MissingKey,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: String,
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::MissingKey => write!(f, "{}: required key is missing", self.path),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{}: expected {expected}, found {found}", self.path)
            }
        }
    }
}

fn conform_record(
    value: &mut Value,
    fields: &[FieldSpec],
    path: &str,
    out: &mut Vec<Violation>,
) {
    let Some(map) = value.as_object_mut() else {
        out.push(Violation {
            path: path.to_string(),
            kind: ViolationKind::WrongType {
                expected: "record",
                found: json_type_name(value),
            },
        });
        return;
    };

    for field in fields {
        let child_path = format!("{path}.{}", field.name);
        match map.get_mut(field.name) {
            None => out.push(Violation {
                path: child_path,
                kind: ViolationKind::MissingKey,
            }),
            Some(child) => conform_value(child, &field.ty, &child_path, out),
        }
    }
    // Keys the shape does not declare stay in the map untouched.
}

fn conform_value(value: &mut Value, ty: &FieldType, path: &str, out: &mut Vec<Violation>) {
    match ty {
        FieldType::String if value.is_string() => {}
        FieldType::Number if value.is_number() => {}
        FieldType::Boolean if value.is_boolean() => {}
        FieldType::Array { elem, max_len } => {
            let Some(items) = value.as_array_mut() else {
                out.push(Violation {
                    path: path.to_string(),
                    kind: ViolationKind::WrongType {
                        expected: "array",
                        found: json_type_name(value),
                    },
                });
                return;
            };
            if let Some(max) = max_len {
                if items.len() > *max {
                    items.truncate(*max);
                }
            }
            for (i, item) in items.iter_mut().enumerate() {
                conform_value(item, elem, &format!("{path}[{i}]"), out);
            }
        }
        FieldType::Record(fields) => conform_record(value, fields, path, out),
        other => out.push(Violation {
            path: path.to_string(),
            kind: ViolationKind::WrongType {
                expected: other.name(),
                found: json_type_name(value),
            },
        }),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "record",
    }
}
