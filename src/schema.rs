//! Structural validation and default-filling for untyped JSON.
//!
//! A [`Shape`] describes what a JSON document must look like. Validating a
//! value against a shape either yields a normalized copy with every missing
//! optional field filled in from its declared default, or a [`SchemaError`]
//! naming the first field that did not match.
//!
//! All record shapes used by the data layer are declared at the bottom of
//! this module so that their defaults live in one place.

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use thiserror::Error;

/// First violation found while validating a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at '{path}': expected {expected}")]
pub struct SchemaError {
    /// Dotted path to the offending field, e.g. `associations[0].display`
    pub path: String,
    /// Human-readable description of what was expected there
    pub expected: String,
}

impl SchemaError {
    fn new(path: &str, expected: impl Into<String>) -> Self {
        Self {
            path: if path.is_empty() { "(root)".to_string() } else { path.to_string() },
            expected: expected.into(),
        }
    }
}

/// Declared shape of a JSON value
#[derive(Debug, Clone)]
pub enum Shape {
    String,
    Integer,
    Number,
    Bool,
    /// Anything at all, passed through untouched
    Any,
    /// A string that must be one of the listed values
    Enum(&'static [&'static str]),
    Array(Box<Shape>),
    /// An object with arbitrary keys whose values all share one shape
    Record(Box<Shape>),
    /// An object with known fields. Strict objects reject unknown keys,
    /// non-strict objects pass them through.
    Object { fields: Vec<Field>, strict: bool },
}

/// One field of an object shape
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub shape: Shape,
    pub default: Option<fn() -> Value>,
}

impl Field {
    pub fn required(name: &'static str, shape: Shape) -> Self {
        Self { name, shape, default: None }
    }

    pub fn defaulted(name: &'static str, shape: Shape, default: fn() -> Value) -> Self {
        Self { name, shape, default: Some(default) }
    }
}

pub fn array(item: Shape) -> Shape {
    Shape::Array(Box::new(item))
}

pub fn record(value: Shape) -> Shape {
    Shape::Record(Box::new(value))
}

/// Object that rejects keys it does not declare
pub fn object(fields: Vec<Field>) -> Shape {
    Shape::Object { fields, strict: true }
}

/// Object that tolerates (and keeps) keys it does not declare
pub fn open_object(fields: Vec<Field>) -> Shape {
    Shape::Object { fields, strict: false }
}

impl Shape {
    /// Validate `value`, returning a normalized copy with defaults applied
    pub fn validate(&self, value: &Value) -> Result<Value, SchemaError> {
        self.check(value, "")
    }

    /// Validate `value` and deserialize the normalized result into `T`
    pub fn parse<T: DeserializeOwned>(&self, value: &Value) -> Result<T, SchemaError> {
        let normalized = self.validate(value)?;
        serde_json::from_value(normalized).map_err(|e| SchemaError::new("", e.to_string()))
    }

    fn check(&self, value: &Value, path: &str) -> Result<Value, SchemaError> {
        match self {
            Shape::Any => Ok(value.clone()),
            Shape::String if value.is_string() => Ok(value.clone()),
            Shape::Bool if value.is_boolean() => Ok(value.clone()),
            Shape::Number if value.is_number() => Ok(value.clone()),
            Shape::Integer if value.is_i64() || value.is_u64() => Ok(value.clone()),
            Shape::Enum(options) => match value.as_str() {
                Some(s) if options.contains(&s) => Ok(value.clone()),
                _ => Err(SchemaError::new(path, self.describe())),
            },
            Shape::Array(item) => {
                let items = value
                    .as_array()
                    .ok_or_else(|| SchemaError::new(path, self.describe()))?;
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| item.check(v, &format!("{}[{}]", path, i)))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Shape::Record(inner) => {
                let map = value
                    .as_object()
                    .ok_or_else(|| SchemaError::new(path, self.describe()))?;
                let mut out = Map::new();
                for (key, v) in map {
                    out.insert(key.clone(), inner.check(v, &join(path, key))?);
                }
                Ok(Value::Object(out))
            }
            Shape::Object { fields, strict } => {
                let map = value
                    .as_object()
                    .ok_or_else(|| SchemaError::new(path, self.describe()))?;
                let mut out = Map::new();
                for field in fields {
                    let field_path = join(path, field.name);
                    match (map.get(field.name), field.default) {
                        (Some(v), _) => {
                            out.insert(field.name.to_string(), field.shape.check(v, &field_path)?);
                        }
                        (None, Some(default)) => {
                            out.insert(field.name.to_string(), default());
                        }
                        (None, None) => {
                            return Err(SchemaError::new(&field_path, field.shape.describe()));
                        }
                    }
                }
                for (key, v) in map {
                    if fields.iter().any(|f| f.name == key) {
                        continue;
                    }
                    if *strict {
                        return Err(SchemaError::new(&join(path, key), "no such field"));
                    }
                    out.insert(key.clone(), v.clone());
                }
                Ok(Value::Object(out))
            }
            _ => Err(SchemaError::new(path, self.describe())),
        }
    }

    fn describe(&self) -> String {
        match self {
            Shape::String => "a string".to_string(),
            Shape::Integer => "an integer".to_string(),
            Shape::Number => "a number".to_string(),
            Shape::Bool => "a boolean".to_string(),
            Shape::Any => "any value".to_string(),
            Shape::Enum(options) => format!("one of {}", options.join(", ")),
            Shape::Array(item) => format!("an array of {}", item.describe()),
            Shape::Record(value) => format!("an object of {}", value.describe()),
            Shape::Object { .. } => "an object".to_string(),
        }
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn empty_array() -> Value {
    json!([])
}

fn empty_object() -> Value {
    json!({})
}

const ASSOCIATION_DISPLAY: &[&str] = &["chip", "card"];
const CLASSIFIER_VISIBILITY: &[&str] = &["visible", "unlisted"];

/// `config.json` at the top of the data root
pub static PORTFOLIO_CONFIG: Lazy<Shape> =
    Lazy::new(|| object(vec![Field::required("name", Shape::String)]));

/// Brief projection of a group's `info.json`
pub static GROUP_BRIEF: Lazy<Shape> = Lazy::new(|| {
    open_object(vec![
        Field::required("name", Shape::String),
        Field::required("description", Shape::String),
        Field::required("color", Shape::String),
    ])
});

/// A group's `info.json`
pub static GROUP_INFO: Lazy<Shape> = Lazy::new(|| {
    let association = object(vec![
        Field::required("group", Shape::String),
        Field::required("title", Shape::String),
        Field::required("display", Shape::Enum(ASSOCIATION_DISPLAY)),
    ]);
    open_object(vec![
        Field::required("name", Shape::String),
        Field::required("description", Shape::String),
        Field::required("color", Shape::String),
        Field::defaulted("filterGroups", array(Shape::String), empty_array),
        Field::defaulted("associations", array(association), empty_array),
        Field::defaulted("listedItems", array(Shape::String), empty_array),
    ])
});

/// A classifier's `info.json`
pub static CLASSIFIER_INFO: Lazy<Shape> = Lazy::new(|| {
    let association = object(vec![
        Field::required("title", Shape::String),
        Field::required("display", Shape::Enum(ASSOCIATION_DISPLAY)),
        Field::defaulted("reverseLookup", Shape::Bool, || json!(false)),
    ]);
    object(vec![
        Field::required("name", Shape::String),
        Field::required("description", Shape::String),
        Field::required("color", Shape::String),
        Field::defaulted("sort", Shape::Integer, || json!(0)),
        Field::defaulted("filterClassifiers", array(Shape::String), empty_array),
        Field::defaulted("visibility", Shape::Enum(CLASSIFIER_VISIBILITY), || json!("visible")),
        Field::defaulted("associations", record(association), empty_object),
        Field::defaulted("extras", record(Shape::Any), empty_object),
    ])
});
