//! Conversions between Rust field types and [`Value`]s.
//!
//! Loading is lenient in one direction only: integers widen into floats, but
//! nothing else is coerced. A value that does not fit produces a
//! [`Mismatch`] and the field keeps what it had.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::path::PathBuf;

use indexmap::IndexMap;

use crate::value::Value;

/// Why a file value could not be stored in a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub expected: &'static str,
    pub found: String,
}

impl Mismatch {
    pub fn new(expected: &'static str, found: &Value) -> Self {
        Self {
            expected,
            found: found.type_name().to_string(),
        }
    }

    fn out_of_range(expected: &'static str, n: i64) -> Self {
        Self {
            expected,
            found: format!("out-of-range integer {n}"),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected {}, found {}", self.expected, self.found)
    }
}

impl std::error::Error for Mismatch {}

/// A type that can be bound to a single configuration key.
pub trait PropertyValue: Sized {
    fn to_value(&self) -> Value;

    fn from_value(value: &Value) -> Result<Self, Mismatch>;
}

impl PropertyValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        match value {
            Value::Bool(b) => Ok(*b),
            other => Err(Mismatch::new("boolean", other)),
        }
    }
}

macro_rules! integer_property {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn to_value(&self) -> Value {
                    match i64::try_from(*self) {
                        Ok(n) => Value::Integer(n),
                        Err(_) => {
                            tracing::warn!(value = %self, "integer exceeds i64 range, saving i64::MAX");
                            Value::Integer(i64::MAX)
                        }
                    }
                }

                fn from_value(value: &Value) -> Result<Self, Mismatch> {
                    match value {
                        Value::Integer(n) => {
                            <$ty>::try_from(*n).map_err(|_| Mismatch::out_of_range($name, *n))
                        }
                        other => Err(Mismatch::new($name, other)),
                    }
                }
            }
        )*
    };
}

integer_property! {
    i8 => "i8",
    i16 => "i16",
    i32 => "i32",
    i64 => "i64",
    isize => "isize",
    u8 => "u8",
    u16 => "u16",
    u32 => "u32",
    u64 => "u64",
    usize => "usize",
}

impl PropertyValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        match value {
            Value::Float(f) => Ok(*f),
            Value::Integer(n) => Ok(*n as f64),
            other => Err(Mismatch::new("float", other)),
        }
    }
}

impl PropertyValue for f32 {
    fn to_value(&self) -> Value {
        // Go through the shortest decimal form so 1.1f32 saves as 1.1, not 1.100000023841858.
        Value::Float(self.to_string().parse().unwrap_or(f64::from(*self)))
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        match value {
            Value::Float(f) => Ok(*f as f32),
            Value::Integer(n) => Ok(*n as f32),
            other => Err(Mismatch::new("float", other)),
        }
    }
}

impl PropertyValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(Mismatch::new("string", other)),
        }
    }
}

impl PropertyValue for PathBuf {
    fn to_value(&self) -> Value {
        Value::String(self.to_string_lossy().into_owned())
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        match value {
            Value::String(s) => Ok(PathBuf::from(s)),
            other => Err(Mismatch::new("path string", other)),
        }
    }
}

/// `None` saves as null; null loads as `None`.
impl<T: PropertyValue> PropertyValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: PropertyValue> PropertyValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(PropertyValue::to_value).collect())
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        match value {
            Value::List(items) => items.iter().map(T::from_value).collect(),
            other => Err(Mismatch::new("list", other)),
        }
    }
}

fn map_entries<T: PropertyValue, M: FromIterator<(String, T)>>(value: &Value) -> Result<M, Mismatch> {
    match value {
        Value::Map(map) => map
            .iter()
            .map(|(k, v)| T::from_value(v).map(|v| (k.clone(), v)))
            .collect(),
        other => Err(Mismatch::new("map", other)),
    }
}

impl<T: PropertyValue> PropertyValue for IndexMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        map_entries(value)
    }
}

impl<T: PropertyValue> PropertyValue for BTreeMap<String, T> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.clone(), v.to_value())).collect())
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        map_entries(value)
    }
}

/// Iteration order of a `HashMap` is unspecified, so keys are sorted on save
/// to keep the written file stable.
impl<T: PropertyValue, H: BuildHasher + Default> PropertyValue for HashMap<String, T, H> {
    fn to_value(&self) -> Value {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.clone(), v.to_value()))
                .collect(),
        )
    }

    fn from_value(value: &Value) -> Result<Self, Mismatch> {
        map_entries(value)
    }
}
