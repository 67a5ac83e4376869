use std::fmt;

use crate::group::Group;

/// Variant tag of a [`Data`], also used as the target of casts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Group,
    Integer,
    Float,
    Bool,
    String,
    /// No value. Data of this type is invalid.
    None,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Group => "Group",
            DataType::Integer => "Integer",
            DataType::Float => "Float",
            DataType::Bool => "Bool",
            DataType::String => "String",
            DataType::None => "None",
        };
        f.write_str(name)
    }
}

/// Payload of a [`Data`].
///
/// Cloning a `Value::Group` copies the group handle, not the group: both
/// values alias the same entries.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    Group(Group),
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    #[default]
    None,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Group(_) => DataType::Group,
            Value::Integer(_) => DataType::Integer,
            Value::Float(_) => DataType::Float,
            Value::Bool(_) => DataType::Bool,
            Value::String(_) => DataType::String,
            Value::None => DataType::None,
        }
    }
}

/// A runtime value together with its key.
///
/// An empty key makes the data anonymous. Data without a value is invalid and
/// is the in-band error signal between the builder and expressions: groups
/// silently refuse to store it.
///
/// # Examples
///
/// ```
/// use datalisp::{Data, DataType, Value};
///
/// let width = Data::new("width", Value::Integer(640));
/// assert_eq!(width.key(), "width");
/// assert_eq!(width.as_int(), Some(640));
/// assert!(width.is_number());
///
/// let nothing = Data::none();
/// assert!(!nothing.is_valid());
/// assert_eq!(nothing.data_type(), DataType::None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Data {
    key: String,
    value: Value,
}

impl Data {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Data {
            key: key.into(),
            value,
        }
    }

    /// Anonymous data holding `value`.
    pub fn anonymous(value: Value) -> Self {
        Data {
            key: String::new(),
            value,
        }
    }

    /// Invalid, anonymous data.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn group(group: Group) -> Self {
        Self::anonymous(Value::Group(group))
    }

    pub fn integer(n: i64) -> Self {
        Self::anonymous(Value::Integer(n))
    }

    pub fn float(n: f64) -> Self {
        Self::anonymous(Value::Float(n))
    }

    pub fn boolean(b: bool) -> Self {
        Self::anonymous(Value::Bool(b))
    }

    pub fn string(s: impl Into<String>) -> Self {
        Self::anonymous(Value::String(s.into()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn set_key(&mut self, key: impl Into<String>) {
        self.key = key.into();
    }

    /// Returns `self` with its key replaced.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn is_anonymous(&self) -> bool {
        self.key.is_empty()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self.value, Value::None)
    }

    /// Integer or float.
    pub fn is_number(&self) -> bool {
        matches!(self.value, Value::Integer(_) | Value::Float(_))
    }

    pub fn as_group(&self) -> Option<&Group> {
        match &self.value {
            Value::Group(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.value {
            Value::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self.value {
            Value::Float(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer or float value widened to a float.
    pub fn number(&self) -> Option<f64> {
        match self.value {
            Value::Integer(n) => Some(n as f64),
            Value::Float(n) => Some(n),
            _ => None,
        }
    }

    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    pub fn set_group(&mut self, group: Group) {
        self.value = Value::Group(group);
    }

    pub fn set_int(&mut self, n: i64) {
        self.value = Value::Integer(n);
    }

    pub fn set_float(&mut self, n: f64) {
        self.value = Value::Float(n);
    }

    pub fn set_bool(&mut self, b: bool) {
        self.value = Value::Bool(b);
    }

    pub fn set_string(&mut self, s: impl Into<String>) {
        self.value = Value::String(s.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_replace_variant() {
        let mut data = Data::new("x", Value::Integer(1));
        data.set_string("one");
        assert_eq!(data.data_type(), DataType::String);
        assert_eq!(data.as_int(), None);
        assert_eq!(data.as_str(), Some("one"));
        assert_eq!(data.key(), "x");
    }

    #[test]
    fn test_number_widening() {
        assert_eq!(Data::integer(3).number(), Some(3.0));
        assert_eq!(Data::float(0.5).number(), Some(0.5));
        assert_eq!(Data::boolean(true).number(), None);
        assert!(!Data::string("1").is_number());
    }
}
