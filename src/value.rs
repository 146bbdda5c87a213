use std::fmt;

/// A scalar attribute value produced by a [`Record`](crate::traits::Record).
///
/// Intentionally small — four scalar shapes cover the attribute surfaces this
/// crate queries. Absence is not a variant: a missing attribute is the `None`
/// side of `Record::get`, and matching treats it as a plain non-match.
///
/// Equality coerces across `Int` and `Float` (so `Value::from(1)` equals
/// `Value::from(1.0)`), mirroring the loose host-level equality the query
/// semantics were defined against. [`fmt::Display`] is the string coercion
/// used when a pattern is tested against a value.
#[derive(Debug, Clone)]
pub enum Value {
    /// A signed integer.
    Int(i64),

    /// A floating-point number.
    Float(f64),

    /// A string.
    Text(String),

    /// A boolean.
    Bool(bool),
}

impl Value {
    /// A short name for the value's shape, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
        }
    }

    /// Borrow the text content, if this is a `Text` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            // Cross-numeric coercion
            (Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => *a as f64 == *b,
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}
