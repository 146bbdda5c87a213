use thiserror::Error;

#[derive(Error, Debug)]
pub enum QueryError {
    // Bracket access
    #[error("unsupported key: {0}")]
    UnsupportedKey(String),

    // Dynamic dispatch
    #[error("unrecognized method `{0}`")]
    UnrecognizedMethod(String),

    #[error("`{method}` expects {expected} argument(s), got {got}")]
    Arity {
        method: String,
        expected: usize,
        got: usize,
    },

    // Pattern construction
    #[error("invalid pattern")]
    InvalidPattern(#[from] regex::Error),
}

impl QueryError {
    /// The dispatched method name this error refers to, if applicable.
    /// Callers use this to report "no method `<name>`" without pattern
    /// matching on variants.
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::UnrecognizedMethod(method) | Self::Arity { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Whether this error means the key or name could not be classified at
    /// all, as opposed to a malformed pattern or a bad argument list.
    ///
    /// A non-match is never an error — singular misses answer `One(None)`,
    /// plural misses answer an empty collection, and `name?` answers
    /// `Exists(false)`. Errors only mark lookups the collection cannot
    /// resolve in principle.
    pub fn is_unresolvable(&self) -> bool {
        matches!(self, Self::UnsupportedKey(_) | Self::UnrecognizedMethod(_))
    }
}
