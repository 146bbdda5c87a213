use std::fmt;

use regex::Regex;

use crate::traits::{Matcher, Record};
use crate::value::Value;

// ---------------------------------------------------------------------------
// Expected
// ---------------------------------------------------------------------------

/// The expected-value slot of a single search term.
///
/// A closed variant rather than duck typing: each shape has one explicit
/// matching rule, dispatched in [`Expected::is_match`].
///
/// - `Literal` — value equality against the actual attribute value.
/// - `Pattern` — a [`Regex`] tested against the string-coerced actual value.
/// - `Predicate` — a caller-supplied check invoked with the actual value
///   (`None` when the record lacks the attribute). The only shape that can
///   match an absent attribute.
pub enum Expected {
    /// Match by value equality.
    Literal(Value),

    /// Match the string-coerced value against a pattern.
    Pattern(Regex),

    /// Match with an arbitrary check over the (possibly absent) value.
    Predicate(Box<dyn Fn(Option<&Value>) -> bool>),
}

impl Expected {
    /// Test this descriptor against an actual attribute value.
    ///
    /// `None` means the record has no such attribute — a non-match for
    /// literals and patterns, and whatever the predicate decides otherwise.
    pub fn is_match(&self, actual: Option<&Value>) -> bool {
        match self {
            Self::Literal(want) => actual.map_or(false, |value| value == want),
            Self::Pattern(pattern) => {
                actual.map_or(false, |value| pattern.is_match(&value.to_string()))
            }
            Self::Predicate(check) => check(actual),
        }
    }
}

impl fmt::Debug for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Pattern(pattern) => f.debug_tuple("Pattern").field(pattern).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

impl From<Value> for Expected {
    fn from(v: Value) -> Self {
        Self::Literal(v)
    }
}

impl From<Regex> for Expected {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

impl From<&str> for Expected {
    fn from(v: &str) -> Self {
        Self::Literal(v.into())
    }
}

impl From<String> for Expected {
    fn from(v: String) -> Self {
        Self::Literal(v.into())
    }
}

impl From<i32> for Expected {
    fn from(v: i32) -> Self {
        Self::Literal(v.into())
    }
}

impl From<i64> for Expected {
    fn from(v: i64) -> Self {
        Self::Literal(v.into())
    }
}

impl From<f64> for Expected {
    fn from(v: f64) -> Self {
        Self::Literal(v.into())
    }
}

impl From<bool> for Expected {
    fn from(v: bool) -> Self {
        Self::Literal(v.into())
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// An ordered attribute → expected-value specification.
///
/// Created via [`quarry::search()`](crate::search) or [`Search::new`], then
/// populated with chained [`attr`](Search::attr) calls. A record matches when
/// **every** term matches (logical AND, in insertion order). The empty search
/// matches every record — "no filter" means "match all", so
/// `find_all(Search::new())` duplicates a collection.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use quarry::{search, Collection, Value};
///
/// let page = |uri: &str, name: &str| {
///     BTreeMap::from([
///         ("uri".to_string(), Value::from(uri)),
///         ("name".to_string(), Value::from(name)),
///     ])
/// };
/// let pages = Collection::new([page("/", "Home"), page("/about", "About")]);
///
/// let home = pages.find_by(search().attr("uri", "/"));
/// assert_eq!(home.and_then(|p| p.get("name").cloned()), Some(Value::from("Home")));
///
/// let none = pages.find_by(search().attr("uri", "/").attr("name", "Typo"));
/// assert!(none.is_none());
/// ```
#[derive(Debug, Default)]
pub struct Search {
    terms: Vec<(String, Expected)>,
}

impl Search {
    /// An empty search, which matches every record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a term: `attribute` must equal (or pattern-match) `expected`.
    ///
    /// `expected` accepts literals (`&str`, `String`, integers, floats,
    /// bools, [`Value`]) and [`Regex`] patterns. For arbitrary checks use
    /// [`attr_with`](Search::attr_with).
    pub fn attr(mut self, attribute: impl Into<String>, expected: impl Into<Expected>) -> Self {
        self.terms.push((attribute.into(), expected.into()));
        self
    }

    /// Add a predicate term: `attribute`'s value (or `None` when absent) is
    /// passed to `check`, and `true` counts as a match.
    pub fn attr_with<F>(mut self, attribute: impl Into<String>, check: F) -> Self
    where
        F: Fn(Option<&Value>) -> bool + 'static,
    {
        self.terms
            .push((attribute.into(), Expected::Predicate(Box::new(check))));
        self
    }

    /// Whether this search has no terms (and therefore matches everything).
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// The terms in insertion order.
    pub fn terms(&self) -> impl Iterator<Item = (&str, &Expected)> {
        self.terms
            .iter()
            .map(|(attribute, expected)| (attribute.as_str(), expected))
    }
}

// The predicate builder: a Search *is* the record predicate. Missing
// attributes surface as `None` and fail to match rather than erroring.

impl<R: Record> Matcher<R> for Search {
    fn is_match(&self, record: &R) -> bool {
        self.terms
            .iter()
            .all(|(attribute, expected)| expected.is_match(record.get(attribute).as_ref()))
    }
}

impl<R: Record> Matcher<R> for &Search {
    fn is_match(&self, record: &R) -> bool {
        <Search as Matcher<R>>::is_match(self, record)
    }
}
