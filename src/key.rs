use std::fmt;
use std::ops::{Range, RangeFull, RangeInclusive};

use regex::Regex;

use crate::collection::Collection;
use crate::search::Search;
use crate::traits::Matcher;
use crate::value::Value;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A classified bracket-access key, as accepted by
/// [`Collection::get`](crate::Collection::get).
///
/// Most callers never name this type — `get` takes `impl Into<Key<R>>` and
/// conversions exist for the natural key shapes:
///
/// | You pass                    | Classified as             | Resolved by            |
/// |-----------------------------|---------------------------|------------------------|
/// | integer (may be negative)   | `Index`                   | native positional access |
/// | integer range               | `Range`                   | native slice access    |
/// | `&str` / `String` / `Value` | `Scalar`                  | default finders        |
/// | [`Regex`]                   | `Pattern`                 | default finders        |
/// | [`Search`]                  | `Search`                  | `find_by`              |
/// | [`Key::matching`]           | `Matching`                | `find_by` (whole record) |
/// | one-element array `[key]`   | `All` — return every match | plural form of the above |
///
/// Native positional keys always win; query classification only applies to
/// keys a sequence cannot resolve.
pub enum Key<R> {
    /// A positional index. Negative values count from the end.
    Index(i64),

    /// A positional range. Endpoints may be negative; out-of-bounds ranges
    /// are clamped rather than rejected.
    Range {
        start: i64,
        end: i64,
        inclusive: bool,
    },

    /// A bare scalar, resolved through the default finders by equality.
    Scalar(Value),

    /// A pattern, resolved through the default finders against
    /// string-coerced values.
    Pattern(Regex),

    /// An explicit attribute → expected-value specification.
    Search(Search),

    /// A whole-record matcher. Never routed through the default finders.
    Matching(Box<dyn Matcher<R>>),

    /// A wrapped key requesting **all** matches instead of the first.
    All(Box<Key<R>>),
}

impl<R> Key<R> {
    /// Wrap a whole-record matcher (usually a closure) as a key.
    ///
    /// ```rust,ignore
    /// let hit = pages.get(Key::matching(|p: &Page| p.uri.starts_with("/users")))?;
    /// ```
    pub fn matching(matcher: impl Matcher<R> + 'static) -> Self {
        Self::Matching(Box::new(matcher))
    }

    /// A short human description, used in `UnsupportedKey` errors.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Index(i) => format!("index {i}"),
            Self::Range { start, end, inclusive } => {
                if *inclusive {
                    format!("range {start}..={end}")
                } else {
                    format!("range {start}..{end}")
                }
            }
            Self::Scalar(value) => format!("{} `{value}`", value.type_name()),
            Self::Pattern(pattern) => format!("pattern /{pattern}/"),
            Self::Search(_) => "search".to_string(),
            Self::Matching(_) => "matcher".to_string(),
            Self::All(inner) => format!("[{}]", inner.describe()),
        }
    }
}

impl<R> fmt::Debug for Key<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({})", self.describe())
    }
}

// ── Conversions: positional keys ──────────────────────────────────────────

macro_rules! positional_keys {
    ($($t:ty),*) => {
        $(
            impl<R> From<$t> for Key<R> {
                fn from(index: $t) -> Self {
                    Key::Index(index as i64)
                }
            }

            impl<R> From<Range<$t>> for Key<R> {
                fn from(range: Range<$t>) -> Self {
                    Key::Range {
                        start: range.start as i64,
                        end: range.end as i64,
                        inclusive: false,
                    }
                }
            }

            impl<R> From<RangeInclusive<$t>> for Key<R> {
                fn from(range: RangeInclusive<$t>) -> Self {
                    Key::Range {
                        start: *range.start() as i64,
                        end: *range.end() as i64,
                        inclusive: true,
                    }
                }
            }
        )*
    };
}

positional_keys!(i32, i64, usize);

impl<R> From<RangeFull> for Key<R> {
    fn from(_: RangeFull) -> Self {
        Key::Range {
            start: 0,
            end: i64::MAX,
            inclusive: false,
        }
    }
}

// ── Conversions: query keys ───────────────────────────────────────────────

impl<R> From<&str> for Key<R> {
    fn from(key: &str) -> Self {
        Key::Scalar(key.into())
    }
}

impl<R> From<String> for Key<R> {
    fn from(key: String) -> Self {
        Key::Scalar(key.into())
    }
}

impl<R> From<Value> for Key<R> {
    fn from(key: Value) -> Self {
        Key::Scalar(key)
    }
}

impl<R> From<Regex> for Key<R> {
    fn from(pattern: Regex) -> Self {
        Key::Pattern(pattern)
    }
}

impl<R> From<Search> for Key<R> {
    fn from(search: Search) -> Self {
        Key::Search(search)
    }
}

/// A one-element array wraps its inner key as a "return all matches" request:
/// `pages.get(["page_1"])`, `pages.get([regex])`, `pages.get([search])`.
impl<R, K: Into<Key<R>>> From<[K; 1]> for Key<R> {
    fn from([inner]: [K; 1]) -> Self {
        Key::All(Box::new(inner.into()))
    }
}

// ---------------------------------------------------------------------------
// Answer
// ---------------------------------------------------------------------------

/// The outcome of a bracket access or dynamic query.
///
/// Singular lookups answer `One` (with `None` for a clean miss), plural
/// lookups answer `Many` (empty for a clean miss — never an error), and the
/// `?`-suffixed dynamic form answers `Exists`.
#[derive(Debug)]
pub enum Answer<'a, R> {
    /// The first matching record, if any.
    One(Option<&'a R>),

    /// Every matching record, carrying the source's default finders.
    Many(Collection<R>),

    /// Whether a match exists (the `name?` dynamic form).
    Exists(bool),
}

impl<'a, R> Answer<'a, R> {
    /// The single matched record, or `None` for a miss or a non-singular
    /// answer.
    pub fn single(self) -> Option<&'a R> {
        match self {
            Self::One(record) => record,
            _ => None,
        }
    }

    /// The matched collection, or `None` for a non-plural answer.
    pub fn all(self) -> Option<Collection<R>> {
        match self {
            Self::Many(collection) => Some(collection),
            _ => None,
        }
    }

    /// Whether anything matched, across all three answer shapes.
    pub fn found(&self) -> bool {
        match self {
            Self::One(record) => record.is_some(),
            Self::Many(collection) => !collection.is_empty(),
            Self::Exists(found) => *found,
        }
    }
}
