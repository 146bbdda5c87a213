use std::ops::{Deref, DerefMut};

use crate::error::QueryError;
use crate::key::{Answer, Key};
use crate::search::Expected;
use crate::traits::{Matcher, Record};
use crate::value::Value;

/// Raised by the default-finder helpers when no finders are configured.
/// Callers translate it: bracket access surfaces `UnsupportedKey`, dynamic
/// dispatch surfaces `UnrecognizedMethod`.
pub(crate) struct NoDefaultFinders;

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// An ordered collection of records sharing an attribute surface, queryable
/// without writing explicit predicates.
///
/// A `Collection` is a thin layer over `Vec<R>` — it derefs to the vector, so
/// the entire native sequence surface (`len`, iteration, `push`, positional
/// `[usize]` indexing) is inherited rather than reimplemented. On top of that
/// it adds:
///
/// - [`find_by`](Collection::find_by) / [`find_all`](Collection::find_all) —
///   first-match and all-matches scans over any [`Matcher`];
/// - [`get`](Collection::get) — the bracket accessor, which tries native
///   positional access first and reclassifies non-positional keys as queries;
/// - **default finders** — attribute names consulted in priority order when a
///   key is a bare scalar or pattern rather than an explicit search;
/// - [`query`](Collection::query) / [`responds_to`](Collection::responds_to)
///   — the dynamic method-name surface (`find_by_x_and_y`, bare names,
///   `name?`, `name!`).
///
/// Query operations never mutate the source; the collections they return
/// carry the source's default-finder configuration forward.
///
/// # Example
///
/// ```rust
/// use quarry::{Collection, Record, Value};
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Page {
///     uri: &'static str,
///     name: &'static str,
/// }
///
/// impl Record for Page {
///     fn get(&self, attribute: &str) -> Option<Value> {
///         match attribute {
///             "uri" => Some(self.uri.into()),
///             "name" => Some(self.name.into()),
///             _ => None,
///         }
///     }
/// }
///
/// let pages = Collection::with_default_finders(
///     [
///         Page { uri: "/", name: "Home" },
///         Page { uri: "/about", name: "About" },
///     ],
///     ["uri", "name"],
/// );
///
/// // Native access
/// assert_eq!(pages[0].name, "Home");
///
/// // Scalar keys consult the default finders in order
/// assert_eq!(pages.get("/about").unwrap().single().map(|p| p.name), Some("About"));
/// assert_eq!(pages.get("missing").unwrap().single(), None);
/// ```
#[derive(Debug, Clone)]
pub struct Collection<R> {
    records: Vec<R>,
    default_finders: Vec<String>,
}

impl<R: Record> Collection<R> {
    // ── Construction ──────────────────────────────────────────────────────

    /// A collection with no default finders.
    ///
    /// Scalar and pattern keys are unsupported until finders are configured —
    /// [`get`](Collection::get) behaves like plain sequence access plus
    /// explicit searches.
    pub fn new(records: impl IntoIterator<Item = R>) -> Self {
        Self {
            records: records.into_iter().collect(),
            default_finders: Vec::new(),
        }
    }

    /// A collection with default-finder attributes, in priority order.
    ///
    /// Bare scalar and pattern keys try each finder in turn and stop at the
    /// first attribute that yields a match.
    pub fn with_default_finders<I, S>(records: impl IntoIterator<Item = R>, finders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            records: records.into_iter().collect(),
            default_finders: finders.into_iter().map(Into::into).collect(),
        }
    }

    /// The configured default-finder attribute names, in priority order.
    pub fn default_finders(&self) -> &[String] {
        &self.default_finders
    }

    /// Replace the default-finder configuration.
    pub fn set_default_finders<I, S>(&mut self, finders: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_finders = finders.into_iter().map(Into::into).collect();
    }

    // ── Search dispatch ───────────────────────────────────────────────────

    /// The first record matching `matcher`, in collection order.
    ///
    /// Accepts a [`Search`](crate::Search), `&Search`, or any
    /// `Fn(&R) -> bool` closure. A miss is `None`, never an error.
    pub fn find_by<M: Matcher<R>>(&self, matcher: M) -> Option<&R> {
        self.records.iter().find(|record| matcher.is_match(record))
    }

    /// Every record matching `matcher`, in original order, as a new
    /// collection carrying this collection's default finders.
    ///
    /// A miss is an empty collection. An empty [`Search`](crate::Search)
    /// matches everything, so `find_all(Search::new())` duplicates the
    /// collection.
    pub fn find_all<M: Matcher<R>>(&self, matcher: M) -> Collection<R>
    where
        R: Clone,
    {
        Collection {
            records: self
                .records
                .iter()
                .filter(|record| matcher.is_match(record))
                .cloned()
                .collect(),
            default_finders: self.default_finders.clone(),
        }
    }

    // ── Bracket accessor ──────────────────────────────────────────────────

    /// Look a key up, trying native positional access first and falling back
    /// to query access.
    ///
    /// Resolution order:
    ///
    /// 1. Integer and range keys are plain sequence access. Out-of-range
    ///    indexes answer `One(None)`; out-of-range slices clamp. Never an
    ///    error.
    /// 2. A one-element array `[key]` requests **all** matches of the inner
    ///    key: `Many` via [`find_all`](Collection::find_all) for searches and
    ///    matchers, or via the plural default-finder scan otherwise.
    /// 3. A [`Search`](crate::Search) key answers `One` via
    ///    [`find_by`](Collection::find_by); a [`Key::matching`] key is a
    ///    whole-record predicate, also `One` — neither consults the default
    ///    finders.
    /// 4. Scalar and pattern keys walk the default finders in priority order
    ///    and answer `One` with the first attribute's match.
    ///
    /// # Errors
    ///
    /// [`QueryError::UnsupportedKey`] when a scalar/pattern key arrives and
    /// no default finders are configured — collections without finders keep
    /// plain sequence semantics. A configured-but-unmatched key is a clean
    /// miss (`One(None)` or empty `Many`), not an error.
    pub fn get(&self, key: impl Into<Key<R>>) -> Result<Answer<'_, R>, QueryError>
    where
        R: Clone,
    {
        match key.into() {
            Key::Index(index) => Ok(Answer::One(
                self.locate(index).map(|position| &self.records[position]),
            )),

            Key::Range {
                start,
                end,
                inclusive,
            } => Ok(Answer::Many(self.slice(start, end, inclusive))),

            Key::Search(search) => Ok(Answer::One(self.find_by(search))),

            // A lone matcher is a whole-record predicate, not a
            // default-finder lookup.
            Key::Matching(matcher) => {
                Ok(Answer::One(self.find_by(|record: &R| matcher.is_match(record))))
            }

            Key::Scalar(value) => {
                let description = Key::<R>::Scalar(value.clone()).describe();
                match self.default_one(&Expected::Literal(value)) {
                    Ok(hit) => Ok(Answer::One(hit)),
                    Err(NoDefaultFinders) => Err(QueryError::UnsupportedKey(description)),
                }
            }

            Key::Pattern(pattern) => {
                let description = format!("pattern /{pattern}/");
                match self.default_one(&Expected::Pattern(pattern)) {
                    Ok(hit) => Ok(Answer::One(hit)),
                    Err(NoDefaultFinders) => Err(QueryError::UnsupportedKey(description)),
                }
            }

            Key::All(inner) => self.get_all(*inner),
        }
    }

    /// Resolve the inner key of a wrapped `[key]` request.
    fn get_all(&self, inner: Key<R>) -> Result<Answer<'_, R>, QueryError>
    where
        R: Clone,
    {
        match inner {
            Key::Search(search) => Ok(Answer::Many(self.find_all(search))),

            Key::Matching(matcher) => {
                Ok(Answer::Many(self.find_all(|record: &R| matcher.is_match(record))))
            }

            // A wrapped integer is a literal value, not a position —
            // positions only resolve natively at the top level.
            Key::Index(index) => self.all_or_unsupported(Value::Int(index)),

            Key::Scalar(value) => self.all_or_unsupported(value),

            Key::Pattern(pattern) => {
                let description = format!("[pattern /{pattern}/]");
                match self.default_all(&Expected::Pattern(pattern)) {
                    Ok(found) => Ok(Answer::Many(found)),
                    Err(NoDefaultFinders) => Err(QueryError::UnsupportedKey(description)),
                }
            }

            other @ (Key::Range { .. } | Key::All(_)) => Err(QueryError::UnsupportedKey(
                Key::All(Box::new(other)).describe(),
            )),
        }
    }

    fn all_or_unsupported(&self, value: Value) -> Result<Answer<'_, R>, QueryError>
    where
        R: Clone,
    {
        let description = format!("[{} `{value}`]", value.type_name());
        match self.default_all(&Expected::Literal(value)) {
            Ok(found) => Ok(Answer::Many(found)),
            Err(NoDefaultFinders) => Err(QueryError::UnsupportedKey(description)),
        }
    }

    // ── Default-finder index ──────────────────────────────────────────────

    /// Singular default-finder scan: try each configured attribute in order
    /// and return the first attribute's first match. Early exit — this is a
    /// priority search, not an aggregate across attributes.
    pub(crate) fn default_one(
        &self,
        expected: &Expected,
    ) -> Result<Option<&R>, NoDefaultFinders> {
        if self.default_finders.is_empty() {
            return Err(NoDefaultFinders);
        }
        for attribute in &self.default_finders {
            let hit = self
                .records
                .iter()
                .find(|record| expected.is_match(record.get(attribute).as_ref()));
            if hit.is_some() {
                return Ok(hit);
            }
        }
        Ok(None)
    }

    /// Plural default-finder scan: the first configured attribute with any
    /// matches wins, and all of its matches are returned.
    fn default_all(&self, expected: &Expected) -> Result<Collection<R>, NoDefaultFinders>
    where
        R: Clone,
    {
        if self.default_finders.is_empty() {
            return Err(NoDefaultFinders);
        }
        for attribute in &self.default_finders {
            let found =
                self.find_all(|record: &R| expected.is_match(record.get(attribute).as_ref()));
            if !found.is_empty() {
                return Ok(found);
            }
        }
        Ok(Collection {
            records: Vec::new(),
            default_finders: self.default_finders.clone(),
        })
    }

    // ── Native positional access ──────────────────────────────────────────

    /// Resolve a possibly-negative index to a position, or `None` when out
    /// of range.
    fn locate(&self, index: i64) -> Option<usize> {
        let len = self.records.len();
        if index < 0 {
            len.checked_sub(index.unsigned_abs() as usize)
        } else {
            let position = index as usize;
            (position < len).then_some(position)
        }
    }

    /// Slice by a possibly-negative, possibly-out-of-bounds range. Endpoints
    /// clamp to the collection bounds; a disjoint range is an empty result.
    fn slice(&self, start: i64, end: i64, inclusive: bool) -> Collection<R>
    where
        R: Clone,
    {
        let len = self.records.len() as i64;
        let start = if start < 0 { start + len } else { start };
        let end = if end < 0 { end + len } else { end };
        let end = if inclusive { end.saturating_add(1) } else { end };

        let start = start.clamp(0, len) as usize;
        let end = end.clamp(start as i64, len) as usize;

        Collection {
            records: self.records[start..end].to_vec(),
            default_finders: self.default_finders.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Native sequence surface
// ---------------------------------------------------------------------------

// The underlying sequence type is extended, not reimplemented: deref hands
// callers the whole Vec API, including in-place mutation. Default finders
// live outside the Vec and are untouched by it.

impl<R> Deref for Collection<R> {
    type Target = Vec<R>;

    fn deref(&self) -> &Vec<R> {
        &self.records
    }
}

impl<R> DerefMut for Collection<R> {
    fn deref_mut(&mut self) -> &mut Vec<R> {
        &mut self.records
    }
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            default_finders: Vec::new(),
        }
    }
}

impl<R> IntoIterator for Collection<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a, R> IntoIterator for &'a Collection<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<R> FromIterator<R> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
            default_finders: Vec::new(),
        }
    }
}

impl<R> Extend<R> for Collection<R> {
    fn extend<I: IntoIterator<Item = R>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

// Equality is record equality. Default finders are configuration, not
// identity — two collections holding the same records compare equal even
// when configured differently.

impl<R: PartialEq> PartialEq for Collection<R> {
    fn eq(&self, other: &Self) -> bool {
        self.records == other.records
    }
}

impl<R: PartialEq> PartialEq<Vec<R>> for Collection<R> {
    fn eq(&self, other: &Vec<R>) -> bool {
        self.records == *other
    }
}
