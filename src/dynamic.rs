use regex::Regex;

use crate::collection::Collection;
use crate::error::QueryError;
use crate::key::Answer;
use crate::search::{Expected, Search};
use crate::traits::Record;
use crate::value::Value;

// ---------------------------------------------------------------------------
// FinderName
// ---------------------------------------------------------------------------

/// Whether a finder name resolves the first match or every match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinderKind {
    /// `find_by_*` — first match.
    Single,

    /// `find_all_by_*` — every match.
    All,
}

/// The structured decomposition of a `find_by_*` / `find_all_by_*` method
/// name.
///
/// Parsed once per call from the raw name; not persisted. The grammar is
/// case-sensitive on the literal prefixes, and the attribute segment splits
/// on the literal `_and_`, left to right:
///
/// ```rust
/// use quarry::{FinderKind, FinderName};
///
/// let parsed = FinderName::parse("find_by_first_name_and_last_name").unwrap();
/// assert_eq!(parsed.kind, FinderKind::Single);
/// assert_eq!(parsed.attributes, ["first_name", "last_name"]);
///
/// assert!(FinderName::parse("find_all_by_city").is_some());
/// assert!(FinderName::parse("find_by_name_or_age").is_some()); // one attribute: "name_or_age"
/// assert!(FinderName::parse("find_first_by_name").is_none());
/// assert!(FinderName::parse("find_by").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinderName {
    /// Single (`find_by_*`) or plural (`find_all_by_*`).
    pub kind: FinderKind,

    /// The attribute names, in left-to-right order. Zipped positionally with
    /// the call's arguments as literal equality terms.
    pub attributes: Vec<String>,

    /// A trailing `!` was present. Recorded for completeness; carries no
    /// dispatch meaning on the finder-grammar path.
    pub exact: bool,

    /// A trailing `?` was present. Recorded for completeness; carries no
    /// dispatch meaning on the finder-grammar path.
    pub boolean: bool,
}

impl FinderName {
    /// Parse a dispatched method name against the finder grammar, or `None`
    /// when the name is not a finder.
    pub fn parse(method: &str) -> Option<Self> {
        let (kind, rest) = if let Some(rest) = method.strip_prefix("find_all_by_") {
            (FinderKind::All, rest)
        } else if let Some(rest) = method.strip_prefix("find_by_") {
            (FinderKind::Single, rest)
        } else {
            return None;
        };

        let (rest, modifier) = split_modifier(rest);
        if rest.is_empty() {
            return None;
        }

        Some(Self {
            kind,
            attributes: rest.split("_and_").map(str::to_string).collect(),
            exact: modifier == Some('!'),
            boolean: modifier == Some('?'),
        })
    }
}

/// Split a trailing `!` or `?` modifier off a method name.
fn split_modifier(method: &str) -> (&str, Option<char>) {
    if let Some(core) = method.strip_suffix('?') {
        (core, Some('?'))
    } else if let Some(core) = method.strip_suffix('!') {
        (core, Some('!'))
    } else {
        (method, None)
    }
}

/// The case-insensitive, unanchored pattern a bare method name matches with.
fn bare_pattern(token: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){}", regex::escape(token)))
}

// ---------------------------------------------------------------------------
// Dynamic dispatch
// ---------------------------------------------------------------------------

impl<R: Record> Collection<R> {
    /// Resolve a method-like lookup by name — the dynamic-dispatch face of
    /// the query layer.
    ///
    /// Two grammars are tried in order:
    ///
    /// **Finder grammar** — `find_by_<attrs>` / `find_all_by_<attrs>`, where
    /// `<attrs>` splits on `_and_` and zips positionally with `args` as
    /// literal equality terms. `find_by_*` answers `One`, `find_all_by_*`
    /// answers `Many`. Unknown attributes never match and produce a clean
    /// miss, not an error.
    ///
    /// **Bare-name path** — any other name is a default-finder lookup of the
    /// name itself (arguments are ignored):
    ///
    /// - `name` — case-insensitive pattern match of the token; answers `One`
    ///   on a hit, fails with `UnrecognizedMethod` on a miss.
    /// - `name!` — the token as a case-sensitive literal; same miss behavior.
    /// - `name?` — the pattern lookup as a boolean; answers
    ///   `Exists(true | false)` and never fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use quarry::{Answer, Collection, Value};
    ///
    /// let user = |name: &str| BTreeMap::from([("username".to_string(), Value::from(name))]);
    /// let users = Collection::with_default_finders([user("bob"), user("steve")], ["username"]);
    ///
    /// let bob = users.query("find_by_username", &["bob".into()]).unwrap();
    /// assert!(bob.found());
    ///
    /// assert!(users.query("BOB", &[]).unwrap().found());
    /// assert!(matches!(users.query("steve?", &[]).unwrap(), Answer::Exists(true)));
    /// assert!(users.query("missing", &[]).is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// [`QueryError::Arity`] when a finder's attribute count differs from
    /// `args.len()`; [`QueryError::UnrecognizedMethod`] when a bare name
    /// misses (or no default finders are configured).
    pub fn query<'a>(
        &'a self,
        method: &str,
        args: &[Value],
    ) -> Result<Answer<'a, R>, QueryError>
    where
        R: Clone,
    {
        if let Some(finder) = FinderName::parse(method) {
            if args.len() != finder.attributes.len() {
                return Err(QueryError::Arity {
                    method: method.to_string(),
                    expected: finder.attributes.len(),
                    got: args.len(),
                });
            }

            let mut search = Search::new();
            for (attribute, value) in finder.attributes.iter().zip(args) {
                search = search.attr(attribute.clone(), value.clone());
            }

            return Ok(match finder.kind {
                FinderKind::Single => Answer::One(self.find_by(search)),
                FinderKind::All => Answer::Many(self.find_all(search)),
            });
        }

        let (token, modifier) = split_modifier(method);
        if token.is_empty() {
            return if modifier == Some('?') {
                Ok(Answer::Exists(false))
            } else {
                Err(QueryError::UnrecognizedMethod(method.to_string()))
            };
        }

        // `name!` is exact; `name` and `name?` are case-insensitive patterns.
        let expected = match modifier {
            Some('!') => Expected::Literal(Value::Text(token.to_string())),
            _ => Expected::Pattern(bare_pattern(token)?),
        };

        let hit = self.default_one(&expected);

        if modifier == Some('?') {
            return Ok(Answer::Exists(matches!(hit, Ok(Some(_)))));
        }

        match hit {
            Ok(Some(record)) => Ok(Answer::One(Some(record))),
            _ => Err(QueryError::UnrecognizedMethod(method.to_string())),
        }
    }

    /// Whether [`query`](Collection::query) would recognize `method` —
    /// the reflection face, mirroring the same grammars without invoking
    /// anything.
    ///
    /// Finder-grammar names always respond; `?`-suffixed names always
    /// respond (they answer `Exists(false)` rather than failing); any other
    /// bare name responds only if the lookup would find a record. Probing
    /// failures count as "does not respond".
    pub fn responds_to(&self, method: &str) -> bool {
        if FinderName::parse(method).is_some() {
            return true;
        }

        let (token, modifier) = split_modifier(method);
        if modifier == Some('?') {
            return true;
        }
        if token.is_empty() {
            return false;
        }

        let expected = match modifier {
            Some('!') => Expected::Literal(Value::Text(token.to_string())),
            _ => match bare_pattern(token) {
                Ok(pattern) => Expected::Pattern(pattern),
                Err(_) => return false,
            },
        };

        matches!(self.default_one(&expected), Ok(Some(_)))
    }
}
