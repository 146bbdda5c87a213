//! # quarry
//!
//! Attribute-based queries over ordered record collections — generic,
//! embeddable, zero opinions.
//!
//! quarry is a query layer, not a database: given an ordered collection
//! whose elements share an attribute surface, it resolves attribute-based
//! lookups without callers writing explicit predicates. It owns the
//! contracts ([`Record`], [`Matcher`]), the search model ([`Search`],
//! [`Expected`]), the bracket accessor ([`Collection::get`]) and the
//! dynamic-name grammar ([`Collection::query`]). It does **not** own the
//! records themselves, indexing, or query planning — every lookup is a
//! linear scan in collection order.
//!
//! # Quick Start
//!
//! ```rust
//! use quarry::{search, Answer, Collection, Record, Value};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Page {
//!     uri: &'static str,
//!     name: &'static str,
//! }
//!
//! impl Record for Page {
//!     fn get(&self, attribute: &str) -> Option<Value> {
//!         match attribute {
//!             "uri" => Some(self.uri.into()),
//!             "name" => Some(self.name.into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! let pages = Collection::with_default_finders(
//!     [
//!         Page { uri: "/", name: "Home" },
//!         Page { uri: "/about", name: "About" },
//!     ],
//!     ["uri", "name"],
//! );
//!
//! // Native positional access still works — out of range is a miss, not an error
//! assert_eq!(pages.get(0).unwrap().single().map(|p| p.name), Some("Home"));
//! assert_eq!(pages.get(99).unwrap().single(), None);
//!
//! // Bare keys consult the default finders in priority order
//! assert_eq!(pages.get("/about").unwrap().single().map(|p| p.name), Some("About"));
//!
//! // Explicit searches name their attributes
//! let home = pages.find_by(search().attr("uri", "/").attr("name", "Home"));
//! assert!(home.is_some());
//!
//! // A one-element array asks for every match
//! let all = pages.get([search().attr("name", "About")]).unwrap().all().unwrap();
//! assert_eq!(all.len(), 1);
//!
//! // Dynamic method-style lookups
//! assert!(pages.query("find_by_name", &["Home".into()]).unwrap().found());
//! assert!(matches!(pages.query("about?", &[]).unwrap(), Answer::Exists(true)));
//! ```
//!
//! # Records and Matchers
//!
//! Implement [`Record`] to expose an attribute surface — a missing attribute
//! is `None` and silently fails to match, never raising. The std map types
//! already implement it, which keeps fixtures short:
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use quarry::{Collection, Value};
//!
//! let user = |name: &str, age: i64| {
//!     BTreeMap::from([
//!         ("name".to_string(), Value::from(name)),
//!         ("age".to_string(), Value::from(age)),
//!     ])
//! };
//! let users = Collection::new([user("bob", 23), user("steve", 29)]);
//!
//! // Any closure over a record is a Matcher
//! let under_25 = users.find_all(|u: &BTreeMap<String, Value>| {
//!     matches!(u.get("age"), Some(Value::Int(age)) if *age < 25)
//! });
//! assert_eq!(under_25.len(), 1);
//! ```

#![forbid(unsafe_code)]

mod collection;
mod dynamic;
mod error;
mod key;
mod search;
mod traits;
mod value;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use collection::Collection;
pub use dynamic::{FinderKind, FinderName};
pub use error::QueryError;
pub use key::{Answer, Key};
pub use search::{Expected, Search};
pub use traits::{Matcher, Record};
pub use value::Value;

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create an empty [`Search`] to build an attribute specification.
///
/// # Example
///
/// ```rust
/// use std::collections::BTreeMap;
/// use quarry::{search, Collection, Value};
///
/// let page = |uri: &str| BTreeMap::from([("uri".to_string(), Value::from(uri))]);
/// let pages = Collection::new([page("/"), page("/about")]);
///
/// let hit = pages.find_by(search().attr("uri", "/about"));
/// assert!(hit.is_some());
/// ```
pub fn search() -> Search {
    Search::new()
}
