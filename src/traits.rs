use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;
use std::sync::Arc;

use crate::value::Value;

/// A queryable record — anything with a named attribute surface.
///
/// Implement this to make quarry query your own types. `get` returns the
/// value of the named attribute, or `None` if the record has no such
/// attribute. Absence is never an error: during matching a missing attribute
/// simply fails to match (unless the expected value is a predicate that
/// accepts `None`).
///
/// # Object Safety
///
/// `Record` is object-safe, and blanket impls cover `&T`, `Box<T>`, `Rc<T>`
/// and `Arc<T>` so a [`Collection`](crate::Collection) can hold shared
/// references rather than owning its records.
///
/// # Example
///
/// ```rust
/// use quarry::{Record, Value};
///
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
/// ```
pub trait Record {
    /// The value of `attribute`, or `None` if the record doesn't have one.
    fn get(&self, attribute: &str) -> Option<Value>;
}

impl<T: Record + ?Sized> Record for &T {
    fn get(&self, attribute: &str) -> Option<Value> {
        (**self).get(attribute)
    }
}

impl<T: Record + ?Sized> Record for Box<T> {
    fn get(&self, attribute: &str) -> Option<Value> {
        (**self).get(attribute)
    }
}

impl<T: Record + ?Sized> Record for Rc<T> {
    fn get(&self, attribute: &str) -> Option<Value> {
        (**self).get(attribute)
    }
}

impl<T: Record + ?Sized> Record for Arc<T> {
    fn get(&self, attribute: &str) -> Option<Value> {
        (**self).get(attribute)
    }
}

// Map types already are an attribute surface — expose them as records
// directly so quick fixtures and loosely-shaped data need no wrapper type.

impl Record for BTreeMap<String, Value> {
    fn get(&self, attribute: &str) -> Option<Value> {
        BTreeMap::get(self, attribute).cloned()
    }
}

impl Record for HashMap<String, Value> {
    fn get(&self, attribute: &str) -> Option<Value> {
        HashMap::get(self, attribute).cloned()
    }
}

/// Determines whether a record is a match.
///
/// Implement this to define custom matching logic beyond what
/// [`Search`](crate::Search) expresses — composite criteria, scoring
/// thresholds, lookups into side tables, or anything else.
///
/// Every `Fn(&R) -> bool` closure is a `Matcher`, so the common case reads:
///
/// ```rust,ignore
/// collection.find_all(|user: &User| user.age < 30)
/// ```
pub trait Matcher<R> {
    /// Returns `true` if this record should be included in results.
    fn is_match(&self, record: &R) -> bool;
}

impl<R, F> Matcher<R> for F
where
    F: Fn(&R) -> bool,
{
    fn is_match(&self, record: &R) -> bool {
        self(record)
    }
}
