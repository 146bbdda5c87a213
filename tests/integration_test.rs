use std::collections::BTreeMap;

use regex::Regex;

use quarry::{
    search, Answer, Collection, FinderKind, FinderName, Key, QueryError, Record, Value,
};

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

/// Three pages with mirrored lowercase/uppercase attributes:
/// `{page_1, PAGE_1}`, `{page_2, PAGE_2}`, `{page_3, PAGE_3}`,
/// queried with default finders `[uri, name]`.
#[derive(Debug, Clone, PartialEq)]
struct Page {
    uri: String,
    name: String,
}

impl Page {
    fn new(uri: &str, name: &str) -> Self {
        Self {
            uri: uri.to_string(),
            name: name.to_string(),
        }
    }
}

impl Record for Page {
    fn get(&self, attribute: &str) -> Option<Value> {
        match attribute {
            "uri" => Some(self.uri.as_str().into()),
            "name" => Some(self.name.as_str().into()),
            _ => None,
        }
    }
}

fn pages() -> Vec<Page> {
    (1..=3)
        .map(|i| Page::new(&format!("page_{i}"), &format!("PAGE_{i}")))
        .collect()
}

fn collection() -> Collection<Page> {
    Collection::with_default_finders(pages(), ["uri", "name"])
}

/// A loose map-shaped record, for fixtures with ad-hoc attributes.
fn map_record(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Bracket accessor — native access
// ---------------------------------------------------------------------------

#[test]
fn integer_keys_use_native_access() {
    let all = pages();
    let collection = collection();

    assert_eq!(collection.get(0).unwrap().single(), Some(&all[0]));
    assert_eq!(collection.get(2).unwrap().single(), Some(&all[2]));
    assert_eq!(collection.get(99).unwrap().single(), None);
}

#[test]
fn negative_indexes_count_from_the_end() {
    let all = pages();
    let collection = collection();

    assert_eq!(collection.get(-1).unwrap().single(), Some(&all[2]));
    assert_eq!(collection.get(-3).unwrap().single(), Some(&all[0]));
    assert_eq!(collection.get(-4).unwrap().single(), None);
}

#[test]
fn out_of_range_is_a_miss_even_without_default_finders() {
    let collection = Collection::new(pages());
    assert_eq!(collection.get(99).unwrap().single(), None);
}

#[test]
fn range_keys_slice_and_carry_default_finders() {
    let all = pages();
    let collection = collection();

    let head = collection.get(0..2).unwrap().all().unwrap();
    assert_eq!(head, all[0..2].to_vec());
    assert_eq!(head.default_finders(), collection.default_finders());

    let tail = collection.get(1..=2).unwrap().all().unwrap();
    assert_eq!(tail, all[1..3].to_vec());

    let everything = collection.get(..).unwrap().all().unwrap();
    assert_eq!(everything, all);

    let disjoint = collection.get(5..9).unwrap().all().unwrap();
    assert!(disjoint.is_empty());
}

// ---------------------------------------------------------------------------
// Bracket accessor — query access
// ---------------------------------------------------------------------------

#[test]
fn scalar_keys_walk_the_default_finders() {
    let all = pages();
    let collection = collection();

    assert_eq!(collection.get("page_1").unwrap().single(), Some(&all[0]));
    assert_eq!(collection.get("PAGE_1").unwrap().single(), Some(&all[0]));
    assert_eq!(collection.get("page_99").unwrap().single(), None);
}

#[test]
fn pattern_keys_match_coerced_values() {
    let all = pages();
    let collection = collection();

    let hit = collection.get(Regex::new("page_1").unwrap()).unwrap();
    assert_eq!(hit.single(), Some(&all[0]));

    let miss = collection.get(Regex::new("^nowhere$").unwrap()).unwrap();
    assert_eq!(miss.single(), None);
}

#[test]
fn search_keys_answer_via_find_by() {
    let all = pages();
    let collection = collection();

    let hit = collection.get(search().attr("uri", "page_1")).unwrap();
    assert_eq!(hit.single(), Some(&all[0]));

    let both = collection
        .get(search().attr("uri", "page_1").attr("name", "PAGE_1"))
        .unwrap();
    assert_eq!(both.single(), Some(&all[0]));

    let contradiction = collection
        .get(search().attr("uri", "page_1").attr("name", "INVALID"))
        .unwrap();
    assert_eq!(contradiction.single(), None);
}

#[test]
fn scalar_keys_error_without_default_finders() {
    let collection = Collection::new(pages());

    match collection.get("page_1") {
        Err(QueryError::UnsupportedKey(_)) => {}
        other => panic!("expected UnsupportedKey, got {other:?}"),
    }

    // Explicit searches don't depend on finder configuration
    let hit = collection.get(search().attr("uri", "page_1")).unwrap();
    assert!(hit.found());
}

#[test]
fn wrapped_keys_return_all_matches() {
    let all = pages();
    let collection = collection();

    let one = collection.get(["page_1"]).unwrap().all().unwrap();
    assert_eq!(one, vec![all[0].clone()]);

    let every = collection.get([Regex::new("page").unwrap()]).unwrap();
    assert_eq!(every.all().unwrap(), all);

    // A literal string is not a pattern — `"page"` equals nothing exactly
    let none = collection.get(["page"]).unwrap().all().unwrap();
    assert!(none.is_empty());

    let by_search = collection
        .get([search().attr("uri", "page_1")])
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(by_search, vec![all[0].clone()]);

    let contradiction = collection
        .get([search().attr("uri", "page_1").attr("name", "INVALID")])
        .unwrap()
        .all()
        .unwrap();
    assert!(contradiction.is_empty());

    let by_pattern_search = collection
        .get([search().attr("uri", Regex::new("page").unwrap())])
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(by_pattern_search, all);
}

#[test]
fn bare_matchers_are_whole_record_predicates() {
    let all = pages();
    let collection = collection();

    let hit = collection
        .get(Key::matching(|page: &Page| page.uri == "page_2"))
        .unwrap();
    assert_eq!(hit.single(), Some(&all[1]));

    let every = collection
        .get([Key::matching(|page: &Page| page.uri.starts_with("page"))])
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(every, all);

    // Matchers work without default finders — they never consult them
    let unconfigured = Collection::new(pages());
    let hit = unconfigured
        .get(Key::matching(|page: &Page| page.name == "PAGE_3"))
        .unwrap();
    assert!(hit.found());
}

// ---------------------------------------------------------------------------
// find_by / find_all
// ---------------------------------------------------------------------------

#[test]
fn find_by_returns_the_first_match_only() {
    let users = Collection::new([
        map_record(&[("name", "bob".into()), ("age", 23.into())]),
        map_record(&[("name", "steve".into()), ("age", 23.into())]),
    ]);

    let hit = users.find_by(search().attr("age", 23)).unwrap();
    assert_eq!(Record::get(hit, "name"), Some(Value::from("bob")));
}

#[test]
fn find_all_filters_and_preserves_order() {
    let all = pages();
    let collection = collection();

    assert_eq!(collection.find_all(search().attr("uri", "page_1")), all[0..1].to_vec());
    assert_eq!(
        collection.find_all(search().attr("uri", "page_1").attr("name", "PAGE_3")),
        Vec::<Page>::new()
    );
    assert_eq!(
        collection.find_all(search().attr("uri", Regex::new(r"^page_\d$").unwrap())),
        all
    );
}

#[test]
fn find_all_accepts_closures() {
    let collection = collection();
    let odd = collection.find_all(|page: &Page| !page.uri.ends_with('2'));
    assert_eq!(odd.len(), 2);
}

#[test]
fn empty_search_duplicates_the_collection() {
    let collection = collection();
    let duplicate = collection.find_all(search());

    assert_eq!(duplicate, collection);
    assert_eq!(duplicate.default_finders(), collection.default_finders());
}

#[test]
fn find_all_carries_default_finders_forward() {
    let collection = collection();
    let found = collection.find_all(search().attr("uri", "page_1"));
    assert_eq!(found.default_finders(), collection.default_finders());

    // ...and so does an empty result
    let none = collection.find_all(search().attr("uri", "nowhere"));
    assert_eq!(none.default_finders(), collection.default_finders());
}

#[test]
fn find_by_agrees_with_find_all() {
    let collection = collection();

    let all = collection.find_all(search().attr("name", Regex::new("PAGE").unwrap()));
    let first = collection.find_by(search().attr("name", Regex::new("PAGE").unwrap()));
    assert_eq!(first, all.first());
}

#[test]
fn predicate_terms_see_absent_values() {
    let records = Collection::new([
        map_record(&[("name", "bob".into())]),
        map_record(&[("name", "steve".into()), ("email", "s@example.com".into())]),
    ]);

    // Only a predicate can match an absent attribute
    let no_email = records.find_all(search().attr_with("email", |value| value.is_none()));
    assert_eq!(no_email.len(), 1);

    let has_email = records.find_all(search().attr_with("email", |value| value.is_some()));
    assert_eq!(has_email.len(), 1);
}

#[test]
fn missing_attributes_never_match_literals() {
    let collection = collection();
    assert!(collection.find_by(search().attr("nonexistent", "anything")).is_none());
    assert!(collection.find_all(search().attr("nonexistent", "anything")).is_empty());
}

// ---------------------------------------------------------------------------
// Default-finder index
// ---------------------------------------------------------------------------

#[test]
fn default_finder_order_is_priority_order() {
    // "x" matches attribute `b` on the first record and attribute `a` on the
    // second — the finder configured first wins, not the record seen first.
    let records = [
        map_record(&[("a", "other".into()), ("b", "x".into())]),
        map_record(&[("a", "x".into()), ("b", "other".into())]),
    ];
    let collection = Collection::with_default_finders(records.clone(), ["a", "b"]);

    let hit = collection.get("x").unwrap().single().unwrap();
    assert_eq!(*hit, records[1]);
}

#[test]
fn plural_default_lookup_stops_at_the_first_matching_finder() {
    let records = [
        map_record(&[("a", "x".into()), ("b", "y".into())]),
        map_record(&[("a", "other".into()), ("b", "x".into())]),
    ];
    let collection = Collection::with_default_finders(records.clone(), ["a", "b"]);

    // `a` yields a match, so `b` is never consulted
    let found = collection.get(["x"]).unwrap().all().unwrap();
    assert_eq!(found, vec![records[0].clone()]);
}

// ---------------------------------------------------------------------------
// Dynamic method dispatch
// ---------------------------------------------------------------------------

#[test]
fn finder_methods_dispatch_to_find_by() {
    let all = pages();
    let collection = collection();

    let hit = collection.query("find_by_name", &["PAGE_2".into()]).unwrap();
    assert_eq!(hit.single(), Some(&all[1]));

    let miss = collection.query("find_by_name", &["PAGE_9".into()]).unwrap();
    assert_eq!(miss.single(), None);
}

#[test]
fn finder_methods_zip_multiple_attributes_in_order() {
    let all = pages();
    let collection = collection();

    let hit = collection
        .query("find_by_name_and_uri", &["PAGE_1".into(), "page_1".into()])
        .unwrap();
    assert_eq!(hit.single(), Some(&all[0]));

    let crossed = collection
        .query("find_by_name_and_uri", &["PAGE_1".into(), "page_3".into()])
        .unwrap();
    assert_eq!(crossed.single(), None);
}

#[test]
fn unknown_attributes_are_a_clean_miss() {
    let collection = collection();
    let miss = collection
        .query("find_by_undefined_method", &["PAGE_1".into()])
        .unwrap();
    assert_eq!(miss.single(), None);
}

#[test]
fn find_all_by_answers_a_collection() {
    let collection = collection();

    let found = collection
        .query("find_all_by_name", &["PAGE_1".into()])
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "PAGE_1");
    assert_eq!(found.default_finders(), collection.default_finders());

    let none = collection
        .query("find_all_by_name", &["PAGE_9".into()])
        .unwrap()
        .all()
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn finder_arity_is_checked() {
    let collection = collection();

    match collection.query("find_by_name_and_uri", &["PAGE_1".into()]) {
        Err(QueryError::Arity { expected, got, .. }) => {
            assert_eq!(expected, 2);
            assert_eq!(got, 1);
        }
        other => panic!("expected Arity error, got {other:?}"),
    }
}

#[test]
fn bare_names_match_case_insensitively() {
    let all = pages();
    let collection = collection();

    assert_eq!(collection.query("page_1", &[]).unwrap().single(), Some(&all[0]));
    assert_eq!(collection.query("PAGE_1", &[]).unwrap().single(), Some(&all[0]));
}

#[test]
fn bare_name_misses_are_unrecognized_methods() {
    let collection = collection();

    match collection.query("page_99", &[]) {
        Err(error @ QueryError::UnrecognizedMethod(_)) => {
            assert_eq!(error.method(), Some("page_99"));
        }
        other => panic!("expected UnrecognizedMethod, got {other:?}"),
    }
}

#[test]
fn bang_names_are_exact_lookups() {
    let all = pages();
    let collection = collection();

    assert_eq!(collection.query("page_1!", &[]).unwrap().single(), Some(&all[0]));
    assert_eq!(collection.query("PAGE_1!", &[]).unwrap().single(), Some(&all[0]));
    assert!(collection.query("Page_1!", &[]).is_err());
}

#[test]
fn question_names_answer_booleans_and_never_fail() {
    let collection = collection();

    assert!(matches!(collection.query("page_1?", &[]).unwrap(), Answer::Exists(true)));
    assert!(matches!(collection.query("PAGE_1?", &[]).unwrap(), Answer::Exists(true)));
    assert!(matches!(collection.query("missing?", &[]).unwrap(), Answer::Exists(false)));

    // Even with no default finders configured
    let unconfigured: Collection<Page> = Collection::new(pages());
    assert!(matches!(unconfigured.query("page_1?", &[]).unwrap(), Answer::Exists(false)));
}

#[test]
fn bare_names_fail_without_default_finders() {
    let collection = Collection::new(pages());
    assert!(matches!(
        collection.query("page_1", &[]),
        Err(QueryError::UnrecognizedMethod(_))
    ));
}

// ---------------------------------------------------------------------------
// Grammar parsing and reflection
// ---------------------------------------------------------------------------

#[test]
fn finder_grammar_recognition() {
    assert!(FinderName::parse("find_by_name").is_some());
    assert!(FinderName::parse("find_all_by_name").is_some());
    assert!(FinderName::parse("find_by_first_name_and_last_name").is_some());
    assert!(FinderName::parse("find_all_by_last_name_and_city").is_some());
    assert!(FinderName::parse("find_by_nil?").is_some());
    assert!(FinderName::parse("find_by_name!").is_some());

    assert!(FinderName::parse("find_by").is_none());
    assert!(FinderName::parse("find_first_by_name").is_none());
    assert!(FinderName::parse("find_name").is_none());
    assert!(FinderName::parse("some_method").is_none());
}

#[test]
fn finder_names_decompose_structurally() {
    let single = FinderName::parse("find_by_first_name_and_last_name").unwrap();
    assert_eq!(single.kind, FinderKind::Single);
    assert_eq!(single.attributes, ["first_name", "last_name"]);
    assert!(!single.exact);
    assert!(!single.boolean);

    let plural = FinderName::parse("find_all_by_age").unwrap();
    assert_eq!(plural.kind, FinderKind::All);
    assert_eq!(plural.attributes, ["age"]);

    // `_or_` is not a separator — it stays inside the attribute name
    let odd = FinderName::parse("find_by_name_or_age").unwrap();
    assert_eq!(odd.attributes, ["name_or_age"]);

    // Trailing modifiers are stripped from the final segment and recorded
    let boolean = FinderName::parse("find_by_nil?").unwrap();
    assert_eq!(boolean.attributes, ["nil"]);
    assert!(boolean.boolean);

    let exact = FinderName::parse("find_by_name!").unwrap();
    assert_eq!(exact.attributes, ["name"]);
    assert!(exact.exact);
}

#[test]
fn responds_to_mirrors_the_grammars() {
    let collection = collection();

    assert!(collection.responds_to("find_by_name"));
    assert!(collection.responds_to("find_all_by_name_and_uri"));
    assert!(collection.responds_to("find_by_anything_at_all"));

    assert!(collection.responds_to("page_1"));
    assert!(collection.responds_to("PAGE_1"));
    assert!(collection.responds_to("page_1!"));
    assert!(!collection.responds_to("Page_1!"));

    assert!(!collection.responds_to("missing"));
    assert!(collection.responds_to("missing?"));

    // Without finders, only the grammar-recognized forms respond
    let unconfigured = Collection::new(pages());
    assert!(unconfigured.responds_to("find_by_name"));
    assert!(!unconfigured.responds_to("page_1"));
    assert!(unconfigured.responds_to("page_1?"));
}

// ---------------------------------------------------------------------------
// Native sequence surface
// ---------------------------------------------------------------------------

#[test]
fn collection_extends_the_native_sequence() {
    let all = pages();
    let mut collection = collection();

    assert_eq!(collection.len(), 3);
    assert_eq!(collection[0], all[0]);
    assert_eq!(collection.iter().count(), 3);

    collection.push(Page::new("page_4", "PAGE_4"));
    assert_eq!(collection.len(), 4);

    // In-place mutation leaves the finder configuration alone
    assert_eq!(collection.default_finders(), ["uri", "name"]);
    assert!(collection.get("page_4").unwrap().found());

    collection.remove(3);
    assert_eq!(collection, all);
}

#[test]
fn queries_do_not_mutate_the_source() {
    let collection = collection();
    let _ = collection.find_all(search().attr("uri", "page_1"));
    let _ = collection.get(["page_2"]).unwrap();
    assert_eq!(collection, pages());
}

#[test]
fn values_coerce_across_numeric_shapes() {
    let records = Collection::new([map_record(&[("age", Value::Int(30))])]);
    assert!(records.find_by(search().attr("age", 30.0)).is_some());
    assert!(records.find_by(search().attr("age", 30)).is_some());
    assert!(records.find_by(search().attr("age", 31)).is_none());
}
