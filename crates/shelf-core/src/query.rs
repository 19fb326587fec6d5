//! Filtering and sorting of the catalog
//!
//! Everything here is a pure function of the record list and a [`ViewQuery`]
//! snapshot. Inputs are never mutated; every call returns a new view.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::models::Record;

/// A recognized sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    TitleAsc,
    TitleDesc,
    AuthorAsc,
    YearDesc,
    YearAsc,
}

impl SortKey {
    /// All keys in selector order
    pub const ALL: [SortKey; 5] = [
        SortKey::TitleAsc,
        SortKey::TitleDesc,
        SortKey::AuthorAsc,
        SortKey::YearDesc,
        SortKey::YearAsc,
    ];

    /// Selector value, e.g. `title-asc`
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::TitleAsc => "title-asc",
            SortKey::TitleDesc => "title-desc",
            SortKey::AuthorAsc => "author-asc",
            SortKey::YearDesc => "year-desc",
            SortKey::YearAsc => "year-asc",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            SortKey::TitleAsc => "Title (A-Z)",
            SortKey::TitleDesc => "Title (Z-A)",
            SortKey::AuthorAsc => "Author (A-Z)",
            SortKey::YearDesc => "Newest first",
            SortKey::YearAsc => "Oldest first",
        }
    }

    fn compare(self, a: &Record, b: &Record) -> Ordering {
        match self {
            SortKey::TitleAsc => locale_cmp(&a.title, &b.title),
            SortKey::TitleDesc => locale_cmp(&b.title, &a.title),
            SortKey::AuthorAsc => locale_cmp(author_key(a), author_key(b)),
            SortKey::YearDesc => b.year_value().cmp(&a.year_value()),
            SortKey::YearAsc => a.year_value().cmp(&b.year_value()),
        }
    }
}

/// The sort currently selected
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortSelection {
    /// Newest first, ties broken by ascending title
    #[default]
    Newest,
    /// One of the selector keys
    Key(SortKey),
    /// A value the selector does not know; keeps input order
    Unrecognized(String),
}

impl SortSelection {
    /// Parse a selector value; unknown values are kept as [`SortSelection::Unrecognized`]
    pub fn from_value(value: &str) -> Self {
        SortKey::ALL
            .iter()
            .find(|key| key.as_str() == value)
            .map(|key| SortSelection::Key(*key))
            .unwrap_or_else(|| SortSelection::Unrecognized(value.to_string()))
    }

    /// Next entry in the selector, wrapping
    pub fn next(&self) -> Self {
        match self {
            SortSelection::Key(key) => {
                let index = SortKey::ALL.iter().position(|k| k == key).unwrap_or(0);
                SortKey::ALL
                    .get(index + 1)
                    .map(|k| SortSelection::Key(*k))
                    .unwrap_or(SortSelection::Newest)
            }
            SortSelection::Newest | SortSelection::Unrecognized(_) => {
                SortSelection::Key(SortKey::ALL[0])
            }
        }
    }

    /// Previous entry in the selector, wrapping
    pub fn prev(&self) -> Self {
        match self {
            SortSelection::Key(key) => {
                let index = SortKey::ALL.iter().position(|k| k == key).unwrap_or(0);
                if index == 0 {
                    SortSelection::Newest
                } else {
                    SortSelection::Key(SortKey::ALL[index - 1])
                }
            }
            SortSelection::Newest | SortSelection::Unrecognized(_) => {
                SortSelection::Key(SortKey::ALL[SortKey::ALL.len() - 1])
            }
        }
    }

    /// Human-readable label
    pub fn label(&self) -> String {
        match self {
            SortSelection::Newest => "Default (newest)".to_string(),
            SortSelection::Key(key) => key.label().to_string(),
            SortSelection::Unrecognized(value) => format!("Unsorted ({})", value),
        }
    }
}

impl fmt::Display for SortSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortSelection::Newest => write!(f, "newest"),
            SortSelection::Key(key) => write!(f, "{}", key.as_str()),
            SortSelection::Unrecognized(value) => write!(f, "{}", value),
        }
    }
}

/// Snapshot of the inputs to one filter/sort pass
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewQuery {
    /// Normalized query text
    pub query: String,
    pub sort: SortSelection,
}

impl ViewQuery {
    /// Build a snapshot, normalizing the raw query text
    pub fn new(raw_query: &str, sort: SortSelection) -> Self {
        Self {
            query: normalize_query(raw_query),
            sort,
        }
    }

    /// Whether a text filter is active
    pub fn has_query(&self) -> bool {
        !self.query.is_empty()
    }
}

/// Trim and lowercase user input
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Filter then sort `records` according to `view`
pub fn apply(records: &[Arc<Record>], view: &ViewQuery) -> Vec<Arc<Record>> {
    let mut books = filter(records, &view.query);
    sort_in_place(&mut books, &view.sort);
    books
}

/// Keep records whose searchable text contains `query`
///
/// `query` is expected to be normalized already. An empty query keeps
/// everything.
pub fn filter(records: &[Arc<Record>], query: &str) -> Vec<Arc<Record>> {
    if query.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| record.haystack().contains(query))
        .cloned()
        .collect()
}

/// Return a sorted copy of `records`
pub fn sort(records: &[Arc<Record>], selection: &SortSelection) -> Vec<Arc<Record>> {
    let mut books = records.to_vec();
    sort_in_place(&mut books, selection);
    books
}

fn sort_in_place(books: &mut [Arc<Record>], selection: &SortSelection) {
    match selection {
        SortSelection::Newest => books.sort_by(|a, b| newest_cmp(a, b)),
        SortSelection::Key(key) => books.sort_by(|a, b| key.compare(a, b)),
        SortSelection::Unrecognized(_) => {}
    }
}

/// Newest first, ties broken by ascending title
pub fn newest_first(records: &[Arc<Record>]) -> Vec<Arc<Record>> {
    sort(records, &SortSelection::Newest)
}

/// Oldest first, ties broken by ascending title
pub fn oldest_first(records: &[Arc<Record>]) -> Vec<Arc<Record>> {
    let mut books = records.to_vec();
    books.sort_by(|a, b| {
        a.year_value()
            .cmp(&b.year_value())
            .then_with(|| locale_cmp(&a.title, &b.title))
    });
    books
}

fn newest_cmp(a: &Record, b: &Record) -> Ordering {
    b.year_value()
        .cmp(&a.year_value())
        .then_with(|| locale_cmp(&a.title, &b.title))
}

/// First comma-delimited segment of the snippet (the surname for "Last, First")
fn author_key(record: &Record) -> &str {
    record.snippet.split(',').next().unwrap_or("")
}

/// Accent- and case-insensitive comparison
///
/// Strings compare by their folded form first, so "Étude" sorts with the
/// e's. Ties put unaccented before accented, then lowercase before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        // Only case differs here; uppercase code points sort lower
        .then_with(|| b.cmp(a))
}

/// Decompose, drop combining marks, lowercase
fn fold(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Count line shown above the cards, e.g. "3 books in collection"
pub fn result_count_label(count: usize, query_active: bool) -> String {
    let noun = if count == 1 { "book" } else { "books" };
    if query_active {
        format!("{} {} found", count, noun)
    } else {
        format!("{} {} in collection", count, noun)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample;

    fn shelf() -> Vec<Arc<Record>> {
        vec![
            Arc::new(sample("Programming Rust", 2017, "Blandy, Jim; Orendorff, Jason")),
            Arc::new(sample("The Rust Programming Language", 2019, "Klabnik, Steve")),
            Arc::new(sample("Rust in Action", 2021, "McNamara, Tim")),
            Arc::new(sample("rust for Rustaceans", 2021, "Gjengset, Jon")),
        ]
    }

    fn titles(records: &[Arc<Record>]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_common_substring_keeps_everything() {
        let records = shelf();
        let result = filter(&records, "rust");
        assert_eq!(result.len(), records.len());
        for (a, b) in result.iter().zip(records.iter()) {
            assert!(Arc::ptr_eq(a, b));
        }
    }

    #[test]
    fn test_accented_titles_sort_with_their_base_letter() {
        let records: Vec<Arc<Record>> = ["Zebra", "Étude", "apple", "Éclair", "Ölfarbe"]
            .iter()
            .map(|t| Arc::new(sample(t, 2000, "A")))
            .collect();

        let asc = sort(&records, &SortSelection::Key(SortKey::TitleAsc));
        assert_eq!(titles(&asc), vec!["apple", "Éclair", "Étude", "Ölfarbe", "Zebra"]);

        let desc = sort(&records, &SortSelection::Key(SortKey::TitleDesc));
        assert_eq!(titles(&desc), vec!["Zebra", "Ölfarbe", "Étude", "Éclair", "apple"]);
    }

    #[test]
    fn test_locale_cmp_ties() {
        assert_eq!(locale_cmp("resume", "Résumé"), Ordering::Less);
        assert_eq!(locale_cmp("apple", "Apple"), Ordering::Less);
        assert_eq!(locale_cmp("Émile", "Emile"), Ordering::Greater);
        assert_eq!(locale_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_author_sort_folds_accents() {
        let records = vec![
            Arc::new(sample("B", 2000, "Zola, Émile")),
            Arc::new(sample("A", 2000, "Éluard, Paul")),
            Arc::new(sample("C", 2000, "Flaubert, Gustave")),
        ];
        let sorted = sort(&records, &SortSelection::Key(SortKey::AuthorAsc));
        assert_eq!(titles(&sorted), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let result = filter(&shelf(), "cobol");
        assert!(result.is_empty());
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        assert_eq!(filter(&shelf(), "").len(), 4);
    }

    #[test]
    fn test_filter_matches_author_and_tags() {
        let records = shelf();
        assert_eq!(titles(&filter(&records, "gjengset")), vec!["rust for Rustaceans"]);
        assert_eq!(filter(&records, "fiction").len(), 4);
        assert_eq!(filter(&records, "about rust in").len(), 1);
    }

    #[test]
    fn test_filter_does_not_mutate_input() {
        let records = shelf();
        let before = titles(&records).join("|");
        let _ = apply(&records, &ViewQuery::new("Rust", SortSelection::Key(SortKey::TitleDesc)));
        assert_eq!(titles(&records).join("|"), before);
    }

    #[test]
    fn test_year_orders_are_reversed() {
        let records = vec![
            Arc::new(sample("A", 2001, "X")),
            Arc::new(sample("B", 2010, "Y")),
            Arc::new(sample("C", 1999, "Z")),
        ];
        let desc = sort(&records, &SortSelection::Key(SortKey::YearDesc));
        let mut asc = sort(&records, &SortSelection::Key(SortKey::YearAsc));
        asc.reverse();
        assert_eq!(titles(&desc), titles(&asc));
        assert_eq!(titles(&desc), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_title_sort_is_idempotent() {
        let key = SortSelection::Key(SortKey::TitleAsc);
        let once = sort(&shelf(), &key);
        let twice = sort(&once, &key);
        assert_eq!(titles(&once), titles(&twice));
        assert_eq!(
            titles(&once),
            vec![
                "Programming Rust",
                "rust for Rustaceans",
                "Rust in Action",
                "The Rust Programming Language",
            ]
        );
    }

    #[test]
    fn test_title_desc() {
        let result = sort(&shelf(), &SortSelection::Key(SortKey::TitleDesc));
        assert_eq!(result[0].title, "The Rust Programming Language");
        assert_eq!(result[3].title, "Programming Rust");
    }

    #[test]
    fn test_author_sort_uses_surname() {
        let result = sort(&shelf(), &SortSelection::Key(SortKey::AuthorAsc));
        let snippets: Vec<&str> = result.iter().map(|r| r.snippet.as_str()).collect();
        assert_eq!(
            snippets,
            vec!["Blandy, Jim", "Gjengset, Jon", "Klabnik, Steve", "McNamara, Tim"]
        );
    }

    #[test]
    fn test_unrecognized_sort_preserves_order() {
        let records = shelf();
        let result = sort(&records, &SortSelection::from_value("price-asc"));
        assert_eq!(titles(&result), titles(&records));
    }

    #[test]
    fn test_newest_first_breaks_ties_by_title() {
        let result = newest_first(&shelf());
        assert_eq!(
            titles(&result),
            vec![
                "rust for Rustaceans",
                "Rust in Action",
                "The Rust Programming Language",
                "Programming Rust",
            ]
        );
        let oldest = oldest_first(&shelf());
        assert_eq!(oldest[0].title, "Programming Rust");
        assert_eq!(oldest[2].title, "rust for Rustaceans");
    }

    #[test]
    fn test_sort_selection_parsing() {
        assert_eq!(
            SortSelection::from_value("year-asc"),
            SortSelection::Key(SortKey::YearAsc)
        );
        assert_eq!(
            SortSelection::from_value("bogus"),
            SortSelection::Unrecognized("bogus".to_string())
        );
        for key in SortKey::ALL {
            assert_eq!(SortSelection::from_value(key.as_str()), SortSelection::Key(key));
        }
    }

    #[test]
    fn test_sort_selection_cycles() {
        let mut selection = SortSelection::Newest;
        let mut seen = Vec::new();
        for _ in 0..6 {
            selection = selection.next();
            seen.push(selection.to_string());
        }
        assert_eq!(
            seen,
            vec!["title-asc", "title-desc", "author-asc", "year-desc", "year-asc", "newest"]
        );
        assert_eq!(SortSelection::Newest.prev(), SortSelection::Key(SortKey::YearAsc));
        assert_eq!(
            SortSelection::Key(SortKey::TitleAsc).prev(),
            SortSelection::Newest
        );
    }

    #[test]
    fn test_view_query_normalizes() {
        let view = ViewQuery::new("  RuSt  ", SortSelection::Newest);
        assert_eq!(view.query, "rust");
        assert!(view.has_query());
        assert!(!ViewQuery::new("   ", SortSelection::Newest).has_query());
    }

    #[test]
    fn test_result_count_label() {
        assert_eq!(result_count_label(3, false), "3 books in collection");
        assert_eq!(result_count_label(1, false), "1 book in collection");
        assert_eq!(result_count_label(0, true), "0 books found");
        assert_eq!(result_count_label(1, true), "1 book found");
    }
}
