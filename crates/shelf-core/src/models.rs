//! Data models for shelf
//!
//! Defines the catalog record and the raw dataset shape it is mapped from.
//! Records are immutable once loaded and shared as `Arc<Record>`.

use serde::{Deserialize, Deserializer, Serialize};

/// A book in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Record {
    /// Display title
    pub title: String,
    /// Publication year, kept as a string for display
    pub year: String,
    /// Subjects, in dataset order
    pub tags: Vec<String>,
    /// First author name, derived from `author`
    pub snippet: String,
    /// Raw author list, semicolon-delimited
    pub author: String,
    /// ISBN-13 as a string of digits
    pub isbn: String,
    /// Publisher name
    pub publisher: String,
    /// Edition number
    pub edition: i64,
    /// Free-text description
    pub description: String,
}

impl Record {
    /// Year as an integer; unparsable years sort as 0
    pub fn year_value(&self) -> i64 {
        self.year.trim().parse().unwrap_or(0)
    }

    /// Individual author names, trimmed
    pub fn authors(&self) -> impl Iterator<Item = &str> {
        self.author
            .split(';')
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Lowercased text searched by the query filter
    pub fn haystack(&self) -> String {
        let mut parts: Vec<&str> = vec![
            &self.title,
            &self.author,
            &self.isbn,
            &self.publisher,
            &self.description,
        ];
        parts.extend(self.tags.iter().map(String::as_str));
        parts.join(" ").to_lowercase()
    }
}

impl From<RawBook> for Record {
    fn from(raw: RawBook) -> Self {
        let snippet = derive_snippet(&raw.author);
        Self {
            title: raw.title,
            year: raw.year,
            tags: raw.subjects,
            snippet,
            author: raw.author,
            isbn: raw.isbn,
            publisher: raw.publisher,
            edition: raw.edition,
            description: raw.description,
        }
    }
}

/// Text before the first `;`, trimmed
pub fn derive_snippet(author: &str) -> String {
    author.split(';').next().unwrap_or("").trim().to_string()
}

/// Top-level dataset document
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub books: Vec<RawBook>,
}

impl Dataset {
    /// Map every raw entry into a record
    pub fn into_records(self) -> Vec<Record> {
        self.books.into_iter().map(Record::from).collect()
    }
}

/// One entry as it appears in the dataset
///
/// Every field defaults so a malformed entry shows up as blank fields
/// rather than failing the whole load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBook {
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub author: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub isbn: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub edition: i64,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Int(i64),
    Float(f64),
    Null,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s,
        StringOrNumber::Int(n) => n.to_string(),
        StringOrNumber::Float(f) => f.to_string(),
        StringOrNumber::Null => String::new(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
pub(crate) fn sample(title: &str, year: i64, author: &str) -> Record {
    Record::from(RawBook {
        title: title.to_string(),
        year: year.to_string(),
        subjects: vec!["Fiction".to_string()],
        author: author.to_string(),
        isbn: "9780000000000".to_string(),
        publisher: "Test Press".to_string(),
        edition: 1,
        description: format!("About {}", title),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_is_first_author() {
        assert_eq!(derive_snippet("Knuth, Donald; Graham, Ronald"), "Knuth, Donald");
        assert_eq!(derive_snippet("  Solo Author  "), "Solo Author");
        assert_eq!(derive_snippet(""), "");
    }

    #[test]
    fn test_dataset_mapping() {
        let json = r#"{
            "books": [{
                "title": "Clean Code",
                "year": 2008,
                "subjects": ["Software", "Craft"],
                "author": "Martin, Robert C.; Feathers, Michael",
                "isbn": "9780132350884",
                "publisher": "Prentice Hall",
                "edition": 1,
                "description": "A handbook of agile software craftsmanship."
            }]
        }"#;

        let dataset: Dataset = serde_json::from_str(json).unwrap();
        let records = dataset.into_records();
        assert_eq!(records.len(), 1);

        let book = &records[0];
        assert_eq!(book.year, "2008");
        assert_eq!(book.year_value(), 2008);
        assert_eq!(book.snippet, "Martin, Robert C.");
        assert_eq!(book.tags, vec!["Software", "Craft"]);
        assert_eq!(
            book.authors().collect::<Vec<_>>(),
            vec!["Martin, Robert C.", "Feathers, Michael"]
        );
    }

    #[test]
    fn test_missing_fields_become_blank() {
        let json = r#"{ "books": [{ "title": "Untitled draft", "subjects": null }] }"#;
        let records: Vec<Record> = serde_json::from_str::<Dataset>(json)
            .unwrap()
            .into_records();

        let book = &records[0];
        assert!(book.tags.is_empty());
        assert_eq!(book.author, "");
        assert_eq!(book.year_value(), 0);
        assert_eq!(book.edition, 0);
    }

    #[test]
    fn test_numeric_isbn_is_stringified() {
        let json = r#"{ "books": [{ "title": "T", "isbn": 9780132350884 }] }"#;
        let records = serde_json::from_str::<Dataset>(json).unwrap().into_records();
        assert_eq!(records[0].isbn, "9780132350884");
    }

    #[test]
    fn test_haystack_includes_tags() {
        let book = sample("Dune", 1965, "Herbert, Frank");
        let hay = book.haystack();
        assert!(hay.contains("dune"));
        assert!(hay.contains("herbert, frank"));
        assert!(hay.contains("fiction"));
        assert!(hay.contains("test press"));
    }
}
