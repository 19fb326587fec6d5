//! Display formatting for the detail view
//!
//! Edition ordinals, ISBN hyphenation, author lists, and the two outbound
//! reference links shown for every book.

use crate::models::Record;

/// Separator shown between author names
pub const AUTHOR_SEPARATOR: &str = " · ";

const WORLDCAT_ISBN_URL: &str = "https://www.worldcat.org/isbn/";
const WEB_SEARCH_URL: &str = "https://www.google.com/search?q=";

/// Render an integer as an English ordinal: 1st, 2nd, 3rd, 4th, 11th, 21st
pub fn ordinal(n: i64) -> String {
    let suffix = if n < 0 {
        "th"
    } else {
        match (n % 100, n % 10) {
            (11..=13, _) => "th",
            (_, 1) => "st",
            (_, 2) => "nd",
            (_, 3) => "rd",
            _ => "th",
        }
    };
    format!("{}{}", n, suffix)
}

/// Hyphenate a 13-character ISBN as 3-1-3-5-1; anything else is returned as-is
pub fn format_isbn(isbn: &str) -> String {
    let chars: Vec<char> = isbn.chars().collect();
    if chars.len() != 13 {
        return isbn.to_string();
    }

    [&chars[0..3], &chars[3..4], &chars[4..7], &chars[7..12], &chars[12..]]
        .iter()
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("-")
}

/// Author list with semicolons replaced by the display separator
pub fn authors_display(author: &str) -> String {
    author.replace(';', AUTHOR_SEPARATOR)
}

/// Catalog lookup link for a record's ISBN
pub fn catalog_url(record: &Record) -> String {
    format!("{}{}", WORLDCAT_ISBN_URL, record.isbn)
}

/// Web search link for a record's title and first author
pub fn web_search_url(record: &Record) -> String {
    let terms = format!("{} {}", record.title, record.snippet);
    format!("{}{}+book", WEB_SEARCH_URL, urlencoding::encode(&terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample;

    #[test]
    fn test_ordinal() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
        assert_eq!(ordinal(22), "22nd");
        assert_eq!(ordinal(101), "101st");
        assert_eq!(ordinal(111), "111th");
        assert_eq!(ordinal(0), "0th");
        assert_eq!(ordinal(-1), "-1th");
    }

    #[test]
    fn test_format_isbn() {
        assert_eq!(format_isbn("9780132350884"), "978-0-132-35088-4");
        assert_eq!(format_isbn("0132350882"), "0132350882");
        assert_eq!(format_isbn(""), "");
    }

    #[test]
    fn test_authors_display() {
        assert_eq!(
            authors_display("Gamma, Erich;Helm, Richard"),
            "Gamma, Erich · Helm, Richard"
        );
        assert_eq!(authors_display("Solo"), "Solo");
    }

    #[test]
    fn test_outbound_links() {
        let mut book = sample("The Rust Book", 2019, "Klabnik, Steve; Nichols, Carol");
        book.isbn = "9781718500440".to_string();

        assert_eq!(catalog_url(&book), "https://www.worldcat.org/isbn/9781718500440");
        assert_eq!(
            web_search_url(&book),
            "https://www.google.com/search?q=The%20Rust%20Book%20Klabnik%2C%20Steve+book"
        );
    }
}
