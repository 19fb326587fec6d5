//! Book command handlers

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use shelf_core::query::{self, SortSelection, ViewQuery};
use shelf_core::{loader, BookDetail, Config, DataSource, Record};

use crate::output::Output;

/// Load every record from the configured dataset
async fn load_records(config: &Config) -> Result<Vec<Arc<Record>>> {
    let source = DataSource::from_config(config).context("Invalid dataset location")?;
    let records = loader::load(&source)
        .await
        .with_context(|| format!("Error loading library from {}", source))?;
    Ok(records.into_iter().map(Arc::new).collect())
}

/// List books, optionally filtered by a query and ordered by a sort key
pub async fn list(
    config: &Config,
    query_text: Option<String>,
    sort: Option<String>,
    output: &Output,
) -> Result<()> {
    let records = load_records(config).await?;

    let sort = sort
        .as_deref()
        .map(SortSelection::from_value)
        .unwrap_or_default();
    let view = ViewQuery::new(query_text.as_deref().unwrap_or(""), sort);
    debug!(query = %view.query, sort = %view.sort, "Listing books");

    let books = query::apply(&records, &view);
    let label = query::result_count_label(books.len(), view.has_query());
    output.print_books(&books, &label);
    Ok(())
}

/// Show the detail view for one book, found by ISBN or title
pub async fn show(config: &Config, key: String, output: &Output) -> Result<()> {
    let records = load_records(config).await?;
    let book = find_book(&records, &key).ok_or_else(|| anyhow::anyhow!("Book not found: {}", key))?;

    output.print_detail(&BookDetail::from_record(book));
    Ok(())
}

/// Match by ISBN (hyphens ignored), then exact title, then title substring
fn find_book<'a>(records: &'a [Arc<Record>], key: &str) -> Option<&'a Record> {
    let digits: String = key.chars().filter(|c| *c != '-').collect();
    let lowered = query::normalize_query(key);

    records
        .iter()
        .find(|r| !digits.is_empty() && r.isbn == digits)
        .or_else(|| records.iter().find(|r| r.title.to_lowercase() == lowered))
        .or_else(|| records.iter().find(|r| r.title.to_lowercase().contains(&lowered)))
        .map(Arc::as_ref)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::models::{Dataset, RawBook};

    fn records() -> Vec<Arc<Record>> {
        let dataset = Dataset {
            books: vec![
                RawBook {
                    title: "Refactoring".to_string(),
                    isbn: "9780134757599".to_string(),
                    ..RawBook::default()
                },
                RawBook {
                    title: "Refactoring Databases".to_string(),
                    isbn: "9780321293534".to_string(),
                    ..RawBook::default()
                },
            ],
        };
        dataset.into_records().into_iter().map(Arc::new).collect()
    }

    #[test]
    fn test_find_by_hyphenated_isbn() {
        let records = records();
        let book = find_book(&records, "978-0-321-29353-4").unwrap();
        assert_eq!(book.title, "Refactoring Databases");
    }

    #[test]
    fn test_exact_title_wins_over_substring() {
        let records = records();
        assert_eq!(find_book(&records, "refactoring").unwrap().isbn, "9780134757599");
        assert_eq!(find_book(&records, "databases").unwrap().isbn, "9780321293534");
        assert!(find_book(&records, "cobol").is_none());
    }
}
