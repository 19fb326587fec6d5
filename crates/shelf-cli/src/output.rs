//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::sync::Arc;

use shelf_core::{BookDetail, Record};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print the full detail view of one book
    pub fn print_detail(&self, detail: &BookDetail) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", detail.title);
                println!("{}", "─".repeat(detail.title.chars().count().min(60)));
                for (label, value) in detail.rows() {
                    println!("{:<11}{}", format!("{}:", label), value);
                }
                println!();
                println!("About this book");
                println!("{}", detail.description);
                println!();
                println!("Find in WorldCat: {}", detail.catalog_url);
                println!("Google Books:     {}", detail.web_search_url);
            }
            OutputFormat::Json => {
                println!("{}", to_json(detail));
            }
            OutputFormat::Quiet => {
                println!("{}", detail.isbn);
            }
        }
    }

    /// Print a list of books followed by the count label
    pub fn print_books(&self, books: &[Arc<Record>], label: &str) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books match your search.");
                } else {
                    for book in books {
                        println!(
                            "{} | {} | {} | {}",
                            book.year,
                            truncate(&book.title, 40),
                            truncate(&book.snippet, 25),
                            book.tags.join(", ")
                        );
                    }
                }
                println!("\n{}", label);
            }
            OutputFormat::Json => {
                println!("{}", to_json(&books_json(books, label)));
            }
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.isbn);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// JSON document for a book list: `{"label": ..., "books": [...]}`
fn books_json(books: &[Arc<Record>], label: &str) -> serde_json::Value {
    let records: Vec<&Record> = books.iter().map(Arc::as_ref).collect();
    serde_json::json!({
        "label": label,
        "books": records,
    })
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({"status": "error", "message": e.to_string()}).to_string()
    })
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
