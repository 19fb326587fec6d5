//! Detail overlay lifecycle
//!
//! The overlay is owned by the catalog as an `Option<DetailOverlay>`; opening
//! moves a record in, closing starts a fade and the overlay is dropped once the
//! fade has finished.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::format::{authors_display, catalog_url, format_isbn, ordinal, web_search_url};
use crate::models::Record;

/// Delay before an opening overlay is fully shown
pub const FADE_IN: Duration = Duration::from_millis(10);
/// Delay between closing an overlay and removing it
pub const FADE_OUT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPhase {
    Opening { since: Instant },
    Open,
    Closing { since: Instant },
}

/// Full-screen detail view for one record
#[derive(Debug, Clone)]
pub struct DetailOverlay {
    record: Arc<Record>,
    phase: OverlayPhase,
    /// Vertical scroll offset inside the overlay
    pub scroll: u16,
}

impl DetailOverlay {
    pub fn open(record: Arc<Record>, now: Instant) -> Self {
        Self {
            record,
            phase: OverlayPhase::Opening { since: now },
            scroll: 0,
        }
    }

    pub fn record(&self) -> &Arc<Record> {
        &self.record
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase
    }

    /// Fully shown (not fading in or out)
    pub fn is_active(&self) -> bool {
        self.phase == OverlayPhase::Open
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.phase, OverlayPhase::Closing { .. })
    }

    /// Start fading out; returns false if already closing
    pub fn close(&mut self, now: Instant) -> bool {
        if self.is_closing() {
            return false;
        }
        self.phase = OverlayPhase::Closing { since: now };
        true
    }

    /// Advance the fade; returns false once the overlay should be removed
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.phase {
            OverlayPhase::Opening { since } if now >= since + FADE_IN => {
                self.phase = OverlayPhase::Open;
                true
            }
            OverlayPhase::Closing { since } => now < since + FADE_OUT,
            _ => true,
        }
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    /// Display-ready fields for the record
    pub fn detail(&self) -> BookDetail {
        BookDetail::from_record(&self.record)
    }
}

/// Every field of a record, formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookDetail {
    pub title: String,
    pub authors: String,
    pub year: String,
    pub publisher: String,
    pub edition: String,
    pub isbn: String,
    pub subjects: Vec<String>,
    pub description: String,
    pub catalog_url: String,
    pub web_search_url: String,
}

impl BookDetail {
    pub fn from_record(record: &Record) -> Self {
        Self {
            title: record.title.clone(),
            authors: authors_display(&record.author),
            year: record.year.clone(),
            publisher: record.publisher.clone(),
            edition: ordinal(record.edition),
            isbn: format_isbn(&record.isbn),
            subjects: record.tags.clone(),
            description: record.description.clone(),
            catalog_url: catalog_url(record),
            web_search_url: web_search_url(record),
        }
    }

    /// Label/value rows for the metadata table
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Author(s)", self.authors.clone()),
            ("Publisher", self.publisher.clone()),
            ("Year", self.year.clone()),
            ("Edition", self.edition.clone()),
            ("ISBN-13", self.isbn.clone()),
            ("Subjects", self.subjects.join(", ")),
        ]
    }
}
