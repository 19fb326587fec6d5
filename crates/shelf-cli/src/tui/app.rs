//! Application state and logic

use std::time::{Duration, Instant};

use shelf_core::format::{catalog_url, web_search_url};
use shelf_core::transition::TransitionEvent;
use shelf_core::{Catalog, Config};

/// Input mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Normal navigation mode
    Normal,
    /// Typing into the search bar (after pressing /)
    Search,
}

/// Which outbound link to open from the detail overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutboundLink {
    Catalog,
    WebSearch,
}

/// Application state
pub struct App {
    /// Catalog state: records, query, sort, cards, overlay
    pub catalog: Catalog,
    /// Whether the app should exit
    pub should_quit: bool,
    /// Current input mode
    pub input_mode: InputMode,
    /// Raw search bar contents
    pub search_input: String,
    /// Cursor position in the search bar (in chars)
    pub search_cursor: usize,
    /// Currently selected card index
    pub selected: usize,
    /// Status message to display temporarily
    pub status_message: Option<String>,
    /// When the status message was set (for auto-dismiss)
    pub status_message_time: Option<Instant>,
    /// Whether help overlay is visible
    pub show_help: bool,
    /// Pending 'g' keypress for gg sequence (with timestamp)
    pub pending_g: Option<Instant>,
    /// Clock value of the last tick, used for drawing
    pub now: Instant,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self::with_catalog(Catalog::from_config(config))
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            should_quit: false,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            search_cursor: 0,
            selected: 0,
            status_message: None,
            status_message_time: None,
            show_help: false,
            pending_g: None,
            now: Instant::now(),
        }
    }

    /// Advance timers and keep the selection in range
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        self.check_status_timeout();

        // Clear pending 'g' if timeout expired (500ms)
        if let Some(time) = self.pending_g {
            if now.duration_since(time) > Duration::from_millis(500) {
                self.pending_g = None;
            }
        }

        if let Some(TransitionEvent::Swapped { .. }) = self.catalog.tick(now) {
            self.selected = 0;
        }
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let count = self.catalog.cards().len();
        self.selected = self.selected.min(count.saturating_sub(1));
    }

    /// Set a status message (will auto-dismiss after 3 seconds)
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_message_time = Some(self.now);
    }

    /// Check and clear expired status message
    pub fn check_status_timeout(&mut self) {
        if let Some(time) = self.status_message_time {
            if self.now.duration_since(time) > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    // ── Navigation ─────────────────────────────────────────────────────

    /// Move up; scrolls the overlay instead while one is open
    pub fn move_up(&mut self) {
        if self.catalog.scroll_locked() {
            if let Some(overlay) = self.catalog.overlay_mut() {
                overlay.scroll_up();
            }
        } else {
            self.selected = self.selected.saturating_sub(1);
        }
    }

    /// Move down; scrolls the overlay instead while one is open
    pub fn move_down(&mut self) {
        if self.catalog.scroll_locked() {
            if let Some(overlay) = self.catalog.overlay_mut() {
                overlay.scroll_down();
            }
        } else if self.selected < self.catalog.cards().len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    /// Move selection to the first card (vim 'gg')
    pub fn move_to_first(&mut self) {
        if !self.catalog.scroll_locked() {
            self.selected = 0;
        }
    }

    /// Move selection to the last card (vim 'G')
    pub fn move_to_last(&mut self) {
        if !self.catalog.scroll_locked() {
            self.selected = self.catalog.cards().len().saturating_sub(1);
        }
    }

    // ── Sort ───────────────────────────────────────────────────────────

    pub fn next_sort(&mut self) {
        let sort = self.catalog.sort().next();
        self.catalog.on_sort_change(sort, self.now);
        self.set_status(format!("Sort: {}", self.catalog.sort().label()));
    }

    pub fn prev_sort(&mut self) {
        let sort = self.catalog.sort().prev();
        self.catalog.on_sort_change(sort, self.now);
        self.set_status(format!("Sort: {}", self.catalog.sort().label()));
    }

    // ── Search bar ─────────────────────────────────────────────────────

    /// Enter search mode, keeping the current text
    pub fn enter_search_mode(&mut self) {
        self.input_mode = InputMode::Search;
        self.search_cursor = self.search_input.chars().count();
    }

    /// Leave search mode, keeping the current text
    pub fn exit_search_mode(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Empty the search bar; the cleared query is debounced like any edit
    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.search_cursor = 0;
        self.search_changed();
    }

    /// Insert character at cursor position
    pub fn insert_char(&mut self, c: char) {
        let byte = self.byte_index(self.search_cursor);
        self.search_input.insert(byte, c);
        self.search_cursor += 1;
        self.search_changed();
    }

    /// Delete character before cursor
    pub fn delete_char(&mut self) {
        if self.search_cursor > 0 {
            self.search_cursor -= 1;
            let byte = self.byte_index(self.search_cursor);
            self.search_input.remove(byte);
            self.search_changed();
        }
    }

    /// Move cursor left
    pub fn cursor_left(&mut self) {
        self.search_cursor = self.search_cursor.saturating_sub(1);
    }

    /// Move cursor right
    pub fn cursor_right(&mut self) {
        if self.search_cursor < self.search_input.chars().count() {
            self.search_cursor += 1;
        }
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.search_input
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.search_input.len())
    }

    fn search_changed(&mut self) {
        self.catalog.on_search_input(&self.search_input, self.now);
    }

    // ── Overlay ────────────────────────────────────────────────────────

    /// Open the detail overlay for the selected card
    pub fn open_selected(&mut self) {
        if !self.catalog.open_card(self.selected, self.now) {
            self.set_status("No book selected");
        }
    }

    /// Close the detail overlay
    pub fn close_overlay(&mut self) -> bool {
        self.catalog.close_detail(self.now)
    }

    /// URL for one of the overlay's outbound links
    pub fn overlay_link(&self, link: OutboundLink) -> Option<String> {
        let overlay = self.catalog.overlay()?;
        let record = overlay.record();
        Some(match link {
            OutboundLink::Catalog => catalog_url(record),
            OutboundLink::WebSearch => web_search_url(record),
        })
    }

    /// Open an outbound link in the system browser
    pub fn open_link(&mut self, link: OutboundLink) {
        let Some(url) = self.overlay_link(link) else {
            return;
        };
        match open::that_detached(&url) {
            Ok(()) => {
                tracing::info!("Opened {}", url);
                self.set_status(format!("Opened {}", url));
            }
            Err(e) => {
                tracing::warn!("Failed to open {}: {}", url, e);
                self.set_status(format!("Failed to open: {}", e));
            }
        }
    }
}
