//! Application state
//!
//! [`Catalog`] owns everything the catalog view needs: the loaded records, the
//! current query and sort, the card transition, the detail overlay and the
//! search debouncer. The UI layer feeds it input events and a clock; it never
//! reaches into ambient state.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::config::Config;
use crate::debounce::Debouncer;
use crate::loader::LoadError;
use crate::models::Record;
use crate::overlay::DetailOverlay;
use crate::query::{self, SortSelection, ViewQuery};
use crate::transition::{CardVisibility, Transition, TransitionEvent, TransitionTiming};

/// Default quiet period before a search is applied
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Shown in place of cards when nothing matches
pub const NO_RESULTS_MESSAGE: &str = "No books match your search.";

/// Dataset loading progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    Idle,
    /// Loading indicator visible
    Loading,
    Ready,
    /// Inline error replaces the loading indicator
    Failed(String),
}

/// The catalog view's state
pub struct Catalog {
    records: Vec<Arc<Record>>,
    search_query: String,
    sort: SortSelection,
    results: Vec<Arc<Record>>,
    result_label: String,
    transition: Transition,
    overlay: Option<DetailOverlay>,
    search: Debouncer<String>,
    load_state: LoadState,
}

impl Catalog {
    pub fn new(timing: TransitionTiming, search_debounce: Duration) -> Self {
        Self {
            records: Vec::new(),
            search_query: String::new(),
            sort: SortSelection::default(),
            results: Vec::new(),
            result_label: query::result_count_label(0, false),
            transition: Transition::new(timing),
            overlay: None,
            search: Debouncer::new(search_debounce),
            load_state: LoadState::Idle,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.transition_timing(), config.search_debounce())
    }

    // ── Loading ────────────────────────────────────────────────────────

    /// Show the loading indicator
    pub fn begin_load(&mut self) {
        self.load_state = LoadState::Loading;
    }

    /// Hide the loading indicator and either render the records or show the error
    pub fn finish_load(&mut self, result: Result<Vec<Record>, LoadError>, now: Instant) {
        match result {
            Ok(records) => self.set_records(records, now),
            Err(e) => {
                error!("Error loading books: {}", e);
                self.load_state = LoadState::Failed(format!("Error loading library: {}", e));
            }
        }
    }

    /// Install the loaded records and render them through the current view
    ///
    /// With no query and the default sort this is the newest-first listing;
    /// a query or sort chosen while loading is honoured.
    pub fn set_records(&mut self, records: Vec<Record>, now: Instant) {
        self.records = records.into_iter().map(Arc::new).collect();
        self.load_state = LoadState::Ready;
        self.apply_filters(now);
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    // ── Filter / sort ──────────────────────────────────────────────────

    pub fn records(&self) -> &[Arc<Record>] {
        &self.records
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort(&self) -> &SortSelection {
        &self.sort
    }

    /// Latest filter/sort output
    pub fn results(&self) -> &[Arc<Record>] {
        &self.results
    }

    /// "<n> book(s) found" / "<n> book(s) in collection"
    pub fn result_label(&self) -> &str {
        &self.result_label
    }

    /// Snapshot of the current query and sort
    pub fn view(&self) -> ViewQuery {
        ViewQuery {
            query: self.search_query.clone(),
            sort: self.sort.clone(),
        }
    }

    /// Re-run filter and sort over the full list and start a card transition
    pub fn apply_filters(&mut self, now: Instant) {
        let view = self.view();
        self.results = query::apply(&self.records, &view);
        self.result_label = query::result_count_label(self.results.len(), view.has_query());
        let generation = self.transition.request(self.results.clone(), now);
        debug!(
            query = %view.query,
            sort = %view.sort,
            results = self.results.len(),
            generation,
            "Applied filters"
        );
    }

    /// Search text changed; the query is applied once typing pauses
    pub fn on_search_input(&mut self, raw: &str, now: Instant) {
        self.search.schedule(raw.to_string(), now);
    }

    /// Sort selection changed; applied immediately
    pub fn on_sort_change(&mut self, sort: SortSelection, now: Instant) {
        self.sort = sort;
        self.apply_filters(now);
    }

    /// Whether a search is waiting for the debounce delay
    pub fn search_pending(&self) -> bool {
        self.search.is_pending()
    }

    // ── Cards ──────────────────────────────────────────────────────────

    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Cards currently on screen
    pub fn cards(&self) -> &[Arc<Record>] {
        self.transition.displayed()
    }

    pub fn card_visibility(&self, index: usize, now: Instant) -> CardVisibility {
        self.transition.card_visibility(index, now)
    }

    /// Whether the zero-results placeholder replaces the cards
    pub fn shows_placeholder(&self) -> bool {
        self.load_state == LoadState::Ready && self.transition.shows_placeholder()
    }

    // ── Overlay ────────────────────────────────────────────────────────

    /// Open the detail overlay for `record`, replacing any overlay already present
    pub fn open_detail(&mut self, record: Arc<Record>, now: Instant) {
        if self.overlay.is_some() {
            debug!("Replacing open detail overlay");
        }
        self.overlay = Some(DetailOverlay::open(record, now));
    }

    /// Open the detail overlay for the card at `index`
    pub fn open_card(&mut self, index: usize, now: Instant) -> bool {
        match self.cards().get(index).cloned() {
            Some(record) => {
                self.open_detail(record, now);
                true
            }
            None => false,
        }
    }

    /// Start closing the overlay; returns false if there was nothing to close
    pub fn close_detail(&mut self, now: Instant) -> bool {
        self.overlay
            .as_mut()
            .map(|overlay| overlay.close(now))
            .unwrap_or(false)
    }

    pub fn overlay(&self) -> Option<&DetailOverlay> {
        self.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self) -> Option<&mut DetailOverlay> {
        self.overlay.as_mut()
    }

    /// Background navigation is locked while an overlay is open
    pub fn scroll_locked(&self) -> bool {
        self.overlay.as_ref().is_some_and(|o| !o.is_closing())
    }

    /// Escape closes the overlay only while it is open
    pub fn escape_armed(&self) -> bool {
        self.scroll_locked()
    }

    // ── Timers ─────────────────────────────────────────────────────────

    /// Fire whatever timers are due at `now`
    pub fn tick(&mut self, now: Instant) -> Option<TransitionEvent> {
        if let Some(raw) = self.search.poll(now) {
            self.search_query = query::normalize_query(&raw);
            self.apply_filters(now);
        }

        if let Some(overlay) = self.overlay.as_mut() {
            if !overlay.tick(now) {
                let closed = self.overlay.take();
                debug!(
                    title = closed.as_ref().map(|o| o.record().title.as_str()),
                    "Detail overlay removed"
                );
            }
        }

        self.transition.tick(now)
    }

    /// Whether anything time-based is still in flight
    pub fn is_busy(&self) -> bool {
        self.search.is_pending() || self.transition.is_animating() || self.overlay.is_some()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(TransitionTiming::default(), SEARCH_DEBOUNCE)
    }
}
