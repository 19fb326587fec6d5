//! Card-set transitions
//!
//! Replacing the visible cards is a timed sequence: the old cards hide one
//! after another, the set is swapped once they have all gone and the settle
//! interval has passed, then the new cards appear one after another.
//!
//! ```text
//!   Idle ──request──▶ TearingDown ──tick (all hidden + settle)──▶ RenderingIn ──tick──▶ Idle
//!     ▲                   │  ▲                                          │
//!     │                   └──┘ request: replace pending set             │
//!     └─────────────── request while nothing is displayed ◀─────────────┘
//! ```
//!
//! Every request bumps a generation counter. Only the newest pending set is
//! ever swapped in, so rapid requests supersede each other instead of
//! interleaving two sequences.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::models::Record;

/// Delays used by the transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTiming {
    /// Extra delay per card when hiding the old set
    pub teardown_stagger: Duration,
    /// Wait after the last card has hidden before swapping
    pub settle: Duration,
    /// Wait after the swap before the first new card appears
    pub render_delay: Duration,
    /// Extra delay per card when showing the new set
    pub render_stagger: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            teardown_stagger: Duration::from_millis(50),
            settle: Duration::from_millis(300),
            render_delay: Duration::from_millis(50),
            render_stagger: Duration::from_millis(100),
        }
    }
}

impl TransitionTiming {
    /// No delays at all; requests swap immediately
    pub fn instant() -> Self {
        Self {
            teardown_stagger: Duration::ZERO,
            settle: Duration::ZERO,
            render_delay: Duration::ZERO,
            render_stagger: Duration::ZERO,
        }
    }

    fn is_instant(&self) -> bool {
        *self == Self::instant()
    }

    fn teardown_total(&self, outgoing: usize) -> Duration {
        stagger(self.teardown_stagger, outgoing) + self.settle
    }

    fn reveal_at(&self, index: usize) -> Duration {
        self.render_delay + stagger(self.render_stagger, index)
    }
}

fn stagger(step: Duration, index: usize) -> Duration {
    step.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Where the transition currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// All displayed cards are visible
    Idle,
    /// Old cards are hiding; a new set is pending
    TearingDown {
        started: Instant,
        /// Cards on screen when teardown began
        outgoing: usize,
        /// How many of those were visible at that moment
        shown: usize,
    },
    /// New cards are appearing
    RenderingIn { started: Instant },
}

/// Whether a single card is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardVisibility {
    Visible,
    Hidden,
}

/// Reported by [`Transition::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEvent {
    /// The pending set replaced the displayed one
    Swapped { generation: u64 },
    /// Every displayed card is now visible
    Settled,
}

/// State machine driving what the card pane shows
#[derive(Debug, Clone)]
pub struct Transition {
    timing: TransitionTiming,
    phase: Phase,
    generation: u64,
    displayed: Vec<Arc<Record>>,
    displayed_generation: u64,
    pending: Option<(u64, Vec<Arc<Record>>)>,
}

impl Transition {
    pub fn new(timing: TransitionTiming) -> Self {
        Self {
            timing,
            phase: Phase::Idle,
            generation: 0,
            displayed: Vec::new(),
            displayed_generation: 0,
            pending: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Generation of the newest request
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation of the set currently on screen
    pub fn displayed_generation(&self) -> u64 {
        self.displayed_generation
    }

    /// Cards currently on screen (visible or not)
    pub fn displayed(&self) -> &[Arc<Record>] {
        &self.displayed
    }

    /// Whether the zero-results message should be drawn
    pub fn shows_placeholder(&self) -> bool {
        self.generation > 0
            && self.displayed.is_empty()
            && !matches!(self.phase, Phase::TearingDown { .. })
    }

    /// Whether any timed step is still outstanding
    pub fn is_animating(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Ask for `records` to replace the card set; returns the request's generation
    pub fn request(&mut self, records: Vec<Arc<Record>>, now: Instant) -> u64 {
        self.generation += 1;
        let generation = self.generation;

        if self.timing.is_instant() {
            self.pending = None;
            self.show(generation, records, now);
            self.phase = Phase::Idle;
            return generation;
        }

        match self.phase {
            Phase::TearingDown { .. } => {
                debug!(generation, "superseding pending card set");
                self.pending = Some((generation, records));
            }
            _ if self.displayed.is_empty() => {
                self.show(generation, records, now);
            }
            _ => {
                let shown = (0..self.displayed.len())
                    .take_while(|&i| self.card_visibility(i, now) == CardVisibility::Visible)
                    .count();
                self.phase = Phase::TearingDown {
                    started: now,
                    outgoing: self.displayed.len(),
                    shown,
                };
                self.pending = Some((generation, records));
            }
        }

        generation
    }

    fn show(&mut self, generation: u64, records: Vec<Arc<Record>>, started: Instant) {
        self.displayed = records;
        self.displayed_generation = generation;
        self.phase = if self.displayed.is_empty() {
            Phase::Idle
        } else {
            Phase::RenderingIn { started }
        };
    }

    /// Advance timed steps that are due at `now`
    pub fn tick(&mut self, now: Instant) -> Option<TransitionEvent> {
        match self.phase {
            Phase::Idle => None,
            Phase::TearingDown {
                started, outgoing, ..
            } => {
                let swap_at = started + self.timing.teardown_total(outgoing);
                if now < swap_at {
                    return None;
                }
                let (generation, records) = self
                    .pending
                    .take()
                    .unwrap_or((self.generation, Vec::new()));
                debug!(generation, cards = records.len(), "swapping card set");
                self.show(generation, records, swap_at);
                Some(TransitionEvent::Swapped { generation })
            }
            Phase::RenderingIn { started } => {
                let last = self.displayed.len().saturating_sub(1);
                if now < started + self.timing.reveal_at(last) {
                    return None;
                }
                self.phase = Phase::Idle;
                Some(TransitionEvent::Settled)
            }
        }
    }

    /// Visibility of the displayed card at `index`
    pub fn card_visibility(&self, index: usize, now: Instant) -> CardVisibility {
        if index >= self.displayed.len() {
            return CardVisibility::Hidden;
        }
        let visible = match self.phase {
            Phase::Idle => true,
            Phase::RenderingIn { started } => now >= started + self.timing.reveal_at(index),
            Phase::TearingDown { started, shown, .. } => {
                index < shown && now < started + stagger(self.timing.teardown_stagger, index)
            }
        };
        if visible {
            CardVisibility::Visible
        } else {
            CardVisibility::Hidden
        }
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(TransitionTiming::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample;

    fn books(titles: &[&str]) -> Vec<Arc<Record>> {
        titles
            .iter()
            .map(|t| Arc::new(sample(t, 2000, "Author")))
            .collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn displayed_titles(t: &Transition) -> Vec<String> {
        t.displayed().iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn test_first_render_is_immediate_then_staggered() {
        let start = Instant::now();
        let mut t = Transition::default();
        t.request(books(&["A", "B", "C"]), start);

        assert_eq!(displayed_titles(&t), vec!["A", "B", "C"]);
        assert_eq!(t.phase(), Phase::RenderingIn { started: start });

        assert_eq!(t.card_visibility(0, start), CardVisibility::Hidden);
        assert_eq!(t.card_visibility(0, start + ms(50)), CardVisibility::Visible);
        assert_eq!(t.card_visibility(1, start + ms(100)), CardVisibility::Hidden);
        assert_eq!(t.card_visibility(1, start + ms(150)), CardVisibility::Visible);
        assert_eq!(t.card_visibility(2, start + ms(250)), CardVisibility::Visible);

        assert_eq!(t.tick(start + ms(249)), None);
        assert_eq!(t.tick(start + ms(250)), Some(TransitionEvent::Settled));
        assert_eq!(t.phase(), Phase::Idle);
    }

    #[test]
    fn test_replacement_tears_down_before_swapping() {
        let start = Instant::now();
        let mut t = Transition::default();
        t.request(books(&["A", "B"]), start);
        t.tick(start + ms(1000));

        let at = start + ms(2000);
        let generation = t.request(books(&["X"]), at);
        assert!(matches!(t.phase(), Phase::TearingDown { outgoing: 2, shown: 2, .. }));
        // Old cards stay on screen while hiding
        assert_eq!(displayed_titles(&t), vec!["A", "B"]);
        assert_eq!(t.card_visibility(0, at), CardVisibility::Hidden);
        assert_eq!(t.card_visibility(1, at + ms(49)), CardVisibility::Visible);
        assert_eq!(t.card_visibility(1, at + ms(50)), CardVisibility::Hidden);

        // 2 cards * 50ms + 300ms settle
        assert_eq!(t.tick(at + ms(399)), None);
        assert_eq!(
            t.tick(at + ms(400)),
            Some(TransitionEvent::Swapped { generation })
        );
        assert_eq!(displayed_titles(&t), vec!["X"]);
        assert_eq!(t.displayed_generation(), generation);
        assert_eq!(t.card_visibility(0, at + ms(449)), CardVisibility::Hidden);
        assert_eq!(t.card_visibility(0, at + ms(450)), CardVisibility::Visible);
    }

    #[test]
    fn test_rapid_requests_only_swap_newest() {
        let start = Instant::now();
        let mut t = Transition::default();
        t.request(books(&["A"]), start);
        t.tick(start + ms(100));

        let at = start + ms(200);
        t.request(books(&["first"]), at);
        t.request(books(&["second"]), at + ms(10));
        let newest = t.request(books(&["third", "fourth"]), at + ms(20));

        // Superseding does not restart the teardown clock
        assert_eq!(
            t.tick(at + ms(350)),
            Some(TransitionEvent::Swapped { generation: newest })
        );
        assert_eq!(displayed_titles(&t), vec!["third", "fourth"]);
        assert_eq!(t.generation(), newest);
    }

    #[test]
    fn test_request_mid_reveal_hides_only_shown_cards() {
        let start = Instant::now();
        let mut t = Transition::default();
        t.request(books(&["A", "B", "C"]), start);

        // At 160ms cards 0 and 1 are visible, card 2 is not yet
        let at = start + ms(160);
        t.request(books(&["Z"]), at);
        assert!(matches!(t.phase(), Phase::TearingDown { shown: 2, .. }));
        assert_eq!(t.card_visibility(2, at), CardVisibility::Hidden);
        assert_eq!(t.card_visibility(1, at + ms(10)), CardVisibility::Visible);
    }

    #[test]
    fn test_empty_results_show_placeholder() {
        let start = Instant::now();
        let mut t = Transition::default();
        assert!(!t.shows_placeholder());

        t.request(books(&["A"]), start);
        t.tick(start + ms(100));
        t.request(Vec::new(), start + ms(200));
        assert!(!t.shows_placeholder());

        t.tick(start + ms(550));
        assert!(t.displayed().is_empty());
        assert!(t.shows_placeholder());
        assert_eq!(t.phase(), Phase::Idle);

        // From the placeholder the next set renders without a teardown
        t.request(books(&["B"]), start + ms(600));
        assert!(matches!(t.phase(), Phase::RenderingIn { .. }));
        assert!(!t.shows_placeholder());
    }

    #[test]
    fn test_instant_timing_swaps_immediately() {
        let now = Instant::now();
        let mut t = Transition::new(TransitionTiming::instant());
        t.request(books(&["A", "B"]), now);
        t.request(books(&["C"]), now);

        assert_eq!(displayed_titles(&t), vec!["C"]);
        assert_eq!(t.phase(), Phase::Idle);
        assert_eq!(t.card_visibility(0, now), CardVisibility::Visible);
        assert!(!t.is_animating());
    }
}
