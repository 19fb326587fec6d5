//! shelf Core Library
//!
//! This crate provides the core functionality for shelf, a searchable and
//! sortable book catalog browser.
//!
//! # Architecture
//!
//! The dataset is loaded once into an immutable list of records. Every view
//! of it is produced by a pure filter/sort pass over an explicit
//! [`ViewQuery`] snapshot; the [`Catalog`] state owns the results, the card
//! transition and the detail overlay, and is driven by a caller-supplied
//! clock.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let source = DataSource::from_config(&config)?;
//!
//! let mut catalog = Catalog::from_config(&config);
//! catalog.begin_load();
//! catalog.finish_load(loader::load(&source).await, Instant::now());
//!
//! catalog.on_sort_change(SortSelection::from_value("title-asc"), Instant::now());
//! ```
//!
//! # Modules
//!
//! - `catalog`: Application state (main entry point)
//! - `models`: Record and raw dataset shapes
//! - `loader`: Dataset fetch and normalization
//! - `query`: Filtering, sorting and count labels
//! - `transition`: Card-set transition state machine
//! - `overlay`: Detail overlay lifecycle
//! - `format`: Display formatting and outbound links
//! - `debounce`: Cancel-and-reschedule timer
//! - `config`: Application configuration

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod format;
pub mod loader;
pub mod models;
pub mod overlay;
pub mod query;
pub mod transition;

pub use catalog::{Catalog, LoadState};
pub use config::Config;
pub use debounce::Debouncer;
pub use loader::{DataSource, LoadError};
pub use models::Record;
pub use overlay::{BookDetail, DetailOverlay};
pub use query::{SortKey, SortSelection, ViewQuery};
pub use transition::{CardVisibility, Transition, TransitionTiming};
