//! Collection service for Shelf.
//!
//! This module provides:
//! - The collection service, the single entry point for collection changes
//! - Change notifications fanned out to in-process listeners
//! - Service configuration and provider selection
//!
//! # Architecture
//! The service sits between the user interface and a collection provider.
//! It validates input, checks for duplicate titles, calls the provider, and
//! notifies listeners once the provider confirms the change. Provider errors
//! never escape: every operation answers with a plain outcome value.

pub mod config;
pub mod events;
pub mod outcome;
pub mod service;
pub mod view;

#[cfg(test)]
mod testing;

pub use config::{ShelfConfig, CONFIG_FILENAME};
pub use events::{ChangeNotifier, CollectionChanged, CollectionEvent, ListenerId, Listeners};
pub use outcome::{ChangeOutcome, Failure, Operation};
pub use service::CollectionService;
pub use view::CollectionView;
