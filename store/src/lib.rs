//! Abstract storage for wallet starters.
//!
//! Every backend (the JSON file store, the in-memory store used by tests)
//! implements [`StarterStore`]. The rest of the codebase depends only on the
//! trait. Backends report mutations through an [`EventBus`] so that observers
//! (a UI, a log) can react without being part of the storage contract.

pub mod error;
pub mod events;
pub mod starter;

pub use error::StoreError;
pub use events::{EventBus, StoreEvent};
pub use starter::StarterStore;
