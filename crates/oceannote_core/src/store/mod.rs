//! In-memory note store and derived views.
//!
//! # Responsibility
//! - Hold the canonical note collection, selection pointer and search query.
//! - Keep ordering/filtering as pure functions over the collection.
//!
//! # Invariants
//! - Recency ordering is recomputed on demand and never stored.

pub mod note_store;
pub mod query;
