//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted entity (`Note`) and its identity type.
//! - Provide display projections used by list/editor views.
//!
//! # Invariants
//! - `NoteId` is assigned once at creation and never changes.
//! - Serialized shape is `{ id, title, content, updatedAt }`.

pub mod note;
