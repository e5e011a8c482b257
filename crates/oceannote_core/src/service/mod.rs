//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store commands and persistence policy into session APIs.
//! - Keep the view layer decoupled from storage and timing details.

pub mod note_session;
