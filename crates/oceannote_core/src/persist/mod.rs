//! Persistence boundary: blob sinks, codec and the debounced coordinator.
//!
//! # Responsibility
//! - Serialize the note collection to an opaque blob and back.
//! - Keep storage technology behind the `BlobSink` contract.
//! - Schedule writes without blocking interactive commands.
//!
//! # Invariants
//! - Nothing in this module returns a fatal error to the session; failures
//!   degrade to an empty load or a logged, counted write failure.

pub mod codec;
pub mod coordinator;
pub mod scheduler;
pub mod sink;
pub mod sqlite_sink;
