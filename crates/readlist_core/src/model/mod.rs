//! Domain model for the bookmark and folder store.
//!
//! # Responsibility
//! - Define canonical records shared by repositories and services.
//! - Keep entity references explicit (ids), never object-graph pointers.
//!
//! # Invariants
//! - Every folder and bookmark is identified by a stable UUID.
//! - At most one active bookmark exists per content id or url.

pub mod bookmark;
pub mod folder;
pub mod post;
pub mod validation;
