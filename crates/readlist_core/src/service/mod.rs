//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the store's use-case APIs.
//! - Publish one change event per committed mutation.
//! - Keep presentation layers decoupled from storage details.

pub mod assignment_service;
pub mod bookmark_service;
pub mod error;
pub mod folder_service;
pub mod retention;
