//! Read-side use-case services.
//!
//! # Responsibility
//! - Combine repositories into presentation-ready read models.
//! - Keep boundary layers free of cross-entity lookups.

pub mod stats_service;
