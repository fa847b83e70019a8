//! Read-only reporting over the entity store.
//!
//! # Responsibility
//! - Derive system-wide statistics from stored records on demand.
//! - Never mutate state.

pub mod dashboard;
