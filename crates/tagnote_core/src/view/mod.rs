//! Read-side projections over notes and tags.
//!
//! # Responsibility
//! - Join normalized notes with the tag registry (`join`).
//! - Filter resolved notes by title and selected tags (`filter`).
//!
//! # Invariants
//! - Projections are pure; caching never changes results.

pub mod filter;
pub mod join;
