//! Domain model for notes and tags.
//!
//! # Responsibility
//! - Define the persisted (normalized) shapes for notes and tags.
//! - Define the derived `ResolvedNote` read model produced by the join.
//!
//! # Invariants
//! - Ids are generated once at creation and never change afterwards.
//! - Notes reference tags by id only; resolution happens on read.

pub mod note;
pub mod tag;
