//! Consumer-facing operation surface.
//!
//! # Responsibility
//! - Coordinate note store, tag registry and join view behind one owner.
//! - Apply cross-entity rules such as tag-delete cascade.

pub mod notebook;
