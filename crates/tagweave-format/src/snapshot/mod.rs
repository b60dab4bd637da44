//! # Snapshot Testing Support
//!
//! Utilities for checking block trees in tests.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts a block tree to a stable, serializable `Snap`
//!   and renders it as indented text for `insta` snapshots
//! - **`invariants`**: Structural checks every built tree must pass (children
//!   ordered, disjoint, contained, and covering all non-whitespace text)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize, render};
