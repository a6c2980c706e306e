//! # Snapshot Testing Support
//!
//! Utilities for testing segmentation via snapshot assertions and invariant
//! checks.
//!
//! ## Modules
//!
//! - **`normalize`**: Converts rows to a stable `Snap` with a compact text
//!   form for `insta` inline snapshots
//! - **`invariants`**: Runtime checks for segmentation correctness (complete
//!   partition, constant membership, minimal boundaries, increasing ids)

pub mod invariants;
pub mod normalize;

pub use invariants::check as invariants;
pub use normalize::{Snap, normalize};
