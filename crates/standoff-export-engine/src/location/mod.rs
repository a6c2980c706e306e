//! # Token-relative locations
//!
//! Fragments address the base text with expressions like `2.3@1-4`: line 2,
//! token 3, four characters from the first one. This module parses those
//! expressions and resolves them into absolute character offsets.
//!
//! - **`cursor`**: byte cursor used by the parser
//! - **`point`**: `Point` / `Location` types and the grammar
//! - **`resolve`**: offset resolution against line-structured text

pub mod cursor;
pub mod point;
pub mod resolve;

pub use point::{Location, Point, parse_location};
pub use resolve::{LineLookup, resolve};
