//! # standoff-export engine
//!
//! Turns a base text plus independent annotation layers into character-exact
//! standoff markup. The pipeline, leaves first:
//!
//! 1. [`location`] parses token coordinates (`Y.X@At-Run`, `A-B`) and
//!    resolves them to character offsets
//! 2. [`flatten`] joins the base text lines and resolves every fragment into
//!    a tagged [`CharRange`]
//! 3. [`segment`] partitions each line into maximal blocks of constant range
//!    membership, querying a [`RangeOverlay`]
//! 4. [`identity`] numbers layers and annotated blocks for cross-references
//! 5. [`render`] and [`compose`] produce the output flows

pub mod compose;
pub mod error;
pub mod flatten;
pub mod identity;
pub mod location;
pub mod model;
pub mod overlay;
pub mod render;
pub mod segment;
pub mod snapshot;
pub mod span;

pub use compose::{
    BASE_TEXT_FLOW, ComposeError, FsComposer, ItemComposer, ItemComposition, LayerOrder,
};
pub use error::{ExportError, ExportResult};
pub use flatten::{CharRange, Flattened, Layer, TokenTextFlattener};
pub use identity::{RenderContext, assign_identities, target_id};
pub use location::{Location, Point, parse_location, resolve};
pub use model::{Fragment, Item, TextLayer};
pub use overlay::{MergedRangeSet, RangeOverlay};
pub use render::{
    BlockRenderer, LayerRenderer, PlainTextOptions, TeiBlockOptions, TeiLayerOptions,
};
pub use segment::{BlockRow, Segmenter, TextBlock, segment};
pub use span::Span;
