//! # Renderers
//!
//! Block renderers turn segmented rows into the base-text flow; layer
//! renderers turn one annotation layer into its own flow, pointing back at
//! the block targets recorded in the [`RenderContext`].
//!
//! Both are closed enums so configuration files can name them directly:
//!
//! ```toml
//! [text_renderer]
//! kind = "tei-standoff"
//! block_open = '<seg xml:id="{target-id}">'
//! ```

pub mod plain;
pub mod tei;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::identity::RenderContext;
use crate::model::TextLayer;
use crate::segment::BlockRow;

pub use plain::PlainTextOptions;
pub use tei::{TeiBlockOptions, TeiLayerOptions};
pub use template::{Metadata, fill_template};

/// Renders the base text rows into a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum BlockRenderer {
    Plain(PlainTextOptions),
    TeiStandoff(TeiBlockOptions),
}

impl Default for BlockRenderer {
    fn default() -> Self {
        Self::TeiStandoff(TeiBlockOptions::default())
    }
}

impl BlockRenderer {
    /// `metadata` carries item-level placeholders; per-row and per-block
    /// values are added on top of a copy.
    pub fn render(&self, rows: &[BlockRow], ctx: &RenderContext, metadata: &Metadata) -> String {
        match self {
            Self::Plain(options) => plain::render_rows(options, rows),
            Self::TeiStandoff(options) => tei::render_rows(options, rows, ctx, metadata),
        }
    }
}

/// Renders one annotation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayerRenderer {
    TeiStandoff(TeiLayerOptions),
    Null,
}

impl LayerRenderer {
    /// Returns `None` when the renderer produces no flow for the layer.
    ///
    /// `layer_index` is the position of `layer` in the flattened input, which
    /// is how its range ids were numbered. `fragment_offset` counts the
    /// fragments already rendered into the same flow by earlier layers with
    /// the same key; fragment numbers continue after it.
    pub fn render(
        &self,
        layer: &TextLayer,
        layer_index: usize,
        fragment_offset: usize,
        ctx: &RenderContext,
        metadata: &Metadata,
    ) -> Option<String> {
        match self {
            Self::TeiStandoff(options) => Some(tei::render_layer(
                options,
                layer,
                layer_index,
                fragment_offset,
                ctx,
                metadata,
            )),
            Self::Null => None,
        }
    }
}
