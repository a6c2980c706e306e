//! # Item composition
//!
//! Runs one item through the whole pipeline (flatten, segment, assign
//! identities, render) and collects the rendered flows by key: the base
//! text under [`BASE_TEXT_FLOW`] and each rendered layer under its key.

pub mod fs;

use std::collections::BTreeMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ExportResult;
use crate::flatten::{Layer, TokenTextFlattener};
use crate::identity::{RenderContext, assign_identities};
use crate::model::{Item, TextLayer};
use crate::overlay::MergedRangeSet;
use crate::render::template::{M_GROUP_ID, M_ITEM_ID, M_ITEM_NR, M_ITEM_TITLE};
use crate::render::{BlockRenderer, LayerRenderer, Metadata};
use crate::segment::{BlockRow, segment};

pub use fs::{ComposeError, FsComposer};

/// Flow key of the rendered base text.
pub const BASE_TEXT_FLOW: &str = "base-text";

/// Order in which an item's layers are flattened and numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerOrder {
    /// Sorted by layer key; stable for equal keys.
    #[default]
    ByKey,
    AsDeclared,
}

/// Everything produced for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemComposition {
    pub flows: BTreeMap<String, String>,
    pub context: RenderContext,
    pub rows: Vec<BlockRow>,
}

#[derive(Debug, Clone, Default)]
pub struct ItemComposer {
    pub flattener: TokenTextFlattener,
    pub text_renderer: BlockRenderer,
    /// Layer key to renderer; layers without an entry produce no flow.
    pub layer_renderers: BTreeMap<String, LayerRenderer>,
    pub layer_order: LayerOrder,
}

impl ItemComposer {
    pub fn new(text_renderer: BlockRenderer) -> Self {
        Self {
            text_renderer,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_layer_renderer(mut self, key: impl Into<String>, renderer: LayerRenderer) -> Self {
        self.layer_renderers.insert(key.into(), renderer);
        self
    }

    #[must_use]
    pub fn with_layer_order(mut self, order: LayerOrder) -> Self {
        self.layer_order = order;
        self
    }

    #[must_use]
    pub fn with_line_separator(mut self, separator: impl Into<String>) -> Self {
        self.flattener = TokenTextFlattener::new(separator);
        self
    }

    /// Layers of `item` in processing order.
    pub fn ordered_layers<'a>(&self, item: &'a Item) -> Vec<&'a TextLayer> {
        let mut layers: Vec<&TextLayer> = item.layers.iter().collect();
        if self.layer_order == LayerOrder::ByKey {
            layers.sort_by_cached_key(|l| l.key());
        }
        layers
    }

    /// Composes one item. `item_nr` is the 1-based position of the item in
    /// the export and ends up in every generated id.
    pub fn compose(&self, item: &Item, item_nr: usize) -> ExportResult<ItemComposition> {
        debug!("Composing item {} ({item_nr})", item.id);
        let layers = self.ordered_layers(item);

        let flat = self.flattener.flatten(&item.base_text, &layers)?;
        let overlay = MergedRangeSet::new(flat.ranges);
        let rows: Vec<BlockRow> =
            segment(&flat.text, &self.flattener.line_separator, &overlay).collect();
        let context = assign_identities(item_nr, &flat.layer_keys, &rows);

        let metadata = item_metadata(item, item_nr);
        let mut flows = BTreeMap::new();
        flows.insert(
            BASE_TEXT_FLOW.to_string(),
            self.text_renderer.render(&rows, &context, &metadata),
        );

        // Layers sharing a key share a flow, so fragment numbers carry over.
        let mut fragments_per_key: BTreeMap<String, usize> = BTreeMap::new();
        for (layer_index, layer) in layers.iter().enumerate() {
            let key = layer.key();
            let Some(renderer) = self.layer_renderers.get(&key) else {
                debug!("No renderer for layer {key}, skipping");
                continue;
            };
            let offset = fragments_per_key.entry(key.clone()).or_default();
            let fragment_offset = *offset;
            *offset += layer.fragments.len();
            let Some(rendered) =
                renderer.render(layer, layer_index, fragment_offset, &context, &metadata)
            else {
                continue;
            };
            match flows.get_mut(&key) {
                Some(flow) => {
                    flow.push('\n');
                    flow.push_str(&rendered);
                }
                None => {
                    flows.insert(key, rendered);
                }
            }
        }

        debug!(
            "Item {} composed into {} rows and {} flows",
            item.id,
            rows.len(),
            flows.len()
        );

        Ok(ItemComposition {
            flows,
            context,
            rows,
        })
    }
}

fn item_metadata(item: &Item, item_nr: usize) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(M_ITEM_NR.to_string(), item_nr.to_string());
    metadata.insert(M_ITEM_ID.to_string(), item.id.clone());
    metadata.insert(M_ITEM_TITLE.to_string(), item.title.clone());
    if let Some(group) = &item.group_id {
        metadata.insert(M_GROUP_ID.to_string(), group.clone());
    }
    metadata
}
