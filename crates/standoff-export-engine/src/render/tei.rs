//! TEI standoff rendering.
//!
//! The base text becomes one container per row with a `<seg>` around every
//! annotated block; each layer becomes a container of elements whose
//! `target` points at those segments.

use html_escape::{encode_double_quoted_attribute, encode_text};
use log::warn;
use serde::{Deserialize, Serialize};

use super::template::{
    M_BLOCK_ID, M_LAYER_KEY, M_LAYER_NR, M_ROW_Y, M_TARGET_ID, Metadata, fill_template,
};
use crate::flatten::{Layer, range_id};
use crate::identity::RenderContext;
use crate::model::TextLayer;
use crate::segment::BlockRow;

/// Prefix turning numeric target ids into valid `xml:id` values.
const DEFAULT_TARGET_PREFIX: &str = "t";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeiBlockOptions {
    pub row_open: String,
    pub row_close: String,
    pub block_open: String,
    pub block_close: String,
    pub target_prefix: String,
}

impl Default for TeiBlockOptions {
    fn default() -> Self {
        Self {
            row_open: r#"<div xml:id="r{item-nr}_{y}">"#.to_string(),
            row_close: "</div>".to_string(),
            block_open: r#"<seg xml:id="{target-id}">"#.to_string(),
            block_close: "</seg>".to_string(),
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeiLayerOptions {
    pub layer_open: String,
    pub layer_close: String,
    /// Element name used for each fragment.
    pub element: String,
    /// Must match the block renderer's prefix for targets to resolve.
    pub target_prefix: String,
    pub fragment_prefix: String,
}

impl Default for TeiLayerOptions {
    fn default() -> Self {
        Self {
            layer_open: r#"<div type="{layer-key}">"#.to_string(),
            layer_close: "</div>".to_string(),
            element: "note".to_string(),
            target_prefix: DEFAULT_TARGET_PREFIX.to_string(),
            fragment_prefix: "f".to_string(),
        }
    }
}

pub(crate) fn render_rows(
    options: &TeiBlockOptions,
    rows: &[BlockRow],
    ctx: &RenderContext,
    metadata: &Metadata,
) -> String {
    let mut data = metadata.clone();
    let mut out = String::new();

    for (row_index, row) in rows.iter().enumerate() {
        data.insert(M_ROW_Y.to_string(), (row_index + 1).to_string());
        data.remove(M_BLOCK_ID);
        data.remove(M_TARGET_ID);
        out.push_str(&fill_template(&options.row_open, &data));

        for block in &row.blocks {
            data.insert(M_BLOCK_ID.to_string(), block.id.to_string());
            let text = encode_text(&block.text);
            match ctx.block_target(block.id) {
                Some(target) if block.is_annotated() => {
                    data.insert(
                        M_TARGET_ID.to_string(),
                        format!("{}{target}", options.target_prefix),
                    );
                    out.push_str(&fill_template(&options.block_open, &data));
                    out.push_str(&text);
                    out.push_str(&fill_template(&options.block_close, &data));
                }
                _ => {
                    data.remove(M_TARGET_ID);
                    out.push_str(&text);
                }
            }
        }

        data.remove(M_BLOCK_ID);
        data.remove(M_TARGET_ID);
        out.push_str(&fill_template(&options.row_close, &data));
    }
    out
}

pub(crate) fn render_layer(
    options: &TeiLayerOptions,
    layer: &TextLayer,
    layer_index: usize,
    fragment_offset: usize,
    ctx: &RenderContext,
    metadata: &Metadata,
) -> String {
    let key = layer.key();
    let layer_nr = ctx.layer_ordinal(&key).unwrap_or(layer_index + 1);

    let mut data = metadata.clone();
    data.insert(M_LAYER_KEY.to_string(), key.clone());
    data.insert(M_LAYER_NR.to_string(), layer_nr.to_string());

    let mut lines = vec![fill_template(&options.layer_open, &data)];
    for (fragment_index, fragment) in layer.fragments.iter().enumerate() {
        let mut element = format!(
            r#"<{} xml:id="{}{}_{}_{}""#,
            options.element,
            options.fragment_prefix,
            ctx.item_nr,
            layer_nr,
            fragment_offset + fragment_index + 1
        );

        let id = range_id(layer_index, fragment_index);
        let targets = ctx.targets_of(&id);
        if targets.is_empty() {
            warn!(
                "Fragment {id} ({}) of layer {key} touches no block",
                fragment.location
            );
        } else {
            let refs = targets
                .iter()
                .map(|t| format!("#{}{t}", options.target_prefix))
                .collect::<Vec<_>>()
                .join(" ");
            element.push_str(&format!(r#" target="{refs}""#));
        }

        if let Some(tag) = fragment.tag.as_deref() {
            element.push_str(&format!(
                r#" type="{}""#,
                encode_double_quoted_attribute(tag)
            ));
        }
        if !fragment.attributes.is_empty() {
            let n = fragment
                .attributes
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join(" ");
            element.push_str(&format!(r#" n="{}""#, encode_double_quoted_attribute(&n)));
        }

        match fragment.text.as_deref() {
            Some(text) => {
                element.push('>');
                element.push_str(&encode_text(text));
                element.push_str(&format!("</{}>", options.element));
            }
            None => element.push_str("/>"),
        }
        lines.push(element);
    }
    lines.push(fill_template(&options.layer_close, &data));
    lines.join("\n")
}
