//! # Block segmentation
//!
//! Splits flattened text into rows (one per non-empty source line) of maximal
//! blocks whose characters all share the same set of active ranges.
//!
//! The scan is a single left-to-right pass with no backtracking. Block ids
//! come from a counter that runs across the whole document, so ids stay
//! unique and increasing even though rows are produced lazily.

use std::iter::FusedIterator;

use log::trace;

use crate::overlay::RangeOverlay;
use crate::span::Span;

/// A maximal run of characters with constant range membership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    /// Document-wide ordinal, starting at 1.
    pub id: usize,
    pub text: String,
    /// Ids of the ranges active over the whole block, in range order.
    pub range_ids: Vec<String>,
    pub span: Span,
}

impl TextBlock {
    pub fn is_annotated(&self) -> bool {
        !self.range_ids.is_empty()
    }
}

/// The blocks of one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockRow {
    /// 1-based source line number.
    pub y: usize,
    pub blocks: Vec<TextBlock>,
}

impl BlockRow {
    /// Concatenated block texts; equal to the source line.
    pub fn text(&self) -> String {
        self.blocks.iter().map(|b| b.text.as_str()).collect()
    }
}

/// Lazy row iterator returned by [`segment`].
pub struct Segmenter<'a, O: RangeOverlay + ?Sized> {
    chars: Vec<char>,
    separator: Vec<char>,
    overlay: &'a O,
    pos: usize,
    block_start: usize,
    blocks_emitted: usize,
    y: usize,
}

/// Segments `text` into rows split on `row_separator`.
///
/// An empty separator disables row splitting: the whole text is one row.
pub fn segment<'a, O: RangeOverlay + ?Sized>(
    text: &str,
    row_separator: &str,
    overlay: &'a O,
) -> Segmenter<'a, O> {
    Segmenter {
        chars: text.chars().collect(),
        separator: row_separator.chars().collect(),
        overlay,
        pos: 0,
        block_start: 0,
        blocks_emitted: 0,
        y: 1,
    }
}

impl<O: RangeOverlay + ?Sized> Segmenter<'_, O> {
    fn separator_at(&self, i: usize) -> bool {
        !self.separator.is_empty() && self.chars[i..].starts_with(&self.separator)
    }

    fn close_block(&mut self, end: usize, blocks: &mut Vec<TextBlock>) {
        if end <= self.block_start {
            return;
        }
        self.blocks_emitted += 1;
        let span = Span::new(self.block_start, end);
        let block = TextBlock {
            id: self.blocks_emitted,
            text: self.chars[span.start..span.end].iter().collect(),
            range_ids: self
                .overlay
                .ranges_at(span.start)
                .into_iter()
                .map(str::to_string)
                .collect(),
            span,
        };
        trace!("block {} {:?} {:?}", block.id, block.span, block.range_ids);
        blocks.push(block);
    }
}

impl<O: RangeOverlay + ?Sized> Iterator for Segmenter<'_, O> {
    type Item = BlockRow;

    fn next(&mut self) -> Option<BlockRow> {
        let mut blocks = Vec::new();
        while self.pos < self.chars.len() {
            let i = self.pos;
            if self.separator_at(i) {
                self.close_block(i, &mut blocks);
                let y = self.y;
                self.y += 1;
                self.pos += self.separator.len();
                self.block_start = self.pos;
                if !blocks.is_empty() {
                    return Some(BlockRow { y, blocks });
                }
                continue;
            }
            if i > self.block_start && !self.overlay.same_membership(i, i - 1) {
                self.close_block(i, &mut blocks);
                self.block_start = i;
            }
            self.pos += 1;
        }

        self.close_block(self.chars.len(), &mut blocks);
        self.block_start = self.chars.len();
        if blocks.is_empty() {
            None
        } else {
            Some(BlockRow { y: self.y, blocks })
        }
    }
}

impl<O: RangeOverlay + ?Sized> FusedIterator for Segmenter<'_, O> {}
