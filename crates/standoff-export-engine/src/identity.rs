use std::collections::BTreeMap;

use crate::segment::BlockRow;

/// Per-item identities shared by the block and layer renderers.
///
/// Built once per item by [`assign_identities`] and handed to each renderer;
/// nothing here survives from one item to the next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub item_nr: usize,
    layer_ordinals: BTreeMap<String, usize>,
    /// Range id to every target it touches, in document order.
    fragment_targets: BTreeMap<String, Vec<String>>,
    /// Block id to target id, for annotated blocks only.
    block_targets: BTreeMap<usize, String>,
}

/// Formats the target id of a block.
pub fn target_id(item_nr: usize, row_nr: usize, block_id: usize) -> String {
    format!("{item_nr}_{row_nr}_{block_id}")
}

/// Numbers layers and annotated blocks for one item.
///
/// `layer_keys` must already be in processing order: the first occurrence of
/// each key gets the next ordinal starting at 1, and repeated keys share it.
pub fn assign_identities<K: AsRef<str>>(
    item_nr: usize,
    layer_keys: &[K],
    rows: &[BlockRow],
) -> RenderContext {
    let mut ctx = RenderContext {
        item_nr,
        ..RenderContext::default()
    };

    for key in layer_keys {
        let next = ctx.layer_ordinals.len() + 1;
        ctx.layer_ordinals
            .entry(key.as_ref().to_string())
            .or_insert(next);
    }

    for (row_index, row) in rows.iter().enumerate() {
        for block in row.blocks.iter().filter(|b| b.is_annotated()) {
            let target = target_id(item_nr, row_index + 1, block.id);
            for id in &block.range_ids {
                ctx.fragment_targets
                    .entry(id.clone())
                    .or_default()
                    .push(target.clone());
            }
            ctx.block_targets.insert(block.id, target);
        }
    }

    ctx
}

impl RenderContext {
    /// 1-based ordinal of a layer key.
    pub fn layer_ordinal(&self, key: &str) -> Option<usize> {
        self.layer_ordinals.get(key).copied()
    }

    pub fn layer_count(&self) -> usize {
        self.layer_ordinals.len()
    }

    /// The last target recorded for a range.
    pub fn target_of(&self, range_id: &str) -> Option<&str> {
        self.targets_of(range_id).last().map(String::as_str)
    }

    pub fn first_target_of(&self, range_id: &str) -> Option<&str> {
        self.targets_of(range_id).first().map(String::as_str)
    }

    /// Every target a range touches, in document order. Empty for unknown ids.
    pub fn targets_of(&self, range_id: &str) -> &[String] {
        self.fragment_targets
            .get(range_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn block_target(&self, block_id: usize) -> Option<&str> {
        self.block_targets.get(&block_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::CharRange;
    use crate::overlay::MergedRangeSet;
    use crate::segment::segment;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<BlockRow> {
        let overlay: MergedRangeSet = vec![
            CharRange::new(2, 2, 0, 0),
            CharRange::new(2, 4, 1, 0),
            CharRange::new(4, 14, 2, 0),
        ]
        .into();
        segment("que bixit\nannos XX", "\n", &overlay).collect()
    }

    #[test]
    fn layer_ordinals_follow_given_order() {
        let ctx = assign_identities(1, &["app", "comm", "app", "orth"], &[]);
        assert_eq!(ctx.layer_ordinal("app"), Some(1));
        assert_eq!(ctx.layer_ordinal("comm"), Some(2));
        assert_eq!(ctx.layer_ordinal("orth"), Some(3));
        assert_eq!(ctx.layer_ordinal("none"), None);
        assert_eq!(ctx.layer_count(), 3);
    }

    #[test]
    fn fragments_keep_every_touched_target() {
        let ctx = assign_identities(3, &["a", "b", "c"], &rows());
        assert_eq!(ctx.targets_of("L0F0"), ["3_1_2"]);
        assert_eq!(ctx.targets_of("L1F0"), ["3_1_2", "3_1_3", "3_1_4"]);
        assert_eq!(ctx.targets_of("L2F0"), ["3_1_4", "3_1_5", "3_2_6"]);
        assert_eq!(ctx.target_of("L2F0"), Some("3_2_6"));
        assert_eq!(ctx.first_target_of("L2F0"), Some("3_1_4"));
        assert!(ctx.targets_of("L9F9").is_empty());
        assert_eq!(ctx.target_of("L9F9"), None);
    }

    #[test]
    fn only_annotated_blocks_get_targets() {
        let ctx = assign_identities(1, &["a"], &rows());
        assert_eq!(ctx.block_target(1), None);
        assert_eq!(ctx.block_target(2), Some("1_1_2"));
        assert_eq!(ctx.block_target(7), None);
    }

    #[test]
    fn row_ordinal_counts_yielded_rows() {
        let overlay: MergedRangeSet = vec![CharRange::new(3, 3, 0, 0)].into();
        // Line 2 is empty, so "b" lives on the second yielded row.
        let rows: Vec<_> = segment("a\n\nb", "\n", &overlay).collect();
        let ctx = assign_identities(1, &["a"], &rows);
        assert_eq!(rows[1].y, 3);
        assert_eq!(ctx.target_of("L0F0"), Some("1_2_2"));
    }

    #[test]
    fn contexts_are_independent() {
        let first = assign_identities(1, &["a"], &rows());
        let second = assign_identities(2, &["z"], &[]);
        assert_eq!(second.layer_ordinal("a"), None);
        assert!(second.targets_of("L0F0").is_empty());
        assert_eq!(first.item_nr, 1);
        assert_eq!(second.item_nr, 2);
    }
}
