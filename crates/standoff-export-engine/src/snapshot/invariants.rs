use crate::overlay::RangeOverlay;
use crate::segment::BlockRow;

/// Panics unless `rows` are a valid segmentation of `text`.
///
/// Checks that non-empty lines are reproduced exactly by their rows, that
/// every character of a block has the block's membership, that adjacent
/// blocks of a row differ, and that block ids increase by one from 1.
pub fn check<O: RangeOverlay + ?Sized>(text: &str, separator: &str, rows: &[BlockRow], overlay: &O) {
    let lines: Vec<&str> = if separator.is_empty() {
        vec![text]
    } else {
        text.split(separator).collect()
    };
    let expected: Vec<(usize, &str)> = lines
        .iter()
        .enumerate()
        .filter(|(_, l)| !l.is_empty())
        .map(|(i, l)| (i + 1, *l))
        .collect();
    let actual: Vec<(usize, String)> = rows.iter().map(|r| (r.y, r.text())).collect();
    assert_eq!(
        expected.len(),
        actual.len(),
        "row count mismatch: expected lines {expected:?}, got rows {actual:?}"
    );
    for ((y, line), (row_y, row_text)) in expected.iter().zip(&actual) {
        assert_eq!(y, row_y, "row for line {y} reports line {row_y}");
        assert_eq!(*line, row_text, "row {y} does not reproduce its line");
    }

    let mut next_id = 1;
    for row in rows {
        assert!(!row.blocks.is_empty(), "row {} has no blocks", row.y);
        for (i, block) in row.blocks.iter().enumerate() {
            assert!(!block.text.is_empty(), "block {} is empty", block.id);
            assert_eq!(block.id, next_id, "block ids must increase by one");
            next_id += 1;

            assert_eq!(
                block.text.chars().count(),
                block.span.len(),
                "block {} text does not match its span {:?}",
                block.id,
                block.span
            );
            let ids = overlay.ranges_at(block.span.start);
            assert_eq!(ids, block.range_ids, "block {} range ids", block.id);
            for pos in block.span.start + 1..block.span.end {
                assert!(
                    overlay.same_membership(block.span.start, pos),
                    "membership changes inside block {} at {pos}",
                    block.id
                );
            }

            if i > 0 {
                let prev = &row.blocks[i - 1];
                assert_eq!(prev.span.end, block.span.start, "gap before block {}", block.id);
                assert!(
                    !overlay.same_membership(prev.span.start, block.span.start),
                    "blocks {} and {} share membership and should be merged",
                    prev.id,
                    block.id
                );
            }
        }
    }
}
