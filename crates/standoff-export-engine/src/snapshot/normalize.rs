use std::fmt;

use serde::Serialize;

use crate::segment::BlockRow;

#[derive(Debug, Serialize)]
pub struct Snap {
    pub rows: Vec<RowSnap>,
}

#[derive(Debug, Serialize)]
pub struct RowSnap {
    pub y: usize,
    pub blocks: Vec<BlockSnap>,
}

#[derive(Debug, Serialize)]
pub struct BlockSnap {
    pub id: usize,
    pub span: (usize, usize),
    pub text: String,
    pub ranges: Vec<String>,
}

pub fn normalize(rows: &[BlockRow]) -> Snap {
    let rows = rows
        .iter()
        .map(|row| RowSnap {
            y: row.y,
            blocks: row
                .blocks
                .iter()
                .map(|b| BlockSnap {
                    id: b.id,
                    span: (b.span.start, b.span.end),
                    text: b.text.clone(),
                    ranges: b.range_ids.clone(),
                })
                .collect(),
        })
        .collect();
    Snap { rows }
}

/// One line per row: `y: [text]{ranges} ...`, ranges omitted when empty.
impl fmt::Display for Snap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            write!(f, "{}:", row.y)?;
            for b in &row.blocks {
                write!(f, " [{}]", b.text)?;
                if !b.ranges.is_empty() {
                    write!(f, "{{{}}}", b.ranges.join(","))?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
