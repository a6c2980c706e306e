use serde::{Deserialize, Serialize};

use crate::segment::BlockRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlainTextOptions {
    /// Inserted between blocks of the same row.
    pub block_separator: String,
    /// Appended after every row.
    pub row_separator: String,
}

impl Default for PlainTextOptions {
    fn default() -> Self {
        Self {
            block_separator: String::new(),
            row_separator: "\n".to_string(),
        }
    }
}

pub(crate) fn render_rows(options: &PlainTextOptions, rows: &[BlockRow]) -> String {
    let mut out = String::new();
    for row in rows {
        for (i, block) in row.blocks.iter().enumerate() {
            if i > 0 {
                out.push_str(&options.block_separator);
            }
            out.push_str(&block.text);
        }
        out.push_str(&options.row_separator);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::CharRange;
    use crate::overlay::MergedRangeSet;
    use crate::segment::segment;

    fn rows() -> Vec<BlockRow> {
        let overlay: MergedRangeSet = vec![CharRange::new(2, 4, 0, 0)].into();
        segment("que bixit\nannos XX", "\n", &overlay).collect()
    }

    #[test]
    fn default_reproduces_lines() {
        let out = render_rows(&PlainTextOptions::default(), &rows());
        insta::assert_snapshot!(out, @r"
        que bixit
        annos XX
        ");
    }

    #[test]
    fn block_separator_exposes_boundaries() {
        let options = PlainTextOptions {
            block_separator: "|".to_string(),
            row_separator: "\n".to_string(),
        };
        assert_eq!(render_rows(&options, &rows()), "qu|e b|ixit\nannos XX\n");
    }
}
