//! Flattening of line-structured text plus annotation layers into one string
//! and a list of tagged character ranges.

use log::debug;

use crate::error::{ExportError, ExportResult};
use crate::location::{parse_location, resolve};

/// Something that contributes fragments anchored to the base text.
///
/// Implementors list their fragment locations in declared order; the
/// flattener numbers them by position in that list.
pub trait Layer {
    /// Stable key used to order layers and to label their output.
    fn key(&self) -> String;

    fn fragment_locations(&self) -> Vec<&str>;
}

impl<L: Layer + ?Sized> Layer for &L {
    fn key(&self) -> String {
        (**self).key()
    }

    fn fragment_locations(&self) -> Vec<&str> {
        (**self).fragment_locations()
    }
}

/// One fragment resolved against the flattened text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharRange {
    /// Inclusive start character offset.
    pub start: usize,
    /// Inclusive end character offset.
    pub end: usize,
    /// `L{layer}F{fragment}`.
    pub id: String,
    /// `L{layer}`.
    pub group_id: String,
    pub layer_index: usize,
    pub fragment_index: usize,
}

impl CharRange {
    pub fn new(start: usize, end: usize, layer_index: usize, fragment_index: usize) -> Self {
        Self {
            start,
            end,
            id: range_id(layer_index, fragment_index),
            group_id: group_id(layer_index),
            layer_index,
            fragment_index,
        }
    }

    pub fn covers(&self, pos: usize) -> bool {
        self.start <= pos && pos <= self.end
    }
}

pub fn range_id(layer_index: usize, fragment_index: usize) -> String {
    format!("L{layer_index}F{fragment_index}")
}

pub fn group_id(layer_index: usize) -> String {
    format!("L{layer_index}")
}

/// Output of [`TokenTextFlattener::flatten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flattened {
    pub text: String,
    pub ranges: Vec<CharRange>,
    /// Keys of the input layers, indexed by layer index.
    pub layer_keys: Vec<String>,
}

/// Joins base text lines and resolves every layer fragment into a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTextFlattener {
    pub line_separator: String,
}

impl Default for TokenTextFlattener {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_string(),
        }
    }
}

impl TokenTextFlattener {
    pub fn new(line_separator: impl Into<String>) -> Self {
        Self {
            line_separator: line_separator.into(),
        }
    }

    /// Flattens `lines` and resolves the fragments of `layers`, in input
    /// order. Any unresolvable fragment aborts the whole call.
    pub fn flatten<S, L>(&self, lines: &[S], layers: &[L]) -> ExportResult<Flattened>
    where
        S: AsRef<str>,
        L: Layer,
    {
        let fragments: usize = layers.iter().map(|l| l.fragment_locations().len()).sum();
        if lines.is_empty() && fragments > 0 {
            return Err(ExportError::EmptyInput { fragments });
        }

        let text = lines
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(self.line_separator.as_str());
        let separator_len = self.line_separator.chars().count();

        let mut ranges = Vec::with_capacity(fragments);
        let mut layer_keys = Vec::with_capacity(layers.len());
        for (layer_index, layer) in layers.iter().enumerate() {
            layer_keys.push(layer.key());
            for (fragment_index, loc) in layer.fragment_locations().into_iter().enumerate() {
                let location = parse_location(loc)?;
                let (start, end) = resolve(&location, lines, separator_len)?;
                ranges.push(CharRange::new(start, end, layer_index, fragment_index));
            }
        }

        debug!(
            "Flattened {} lines into {} chars with {} ranges from {} layers",
            lines.len(),
            text.chars().count(),
            ranges.len(),
            layers.len()
        );

        Ok(Flattened {
            text,
            ranges,
            layer_keys,
        })
    }
}
