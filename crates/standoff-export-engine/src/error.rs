/// Errors raised while resolving locations or flattening an item.
///
/// None of these are recovered from inside the engine: a malformed or
/// out-of-range coordinate would corrupt the character-exact output, so the
/// whole item is abandoned and the caller decides whether to move on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("Malformed location `{location}` at {position}: {reason}")]
    LocationSyntax {
        location: String,
        position: usize,
        reason: String,
    },
    #[error("Location `{location}` is out of bounds: {reason}")]
    LocationBounds { location: String, reason: String },
    #[error("Base text is empty but {fragments} fragment(s) were supplied")]
    EmptyInput { fragments: usize },
}

impl ExportError {
    pub(crate) fn syntax(location: &str, position: usize, reason: impl Into<String>) -> Self {
        Self::LocationSyntax {
            location: location.to_string(),
            position,
            reason: reason.into(),
        }
    }

    pub(crate) fn bounds(location: impl ToString, reason: impl Into<String>) -> Self {
        Self::LocationBounds {
            location: location.to_string(),
            reason: reason.into(),
        }
    }
}

pub type ExportResult<T> = Result<T, ExportError>;
