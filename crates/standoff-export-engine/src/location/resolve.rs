use super::point::{Location, Point};
use crate::error::{ExportError, ExportResult};

/// Random access to the lines of a base text.
///
/// Line numbers are 1-based, matching the `y` of a [`Point`]. Lengths are
/// counted in characters, not bytes.
pub trait LineLookup {
    fn line_count(&self) -> usize;

    fn line(&self, y: usize) -> Option<&str>;
}

impl<S: AsRef<str>> LineLookup for [S] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, y: usize) -> Option<&str> {
        y.checked_sub(1)
            .and_then(|i| self.get(i))
            .map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> LineLookup for Vec<S> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, y: usize) -> Option<&str> {
        self.as_slice().line(y)
    }
}

/// Resolves a location into an inclusive `(start, end)` character pair in the
/// text obtained by joining `lines` with a separator of `separator_len`
/// characters.
pub fn resolve<L: LineLookup + ?Sized>(
    location: &Location,
    lines: &L,
    separator_len: usize,
) -> ExportResult<(usize, usize)> {
    let (start, end) = match location {
        Location::Point(p) => {
            let token = locate_token(location, p, lines, separator_len)?;
            let start = token.start_of(p);
            let end = if p.at > 0 && p.run > 0 {
                token.partial_end(location, p)?
            } else {
                token.base + token.end - 1
            };
            (start, end)
        }
        Location::Range(a, b) => {
            let start = locate_token(location, a, lines, separator_len)?.start_of(a);
            let tail = locate_token(location, b, lines, separator_len)?;
            let end = if b.at == 0 {
                tail.base + tail.end - 1
            } else {
                tail.partial_end(location, b)?
            };
            (start, end)
        }
    };

    if end < start {
        return Err(ExportError::bounds(location, "range end precedes its start"));
    }
    Ok((start, end))
}

/// A token located inside its line.
struct TokenSpan {
    /// Absolute offset of the line start.
    base: usize,
    /// Line length in characters.
    line_len: usize,
    /// Token start, relative to the line.
    start: usize,
    /// Token end (exclusive), relative to the line.
    end: usize,
}

impl TokenSpan {
    fn start_of(&self, p: &Point) -> usize {
        self.base + self.start + p.at.saturating_sub(1)
    }

    /// Inclusive end of a partial span starting at `p.at`.
    ///
    /// An end point with no explicit run covers the single character at `at`.
    fn partial_end(&self, location: &Location, p: &Point) -> ExportResult<usize> {
        let run = p.run.max(1);
        // `at` is already bounded by the token length; only `run` can be huge.
        match (self.start + p.at - 1).checked_add(run - 1) {
            Some(last) if last < self.line_len => Ok(self.base + last),
            _ => Err(ExportError::bounds(
                location,
                format!(
                    "run of {run} from character {} of token {} runs past the end of line {}",
                    p.at, p.x, p.y
                ),
            )),
        }
    }
}

fn locate_token<L: LineLookup + ?Sized>(
    location: &Location,
    p: &Point,
    lines: &L,
    separator_len: usize,
) -> ExportResult<TokenSpan> {
    let Some(line) = lines.line(p.y) else {
        return Err(ExportError::bounds(
            location,
            format!("line {} does not exist (text has {} lines)", p.y, lines.line_count()),
        ));
    };

    let base = (p.y - 1) * separator_len
        + (1..p.y)
            .filter_map(|y| lines.line(y))
            .map(|l| l.chars().count())
            .sum::<usize>();

    if p.x == 0 {
        return Err(missing_token(location, p));
    }

    let chars: Vec<char> = line.chars().collect();
    let mut start = 0;
    for _ in 1..p.x {
        match chars[start..].iter().position(|&c| c == ' ') {
            Some(offset) => start += offset + 1,
            None => return Err(missing_token(location, p)),
        }
    }
    if start >= chars.len() {
        return Err(missing_token(location, p));
    }
    let end = chars[start..]
        .iter()
        .position(|&c| c == ' ')
        .map_or(chars.len(), |offset| start + offset);
    // A leading or doubled space leaves an empty token.
    if end == start {
        return Err(missing_token(location, p));
    }

    if p.at > end - start {
        return Err(ExportError::bounds(
            location,
            format!(
                "character {} is beyond token {} of line {} ({} characters)",
                p.at,
                p.x,
                p.y,
                end - start
            ),
        ));
    }

    Ok(TokenSpan {
        base,
        line_len: chars.len(),
        start,
        end,
    })
}

fn missing_token(location: &Location, p: &Point) -> ExportError {
    ExportError::bounds(location, format!("token {} does not exist in line {}", p.x, p.y))
}
