use std::fmt;
use std::str::FromStr;

use super::cursor::Cursor;
use crate::error::{ExportError, ExportResult};

/// A token coordinate: line `y`, token `x`, and an optional partial span.
///
/// `at` is the 1-based character offset inside the token (0 means the whole
/// token) and `run` the number of characters from there (only meaningful
/// when `at > 0`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub y: usize,
    pub x: usize,
    pub at: usize,
    pub run: usize,
}

impl Point {
    /// A whole-token point.
    pub fn token(y: usize, x: usize) -> Self {
        Self { y, x, at: 0, run: 0 }
    }

    /// A point starting at character `at` of the token, `run` characters long.
    pub fn partial(y: usize, x: usize, at: usize, run: usize) -> Self {
        Self { y, x, at, run }
    }

    pub fn is_whole_token(&self) -> bool {
        self.at == 0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.y, self.x)?;
        if self.at > 0 {
            write!(f, "@{}", self.at)?;
            if self.run > 0 {
                write!(f, "-{}", self.run)?;
            }
        }
        Ok(())
    }
}

/// A parsed location expression: one point or a range between two points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Point(Point),
    Range(Point, Point),
}

impl Location {
    pub fn is_range(&self) -> bool {
        matches!(self, Location::Range(..))
    }

    /// The point the location starts from.
    pub fn start(&self) -> &Point {
        match self {
            Location::Point(p) | Location::Range(p, _) => p,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Point(p) => write!(f, "{p}"),
            Location::Range(a, b) => write!(f, "{a}-{b}"),
        }
    }
}

impl FromStr for Location {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_location(s)
    }
}

/// Parses `Y.X[@At[-Run]]` or `A-B` where both ends are points.
///
/// A `-` followed by a bare integer is a run length; a `-` followed by
/// `Y.X` starts the end point of a range.
pub fn parse_location(s: &str) -> ExportResult<Location> {
    let mut cur = Cursor::new(s);
    let a = parse_point(&mut cur)?;
    if cur.eof() {
        return Ok(Location::Point(a));
    }
    if !cur.eat(b'-') {
        return Err(ExportError::syntax(s, cur.i, "expected `-` or end of location"));
    }
    let b = parse_point(&mut cur)?;
    if !cur.eof() {
        return Err(ExportError::syntax(s, cur.i, "unexpected trailing input"));
    }
    Ok(Location::Range(a, b))
}

fn parse_point(cur: &mut Cursor<'_>) -> ExportResult<Point> {
    let y = parse_ordinal(cur, "line number")?;
    if !cur.eat(b'.') {
        return Err(ExportError::syntax(cur.s, cur.i, "expected `.` after line number"));
    }
    let x = parse_ordinal(cur, "token ordinal")?;

    let mut point = Point::token(y, x);
    if cur.eat(b'@') {
        point.at = parse_ordinal(cur, "character offset")?;
        if run_ahead(cur) {
            cur.bump();
            point.run = parse_ordinal(cur, "run length")?;
        }
    }
    Ok(point)
}

/// True when the cursor sits on `-N` that is not the start of another point.
fn run_ahead(cur: &Cursor<'_>) -> bool {
    if cur.peek() != Some(b'-') {
        return false;
    }
    let n = cur.digits_at(1);
    n > 0 && cur.peek_at(1 + n) != Some(b'.')
}

fn parse_ordinal(cur: &mut Cursor<'_>, what: &str) -> ExportResult<usize> {
    let start = cur.i;
    let digits = cur.digits();
    if digits.is_empty() {
        return Err(ExportError::syntax(cur.s, start, format!("expected {what}")));
    }
    let value: usize = digits
        .parse()
        .map_err(|_| ExportError::syntax(cur.s, start, format!("{what} is too large")))?;
    if value == 0 {
        return Err(ExportError::syntax(cur.s, start, format!("{what} must be at least 1")));
    }
    Ok(value)
}
