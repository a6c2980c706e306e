/// A byte cursor over a location expression.
///
/// Location strings are pure ASCII by grammar; any other byte simply fails to
/// match and surfaces as a syntax error at the cursor position.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The expression being parsed.
    pub s: &'a str,
    /// Current index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Peeks `n` bytes ahead of the current position.
    pub fn peek_at(&self, n: usize) -> Option<u8> {
        self.s.as_bytes().get(self.i + n).copied()
    }

    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Consumes `b` if it is the next byte.
    pub fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    /// Consumes a run of ASCII digits and returns it (possibly empty).
    pub fn digits(&mut self) -> &'a str {
        let start = self.i;
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.i += 1;
        }
        &self.s[start..self.i]
    }

    /// Counts the digits starting `n` bytes ahead without consuming them.
    pub fn digits_at(&self, n: usize) -> usize {
        self.s.as_bytes()[(self.i + n).min(self.s.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    }
}
