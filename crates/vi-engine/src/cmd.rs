//! Command token buffer.
//!
//! Keys typed in command or visual mode accumulate in a string that is
//! re-parsed from scratch on every key. [`Cmd`] is one parse attempt over
//! that string: it reads an optional count, then hands characters to the
//! grammar one at a time. Running out of characters is reported as
//! [`ParseError::Incomplete`], which tells the caller to keep the buffer and
//! wait.

use crate::error::ParseError;

type Result<T> = std::result::Result<T, ParseError>;

#[derive(Debug, Clone)]
pub struct Cmd {
    keys: Vec<char>,
    pos: usize,
    count: usize,
    explicit: bool,
}

impl Cmd {
    #[must_use]
    pub fn new(s: &str) -> Self {
        Self {
            keys: s.chars().collect(),
            pos: 0,
            count: 1,
            explicit: false,
        }
    }

    /// Parse a leading count, if any. A count starts with `1`-`9`; a leading
    /// `0` is the motion to line start, not a number.
    pub fn count(&mut self) -> Result<()> {
        if let Some(n) = self.digits()? {
            self.count = n;
            self.explicit = true;
        }
        Ok(())
    }

    /// Parse a count between operator and motion. It multiplies any count
    /// given before the operator, so `2d3w` acts on six words.
    pub fn motion_count(&mut self) -> Result<()> {
        if let Some(n) = self.digits()? {
            self.count = self
                .count
                .checked_mul(n)
                .ok_or(ParseError::InvalidNumber)?;
            self.explicit = true;
        }
        Ok(())
    }

    fn digits(&mut self) -> Result<Option<usize>> {
        let start = self.pos;
        while let Some(&c) = self.keys.get(self.pos) {
            let first = self.pos == start;
            if !(c.is_ascii_digit() && (c != '0' || !first)) {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Ok(None);
        }
        let s: String = self.keys[start..self.pos].iter().collect();
        s.parse()
            .map(Some)
            .map_err(|_| ParseError::InvalidNumber)
    }

    /// Refuse a count, for motions like `$` and `%` where it makes no sense.
    pub const fn no_number(&self) -> Result<()> {
        if self.count == 1 {
            Ok(())
        } else {
            Err(ParseError::NoNumberAllowed)
        }
    }

    /// The repeat count, 1 unless given.
    #[inline]
    #[must_use]
    pub const fn n(&self) -> usize {
        self.count
    }

    /// Override the count when none was typed (`J` joins two lines).
    pub const fn default_count(&mut self, n: usize) {
        if !self.explicit {
            self.count = n;
        }
    }

    /// Whether a count was typed.
    #[inline]
    #[must_use]
    pub const fn has_count(&self) -> bool {
        self.explicit
    }

    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.keys.get(self.pos).copied()
    }

    /// Consume the next key, or report that more keys are needed.
    pub fn get(&mut self) -> Result<char> {
        let c = self.peek().ok_or(ParseError::Incomplete)?;
        self.pos += 1;
        Ok(c)
    }

    /// Whether every key has been consumed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.pos >= self.keys.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_count_is_one() {
        let mut c = Cmd::new("dw");
        c.count().unwrap();
        assert_eq!(c.n(), 1);
        assert!(!c.has_count());
        assert_eq!(c.get(), Ok('d'));
    }

    #[test]
    fn leading_count() {
        let mut c = Cmd::new("12j");
        c.count().unwrap();
        assert_eq!(c.n(), 12);
        assert_eq!(c.get(), Ok('j'));
        assert!(c.is_done());
    }

    #[test]
    fn zero_is_not_a_count() {
        let mut c = Cmd::new("0");
        c.count().unwrap();
        assert_eq!(c.n(), 1);
        assert_eq!(c.peek(), Some('0'));
    }

    #[test]
    fn zero_inside_a_count() {
        let mut c = Cmd::new("10x");
        c.count().unwrap();
        assert_eq!(c.n(), 10);
    }

    #[test]
    fn counts_multiply() {
        let mut c = Cmd::new("2d3w");
        c.count().unwrap();
        assert_eq!(c.get(), Ok('d'));
        c.motion_count().unwrap();
        assert_eq!(c.n(), 6);
        assert_eq!(c.get(), Ok('w'));
    }

    #[test]
    fn overflow_is_invalid() {
        let mut c = Cmd::new("99999999999999999999999j");
        assert_eq!(c.count(), Err(ParseError::InvalidNumber));
    }

    #[test]
    fn get_at_end_is_incomplete() {
        let mut c = Cmd::new("d");
        c.get().unwrap();
        assert_eq!(c.get(), Err(ParseError::Incomplete));
    }

    #[test]
    fn no_number() {
        let mut c = Cmd::new("3$");
        c.count().unwrap();
        assert_eq!(c.no_number(), Err(ParseError::NoNumberAllowed));
        let c = Cmd::new("$");
        assert_eq!(c.no_number(), Ok(()));
    }

    #[test]
    fn default_count_only_without_typed_count() {
        let mut c = Cmd::new("J");
        c.count().unwrap();
        c.default_count(2);
        assert_eq!(c.n(), 2);
        let mut c = Cmd::new("3J");
        c.count().unwrap();
        c.default_count(2);
        assert_eq!(c.n(), 3);
    }
}
