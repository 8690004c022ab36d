//! Character scanner used by the marking grammars.

/// Forward-only cursor over the characters of a marking.
#[derive(Debug, Clone)]
pub struct Scanner {
    chars: Vec<char>,
    pos: usize,
}

impl Scanner {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    pub fn skip_whitespace(&mut self) {
        while self.peek().map(char::is_whitespace).unwrap_or(false) {
            self.pos += 1;
        }
    }

    /// Consume the next character if it satisfies `pred`.
    pub fn eat_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.pos += 1;
                Some(ch)
            }
            _ => None,
        }
    }

    /// Consume a run of ASCII digits; `None` if there is none.
    pub fn digits(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().map(|c| c.is_ascii_digit()).unwrap_or(false) {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.chars[start..self.pos].iter().collect())
        }
    }

    /// Consume `\d+(\.\d*)?` and return its value.
    pub fn decimal(&mut self) -> Option<f64> {
        let mut text = self.digits()?;
        if self.peek() == Some('.') {
            self.pos += 1;
            text.push('.');
            if let Some(frac) = self.digits() {
                text.push_str(&frac);
            }
        }
        text.trim_end_matches('.').parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal() {
        let mut s = Scanner::new("0.047uF");
        assert_eq!(s.decimal(), Some(0.047));
        assert_eq!(s.peek(), Some('u'));
    }

    #[test]
    fn test_decimal_trailing_point() {
        let mut s = Scanner::new("47.");
        assert_eq!(s.decimal(), Some(47.0));
        assert!(s.is_at_end());
    }

    #[test]
    fn test_digits_none() {
        let mut s = Scanner::new("n7");
        assert_eq!(s.digits(), None);
        assert_eq!(s.bump(), Some('n'));
    }

    #[test]
    fn test_multibyte_micro_sign() {
        let mut s = Scanner::new("10µF");
        s.digits();
        assert_eq!(s.bump(), Some('µ'));
        assert_eq!(s.peek(), Some('F'));
    }
}
