
use super::source::{SourceOffset, Span};

use regex::Regex;
use once_cell::sync::Lazy;

/// Cursor over an input string, with helpers for reading literal and
/// regex-driven tokens.
#[derive(Debug, Clone)]
pub struct TokenizerState<'a> {
  whole_input: &'a str,
  input: &'a str,
  position: SourceOffset,
}

/// The substring matched by a single tokenizer read, together with
/// its location in the original input.
#[derive(Debug, Clone)]
pub struct TokenizerMatch<'a> {
  matched_str: &'a str,
  start: SourceOffset,
  end: SourceOffset,
}

impl<'a> TokenizerState<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      whole_input: input,
      input,
      position: SourceOffset(0),
    }
  }

  pub fn is_eof(&self) -> bool {
    self.input.is_empty()
  }

  pub fn peek(&self) -> Option<char> {
    self.input.chars().next()
  }

  pub fn current_pos(&self) -> SourceOffset {
    self.position
  }

  /// Advances the position of `self` by `amount` bytes, never moving
  /// beyond one-past-the-end of the input. Returns a
  /// [`TokenizerMatch`] for the skipped portion.
  pub fn advance(&mut self, mut amount: usize) -> TokenizerMatch<'a> {
    amount = amount.min(self.input.len());

    let match_pos = self.current_pos();
    let (prefix, suffix) = self.input.split_at(amount);
    self.position.0 += amount;
    self.input = suffix;
    TokenizerMatch {
      matched_str: prefix,
      start: match_pos,
      end: match_pos + amount,
    }
  }

  pub fn read_literal(&mut self, literal: &str) -> Option<TokenizerMatch<'a>> {
    self.input.starts_with(literal).then(|| {
      self.advance(literal.len())
    })
  }

  /// If the current position of the string matches the given regex,
  /// returns the matched string and advances the tokenizer state. If
  /// not, returns `None`.
  ///
  /// The regex MUST be anchored at the start of the input. This
  /// function may panic if that precondition is not satisfied.
  pub fn read_regex(&mut self, regex: &Regex) -> Option<TokenizerMatch<'a>> {
    let m = regex.find(self.input)?;
    assert_eq!(m.start(), 0, "Regex must be anchored at the start of the input");

    Some(self.advance(m.len()))
  }

  pub fn consume_spaces(&mut self) {
    static RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*").unwrap());
    self.read_regex(&RE).expect("regex should not fail");
  }
}

impl<'h> TokenizerMatch<'h> {
  pub fn as_str(&self) -> &'h str {
    self.matched_str
  }
  pub fn start(&self) -> SourceOffset {
    self.start
  }
  pub fn end(&self) -> SourceOffset {
    self.end
  }
  pub fn span(&self) -> Span {
    Span::new(self.start, self.end)
  }
}
