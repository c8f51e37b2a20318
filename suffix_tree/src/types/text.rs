use std::ascii;
use std::fmt;

use crate::error::{Result, SuffixTreeError};

/// Terminator used when none is given explicitly.
pub const DEFAULT_TERMINATOR: u8 = b'$';

// The input with a unique terminator appended at the end. Since the
// terminator cannot occur anywhere else, no suffix is a prefix of
// another one and every suffix ends in its own leaf.
#[derive(Clone)]
pub struct Text {
  bytes: Vec<u8>,
  terminator: u8,
}

impl Text {
  pub fn new(input: &[u8], terminator: u8) -> Result<Self> {
    if let Some(offset) = input.iter().position(|&b| b == terminator) {
      return Err(SuffixTreeError::TerminatorInText { terminator, offset });
    }

    let mut bytes = Vec::with_capacity(input.len() + 1);
    bytes.extend_from_slice(input);
    bytes.push(terminator);
    Ok(Text { bytes, terminator })
  }

  // Length including the terminator, so never 0
  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn at(&self, i: usize) -> u8 {
    self.bytes[i]
  }

  pub fn as_bytes(&self) -> &[u8] {
    &self.bytes
  }

  // The text as it was given, without the terminator
  pub fn input(&self) -> &[u8] {
    &self.bytes[..self.bytes.len() - 1]
  }

  pub fn terminator(&self) -> u8 {
    self.terminator
  }

  pub fn label(&self, start: usize, end: usize) -> &[u8] {
    &self.bytes[start..end]
  }

  // Printable form of text[start..end]. Non-printable bytes are escaped
  // and the terminator is wrapped in angle brackets so it stands out.
  pub fn as_readable(&self, start: usize, end: usize) -> String {
    let mut out = String::with_capacity(end - start);
    for &b in self.label(start, end) {
      if b == self.terminator {
        out.push('<');
        push_escaped(&mut out, b);
        out.push('>');
      } else {
        push_escaped(&mut out, b);
      }
    }
    out
  }
}

fn push_escaped(out: &mut String, b: u8) {
  out.extend(ascii::escape_default(b).map(char::from));
}

impl fmt::Debug for Text {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", self.as_readable(0, self.len()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn appends_terminator() {
    let text = Text::new(b"abab", b'$').unwrap();
    assert_eq!(b"abab$", text.as_bytes());
    assert_eq!(b"abab", text.input());
    assert_eq!(5, text.len());
    assert_eq!(b'$', text.at(4));
  }

  #[test]
  fn empty_input_is_only_the_terminator() {
    let text = Text::new(b"", b'$').unwrap();
    assert_eq!(b"$", text.as_bytes());
    assert!(text.input().is_empty());
  }

  #[test]
  fn rejects_terminator_in_input() {
    let err = Text::new(b"ab$ab", b'$').unwrap_err();
    assert_eq!(
      SuffixTreeError::TerminatorInText {
        terminator: b'$',
        offset: 2
      },
      err
    );
  }

  #[test]
  fn readable_marks_terminator() {
    let text = Text::new(b"a\tb", 0).unwrap();
    assert_eq!("a\\tb<\\x00>", text.as_readable(0, text.len()));
    assert_eq!("\\tb", text.as_readable(1, 3));
  }
}
