//! Compact JavaScript output.
//!
//! The [`Emitter`] inserts the minimal whitespace required so that adjacent
//! fragments never lex as a different token (e.g. `returnx`, `a+ +b`, `a/ /b/`).
//! Callers should prefer the typed helpers ([`Emitter::keyword`],
//! [`Emitter::identifier`], [`Emitter::punct`]) so fragments are classified
//! correctly; [`Emitter::raw`] bypasses boundary tracking entirely and is only
//! for fragments that carry their own delimiters (string/template/regex text).

pub mod expr;
pub mod pat;
pub mod stmt;

#[cfg(test)]
mod tests;

use crate::ast::node::Node;
use crate::ast::stx::TopLevel;

/// Emits a whole program as compact source text.
pub fn emit_js(top: &Node<TopLevel>) -> String {
  let mut out = Emitter::new();
  stmt::emit_stmts(&mut out, &top.stx.body);
  out.finish()
}

// What the last emitted fragment ends with, as far as token gluing is concerned.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Trailing {
  None,
  Word,
  Plus,
  PlusPlus,
  Minus,
  MinusMinus,
  Slash,
  Dot,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Leading {
  None,
  Word,
  Digit,
  Plus,
  Minus,
  Slash,
  Star,
  Dot,
  Other,
}

pub struct Emitter {
  out: String,
  trailing: Trailing,
}

impl Emitter {
  pub fn new() -> Emitter {
    Emitter {
      out: String::new(),
      trailing: Trailing::None,
    }
  }

  pub fn finish(self) -> String {
    self.out
  }

  pub fn len(&self) -> usize {
    self.out.len()
  }

  /// Emits a keyword or identifier.
  pub fn keyword(&mut self, kw: &str) {
    self.fragment(kw, Leading::Word, Trailing::Word);
  }

  pub fn identifier(&mut self, id: &str) {
    self.fragment(id, Leading::Word, Trailing::Word);
  }

  /// Emits a numeric or bigint literal carried as raw source text.
  pub fn number(&mut self, raw: &str) {
    // A number also counts as a word start so `in1e3` style gluing is avoided.
    self.fragment(raw, Leading::Digit, Trailing::Word);
  }

  pub fn punct(&mut self, punct: &str) {
    let leading = match punct.as_bytes().first() {
      Some(b'+') => Leading::Plus,
      Some(b'-') => Leading::Minus,
      Some(b'/') => Leading::Slash,
      Some(b'*') => Leading::Star,
      Some(b'.') => Leading::Dot,
      _ => Leading::Other,
    };
    let trailing = match punct {
      "+" => Trailing::Plus,
      "++" => Trailing::PlusPlus,
      "-" => Trailing::Minus,
      "--" => Trailing::MinusMinus,
      "/" => Trailing::Slash,
      "." | "?." | "..." => Trailing::Dot,
      _ => Trailing::None,
    };
    self.fragment(punct, leading, trailing);
  }

  /// Emits a single-token fragment, classifying its edges by inspection.
  /// Used for raw literals that keep their original source text.
  pub fn token(&mut self, text: &str) {
    let leading = match text.as_bytes().first() {
      None => return,
      Some(b'0'..=b'9') => Leading::Digit,
      Some(b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$') => Leading::Word,
      Some(b'+') => Leading::Plus,
      Some(b'-') => Leading::Minus,
      Some(b'/') => Leading::Slash,
      Some(b'*') => Leading::Star,
      Some(b'.') => Leading::Dot,
      _ => Leading::Other,
    };
    let trailing = match text.as_bytes().last() {
      Some(b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'_' | b'$') => Trailing::Word,
      Some(b'+') => Trailing::Plus,
      Some(b'-') => Trailing::Minus,
      Some(b'/') => Trailing::Slash,
      Some(b'.') => Trailing::Dot,
      _ => Trailing::None,
    };
    self.fragment(text, leading, trailing);
  }

  /// Writes text verbatim with no boundary handling.
  pub fn raw(&mut self, text: &str) {
    self.out.push_str(text);
    self.trailing = Trailing::None;
  }

  fn fragment(&mut self, text: &str, leading: Leading, trailing: Trailing) {
    if text.is_empty() {
      return;
    }
    if needs_space(self.trailing, leading) {
      self.out.push(' ');
    }
    self.out.push_str(text);
    self.trailing = trailing;
  }
}

fn needs_space(prev: Trailing, next: Leading) -> bool {
  match (prev, next) {
    (Trailing::Word, Leading::Word | Leading::Digit) => true,
    (Trailing::Plus | Trailing::PlusPlus, Leading::Plus) => true,
    (Trailing::Minus | Trailing::MinusMinus, Leading::Minus) => true,
    (Trailing::Slash, Leading::Slash | Leading::Star) => true,
    // `1.` then `.x` would lex the dots as a range of the number.
    (Trailing::Dot, Leading::Digit | Leading::Dot) => true,
    _ => false,
  }
}
