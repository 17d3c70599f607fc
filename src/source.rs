//! Helpers for quoting and truncating original source text that gets baked
//! into the generated code (error messages, `toString` markers).

use crate::loc::Loc;

/// Budget for source text quoted in runtime error messages.
pub const ERROR_SOURCE_BUDGET: usize = 25;

pub fn slice<'a>(source: &'a str, loc: Loc) -> &'a str {
  source.get(loc.0..loc.1).unwrap_or("<unknown>")
}

/// Truncates long expression text for error messages: anything over `max`
/// characters keeps the first 70% and last 30% of `max - 5` characters around
/// a ` ... ` ellipsis (25 becomes first 14 + ellipsis + last 6).
pub fn limit_string_length(input: &str, max: usize) -> String {
  let chars: Vec<char> = input.chars().collect();
  if chars.len() <= max {
    return input.to_string();
  }
  let keep = max - 5;
  let head = keep * 7 / 10;
  let tail = keep * 3 / 10;
  let mut out = String::new();
  out.extend(&chars[..head]);
  out.push_str(" ... ");
  out.extend(&chars[chars.len() - tail..]);
  out
}

/// Builds a single-quoted string literal, escapes included, whose runtime
/// value is `value`. Non-ASCII characters other than the line separators pass
/// through verbatim: host engines quote string literals from the emitted
/// source text in their error messages, and error demangling recognizes the
/// raw U+FEFF markers there, not their escaped spellings.
pub fn to_js_string_lit(value: &str) -> String {
  let mut out = String::with_capacity(value.len() + 2);
  out.push('\'');
  for c in value.chars() {
    match c {
      '\\' => out.push_str("\\\\"),
      '\'' => out.push_str("\\'"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      c if (c as u32) < 0x20 => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
      c => out.push(c),
    }
  }
  out.push('\'');
  out
}

/// Percent-encodes like the host language's `encodeURIComponent`: everything
/// except alphanumerics and `- _ . ! ~ * ' ( )` becomes `%XX` UTF-8 bytes.
pub fn encode_uri_component(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for b in value.bytes() {
    match b {
      b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => out.push(b as char),
      b'-' | b'_' | b'.' | b'!' | b'~' | b'*' | b'\'' | b'(' | b')' => out.push(b as char),
      _ => out.push_str(&format!("%{b:02X}")),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_limit_string_length() {
    assert_eq!(limit_string_length("shortish", 25), "shortish");
    assert_eq!(
      limit_string_length("abcdefghijklmnopqrstuvwxyz", 25),
      "abcdefghijklmn ... uvwxyz"
    );
    // Multibyte input is truncated on character boundaries.
    assert_eq!(
      limit_string_length(&"é".repeat(30), 25),
      format!("{} ... {}", "é".repeat(14), "é".repeat(6))
    );
  }

  #[test]
  fn test_to_js_string_lit() {
    assert_eq!(to_js_string_lit("a'b"), r#"'a\'b'"#);
    assert_eq!(to_js_string_lit("a\nb\\c"), r#"'a\nb\\c'"#);
    assert_eq!(to_js_string_lit("\u{feff}x\u{feff}"), "'\u{feff}x\u{feff}'");
    assert_eq!(to_js_string_lit("a\u{2028}b"), "'a\\u2028b'");
  }

  #[test]
  fn test_encode_uri_component() {
    assert_eq!(encode_uri_component("a b+c"), "a%20b%2Bc");
    assert_eq!(encode_uri_component("() => x!"), "()%20%3D%3E%20x!");
    assert_eq!(encode_uri_component("é"), "%C3%A9");
  }
}
