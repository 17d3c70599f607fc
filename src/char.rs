use ahash::HashSet;
use core::ops::RangeInclusive;
use once_cell::sync::Lazy;

/// Membership test over a small set of characters.
#[derive(Clone)]
pub struct CharFilter {
  chars: HashSet<char>,
}

impl CharFilter {
  fn of<const N: usize>(ranges: [RangeInclusive<char>; N], extra: &str) -> CharFilter {
    let chars = ranges
      .into_iter()
      .flatten()
      .chain(extra.chars())
      .collect();
    CharFilter { chars }
  }

  pub fn has(&self, c: char) -> bool {
    self.chars.contains(&c)
  }
}

// ASCII only; the lexer routes non-ASCII identifier characters separately.
pub const ID_START_CHARSTR: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ$_";
pub const ID_CONTINUE_CHARSTR: &str =
  "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789$_";

pub static ID_START: Lazy<CharFilter> = Lazy::new(|| CharFilter::of([], ID_START_CHARSTR));

pub static ID_CONTINUE: Lazy<CharFilter> = Lazy::new(|| CharFilter::of([], ID_CONTINUE_CHARSTR));

pub static DIGIT: Lazy<CharFilter> = Lazy::new(|| CharFilter::of(['0'..='9'], ""));

pub static DIGIT_BIN: Lazy<CharFilter> = Lazy::new(|| CharFilter::of(['0'..='1'], ""));

pub static DIGIT_HEX: Lazy<CharFilter> =
  Lazy::new(|| CharFilter::of(['0'..='9', 'a'..='f', 'A'..='F'], ""));

pub static DIGIT_OCT: Lazy<CharFilter> = Lazy::new(|| CharFilter::of(['0'..='7'], ""));
