use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;
use serde::Serialize;
use std::fmt;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::ops::Add;

/// Byte range into the source, `[start, end)`.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn error(self, typ: SyntaxErrorType, actual_token: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual_token)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = self.0.min(other.0);
    self.1 = self.1.max(other.1);
  }

  pub fn is_empty(self) -> bool {
    self.0 >= self.1
  }

  pub fn len(self) -> usize {
    self.1 - self.0
  }
}

impl Add<usize> for Loc {
  type Output = Loc;

  fn add(self, rhs: usize) -> Self::Output {
    Loc(self.0 + rhs, self.1 + rhs)
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(mut self, rhs: Loc) -> Self::Output {
    self.extend(rhs);
    self
  }
}

impl Debug for Loc {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "[{}:{}]", self.0, self.1)
  }
}

#[cfg(test)]
mod tests {
  use super::Loc;

  #[test]
  fn test_add_unions_spans() {
    assert_eq!(Loc(3, 5) + Loc(10, 12), Loc(3, 12));
    assert_eq!(Loc(10, 12) + Loc(3, 5), Loc(3, 12));
    assert_eq!(Loc(2, 4) + 3, Loc(5, 7));
  }
}
