use expr::pat::ParsePatternRules;

use crate::ast::node::Node;
use crate::ast::stx::TopLevel;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;

pub mod class_or_object;
pub mod drive;
pub mod expr;
pub mod func;
pub mod operator;
pub mod stmt;
#[cfg(test)]
mod tests;

// Threaded through every parse method instead of a parameter list. Copy and
// alter via with_rules when entering a context with different binding rules.
#[derive(Clone, Copy)]
pub struct ParseCtx {
  pub rules: ParsePatternRules,
}

impl ParseCtx {
  pub fn with_rules(&self, rules: ParsePatternRules) -> ParseCtx {
    ParseCtx { rules, ..*self }
  }
}

/// Outcome of a conditional token consumption.
#[derive(Debug)]
#[must_use]
pub struct TokenMatch {
  typ: TT,
  loc: Loc,
  matched: bool,
}

impl TokenMatch {
  pub fn is_match(&self) -> bool {
    self.matched
  }

  pub fn match_loc(&self) -> Option<Loc> {
    self.matched.then_some(self.loc)
  }

  pub fn error(&self, err: SyntaxErrorType) -> SyntaxError {
    debug_assert!(!self.matched);
    self.loc.error(err, Some(self.typ))
  }

  pub fn map<R, F: FnOnce(Self) -> R>(self, f: F) -> Option<R> {
    if self.matched {
      Some(f(self))
    } else {
      None
    }
  }

  pub fn and_then<R, F: FnOnce() -> SyntaxResult<R>>(self, f: F) -> SyntaxResult<Option<R>> {
    Ok(if self.matched { Some(f()?) } else { None })
  }
}

pub struct ParserCheckpoint {
  cursor: usize,
}

struct LexedToken {
  token: Token,
  mode: LexMode,
}

/// A lazily-lexing, arbitrary-lookahead parser. Tokens are buffered as they
/// are lexed so checkpoints are just indices into the buffer.
pub struct Parser<'a> {
  lexer: Lexer<'a>,
  lookahead: Vec<LexedToken>,
  cursor: usize,
}

impl<'a> Parser<'a> {
  pub fn new(lexer: Lexer<'a>) -> Parser<'a> {
    Parser {
      lexer,
      lookahead: Vec::new(),
      cursor: 0,
    }
  }

  pub fn source_range(&self) -> Loc {
    self.lexer.source_range()
  }

  /// Parses the entire source as a script. Snippets are never modules, so
  /// `await` and `yield` stay usable as plain identifiers at the top level.
  pub fn parse_top_level(&mut self) -> SyntaxResult<Node<TopLevel>> {
    let ctx = ParseCtx {
      rules: ParsePatternRules {
        await_allowed: true,
        yield_allowed: true,
      },
    };
    let body = self.stmts(ctx, TT::EOF)?;
    self.expect(TT::EOF)?;
    Ok(Node::new(self.source_range(), TopLevel { body }))
  }

  pub fn str(&self, loc: Loc) -> &str {
    &self.lexer[loc]
  }

  pub fn string(&self, loc: Loc) -> String {
    self.str(loc).to_string()
  }

  pub fn checkpoint(&self) -> ParserCheckpoint {
    ParserCheckpoint {
      cursor: self.cursor,
    }
  }

  pub fn restore_checkpoint(&mut self, checkpoint: ParserCheckpoint) {
    self.cursor = checkpoint.cursor;
  }

  /// End of the last consumed token.
  fn last_consumed_end(&self) -> usize {
    self
      .cursor
      .checked_sub(1)
      .map(|i| self.lookahead[i].token.loc.1)
      .unwrap_or(0)
  }

  fn truncate_to(&mut self, n: usize) {
    self.cursor = n;
    self.lookahead.truncate(n);
    let resume = self.lookahead.last().map(|t| t.token.loc.1).unwrap_or(0);
    self.lexer.set_next(resume);
  }

  fn step<K: FnOnce(&Token) -> bool>(&mut self, mode: LexMode, keep: K) -> (bool, Token) {
    // A token lexed under a different mode may have a different boundary
    // (regex vs division), so it must be re-lexed.
    if self
      .lookahead
      .get(self.cursor)
      .is_some_and(|t| t.mode != mode)
    {
      self.truncate_to(self.cursor);
    }
    if self.lookahead.len() == self.cursor {
      let token = lex_next(&mut self.lexer, mode);
      self.lookahead.push(LexedToken { token, mode });
    }
    debug_assert!(self.lookahead.len() > self.cursor);
    let t = self.lookahead[self.cursor].token.clone();
    let k = keep(&t);
    if k {
      self.cursor += 1;
    };
    (k, t)
  }

  pub fn bump_with_mode(&mut self, mode: LexMode) -> Token {
    self.step(mode, |_| true).1
  }

  pub fn bump(&mut self) -> Token {
    self.bump_with_mode(LexMode::Standard)
  }

  /// Consumes the next token whatever its type and returns its raw source.
  pub fn take_source(&mut self) -> String {
    let loc = self.bump().loc;
    self.string(loc)
  }

  pub fn peek_with_mode(&mut self, mode: LexMode) -> Token {
    self.step(mode, |_| false).1
  }

  pub fn peek(&mut self) -> Token {
    self.peek_with_mode(LexMode::Standard)
  }

  pub fn peek_n_with_mode<const N: usize>(&mut self, modes: [LexMode; N]) -> [Token; N] {
    let cp = self.checkpoint();
    let toks = modes.map(|mode| self.step(mode, |_| true).1);
    self.restore_checkpoint(cp);
    toks
  }

  pub fn peek_n<const N: usize>(&mut self) -> [Token; N] {
    self.peek_n_with_mode([LexMode::Standard; N])
  }

  pub fn peek_4(&mut self) -> (Token, Token, Token, Token) {
    let [a, b, c, d] = self.peek_n();
    (a, b, c, d)
  }

  pub fn eat_with_mode(&mut self, typ: TT, mode: LexMode) -> TokenMatch {
    let (matched, t) = self.step(mode, |t| t.typ == typ);
    TokenMatch {
      typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn eat(&mut self, typ: TT) -> TokenMatch {
    self.eat_with_mode(typ, LexMode::Standard)
  }

  pub fn eat_if<F: FnOnce(&Token) -> bool>(&mut self, pred: F) -> TokenMatch {
    let (matched, t) = self.step(LexMode::Standard, pred);
    TokenMatch {
      typ: t.typ,
      matched,
      loc: t.loc,
    }
  }

  pub fn expect_with_mode(&mut self, typ: TT, mode: LexMode) -> SyntaxResult<Token> {
    let t = self.bump_with_mode(mode);
    if t.typ != typ {
      Err(t.error(SyntaxErrorType::RequiredTokenNotFound(typ)))
    } else {
      Ok(t)
    }
  }

  pub fn expect(&mut self, typ: TT) -> SyntaxResult<Token> {
    self.expect_with_mode(typ, LexMode::Standard)
  }
}
