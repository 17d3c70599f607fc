use super::Parser;
use crate::ast::node::Node;
use crate::error::SyntaxResult;
use crate::loc::Loc;
use crate::token::TT;
use derive_visitor::Drive;
use derive_visitor::DriveMut;

impl<'a> Parser<'a> {
  pub fn spanned<S: Drive + DriveMut, F>(&mut self, f: F) -> SyntaxResult<Node<S>>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<S>,
  {
    let start = self.peek().loc.0;
    let stx = f(self)?;
    let end = self.last_consumed_end().max(start);
    Ok(Node::new(Loc(start, end), stx))
  }

  pub fn collect_while<S, F, W>(&mut self, w: W, f: F) -> SyntaxResult<Vec<S>>
  where
    F: Fn(&mut Self) -> SyntaxResult<S>,
    W: Fn(&mut Self) -> bool,
  {
    let mut nodes = Vec::new();
    while w(self) {
      nodes.push(f(self)?);
    }
    Ok(nodes)
  }

  pub fn collect_while_spanned<S: Drive + DriveMut, F, W>(
    &mut self,
    w: W,
    f: F,
  ) -> SyntaxResult<Vec<Node<S>>>
  where
    F: Fn(&mut Self) -> SyntaxResult<S>,
    W: Fn(&mut Self) -> bool,
  {
    self.collect_while(w, |p| p.spanned(|p| f(p)))
  }

  pub fn collect_until<S, F>(&mut self, tt: TT, f: F) -> SyntaxResult<Vec<S>>
  where
    F: Fn(&mut Self) -> SyntaxResult<S>,
  {
    self.collect_while(|p| p.peek().typ != tt, f)
  }

  pub fn collect_until_spanned<S: Drive + DriveMut, F>(
    &mut self,
    tt: TT,
    f: F,
  ) -> SyntaxResult<Vec<Node<S>>>
  where
    F: Fn(&mut Self) -> SyntaxResult<S>,
  {
    self.collect_while_spanned(|p| p.peek().typ != tt, f)
  }

  /// Parses delimiter-separated items up to and including `close`.
  /// A trailing delimiter is accepted.
  pub fn delimited_list<S: Drive + DriveMut, F>(
    &mut self,
    delim: TT,
    close: TT,
    f: F,
  ) -> SyntaxResult<Vec<Node<S>>>
  where
    F: Fn(&mut Self) -> SyntaxResult<S>,
  {
    let mut nodes = Vec::new();
    while !self.eat(close).is_match() {
      nodes.push(self.spanned(&f)?);
      // We expect either the delimiter or the close token.
      // A delimiter directly before the close token is a trailing delimiter.
      if !self.eat(delim).is_match() {
        self.expect(close)?;
        break;
      }
    }
    Ok(nodes)
  }

  /// Runs the closure, rewinding the parser if it comes back with None.
  pub fn speculate<S, F>(&mut self, f: F) -> SyntaxResult<Option<S>>
  where
    F: FnOnce(&mut Self) -> SyntaxResult<Option<S>>,
  {
    let checkpoint = self.checkpoint();
    let stx = f(self)?;
    if stx.is_none() {
      self.restore_checkpoint(checkpoint);
    };
    Ok(stx)
  }
}
