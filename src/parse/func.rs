use super::ParseCtx;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::Stmt;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn func_params(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ParamDecl>>> {
    self.expect(TT::OpenParen)?;
    let parameters = self.delimited_list(TT::Comma, TT::CloseParen, |p| {
      let rest = p.eat(TT::Ellipsis).is_match();
      let pattern = p.pat_decl(ctx)?;
      let default_value = p
        .eat(TT::Eq)
        .and_then(|| p.expr(ctx, [TT::Comma, TT::CloseParen]))?;
      Ok(ParamDecl {
        rest,
        pattern,
        default_value,
      })
    })?;
    Ok(parameters)
  }

  pub fn parse_func_block_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<Stmt>>> {
    self.expect(TT::OpenBrace)?;
    let body = self.stmts(ctx, TT::CloseBrace)?;
    self.expect(TT::CloseBrace)?;
    Ok(body)
  }
}
