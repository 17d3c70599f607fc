use super::ParseCtx;
use super::Parser;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ClassDecl;
use crate::ast::stmt::decl::FuncDecl;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::decl::VarDeclarator;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::parse::expr::pat::ParsePatternRules;
use crate::parse::expr::Asi;
use crate::token::TT;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum VarDeclParseMode {
  // Standard parsing mode for a var/let/const statement.
  Asi,
  // Parse as many valid declarators as possible, then break before the first invalid token (i.e. not a comma). Used by the for-loop parser.
  Leftmost,
}

impl<'a> Parser<'a> {
  pub fn pat_decl(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<PatDecl>> {
    self.spanned(|p| {
      let pat = p.pat(ctx)?;
      Ok(PatDecl { pat })
    })
  }

  pub fn var_decl_mode(&mut self) -> SyntaxResult<VarDeclMode> {
    let t = self.bump();
    Ok(match t.typ {
      TT::Let => VarDeclMode::Let,
      TT::Const => VarDeclMode::Const,
      TT::Var => VarDeclMode::Var,
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("variable declaration"))),
    })
  }

  /// Parses a variable declaration, which contains one or more declarators, each with an optional initializer. Examples:
  /// `const a = 1`,
  /// `let a, b = 2, c`,
  /// `var a`, and the like.
  pub fn var_decl(
    &mut self,
    ctx: ParseCtx,
    parse_mode: VarDeclParseMode,
  ) -> SyntaxResult<Node<VarDecl>> {
    self.spanned(|p| {
      let mode = p.var_decl_mode()?;
      let mut declarators = Vec::new();
      loop {
        let pattern = p.pat_decl(ctx)?;
        let mut asi = match parse_mode {
          VarDeclParseMode::Asi => Asi::can(),
          VarDeclParseMode::Leftmost => Asi::no(),
        };
        let initializer = p
          .eat(TT::Eq)
          .and_then(|| p.expr_with_asi(ctx, [TT::Semicolon, TT::Comma], &mut asi))?;
        declarators.push(VarDeclarator {
          pattern,
          initializer,
        });
        match parse_mode {
          VarDeclParseMode::Asi => {
            if p.eat(TT::Semicolon).is_match() || asi.did_end_with_asi {
              break;
            }
            let t = p.peek();
            if t.typ == TT::EOF
              || t.typ == TT::CloseBrace
              || (t.preceded_by_line_terminator && t.typ != TT::Comma)
            {
              break;
            };
            p.expect(TT::Comma)?;
          }
          VarDeclParseMode::Leftmost => {
            if !p.eat(TT::Comma).is_match() {
              break;
            }
          }
        }
      }
      Ok(VarDecl { mode, declarators })
    })
  }

  pub fn func_decl(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<FuncDecl>> {
    self.spanned(|p| {
      let is_async = p.eat(TT::Async).is_match();
      let start = p.expect(TT::Function)?.loc;
      let generator = p.eat(TT::Star).is_match();
      // The function name is always parsed with yield/await allowed as identifiers, even for generator/async functions.
      let name_ctx = ctx.with_rules(ParsePatternRules {
        await_allowed: true,
        yield_allowed: true,
      });
      let name = p.maybe_class_or_func_name(name_ctx);
      if name.is_none() {
        return Err(start.error(SyntaxErrorType::ExpectedSyntax("function name"), None));
      };
      let function = p.spanned(|p| {
        // Parameters and body use the function's own context, not the parent's.
        let fn_ctx = ctx.with_rules(ParsePatternRules {
          await_allowed: !is_async && ctx.rules.await_allowed,
          yield_allowed: !generator && ctx.rules.yield_allowed,
        });
        let parameters = p.func_params(fn_ctx)?;
        let body = p.parse_func_block_body(fn_ctx)?.into();
        Ok(Func {
          arrow: false,
          async_: is_async,
          generator,
          parameters,
          body,
        })
      })?;
      Ok(FuncDecl { name, function })
    })
  }

  pub fn class_decl(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ClassDecl>> {
    self.spanned(|p| {
      let start = p.expect(TT::Class)?.loc;
      let name = p.maybe_class_or_func_name(ctx);
      if name.is_none() {
        return Err(start.error(SyntaxErrorType::ExpectedSyntax("class name"), None));
      };
      let extends = p
        .eat(TT::Extends)
        .and_then(|| p.expr(ctx, [TT::OpenBrace]))?;
      let members = p.class_body(ctx)?;
      Ok(ClassDecl {
        name,
        extends,
        members,
      })
    })
  }
}
