pub mod decl;

use decl::VarDeclParseMode;

use super::expr::pat::is_valid_pattern_identifier;
use super::expr::util::lit_to_pat;
use super::expr::Asi;
use super::ParseCtx;
use super::Parser;
use crate::ast::node::Node;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::BreakStmt;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::ContinueStmt;
use crate::ast::stmt::DebuggerStmt;
use crate::ast::stmt::DoWhileStmt;
use crate::ast::stmt::EmptyStmt;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::ForBody;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForInStmt;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForTripleStmt;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::IfStmt;
use crate::ast::stmt::LabelStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::SwitchBranch;
use crate::ast::stmt::SwitchStmt;
use crate::ast::stmt::ThrowStmt;
use crate::ast::stmt::TryStmt;
use crate::ast::stmt::WhileStmt;
use crate::ast::stmt::WithStmt;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn stmts(&mut self, ctx: ParseCtx, end: TT) -> SyntaxResult<Vec<Node<Stmt>>> {
    self.collect_until(end, |p| p.stmt(ctx))
  }

  pub fn stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    let [t0, t1, _] = self.peek_n();
    let stmt: Node<Stmt> = match t0.typ {
      TT::OpenBrace => self.block_stmt(ctx)?.into_wrapped(),
      TT::Break => self.break_stmt(ctx)?.into_wrapped(),
      TT::Class => self.class_decl(ctx)?.into_wrapped(),
      TT::Const | TT::Var => {
        self.var_decl(ctx, VarDeclParseMode::Asi)?.into_wrapped()
      }
      // `let` is a contextual keyword; it only starts a declaration when followed by a pattern start.
      TT::Let
        if t1.typ == TT::OpenBrace
          || t1.typ == TT::OpenBracket
          || is_valid_pattern_identifier(t1.typ, ctx.rules) =>
      {
        self.var_decl(ctx, VarDeclParseMode::Asi)?.into_wrapped()
      }
      TT::Continue => self.continue_stmt(ctx)?.into_wrapped(),
      TT::Debugger => self.debugger_stmt()?.into_wrapped(),
      TT::Do => self.do_while_stmt(ctx)?.into_wrapped(),
      // Module declarations never appear in REPL input.
      TT::Export => return Err(t0.error(SyntaxErrorType::ModuleSyntaxNotAllowed)),
      TT::Import if t1.typ != TT::OpenParen => {
        return Err(t0.error(SyntaxErrorType::ModuleSyntaxNotAllowed))
      }
      TT::For => self.for_stmt(ctx)?,
      // Only treat `async` as starting a function declaration if followed by the function keyword.
      TT::Async if t1.typ == TT::Function => self.func_decl(ctx)?.into_wrapped(),
      TT::Function => self.func_decl(ctx)?.into_wrapped(),
      TT::If => self.if_stmt(ctx)?.into_wrapped(),
      TT::Return => self.return_stmt(ctx)?.into_wrapped(),
      TT::Switch => self.switch_stmt(ctx)?.into_wrapped(),
      TT::Throw => self.throw_stmt(ctx)?.into_wrapped(),
      TT::Try => self.try_stmt(ctx)?.into_wrapped(),
      TT::While => self.while_stmt(ctx)?.into_wrapped(),
      TT::With => self.with_stmt(ctx)?.into_wrapped(),
      TT::Semicolon => self.empty_stmt()?.into_wrapped(),
      t if is_valid_pattern_identifier(t, ctx.rules) && t1.typ == TT::Colon => {
        self.label_stmt(ctx)?.into_wrapped()
      }
      _ => self.expr_stmt(ctx)?.into_wrapped(),
    };
    Ok(stmt)
  }

  pub fn label_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LabelStmt>> {
    self.spanned(|p| {
      let name = p.take_source();
      p.expect(TT::Colon)?;
      let statement = p.stmt(ctx)?;
      Ok(LabelStmt { name, statement })
    })
  }

  pub fn empty_stmt(&mut self) -> SyntaxResult<Node<EmptyStmt>> {
    self.spanned(|p| p.expect(TT::Semicolon).map(|_| EmptyStmt {}))
  }

  pub fn block_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<BlockStmt>> {
    self.spanned(|p| {
      p.expect(TT::OpenBrace)?;
      let body = p.stmts(ctx, TT::CloseBrace)?;
      p.expect(TT::CloseBrace)?;
      Ok(BlockStmt { body })
    })
  }

  fn break_or_continue_label(&mut self, ctx: ParseCtx) -> SyntaxResult<Option<String>> {
    let t = self.peek();
    let label = if is_valid_pattern_identifier(t.typ, ctx.rules) && !t.preceded_by_line_terminator {
      // Label.
      Some(self.take_source())
    } else if t.typ == TT::Semicolon {
      self.bump();
      None
    } else if t.preceded_by_line_terminator || t.typ == TT::CloseBrace || t.typ == TT::EOF {
      // ASI.
      None
    } else {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("label")));
    };
    Ok(label)
  }

  pub fn break_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<BreakStmt>> {
    self.spanned(|p| {
      p.expect(TT::Break)?;
      let label = p.break_or_continue_label(ctx)?;
      Ok(BreakStmt { label })
    })
  }

  pub fn continue_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ContinueStmt>> {
    self.spanned(|p| {
      p.expect(TT::Continue)?;
      let label = p.break_or_continue_label(ctx)?;
      Ok(ContinueStmt { label })
    })
  }

  pub fn debugger_stmt(&mut self) -> SyntaxResult<Node<DebuggerStmt>> {
    self.spanned(|p| p.expect(TT::Debugger).map(|_| DebuggerStmt {}))
  }

  // WARNING: Do not reuse this function for other statements, as this will output a statement node, not an expression, which can lead to double semicolons that cause invalid code when outputting.
  pub fn expr_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ExprStmt>> {
    self.spanned(|p| {
      let mut asi = Asi::can();
      let expr = p.expr_with_asi(ctx, [TT::Semicolon], &mut asi)?;
      if !asi.did_end_with_asi {
        p.expect(TT::Semicolon)?;
      };
      Ok(ExprStmt { expr })
    })
  }

  fn for_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ForBody>> {
    self.spanned(|p| {
      if p.peek().typ == TT::OpenBrace {
        // A block body.
        p.expect(TT::OpenBrace)?;
        let body = p.stmts(ctx, TT::CloseBrace)?;
        p.expect(TT::CloseBrace)?;
        Ok(ForBody { body })
      } else {
        // A single-statement body.
        Ok(ForBody {
          body: vec![p.stmt(ctx)?],
        })
      }
    })
  }

  pub fn for_triple_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ForTripleStmt>> {
    self.spanned(|p| {
      p.expect(TT::For)?;
      p.expect(TT::OpenParen)?;
      let init = {
        let [t0, t1] = p.peek_n();
        match t0.typ {
          TT::Var | TT::Const => {
            ForTripleStmtInit::Decl(p.var_decl(ctx, VarDeclParseMode::Leftmost)?)
          }
          TT::Let
            if t1.typ == TT::OpenBrace
              || t1.typ == TT::OpenBracket
              || is_valid_pattern_identifier(t1.typ, ctx.rules) =>
          {
            ForTripleStmtInit::Decl(p.var_decl(ctx, VarDeclParseMode::Leftmost)?)
          }
          TT::Semicolon => ForTripleStmtInit::None,
          _ => ForTripleStmtInit::Expr(p.expr(ctx, [TT::Semicolon])?),
        }
      };
      p.expect(TT::Semicolon)?;
      let cond = (p.peek().typ != TT::Semicolon)
        .then(|| p.expr(ctx, [TT::Semicolon]))
        .transpose()?;
      p.expect(TT::Semicolon)?;
      let post = (p.peek().typ != TT::CloseParen)
        .then(|| p.expr(ctx, [TT::CloseParen]))
        .transpose()?;
      p.expect(TT::CloseParen)?;
      let body = p.for_body(ctx)?;
      Ok(ForTripleStmt {
        init,
        cond,
        post,
        body,
      })
    })
  }

  pub fn for_in_of_lhs(&mut self, ctx: ParseCtx) -> SyntaxResult<ForInOfLhs> {
    let [t0, t1] = self.peek_n();
    Ok(match t0.typ {
      TT::Var | TT::Const => ForInOfLhs::Decl({
        let mode = self.var_decl_mode()?;
        let pat = self.pat_decl(ctx)?;
        (mode, pat)
      }),
      TT::Let
        if t1.typ == TT::OpenBrace
          || t1.typ == TT::OpenBracket
          || is_valid_pattern_identifier(t1.typ, ctx.rules) =>
      {
        ForInOfLhs::Decl({
          let mode = self.var_decl_mode()?;
          let pat = self.pat_decl(ctx)?;
          (mode, pat)
        })
      }
      _ => {
        // Parse as an expression (which handles member expressions, literals that are really patterns, etc.), then convert to an assignment target.
        let expr = self.expr(ctx, [TT::In, TT::Of])?;
        let pat = lit_to_pat(expr)?;
        ForInOfLhs::Assign(pat)
      }
    })
  }

  pub fn for_in_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ForInStmt>> {
    self.spanned(|p| {
      p.expect(TT::For)?;
      p.expect(TT::OpenParen)?;
      let lhs = p.for_in_of_lhs(ctx)?;
      p.expect(TT::In)?;
      let rhs = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      let body = p.for_body(ctx)?;
      Ok(ForInStmt { lhs, rhs, body })
    })
  }

  pub fn for_of_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ForOfStmt>> {
    self.spanned(|p| {
      p.expect(TT::For)?;
      let await_ = p.eat(TT::Await).is_match();
      p.expect(TT::OpenParen)?;
      let lhs = p.for_in_of_lhs(ctx)?;
      p.expect(TT::Of)?;
      let rhs = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      let body = p.for_body(ctx)?;
      Ok(ForOfStmt {
        await_,
        lhs,
        rhs,
        body,
      })
    })
  }

  /// One of:
  /// - `for ([expr | var decls]? ; expr? ; expr?)`
  /// - `for ([pat | var decl] in expr)`
  /// - `for await? ([pat | var decl] of expr)`
  pub fn for_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Stmt>> {
    // Classify the for statement before committing to a parser.
    // A pattern or expression in the head can be arbitrarily long, so no fixed
      // lookahead settles it; speculatively parse and backtrack.
    // In pathological cases, the header may be very long, so rewinding may seem wasteful. In reality, it's rarely the case, and a single function that tries to parse all variants in one drive tends to lead to error-prone code.
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Type {
      In,
      Of,
      Triple,
    }
    impl Type {
      fn determine(p: &mut Parser, ctx: ParseCtx) -> SyntaxResult<Self> {
        p.expect(TT::For)?;
        if p.eat(TT::Await).is_match() {
          // `for await` only pairs with `of`.
          return Ok(Self::Of);
        };
        p.expect(TT::OpenParen)?;
        Ok(match p.peek().typ {
          TT::Var | TT::Const => {
            p.var_decl(ctx, VarDeclParseMode::Leftmost)?;
            match p.peek().typ {
              TT::In => Self::In,
              TT::Of => Self::Of,
              // Missing semicolon; the for(;;) parser reports it with a better message.
              _ => Self::Triple,
            }
          }
          // `let` is a contextual keyword; it only starts a declaration when followed by a pattern start.
          TT::Let => {
            let [_, next_token] = p.peek_n::<2>();
            let next = next_token.typ;
            if next == TT::OpenBrace
              || next == TT::OpenBracket
              || is_valid_pattern_identifier(next, ctx.rules)
            {
              p.var_decl(ctx, VarDeclParseMode::Leftmost)?;
              match p.peek().typ {
                TT::In => Self::In,
                TT::Of => Self::Of,
                _ => Self::Triple,
              }
            } else {
              match p.expr(ctx, [TT::In, TT::Of]) {
                Ok(_) => match p.peek().typ {
                  TT::In => Self::In,
                  TT::Of => Self::Of,
                  _ => Self::Triple,
                },
                Err(_) => Self::Triple,
              }
            }
          }
          // Only for(;;) loops have semicolons in the header.
          TT::Semicolon => Self::Triple,
          _ => {
            // for-in and for-of loops must have an assignment target or variable declarator at the beginning of the header, followed by the keyword.
            match p.expr(ctx, [TT::In, TT::Of]) {
              Ok(_) => match p.peek().typ {
                TT::In => Self::In,
                TT::Of => Self::Of,
                _ => Self::Triple,
              },
              Err(_) => Self::Triple,
            }
          }
        })
      }
    }

    let cp = self.checkpoint();
    let typ = Type::determine(self, ctx)?;
    self.restore_checkpoint(cp);
    Ok(match typ {
      Type::Triple => self.for_triple_stmt(ctx)?.into_wrapped(),
      Type::In => self.for_in_stmt(ctx)?.into_wrapped(),
      Type::Of => self.for_of_stmt(ctx)?.into_wrapped(),
    })
  }

  pub fn if_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IfStmt>> {
    self.spanned(|p| {
      p.expect(TT::If)?;
      p.expect(TT::OpenParen)?;
      let test = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      let consequent = p.stmt(ctx)?;
      let alternate = p.eat(TT::Else).and_then(|| p.stmt(ctx))?;
      Ok(IfStmt {
        test,
        consequent,
        alternate,
      })
    })
  }

  pub fn return_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ReturnStmt>> {
    self.spanned(|p| {
      p.expect(TT::Return)?;
      let value = if p.peek().preceded_by_line_terminator
        || p.peek().typ == TT::CloseBrace
        || p.peek().typ == TT::EOF
      {
        // Automatic Semicolon Insertion.
        None
      } else if p.eat(TT::Semicolon).is_match() {
        None
      } else {
        let mut asi = Asi::can();
        let value = p.expr_with_asi(ctx, [TT::Semicolon], &mut asi)?;
        if !asi.did_end_with_asi {
          p.expect(TT::Semicolon)?;
        };
        Some(value)
      };
      Ok(ReturnStmt { value })
    })
  }

  pub fn throw_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ThrowStmt>> {
    self.spanned(|p| {
      let start = p.expect(TT::Throw)?;
      if p.peek().preceded_by_line_terminator {
        // ASI forbids a newline here.
        return Err(start.error(SyntaxErrorType::LineTerminatorAfterThrow));
      }
      let mut asi = Asi::can();
      let value = p.expr_with_asi(ctx, [TT::Semicolon], &mut asi)?;
      if !asi.did_end_with_asi {
        p.expect(TT::Semicolon)?;
      };
      Ok(ThrowStmt { value })
    })
  }

  pub fn try_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<TryStmt>> {
    self.spanned(|p| {
      let start = p.expect(TT::Try)?;
      let wrapped = p.block_stmt(ctx)?;
      let catch = p.eat(TT::Catch).and_then(|| {
        let parameter = p.eat(TT::OpenParen).and_then(|| {
          let pattern = p.pat_decl(ctx)?;
          p.expect(TT::CloseParen)?;
          Ok(pattern)
        })?;
        p.spanned(|p| {
          p.expect(TT::OpenBrace)?;
          let body = p.stmts(ctx, TT::CloseBrace)?;
          p.expect(TT::CloseBrace)?;
          Ok(CatchBlock { parameter, body })
        })
      })?;
      let finally = p.eat(TT::Finally).and_then(|| p.block_stmt(ctx))?;
      if catch.is_none() && finally.is_none() {
        return Err(start.error(SyntaxErrorType::TryStatementHasNoCatchOrFinally));
      }
      Ok(TryStmt {
        wrapped,
        catch,
        finally,
      })
    })
  }

  pub fn while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<WhileStmt>> {
    self.spanned(|p| {
      p.expect(TT::While)?;
      p.expect(TT::OpenParen)?;
      let condition = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      let body = p.stmt(ctx)?;
      Ok(WhileStmt { condition, body })
    })
  }

  pub fn with_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<WithStmt>> {
    self.spanned(|p| {
      p.expect(TT::With)?;
      p.expect(TT::OpenParen)?;
      let object = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      let body = p.stmt(ctx)?;
      Ok(WithStmt { object, body })
    })
  }

  pub fn do_while_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<DoWhileStmt>> {
    self.spanned(|p| {
      p.expect(TT::Do)?;
      let body = p.stmt(ctx)?;
      p.expect(TT::While)?;
      p.expect(TT::OpenParen)?;
      let condition = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      // The terminating semicolon is optional after a do-while.
      p.eat(TT::Semicolon);
      Ok(DoWhileStmt { condition, body })
    })
  }

  pub fn switch_stmt(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<SwitchStmt>> {
    self.spanned(|p| {
      p.expect(TT::Switch)?;
      p.expect(TT::OpenParen)?;
      let test = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      p.expect(TT::OpenBrace)?;
      let branches = p.collect_until_spanned(TT::CloseBrace, |p| {
        let case = if p.eat(TT::Case).is_match() {
          Some(p.expr(ctx, [TT::Colon])?)
        } else {
          p.expect(TT::Default)?;
          None
        };
        p.expect(TT::Colon)?;
        let body = p.collect_while(
          |p| {
            !matches!(
              p.peek().typ,
              TT::Case | TT::Default | TT::CloseBrace
            )
          },
          |p| p.stmt(ctx),
        )?;
        Ok(SwitchBranch { case, body })
      })?;
      p.expect(TT::CloseBrace)?;
      Ok(SwitchStmt { test, branches })
    })
  }
}
