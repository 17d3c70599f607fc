pub mod lit;
pub mod pat;
pub mod util;

use pat::is_valid_pattern_identifier;
use pat::ParsePatternRules;
use util::lhs_expr_to_assign_target;

use super::ParseCtx;
use super::Parser;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ClassExpr;
use crate::ast::expr::ComputedMemberExpr;
use crate::ast::expr::CondExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::FuncExpr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::ImportExpr;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::NewTargetExpr;
use crate::ast::expr::SuperExpr;
use crate::ast::expr::TaggedTemplateExpr;
use crate::ast::expr::ThisExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::expr::UnaryPostfixExpr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::PatDecl;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::lex::KEYWORDS_MAPPING;
use crate::loc::Loc;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::operator::PRECEDENCE_ASSIGNMENT;
use crate::parse::operator::MULTARY_OPERATOR_MAPPING;
use crate::parse::operator::UNARY_OPERATOR_MAPPING;
use crate::token::TT;

pub struct Asi {
  pub can_end_with_asi: bool,
  pub did_end_with_asi: bool,
}

impl Asi {
  pub fn can() -> Asi {
    Asi {
      can_end_with_asi: true,
      did_end_with_asi: false,
    }
  }

  pub fn no() -> Asi {
    Asi {
      can_end_with_asi: false,
      did_end_with_asi: false,
    }
  }
}

impl<'a> Parser<'a> {
  pub fn call_args(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<CallArg>>> {
    let mut args = Vec::new();
    while self.peek().typ != TT::CloseParen {
      let arg = self.spanned(|p| {
        let spread = p.eat(TT::Ellipsis).is_match();
        let value = p.expr(ctx, [TT::Comma, TT::CloseParen])?;
        Ok(CallArg { spread, value })
      })?;
      args.push(arg);
      if !self.eat(TT::Comma).is_match() {
        break;
      };
    }
    Ok(args)
  }

  pub fn expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
  ) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, 1, terminators, &mut Asi::no())
  }

  pub fn expr_with_asi<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    self.expr_with_min_prec(ctx, 1, terminators, asi)
  }

  /// Parses a parenthesised expression like `(a + b)`. Grouping does not produce a node; the inner expression is returned directly.
  pub fn grouping(&mut self, ctx: ParseCtx, asi: &mut Asi) -> SyntaxResult<Node<Expr>> {
    self.expect(TT::OpenParen)?;
    let expr = self.expr_with_min_prec(ctx, 1, [TT::CloseParen], asi)?;
    self.expect(TT::CloseParen)?;
    Ok(expr)
  }

  pub fn arrow_func_expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
  ) -> SyntaxResult<Node<ArrowFuncExpr>> {
    let func = self.spanned(|p| {
      // If `async` is immediately followed by `=>`, it's the sole parameter name, not the async keyword.
      let is_async_param_name =
        p.peek().typ == TT::Async && p.peek_n::<2>()[1].typ == TT::Arrow;

      let is_async = if !is_async_param_name {
        p.eat(TT::Async).is_match()
      } else {
        false
      };

      // Works for both sync (`x => ...`) and async (`async x => ...`).
      let next_token = p.peek().typ;
      let is_unparenthesised_single_param = is_valid_pattern_identifier(next_token, ParsePatternRules {
        await_allowed: false,
        yield_allowed: ctx.rules.yield_allowed,
      }) && p.peek_n::<2>()[1].typ == TT::Arrow;

      let (parameters, arrow) = if is_unparenthesised_single_param {
        // Parse the arrow first for fast fail, in case we are merely trying to parse as an arrow function and will rewind.
        let param_name = p.bump().loc;
        let arrow = p.expect(TT::Arrow)?;
        let pattern = Node::new(param_name, PatDecl {
          pat: Node::new(param_name, IdPat {
            name: p.string(param_name),
          })
          .into_wrapped(),
        });
        let param = Node::new(param_name, ParamDecl {
          rest: false,
          pattern,
          default_value: None,
        });
        (vec![param], arrow)
      } else {
        let params = p.func_params(ctx)?;
        let arrow = p.expect(TT::Arrow)?;
        (params, arrow)
      };

      if arrow.preceded_by_line_terminator {
        // ASI forbids a newline here.
        return Err(arrow.error(SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters));
      }
      let fn_body_ctx = ctx.with_rules(ParsePatternRules {
        await_allowed: !is_async && ctx.rules.await_allowed,
        ..ctx.rules
      });
      let body = match p.peek().typ {
        TT::OpenBrace => p.parse_func_block_body(fn_body_ctx)?.into(),
        _ => p
          .expr_with_asi(fn_body_ctx, terminators, &mut Asi::can())?
          .into(),
      };
      Ok(Func {
        arrow: true,
        async_: is_async,
        generator: false,
        parameters,
        body,
      })
    })?;
    Ok(Node::new(func.loc, ArrowFuncExpr { func }))
  }

  pub fn arrow_function_or_grouping_expr<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    // Speculatively parse an arrow function signature.
    // On failure, rewind and parse a parenthesised grouping.
    // Once `=>` shows up there is no going back; it must be an arrow function.
    self
      .speculate::<Node<Expr>, _>(|p| match p.arrow_func_expr(ctx, terminators) {
        Ok(expr) => Ok(Some(expr.into_wrapped())),
        Err(err) if err.typ == SyntaxErrorType::LineTerminatorAfterArrowFunctionParameters => {
          Err(err)
        }
        Err(_) => Ok(None),
      })
      .transpose()
      .unwrap_or_else(|| self.grouping(ctx, asi))
  }

  pub fn func_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<FuncExpr>> {
    self.spanned(|p| {
      let is_async = p.eat(TT::Async).is_match();
      p.expect(TT::Function)?;
      let generator = p.eat(TT::Star).is_match();
      // The function name is always parsed with yield/await allowed as identifiers, even for generator/async functions.
      let name_ctx = ctx.with_rules(ParsePatternRules {
        await_allowed: true,
        yield_allowed: true,
      });
      let name = p.maybe_class_or_func_name(name_ctx);
      let func = p.spanned(|p| {
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
      Ok(FuncExpr { name, func })
    })
  }

  pub fn class_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ClassExpr>> {
    self.spanned(|p| {
      p.expect(TT::Class)?;
      let name = p.maybe_class_or_func_name(ctx);
      let extends = p
        .eat(TT::Extends)
        .and_then(|| p.expr(ctx, [TT::OpenBrace]))?;
      let members = p.class_body(ctx)?;
      Ok(ClassExpr {
        name,
        extends,
        members,
      })
    })
  }

  pub fn id_expr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IdExpr>> {
    self.spanned(|p| {
      let name = p.id_name(ctx)?;
      Ok(IdExpr { name })
    })
  }

  /// The raw text of an identifier-like token. For an IdExpr node, use `id_expr`.
  pub fn id_name(&mut self, ctx: ParseCtx) -> SyntaxResult<String> {
    let t = self.bump();
    if !is_valid_pattern_identifier(t.typ, ctx.rules) {
      return Err(t.error(SyntaxErrorType::ExpectedSyntax("identifier")));
    };
    Ok(self.string(t.loc))
  }

  fn expr_operand<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    let [t0, t1, t2] =
      self.peek_n_with_mode([LexMode::SlashIsRegex, LexMode::Standard, LexMode::Standard]);
    // Handle unary operators before the operand.
    if let Some(operator) = UNARY_OPERATOR_MAPPING
      .get(&t0.typ)
      .filter(|operator| {
        // Treat await/yield as operators only when they're keywords (i.e. not allowed as identifiers in this context).
        (operator.name != OperatorName::Await && operator.name != OperatorName::Yield)
          || (operator.name == OperatorName::Await && !ctx.rules.await_allowed)
          || (operator.name == OperatorName::Yield && !ctx.rules.yield_allowed)
      })
      .filter(|operator| {
        // `new.target` is not the `new` operator.
        !(operator.name == OperatorName::New && t1.typ == TT::Dot)
      })
    {
      return Ok(
        self
          .spanned(|p| {
            let op_loc = p.bump_with_mode(LexMode::SlashIsRegex).loc;
            let operator = if operator.name == OperatorName::Yield
              && p.eat(TT::Star).is_match()
            {
              &OPERATORS[&OperatorName::YieldDelegated]
            } else {
              *operator
            };
            let next_min_prec =
              operator.precedence + (operator.associativity == Associativity::Left) as u8;

            // `yield` may have no operand.
            let next_token = p.peek();
            let has_operand = operator.name != OperatorName::Yield
              || (!next_token.preceded_by_line_terminator
                && next_token.typ != TT::EOF
                && next_token.typ != TT::Semicolon
                && next_token.typ != TT::Comma
                && next_token.typ != TT::CloseParen
                && next_token.typ != TT::CloseBracket
                && next_token.typ != TT::CloseBrace
                && !terminators.contains(&next_token.typ));

            let argument = if has_operand {
              p.expr_with_min_prec(ctx, next_min_prec, terminators, asi)?
            } else {
              // `yield;` yields undefined.
              Node::new(Loc(op_loc.1, op_loc.1), IdExpr {
                name: "undefined".to_string(),
              })
              .into_wrapped()
            };

            Ok(UnaryExpr {
              operator: operator.name,
              argument,
            })
          })?
          .into_wrapped(),
      );
    };

    // Check for the async keyword before checking if it's a valid identifier.
    // Exception: `async => ...` uses `async` as the parameter name.
    if t0.typ == TT::Async && t1.typ != TT::Arrow {
      return Ok(match t1.typ {
        TT::OpenParen => self.arrow_func_expr(ctx, terminators)?.into_wrapped(),
        TT::Function => self.func_expr(ctx)?.into_wrapped(),
        // Single-parameter async arrow function: `async x => ...`.
        _ if is_valid_pattern_identifier(t1.typ, ctx.rules)
          && t2.typ == TT::Arrow =>
        {
          self.arrow_func_expr(ctx, terminators)?.into_wrapped()
        }
        // Here `async` is just an identifier.
        _ => self.id_expr(ctx)?.into_wrapped(),
      });
    };

    if is_valid_pattern_identifier(t0.typ, ctx.rules) {
      return Ok(if t1.typ == TT::Arrow {
        // An arrow function with one bare parameter.
        self.arrow_func_expr(ctx, terminators)?.into_wrapped()
      } else {
        self.id_expr(ctx)?.into_wrapped()
      });
    };

    let expr: Node<Expr> = match t0.typ {
      TT::OpenBracket => self.lit_arr(ctx)?.into_wrapped(),
      TT::OpenBrace => self.lit_obj(ctx)?.into_wrapped(),
      TT::Class => self.class_expr(ctx)?.into_wrapped(),
      TT::Function => self.func_expr(ctx)?.into_wrapped(),
      TT::Import => match t1.typ {
        // `import.meta` only exists in modules.
        TT::Dot => return Err(t0.error(SyntaxErrorType::ModuleSyntaxNotAllowed)),
        TT::OpenParen => self.import_call(ctx)?.into_wrapped(),
        _ => return Err(t0.error(SyntaxErrorType::ExpectedSyntax("import expression"))),
      },
      TT::New if t1.typ == TT::Dot => self.new_target()?.into_wrapped(),
      TT::Super => self.super_expr()?.into_wrapped(),
      TT::This => self.this_expr()?.into_wrapped(),
      TT::BigIntLit => self.lit_bigint()?.into_wrapped(),
      TT::TrueLit | TT::FalseLit => self.lit_bool()?.into_wrapped(),
      TT::NullLit => self.lit_null()?.into_wrapped(),
      TT::NumberLit => self.lit_num()?.into_wrapped(),
      TT::RegexLit => self.lit_regex()?.into_wrapped(),
      TT::StringLit => self.lit_str()?.into_wrapped(),
      TT::TemplateChunk | TT::TemplateChunkEnd => {
        self.lit_template(ctx)?.into_wrapped()
      }
      TT::OpenParen => self.arrow_function_or_grouping_expr(ctx, terminators, asi)?,
      // Private identifier in expression position (e.g. `#field in obj`).
      TT::PrivateName => self
        .spanned(|p| {
          let name = p.take_source();
          Ok(IdExpr { name })
        })?
        .into_wrapped(),
      _ => return Err(t0.error(SyntaxErrorType::ExpectedSyntax("expression operand"))),
    };
    Ok(expr)
  }

  pub fn expr_with_min_prec<const N: usize>(
    &mut self,
    ctx: ParseCtx,
    min_prec: u8,
    terminators: [TT; N],
    asi: &mut Asi,
  ) -> SyntaxResult<Node<Expr>> {
    let mut left = self.expr_operand(ctx, terminators, asi)?;

    loop {
      let cp = self.checkpoint();
      let t = self.bump();

      // EOF ends any expression; a context that required more input fails at
      // its own next required token instead.
      if terminators.contains(&t.typ) || t.typ == TT::EOF {
        self.restore_checkpoint(cp);
        if t.typ == TT::EOF && asi.can_end_with_asi {
          asi.did_end_with_asi = true;
        }
        break;
      };

      match t.typ {
        // A newline before a postfix operator ends the statement instead (ASI).
        TT::PlusPlus | TT::MinusMinus if !t.preceded_by_line_terminator => {
          let operator_name = match t.typ {
            TT::PlusPlus => OperatorName::PostfixIncrement,
            TT::MinusMinus => OperatorName::PostfixDecrement,
            _ => unreachable!(),
          };
          let operator = &OPERATORS[&operator_name];
          if operator.precedence < min_prec {
            self.restore_checkpoint(cp);
            break;
          };
          left = Node::new(left.loc + t.loc, UnaryPostfixExpr {
            operator: operator_name,
            argument: left,
          })
          .into_wrapped();
          continue;
        }
        // A newline before the template ends the statement instead (ASI).
        TT::TemplateChunk | TT::TemplateChunkEnd
          if !t.preceded_by_line_terminator =>
        {
          let loc = t.loc;
          self.restore_checkpoint(cp);
          let parts = self.lit_template_parts(ctx)?;
          left = Node::new(left.loc + loc, TaggedTemplateExpr {
            function: left,
            parts,
          })
          .into_wrapped();
          continue;
        }
        _ => {}
      };

      match MULTARY_OPERATOR_MAPPING.get(&t.typ) {
        None => {
          if asi.can_end_with_asi
            && (t.preceded_by_line_terminator || t.typ == TT::CloseBrace || t.typ == TT::EOF)
          {
            // ASI applies here.
            self.restore_checkpoint(cp);
            asi.did_end_with_asi = true;
            break;
          };
          return Err(t.error(SyntaxErrorType::ExpectedSyntax("expression operator")));
        }
        Some(operator) => {
          if operator.precedence < min_prec {
            self.restore_checkpoint(cp);
            break;
          };

          let next_min_prec =
            operator.precedence + (operator.associativity == Associativity::Left) as u8;

          left = match operator.name {
            OperatorName::Call | OperatorName::OptionalChainingCall => {
              let arguments = self.call_args(ctx)?;
              let end = self.expect(TT::CloseParen)?;
              Node::new(left.loc + end.loc, CallExpr {
                optional_chaining: operator.name == OperatorName::OptionalChainingCall,
                arguments,
                callee: left,
              })
              .into_wrapped()
            }
            OperatorName::ComputedMemberAccess
            | OperatorName::OptionalChainingComputedMemberAccess => {
              let member = self.expr(ctx, [TT::CloseBracket])?;
              let end = self.expect(TT::CloseBracket)?;
              Node::new(left.loc + end.loc, ComputedMemberExpr {
                optional_chaining: operator.name
                  == OperatorName::OptionalChainingComputedMemberAccess,
                object: left,
                member,
              })
              .into_wrapped()
            }
            OperatorName::Conditional => {
              let consequent = self.expr(ctx, [TT::Colon])?;
              self.expect(TT::Colon)?;
              // The alternate is an AssignmentExpression, so assignments bind without grouping.
              let alternate =
                self.expr_with_min_prec(ctx, PRECEDENCE_ASSIGNMENT, terminators, asi)?;
              Node::new(left.loc + alternate.loc, CondExpr {
                test: left,
                consequent,
                alternate,
              })
              .into_wrapped()
            }
            OperatorName::MemberAccess | OperatorName::OptionalChainingMemberAccess => {
              let right_tok = self.bump();
              match right_tok.typ {
                TT::Identifier => {}
                TT::PrivateName => {}
                t if KEYWORDS_MAPPING.contains_key(&t) => {}
                _ => {
                  return Err(
                    right_tok.error(SyntaxErrorType::ExpectedSyntax("member access property")),
                  )
                }
              };
              let right = right_tok.loc;
              Node::new(left.loc + right, MemberExpr {
                optional_chaining: operator.name == OperatorName::OptionalChainingMemberAccess,
                left,
                right: self.string(right),
              })
              .into_wrapped()
            }
            _ => {
              if operator.name.is_assignment() {
                left = lhs_expr_to_assign_target(left, operator.name)?;
              };
              let right = self.expr_with_min_prec(ctx, next_min_prec, terminators, asi)?;
              Node::new(left.loc + right.loc, BinaryExpr {
                operator: operator.name,
                left,
                right,
              })
              .into_wrapped()
            }
          };
        }
      };
    }

    Ok(left)
  }

  pub fn import_call(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ImportExpr>> {
    self.spanned(|p| {
      p.expect(TT::Import)?;
      p.expect(TT::OpenParen)?;
      let module = p.expr(ctx, [TT::CloseParen])?;
      p.expect(TT::CloseParen)?;
      Ok(ImportExpr { module })
    })
  }

  pub fn super_expr(&mut self) -> SyntaxResult<Node<SuperExpr>> {
    self.spanned(|p| {
      p.expect(TT::Super)?;
      Ok(SuperExpr {})
    })
  }

  pub fn this_expr(&mut self) -> SyntaxResult<Node<ThisExpr>> {
    self.spanned(|p| {
      p.expect(TT::This)?;
      Ok(ThisExpr {})
    })
  }

  pub fn new_target(&mut self) -> SyntaxResult<Node<NewTargetExpr>> {
    self.spanned(|p| {
      p.expect(TT::New)?;
      p.expect(TT::Dot)?;
      let prop = p.expect(TT::Identifier)?;
      if p.str(prop.loc) != "target" {
        return Err(prop.error(SyntaxErrorType::ExpectedSyntax("`target` property")));
      };
      Ok(NewTargetExpr {})
    })
  }
}
