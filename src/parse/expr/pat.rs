use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ArrPatElem;
use crate::ast::expr::pat::ClassOrFuncName;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::ObjPatProp;
use crate::ast::expr::pat::Pat;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::token::TT;

#[derive(Clone, Copy)]
pub struct ParsePatternRules {
  // `await` is not allowed as a parameter or variable inside an async function.
  pub await_allowed: bool,
  // `yield` is not allowed as a parameter or variable inside a generator function.
  pub yield_allowed: bool,
}

impl ParsePatternRules {
  pub fn with_await_allowed(&self, await_allowed: bool) -> ParsePatternRules {
    Self {
      await_allowed,
      ..*self
    }
  }

  pub fn with_yield_allowed(&self, yield_allowed: bool) -> ParsePatternRules {
    Self {
      yield_allowed,
      ..*self
    }
  }
}

pub fn is_valid_pattern_identifier(typ: TT, rules: ParsePatternRules) -> bool {
  match typ {
    TT::Identifier => true,
    TT::Await => rules.await_allowed,
    TT::Yield => rules.yield_allowed,
    t => t.is_unreserved_keyword(),
  }
}

impl<'a> Parser<'a> {
  pub fn maybe_class_or_func_name(&mut self, ctx: ParseCtx) -> Option<Node<ClassOrFuncName>> {
    self
      .eat_if(|t| is_valid_pattern_identifier(t.typ, ctx.rules))
      .map(|t| {
        Node::new(t.loc, ClassOrFuncName {
          name: self.string(t.loc),
        })
      })
  }

  /// A bare identifier binding.
  pub fn id_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<IdPat>> {
    self.spanned(|p| {
      let t = p.bump();
      if !is_valid_pattern_identifier(t.typ, ctx.rules) {
        return Err(t.error(SyntaxErrorType::ExpectedSyntax("identifier")));
      }
      Ok(IdPat {
        name: p.string(t.loc),
      })
    })
  }

  /// An object pattern: `{ x, y: z, [computed]: value, ...rest }`.
  /// At most one rest element, and nothing may follow it.
  pub fn obj_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ObjPat>> {
    self.spanned(|p| {
      p.expect(TT::OpenBrace)?;
      let mut properties = Vec::new();
      let mut rest = None;
      while p.peek().typ != TT::CloseBrace {
        // Checked inside the loop so rest comes first or right after a comma.
        // NOTE: No trailing comma allowed after the rest element.
        if p.eat(TT::Ellipsis).is_match() {
          rest = Some(p.id_pat(ctx)?);
          break;
        };

        let prop = p.spanned(|p| {
          let key = p.class_or_obj_key(ctx)?;
          let (shorthand, target) = if p.eat(TT::Colon).is_match() {
            // A colon means an explicit subpattern, not a shorthand.
            (false, p.pat(ctx)?)
          } else {
            // There's no colon, so it's a shorthand. The key must not be computed, and must be a valid identifier name. (It could be a number, reserved keyword, etc., all of which are not allowed.)
            match &key {
              ClassOrObjKey::Computed(name) => {
                return Err(name.error(SyntaxErrorType::ExpectedSyntax(
                  "object pattern property subpattern",
                )));
              }
              ClassOrObjKey::Direct(n) => {
                if !is_valid_pattern_identifier(n.stx.tt, ctx.rules) {
                  return Err(n.error(SyntaxErrorType::ExpectedSyntax("identifier")));
                }
                let id_pat = n
                  .derive_stx(|n| IdPat {
                    name: n.key.clone(),
                  })
                  .into_wrapped();
                (true, id_pat)
              }
            }
          };

          let default_value = p
            .eat(TT::Eq)
            .and_then(|| p.expr(ctx, [TT::Comma, TT::CloseBrace]))?;
          Ok(ObjPatProp {
            key,
            target,
            default_value,
            shorthand,
          })
        })?;
        properties.push(prop);
        // Falls out of the loop on `}`.
        if !p.eat(TT::Comma).is_match() {
          break;
        };
      }
      p.expect(TT::CloseBrace)?;
      Ok(ObjPat { properties, rest })
    })
  }

  /// An array pattern: `[a, b = c, ...rest]`.
  pub fn arr_pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<ArrPat>> {
    self.spanned(|p| {
      p.expect(TT::OpenBracket)?;
      let mut elements = Vec::<Option<ArrPatElem>>::new();
      let mut rest = None;
      while p.peek().typ != TT::CloseBracket {
        if p.eat(TT::Ellipsis).is_match() {
          rest = Some(p.pat(ctx)?);
          break;
        };

        // A hole skips its element.
        if p.eat(TT::Comma).is_match() {
          elements.push(None);
        } else {
          let target = p.pat(ctx)?;
          let default_value = p
            .eat(TT::Eq)
            .and_then(|| p.expr(ctx, [TT::Comma, TT::CloseBracket]))?;
          elements.push(Some(ArrPatElem {
            target,
            default_value,
          }));
          // Falls out of the loop on `]`.
          if !p.eat(TT::Comma).is_match() {
            break;
          };
        };
      }
      p.expect(TT::CloseBracket)?;
      Ok(ArrPat { elements, rest })
    })
  }

  /// Parses any binding pattern: an identifier, object pattern, or array pattern.
  pub fn pat(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<Pat>> {
    let t = self.peek();
    let pat: Node<Pat> = match t.typ {
      t if is_valid_pattern_identifier(t, ctx.rules) => self.id_pat(ctx)?.into_wrapped(),
      TT::OpenBrace => self.obj_pat(ctx)?.into_wrapped(),
      TT::OpenBracket => self.arr_pat(ctx)?.into_wrapped(),
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("pattern"))),
    };
    Ok(pat)
  }
}
