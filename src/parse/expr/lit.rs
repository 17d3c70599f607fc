use super::pat::is_valid_pattern_identifier;
use super::Asi;
use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMember;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitArrExpr;
use crate::ast::expr::lit::LitBigIntExpr;
use crate::ast::expr::lit::LitBoolExpr;
use crate::ast::expr::lit::LitNullExpr;
use crate::ast::expr::lit::LitNumExpr;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::lit::LitRegexExpr;
use crate::ast::expr::lit::LitStrExpr;
use crate::ast::expr::lit::LitTemplateExpr;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::IdExpr;
use crate::ast::node::Node;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::LexMode;
use crate::token::TT;

// Slices the content out of a raw template part. The first part begins with a backtick; every part ends with either `${` (more parts follow) or a backtick (the template ends).
fn template_content(raw: &str, is_end: bool) -> Option<&str> {
  let mut start = 0;
  let mut end = raw.len();
  if raw.starts_with('`') && raw.len() > '`'.len_utf8() {
    start += '`'.len_utf8();
  }
  if is_end {
    if !raw.ends_with('`') {
      return None;
    }
    end = end.saturating_sub('`'.len_utf8());
  } else {
    if !raw.ends_with("${") {
      return None;
    }
    end = end.saturating_sub("${".len());
  }
  if end < start {
    return None;
  }
  raw.get(start..end)
}

impl<'a> Parser<'a> {
  pub fn lit_arr(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitArrExpr>> {
    self.spanned(|p| {
      p.expect(TT::OpenBracket)?;
      let mut elements = Vec::<LitArrElem>::new();
      loop {
        if p.eat(TT::Comma).is_match() {
          elements.push(LitArrElem::Empty);
          continue;
        };
        if p.peek().typ == TT::CloseBracket {
          break;
        };
        let rest = p.eat(TT::Ellipsis).is_match();
        let value = p.expr(ctx, [TT::Comma, TT::CloseBracket])?;
        elements.push(if rest {
          LitArrElem::Rest(value)
        } else {
          LitArrElem::Single(value)
        });
        if p.peek().typ == TT::CloseBracket {
          break;
        };
        p.expect(TT::Comma)?;
      }
      p.expect(TT::CloseBracket)?;
      Ok(LitArrExpr { elements })
    })
  }

  pub fn lit_bigint(&mut self) -> SyntaxResult<Node<LitBigIntExpr>> {
    self.spanned(|p| {
      let t = p.expect(TT::BigIntLit)?;
      Ok(LitBigIntExpr {
        raw: p.string(t.loc),
      })
    })
  }

  pub fn lit_bool(&mut self) -> SyntaxResult<Node<LitBoolExpr>> {
    self.spanned(|p| {
      if p.eat(TT::TrueLit).is_match() {
        Ok(LitBoolExpr { value: true })
      } else {
        p.expect(TT::FalseLit)?;
        Ok(LitBoolExpr { value: false })
      }
    })
  }

  pub fn lit_null(&mut self) -> SyntaxResult<Node<LitNullExpr>> {
    self.spanned(|p| {
      p.expect(TT::NullLit)?;
      Ok(LitNullExpr {})
    })
  }

  pub fn lit_num(&mut self) -> SyntaxResult<Node<LitNumExpr>> {
    self.spanned(|p| {
      let t = p.expect(TT::NumberLit)?;
      Ok(LitNumExpr {
        raw: p.string(t.loc),
      })
    })
  }

  pub fn lit_obj(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitObjExpr>> {
    self.spanned(|p| {
      p.expect(TT::OpenBrace)?;
      let mut members = Vec::new();
      while p.peek().typ != TT::CloseBrace {
        let member = p.spanned(|p| {
          if p.eat(TT::Ellipsis).is_match() {
            let value = p.expr(ctx, [TT::Comma, TT::CloseBrace])?;
            return Ok(ObjMember {
              typ: ObjMemberType::Rest { val: value },
            });
          };
          let (key, val) = p.class_or_obj_member(ctx, TT::Colon, TT::Comma, &mut Asi::no())?;
          let typ = match val {
            ClassOrObjVal::Prop(None) => {
              // This property had no value, so it's a shorthand property. The key must not be computed, and must be a valid identifier name.
              match key {
                ClassOrObjKey::Computed(expr) => {
                  return Err(expr.error(SyntaxErrorType::ExpectedSyntax("object literal value")));
                }
                ClassOrObjKey::Direct(direct_key) => {
                  if !is_valid_pattern_identifier(direct_key.stx.tt, ctx.rules) {
                    return Err(direct_key.error(SyntaxErrorType::ExpectedSyntax("identifier")));
                  }
                  ObjMemberType::Shorthand {
                    id: direct_key.map_stx(|n| IdExpr { name: n.key }),
                  }
                }
              }
            }
            _ => ObjMemberType::Valued { key, val },
          };
          Ok(ObjMember { typ })
        })?;
        members.push(member);
        if !p.eat(TT::Comma).is_match() {
          break;
        };
      }
      p.expect(TT::CloseBrace)?;
      Ok(LitObjExpr { members })
    })
  }

  pub fn lit_regex(&mut self) -> SyntaxResult<Node<LitRegexExpr>> {
    self.spanned(|p| {
      let t = p.expect_with_mode(TT::RegexLit, LexMode::SlashIsRegex)?;
      Ok(LitRegexExpr {
        raw: p.string(t.loc),
      })
    })
  }

  pub fn lit_str(&mut self) -> SyntaxResult<Node<LitStrExpr>> {
    self.spanned(|p| {
      let t = p.expect(TT::StringLit)?;
      Ok(LitStrExpr {
        raw: p.string(t.loc),
      })
    })
  }

  pub fn lit_template(&mut self, ctx: ParseCtx) -> SyntaxResult<Node<LitTemplateExpr>> {
    self.spanned(|p| {
      let parts = p.lit_template_parts(ctx)?;
      Ok(LitTemplateExpr { parts })
    })
  }

  // Caller guarantees the next token is a template chunk.
  pub fn lit_template_parts(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<LitTemplatePart>> {
    let t = self.bump();
    let is_end = match t.typ {
      TT::TemplateChunk => false,
      TT::TemplateChunkEnd => true,
      _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("template string part"))),
    };

    let mut parts = Vec::new();
    let raw = self.str(t.loc);
    let first = template_content(raw, is_end).ok_or_else(|| t.error(SyntaxErrorType::UnexpectedEnd))?;
    parts.push(LitTemplatePart::String(first.to_string()));
    if !is_end {
      loop {
        let substitution = self.expr(ctx, [TT::CloseBrace])?;
        self.expect(TT::CloseBrace)?;
        parts.push(LitTemplatePart::Substitution(substitution));
        let string = self.bump_with_mode(LexMode::TemplateStrContinue);
        let string_is_end = match string.typ {
          TT::TemplateChunk => false,
          TT::TemplateChunkEnd => true,
          _ => {
            return Err(string.error(SyntaxErrorType::ExpectedSyntax("template string part")));
          }
        };
        let raw = self.str(string.loc);
        let content = template_content(raw, string_is_end)
          .ok_or_else(|| string.error(SyntaxErrorType::UnexpectedEnd))?;
        parts.push(LitTemplatePart::String(content.to_string()));
        if string_is_end {
          break;
        };
      }
    };

    Ok(parts)
  }
}
