use super::expr::pat::ParsePatternRules;
use super::expr::Asi;
use super::ParseCtx;
use super::Parser;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjGetter;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::class_or_object::ClassOrObjMethod;
use crate::ast::class_or_object::ClassOrObjSetter;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::expr::Expr;
use crate::ast::func::Func;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::error::SyntaxErrorType;
use crate::error::SyntaxResult;
use crate::lex::KEYWORDS_MAPPING;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn class_body(&mut self, ctx: ParseCtx) -> SyntaxResult<Vec<Node<ClassMember>>> {
    self.expect(TT::OpenBrace)?;
    let members = self.collect_until_spanned(TT::CloseBrace, |p| {
      // `static` must always come first if present.
      let static_ = p.eat(TT::Static).match_loc();
      let (key, val) = p.class_or_obj_member(ctx, TT::Eq, TT::Semicolon, &mut Asi::can())?;
      p.eat(TT::Semicolon);
      Ok(ClassMember {
        key,
        static_: static_.is_some(),
        val,
      })
    })?;
    self.expect(TT::CloseBrace)?;
    Ok(members)
  }

  /// Parses a member key: `a`, `'a'`, `#a`, `1`, or computed `[expr]`.
  /// Direct keys keep the raw source text.
  pub fn class_or_obj_key(&mut self, ctx: ParseCtx) -> SyntaxResult<ClassOrObjKey> {
    Ok(if self.peek().typ == TT::OpenBracket {
      ClassOrObjKey::Computed({
        self.expect(TT::OpenBracket)?;
        let key = self.expr(ctx, [TT::CloseBracket])?;
        self.expect(TT::CloseBracket)?;
        key
      })
    } else {
      ClassOrObjKey::Direct(self.spanned(|p| {
        let t = p.peek();
        let key = match t.typ {
          TT::StringLit
          | TT::NumberLit
          | TT::BigIntLit
          | TT::PrivateName
          | TT::Identifier => p.take_source(),
          // Keywords are fine as keys.
          t if KEYWORDS_MAPPING.contains_key(&t) => p.take_source(),
          _ => return Err(t.error(SyntaxErrorType::ExpectedSyntax("keyword or identifier"))),
        };
        Ok(ClassOrObjMemberDirectKey { key, tt: t.typ })
      })?)
    })
  }

  /// Parses a method, with any `async`/`*` markers: `a() {}`, `async *a() {}`.
  pub fn class_or_obj_method(
    &mut self,
    ctx: ParseCtx,
  ) -> SyntaxResult<(ClassOrObjKey, Node<ClassOrObjMethod>)> {
    let is_async = self.eat(TT::Async).is_match();
    let is_generator = self.eat(TT::Star).is_match();
    let key = self.class_or_obj_key(ctx)?;
    let val = self.method_val(ctx, is_async, is_generator)?;
    Ok((key, val))
  }

  /// Parses a method's parameters and body; the key (and any `async`/`*`
  /// markers) must already be consumed.
  fn method_val(
    &mut self,
    ctx: ParseCtx,
    is_async: bool,
    is_generator: bool,
  ) -> SyntaxResult<Node<ClassOrObjMethod>> {
    let func = self.spanned(|p| {
      let fn_ctx = ctx.with_rules(ParsePatternRules {
        await_allowed: !is_async && ctx.rules.await_allowed,
        yield_allowed: !is_generator && ctx.rules.yield_allowed,
      });
      let parameters = p.func_params(fn_ctx)?;
      let body = p.parse_func_block_body(fn_ctx)?.into();
      Ok(Func {
        arrow: false,
        async_: is_async,
        generator: is_generator,
        parameters,
        body,
      })
    })?;
    Ok(func.wrap(|func| ClassOrObjMethod { func }))
  }

  pub fn class_or_obj_getter(
    &mut self,
    ctx: ParseCtx,
  ) -> SyntaxResult<(ClassOrObjKey, Node<ClassOrObjGetter>)> {
    self.expect(TT::Get)?;
    let key = self.class_or_obj_key(ctx)?;
    let func = self.spanned(|p| {
      p.expect(TT::OpenParen)?;
      p.expect(TT::CloseParen)?;
      let body = p.parse_func_block_body(ctx)?.into();
      Ok(Func {
        arrow: false,
        async_: false,
        generator: false,
        parameters: Vec::new(),
        body,
      })
    })?;
    let val = func.wrap(|func| ClassOrObjGetter { func });
    Ok((key, val))
  }

  pub fn class_or_obj_setter(
    &mut self,
    ctx: ParseCtx,
  ) -> SyntaxResult<(ClassOrObjKey, Node<ClassOrObjSetter>)> {
    self.expect(TT::Set)?;
    let key = self.class_or_obj_key(ctx)?;
    let func = self.spanned(|p| {
      p.expect(TT::OpenParen)?;
      let param = p.pat_decl(ctx)?;
      p.expect(TT::CloseParen)?;
      let body = p.parse_func_block_body(ctx)?.into();
      Ok(Func {
        arrow: false,
        async_: false,
        generator: false,
        parameters: vec![Node::new(param.loc, ParamDecl {
          rest: false,
          pattern: param,
          default_value: None,
        })],
        body,
      })
    })?;
    let val = func.wrap(|func| ClassOrObjSetter { func });
    Ok((key, val))
  }

  /// Parses a class or object property like `a`, `a = 1`, `#a = 1`, `a: 1`.
  pub fn class_or_obj_prop(
    &mut self,
    ctx: ParseCtx,
    // Separates key from value: `:` in object literals, `=` in class bodies.
    value_delimiter: TT,
    statement_delimiter: TT,
    property_initialiser_asi: &mut Asi,
  ) -> SyntaxResult<(ClassOrObjKey, Option<Node<Expr>>)> {
    let key = self.class_or_obj_key(ctx)?;
    let initializer =
      self.prop_init(ctx, value_delimiter, statement_delimiter, property_initialiser_asi)?;
    Ok((key, initializer))
  }

  fn prop_init(
    &mut self,
    ctx: ParseCtx,
    value_delimiter: TT,
    statement_delimiter: TT,
    property_initialiser_asi: &mut Asi,
  ) -> SyntaxResult<Option<Node<Expr>>> {
    (self.peek().typ == value_delimiter)
      .then(|| {
        self.expect(value_delimiter)?;
        self.expr_with_asi(
          ctx,
          [statement_delimiter, TT::CloseBrace],
          property_initialiser_asi,
        )
      })
      .transpose()
  }

  // A member takes exactly one of these shapes:
  // - `<key> ['=' <expr>]? [<asi> | ';']`
  // - `async? '*'? <key> '(' ...`
  // - `[get | set] <key> '(' ...`
  // with `<key> = <ident> | <keyword> | <str> | <num> | '[' <expr> ']'`.
  pub fn class_or_obj_member(
    &mut self,
    ctx: ParseCtx,
    value_delimiter: TT,
    statement_delimiter: TT,
    property_initialiser_asi: &mut Asi,
  ) -> SyntaxResult<(ClassOrObjKey, ClassOrObjVal)> {
    let (a, b, c, d) = self.peek_4();
    // Getter or setter, with a direct or computed key. `get`/`set` used as an
    // ordinary method or property name falls through.
    let is_getter = a.typ == TT::Get
      && (b.typ == TT::OpenBracket || (c.typ == TT::OpenParen && b.typ != value_delimiter));
    let is_setter = a.typ == TT::Set
      && (b.typ == TT::OpenBracket || (c.typ == TT::OpenParen && b.typ != value_delimiter));
    if is_getter {
      let (k, v) = self.class_or_obj_getter(ctx)?;
      return Ok((k, v.into()));
    }
    if is_setter {
      let (k, v) = self.class_or_obj_setter(ctx)?;
      return Ok((k, v.into()));
    }
    // An `async` or `*` marker always signals a method, whatever the key
    // shape. Includes using "get" or "set" as the method's name.
    let marked_method = matches!(
      (a.typ, b.typ, c.typ, d.typ),
      (TT::Async, TT::Star, TT::OpenBracket, _)
        | (TT::Async, TT::Star, _, TT::OpenParen)
        | (TT::Async, TT::OpenBracket, _, _)
        | (TT::Async, _, TT::OpenParen, _)
        | (TT::Star, TT::OpenBracket, _, _)
        | (TT::Star, _, TT::OpenParen, _)
        | (_, TT::OpenParen, _, _)
    );
    if marked_method {
      let (k, v) = self.class_or_obj_method(ctx)?;
      return Ok((k, v.into()));
    }
    // A computed key spans arbitrarily many tokens, so no fixed lookahead can
    // tell `[a]() {}` from `[a]: 1`. Parse the key, then decide.
    let key = self.class_or_obj_key(ctx)?;
    Ok(if self.peek().typ == TT::OpenParen {
      let v = self.method_val(ctx, false, false)?;
      (key, v.into())
    } else {
      let v =
        self.prop_init(ctx, value_delimiter, statement_delimiter, property_initialiser_asi)?;
      (key, v.into())
    })
  }
}
