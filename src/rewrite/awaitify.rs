//! Stage three: the implicit-await machinery itself.
//!
//! Every function-like frame the analyzer marked async-needing is rewritten
//! into a dual-mode state machine: the body runs inside an immediately-invoked
//! async arrow, and if it completes without actually suspending, the original
//! caller gets the plain value (or exception) synchronously. Only when the
//! body really awaited does the function return a promise, tagged with the
//! synthetic-promise symbol so enclosing rewritten code awaits it in turn.
//!
//! Within rewritten frames, every candidate expression site is wrapped so its
//! value is awaited if (and only if) it is a tagged promise. Frames that can
//! never become async (class constructors, plain generators, known-sync
//! callbacks) instead get an assertion that rejects tagged values with a
//! descriptive error. `for`-`of` loops are adapted so tagged async iterables
//! drive the loop while everything else iterates untouched.
//!
//! Each rewritten function also gets a leading string-literal marker encoding
//! its original source, which the runtime support library's
//! `Function.prototype.toString` override decodes back.

use super::build;
use super::names::FreshInternalNameGenerator;
use super::names::GeneratedNames;
use crate::analyze::pat_names;
use crate::analyze::scope_names;
use crate::analyze::Analysis;
use crate::analyze::Frame;
use crate::analyze::FrameId;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::ForBody;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForOfStmt;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::error::RewriteResult;
use crate::error::SyntaxError;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::source;
use crate::source::ERROR_SOURCE_BUDGET;
use ahash::HashSet;
use ahash::HashSetExt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FrameMode {
  /// Rewritten into the dual sync/async state machine.
  Convert,
  /// Written `async` by the user; sites are awaited directly.
  AsyncUser,
  /// Cannot become async; sites get the synthetic-value assertion.
  Assert,
  Untouched,
}

pub fn apply(
  top: &mut Node<TopLevel>,
  source: &str,
  analysis: &Analysis,
  g: &GeneratedNames,
  names: FreshInternalNameGenerator,
) -> RewriteResult<FreshInternalNameGenerator> {
  let mut top_scope = HashSet::new();
  scope_names(&top.stx.body, &mut top_scope);
  let mut pass = Awaitify {
    source,
    analysis,
    g,
    names,
    scopes: vec![top_scope],
    mode: FrameMode::Untouched,
    full_helpers_in_scope: false,
    sync_helpers_in_scope: false,
    err: None,
  };
  pass.stmts(&mut top.stx.body);
  match pass.err {
    Some(err) => Err(err.into()),
    None => Ok(pass.names),
  }
}

// Helper templates, parsed per installation. Placeholder tokens are replaced
// with the program's collision-free names and the shared symbol keys before
// parsing.
const FULL_HELPERS: &str = r#"
const __SP__ = Symbol.for("__SP_KEY__");
const __SAI__ = Symbol.for("__SAI_KEY__");
let __EX__;
function __MSP__(p) {
  return Object.defineProperty(p, __SP__, { value: true });
}
function __ISP__(p) {
  return p && p[__SP__];
}
function __ANSP__(p, s, i = false) {
  if (p && p[__SP__]) {
    throw new Error('[ASYNC-10012] Result of expression "' + s + '" cannot be used in this context');
  }
  if (i && p && p[__SAI__]) {
    throw new Error('[ASYNC-10013] Result of expression "' + s + '" cannot be iterated in this context');
  }
  return p;
}
function __AAITSI__(original) {
  if (!original || !original[__SAI__]) {
    return { iterable: original, isSyntheticAsyncIterable: false };
  }
  const originalIterator = original[Symbol.asyncIterator]();
  let next;
  let returned;
  return {
    isSyntheticAsyncIterable: true,
    iterable: {
      [Symbol.iterator]() {
        return this;
      },
      next() {
        const value = next;
        next = undefined;
        return value;
      },
      return(value) {
        returned = { value };
        return { value, done: true };
      },
      async expectNext() {
        if (next === undefined) next = await originalIterator.next();
      },
      async syncReturn() {
        if (returned) {
          await originalIterator.return(returned.value);
        }
      }
    }
  };
}
function __DE__(err) {
  if (Object.prototype.toString.call(err) === '[object Error]' && err.message.includes('﻿')) {
    err.message = err.message.replace(/\(\s*['"]﻿(.+?)﻿['"]\s*,(?:[^\(]|\([^\)]*\))*\)/g, (m, o) => o);
  }
  return err;
}
"#;

const SYNC_HELPERS: &str = r#"
const __SP__ = Symbol.for("__SP_KEY__");
const __SAI__ = Symbol.for("__SAI_KEY__");
function __ANSP__(p, s, i = false) {
  if (p && p[__SP__]) {
    throw new Error('[ASYNC-10012] Result of expression "' + s + '" cannot be used in this context');
  }
  if (i && p && p[__SAI__]) {
    throw new Error('[ASYNC-10013] Result of expression "' + s + '" cannot be iterated in this context');
  }
  return p;
}
"#;

struct Awaitify<'a> {
  source: &'a str,
  analysis: &'a Analysis,
  g: &'a GeneratedNames,
  names: FreshInternalNameGenerator,
  // One flat set of bindings per enclosing function.
  scopes: Vec<HashSet<String>>,
  mode: FrameMode,
  full_helpers_in_scope: bool,
  sync_helpers_in_scope: bool,
  err: Option<SyntaxError>,
}

impl<'a> Awaitify<'a> {
  fn is_bound(&self, name: &str) -> bool {
    self.scopes.iter().any(|s| s.contains(name))
  }

  fn mode_of(&self, id: FrameId) -> FrameMode {
    let frame = self.analysis.frame(id);
    if frame.async_user {
      FrameMode::AsyncUser
    } else if frame.convertible && frame.needs_async {
      FrameMode::Convert
    } else if !frame.convertible && frame.has_site {
      FrameMode::Assert
    } else {
      FrameMode::Untouched
    }
  }

  fn helper_stmts(&mut self, template: &str) -> Vec<Node<Stmt>> {
    let g = self.g;
    let src = template
      .replace("__SP_KEY__", super::SYMBOL_SYNTHETIC_PROMISE)
      .replace("__SAI_KEY__", super::SYMBOL_SYNTHETIC_ASYNC_ITERABLE)
      .replace("__AAITSI__", &g.aaitsi)
      .replace("__ANSP__", &g.ansp)
      .replace("__MSP__", &g.msp)
      .replace("__ISP__", &g.isp)
      .replace("__SAI__", &g.sai)
      .replace("__SP__", &g.sp)
      .replace("__EX__", &g.ex)
      .replace("__DE__", &g.de);
    match build::parse_stmts(&src) {
      Ok(stmts) => stmts,
      // Can only happen if a template stops being valid for this parser;
      // surfaced from `apply` rather than panicking mid-walk.
      Err(err) => {
        if self.err.is_none() {
          self.err = Some(err);
        }
        Vec::new()
      }
    }
  }

  // `marker_loc` spans the whole function as written (the `Func` node's own
  // location starts at the parameter list), so the marker captures the
  // complete original text.
  fn func(&mut self, node: &mut Node<Func>, name: Option<&str>, marker_loc: Loc) {
    let mode = node
      .assoc
      .get::<Frame>()
      .map(|f| self.mode_of(f.0))
      .unwrap_or(FrameMode::Untouched);

    // Expression-bodied arrows become block-bodied so the marker (and any
    // machinery) has somewhere to live. The marker keeps `toString` honest.
    if let FuncBody::Expression(_) = node.stx.body {
      let FuncBody::Expression(expr) =
        std::mem::replace(&mut node.stx.body, FuncBody::Block(vec![]))
      else {
        unreachable!();
      };
      node.stx.body = FuncBody::Block(vec![build::return_stmt(Some(expr))]);
    }

    let mut scope = HashSet::new();
    if let Some(name) = name {
      scope.insert(name.to_string());
    }
    for param in &node.stx.parameters {
      let mut names = Vec::new();
      pat_names(&param.stx.pattern.stx.pat, &mut names);
      scope.extend(names);
    }
    if let FuncBody::Block(body) = &node.stx.body {
      scope_names(body, &mut scope);
    }
    self.scopes.push(scope);

    let saved_mode = self.mode;
    let saved_helpers = self.full_helpers_in_scope;
    let saved_sync = self.sync_helpers_in_scope;
    let install_full =
      matches!(mode, FrameMode::Convert | FrameMode::AsyncUser) && !self.full_helpers_in_scope;
    let install_sync =
      mode == FrameMode::Assert && !self.full_helpers_in_scope && !self.sync_helpers_in_scope;
    if matches!(mode, FrameMode::Convert | FrameMode::AsyncUser) {
      self.full_helpers_in_scope = true;
    }
    if install_sync {
      self.sync_helpers_in_scope = true;
    }
    self.mode = mode;

    // Awaiting is illegal in parameter defaults even inside async functions.
    let default_mode = match mode {
      FrameMode::Convert | FrameMode::AsyncUser => FrameMode::Assert,
      other => other,
    };
    for param in &mut node.stx.parameters {
      let outer = std::mem::replace(&mut self.mode, default_mode);
      self.decl_pat(&mut param.stx.pattern);
      if let Some(default) = &mut param.stx.default_value {
        self.expr(default, false, false);
      }
      self.mode = outer;
    }
    if let FuncBody::Block(body) = &mut node.stx.body {
      self.stmts(body);
    }

    let FuncBody::Block(body) = std::mem::replace(&mut node.stx.body, FuncBody::Block(vec![]))
    else {
      unreachable!();
    };
    let mut out = Vec::new();
    if !marker_loc.is_empty() {
      out.push(self.marker(marker_loc));
    }
    if install_full {
      out.extend(self.helper_stmts(FULL_HELPERS));
    } else if install_sync {
      out.extend(self.helper_stmts(SYNC_HELPERS));
    }
    match mode {
      FrameMode::Convert => out.extend(self.state_machine(body)),
      FrameMode::AsyncUser => out.push(self.rethrow(body)),
      FrameMode::Assert if saved_helpers => out.push(self.rethrow(body)),
      FrameMode::Assert | FrameMode::Untouched => out.extend(body),
    }
    node.stx.body = FuncBody::Block(out);

    self.mode = saved_mode;
    self.full_helpers_in_scope = saved_helpers;
    self.sync_helpers_in_scope = saved_sync;
    self.scopes.pop();
  }

  /// `'<async_rewriter>' + encodeURIComponent(originalSource) + '</>'`, as the
  /// function's first statement.
  fn marker(&self, loc: Loc) -> Node<Stmt> {
    let encoded = source::encode_uri_component(source::slice(self.source, loc));
    build::expr_stmt(build::str_lit(&format!("<async_rewriter>{encoded}</>")))
  }

  /// The dual-mode wrapper. The body runs in an IIFE'd async arrow; state
  /// tracks whether it finished before its first real suspension point.
  fn state_machine(&mut self, body: Vec<Node<Stmt>>) -> Vec<Node<Stmt>> {
    let g = self.g;
    let err = self.names.fresh("_err");
    let catch_body = vec![
      build::expr_stmt(build::assign(
        build::id(&err),
        build::call(build::id(&g.de), vec![build::id(&err)]),
      )),
      build::if_stmt(
        build::binary(OperatorName::StrictEquality, build::id(&g.fs), build::str_lit("sync")),
        build::block(vec![
          build::expr_stmt(build::assign(build::id(&g.srv), build::id(&err))),
          build::expr_stmt(build::assign(build::id(&g.fs), build::str_lit("threw"))),
        ]),
        Some(build::throw_stmt(build::id(&err))),
      ),
    ];
    let finally = build::block_node(vec![build::if_stmt(
      build::binary(OperatorName::StrictInequality, build::id(&g.fs), build::str_lit("threw")),
      build::expr_stmt(build::assign(build::id(&g.fs), build::str_lit("returned"))),
      None,
    )]);
    let guarded = build::try_stmt(build::block_node(body), Some((&err, catch_body)), Some(finally));
    vec![
      build::var_decl(VarDeclMode::Let, &g.fs, Some(build::str_lit("sync"))),
      build::var_decl(VarDeclMode::Let, &g.srv, None),
      build::var_decl(
        VarDeclMode::Const,
        &g.arv,
        Some(build::call(build::arrow(true, vec![], vec![guarded]), vec![])),
      ),
      build::if_stmt(
        build::binary(
          OperatorName::StrictEquality,
          build::id(&g.fs),
          build::str_lit("returned"),
        ),
        build::return_stmt(Some(build::id(&g.srv))),
        Some(build::if_stmt(
          build::binary(
            OperatorName::StrictEquality,
            build::id(&g.fs),
            build::str_lit("threw"),
          ),
          build::throw_stmt(build::id(&g.srv)),
          None,
        )),
      ),
      build::expr_stmt(build::assign(build::id(&g.fs), build::str_lit("async"))),
      build::return_stmt(Some(build::call(build::id(&g.msp), vec![build::id(&g.arv)]))),
    ]
  }

  /// `try { BODY } catch (_err) { _err = _de(_err); throw _err; }`, so thrown
  /// errors have their mangled expression text restored.
  fn rethrow(&mut self, body: Vec<Node<Stmt>>) -> Node<Stmt> {
    let g = self.g;
    let err = self.names.fresh("_err");
    build::try_stmt(
      build::block_node(body),
      Some((&err, vec![
        build::expr_stmt(build::assign(
          build::id(&err),
          build::call(build::id(&g.de), vec![build::id(&err)]),
        )),
        build::throw_stmt(build::id(&err)),
      ])),
      None,
    )
  }

  fn stmts(&mut self, stmts: &mut [Node<Stmt>]) {
    for stmt in stmts {
      self.stmt(stmt);
    }
  }

  fn stmt(&mut self, stmt: &mut Node<Stmt>) {
    match stmt.stx.as_mut() {
      Stmt::Block(block) => self.stmts(&mut block.stx.body),
      Stmt::Break(_) | Stmt::Continue(_) | Stmt::Debugger(_) | Stmt::Empty(_) => {}
      Stmt::DoWhile(s) => {
        self.stmt(&mut s.stx.body);
        self.expr(&mut s.stx.condition, false, false);
      }
      Stmt::Expr(s) => self.expr(&mut s.stx.expr, false, false),
      Stmt::ForIn(s) => {
        self.for_lhs(&mut s.stx.lhs);
        self.expr(&mut s.stx.rhs, false, false);
        self.stmts(&mut s.stx.body.stx.body);
      }
      Stmt::ForOf(_) => self.for_of(stmt),
      Stmt::ForTriple(s) => {
        match &mut s.stx.init {
          ForTripleStmtInit::None => {}
          ForTripleStmtInit::Expr(expr) => self.expr(expr, false, false),
          ForTripleStmtInit::Decl(decl) => self.var_decl(decl),
        }
        if let Some(cond) = &mut s.stx.cond {
          self.expr(cond, false, false);
        }
        if let Some(post) = &mut s.stx.post {
          self.expr(post, false, false);
        }
        self.stmts(&mut s.stx.body.stx.body);
      }
      Stmt::If(s) => {
        self.expr(&mut s.stx.test, false, false);
        self.stmt(&mut s.stx.consequent);
        if let Some(alt) = &mut s.stx.alternate {
          self.stmt(alt);
        }
      }
      Stmt::Label(s) => self.stmt(&mut s.stx.statement),
      Stmt::Return(s) => {
        if let Some(value) = &mut s.stx.value {
          self.expr(value, false, false);
        }
        // In converted frames a return must both record the synchronous
        // result and produce the value the inner async arrow resolves with.
        if self.mode == FrameMode::Convert {
          if let Some(value) = &mut s.stx.value {
            let g = self.g;
            let inner = build::take_expr(value);
            *value = build::seq(build::assign(build::id(&g.srv), inner), vec![build::cond(
              build::binary(
                OperatorName::StrictEquality,
                build::id(&g.fs),
                build::str_lit("async"),
              ),
              build::id(&g.srv),
              build::null_lit(),
            )]);
          }
        }
      }
      Stmt::Switch(s) => {
        self.expr(&mut s.stx.test, false, false);
        for branch in &mut s.stx.branches {
          if let Some(case) = &mut branch.stx.case {
            self.expr(case, false, false);
          }
          self.stmts(&mut branch.stx.body);
        }
      }
      Stmt::Throw(s) => self.expr(&mut s.stx.value, false, false),
      Stmt::Try(s) => {
        self.stmts(&mut s.stx.wrapped.stx.body);
        if let Some(catch) = &mut s.stx.catch {
          self.stmts(&mut catch.stx.body);
          // Restore mangled error text on entry to every reachable handler.
          if self.full_helpers_in_scope {
            if let Some(param) = &catch.stx.parameter {
              if let Pat::Id(id) = param.stx.pat.stx.as_ref() {
                let name = id.stx.name.clone();
                let g = self.g;
                catch.stx.body.insert(
                  0,
                  build::expr_stmt(build::assign(
                    build::id(&name),
                    build::call(build::id(&g.de), vec![build::id(&name)]),
                  )),
                );
              }
            }
          }
        }
        if let Some(finally) = &mut s.stx.finally {
          self.stmts(&mut finally.stx.body);
        }
      }
      Stmt::While(s) => {
        self.expr(&mut s.stx.condition, false, false);
        self.stmt(&mut s.stx.body);
      }
      Stmt::With(s) => {
        self.expr(&mut s.stx.object, false, false);
        self.stmt(&mut s.stx.body);
      }
      Stmt::ClassDecl(decl) => {
        if let Some(extends) = &mut decl.stx.extends {
          self.expr(extends, false, false);
        }
        self.class_members(&mut decl.stx.members);
      }
      Stmt::FunctionDecl(decl) => {
        let name = decl.stx.name.as_ref().map(|n| n.stx.name.clone());
        let loc = decl.loc;
        self.func(&mut decl.stx.function, name.as_deref(), loc);
      }
      Stmt::VarDecl(decl) => self.var_decl(decl),
    }
  }

  fn var_decl(&mut self, decl: &mut Node<VarDecl>) {
    for declarator in &mut decl.stx.declarators {
      self.decl_pat(&mut declarator.pattern);
      if let Some(init) = &mut declarator.initializer {
        self.expr(init, false, false);
      }
    }
  }

  // Declaration patterns only contain expressions in their defaults.
  fn decl_pat(&mut self, pat_decl: &mut Node<PatDecl>) {
    self.pat_defaults(&mut pat_decl.stx.pat);
  }

  fn pat_defaults(&mut self, pat: &mut Node<Pat>) {
    match pat.stx.as_mut() {
      Pat::Id(_) => {}
      Pat::Arr(arr) => {
        for elem in arr.stx.elements.iter_mut().flatten() {
          self.pat_defaults(&mut elem.target);
          if let Some(default) = &mut elem.default_value {
            self.expr(default, false, false);
          }
        }
        if let Some(rest) = &mut arr.stx.rest {
          self.pat_defaults(rest);
        }
      }
      Pat::Obj(obj) => {
        for prop in &mut obj.stx.properties {
          if let ClassOrObjKey::Computed(key) = &mut prop.stx.key {
            self.expr(key, false, false);
          }
          self.pat_defaults(&mut prop.stx.target);
          if let Some(default) = &mut prop.stx.default_value {
            self.expr(default, false, false);
          }
        }
      }
      Pat::AssignTarget(expr) => self.expr(expr, true, false),
    }
  }

  // Assignment-target patterns (`[a.b] = x`): each target is written to, not
  // read, so the target expression itself is never wrapped.
  fn assign_target_pat(&mut self, pat: &mut Node<Pat>) {
    self.pat_defaults(pat);
  }

  fn for_lhs(&mut self, lhs: &mut ForInOfLhs) {
    match lhs {
      ForInOfLhs::Assign(pat) => self.assign_target_pat(pat),
      ForInOfLhs::Decl((_, pat_decl)) => self.decl_pat(pat_decl),
    }
  }

  fn for_of(&mut self, stmt: &mut Node<Stmt>) {
    let rewrite = matches!(self.mode, FrameMode::Convert | FrameMode::AsyncUser)
      && !stmt.loc.is_empty();
    {
      let Stmt::ForOf(s) = stmt.stx.as_mut() else {
        unreachable!();
      };
      let rewrite = rewrite && !s.stx.await_;
      self.for_lhs(&mut s.stx.lhs);
      // Captured before the walk wraps the expression away from its span.
      let rhs_src =
        source::limit_string_length(source::slice(self.source, s.stx.rhs.loc), ERROR_SOURCE_BUDGET);
      let iterate_assert = self.mode == FrameMode::Assert;
      self.expr(&mut s.stx.rhs, false, iterate_assert);
      self.stmts(&mut s.stx.body.stx.body);
      if !rewrite {
        return;
      }
      s.assoc.set(ForOfSrc(rhs_src));
    }

    let Stmt::ForOf(s) = std::mem::replace(
      stmt.stx.as_mut(),
      Stmt::Empty(build::node(crate::ast::stmt::EmptyStmt {})),
    ) else {
      unreachable!();
    };
    *stmt.stx = self.adapted_for_of(s);
  }

  /// The adapter keeps a tagged async iterable one `next()` ahead of the
  /// loop, awaiting between iterations, while plain iterables flow through
  /// the original protocol untouched.
  fn adapted_for_of(&mut self, mut s: Node<ForOfStmt>) -> Stmt {
    let g = self.g;
    let rhs_src = s.assoc.get::<ForOfSrc>().map(|m| m.0.clone()).unwrap_or_default();
    let ii = self.names.fresh("_ii");
    let isai = self.names.fresh("_isai");
    let it = self.names.fresh("_it");
    let item = self.names.fresh("_i");

    let expect_next = |isai: &str, it: &str| {
      build::expr_stmt(build::binary(
        OperatorName::LogicalAnd,
        build::id(isai),
        build::await_expr(build::call(build::member(build::id(it), "expectNext"), vec![])),
      ))
    };

    let bind_item = match std::mem::replace(
      &mut s.stx.lhs,
      ForInOfLhs::Assign(build::id_pat("_")),
    ) {
      ForInOfLhs::Decl((mode, pat_decl)) => {
        build::var_decl_pat(mode, pat_decl.stx.pat, Some(build::id(&item)))
      }
      ForInOfLhs::Assign(pat) => {
        build::expr_stmt(build::assign(pat.into_stx::<Expr>(), build::id(&item)))
      }
    };
    let body = std::mem::take(&mut s.stx.body.stx.body);
    let inner_try = build::try_stmt(
      build::block_node(body),
      None,
      Some(build::block_node(vec![expect_next(&isai, &it)])),
    );
    let rhs = build::take_expr(&mut s.stx.rhs);
    let inner_for = build::node(Stmt::ForOf(build::node(ForOfStmt {
      await_: false,
      lhs: ForInOfLhs::Decl((
        VarDeclMode::Const,
        build::pat_decl(build::id_pat(&item)),
      )),
      rhs: build::seq(
        build::str_lit(&format!("\u{feff}{rhs_src}\u{feff}")),
        vec![build::id(&it)],
      ),
      body: build::node(ForBody {
        body: vec![bind_item, inner_try],
      }),
    })));
    let outer_try = build::try_stmt(
      build::block_node(vec![expect_next(&isai, &it), inner_for]),
      None,
      Some(build::block_node(vec![build::expr_stmt(build::binary(
        OperatorName::LogicalAnd,
        build::id(&isai),
        build::await_expr(build::call(build::member(build::id(&it), "syncReturn"), vec![])),
      ))])),
    );
    Stmt::Block(build::block_node(vec![
      build::var_decl(
        VarDeclMode::Const,
        &ii,
        Some(build::call(build::id(&g.aaitsi), vec![rhs])),
      ),
      build::var_decl(
        VarDeclMode::Const,
        &isai,
        Some(build::member(build::id(&ii), "isSyntheticAsyncIterable")),
      ),
      build::var_decl(
        VarDeclMode::Const,
        &it,
        Some(build::member(build::id(&ii), "iterable")),
      ),
      outer_try,
    ]))
  }

  fn class_members(&mut self, members: &mut [Node<ClassMember>]) {
    for member in members {
      if let ClassOrObjKey::Computed(key) = &mut member.stx.key {
        self.expr(key, false, false);
      }
      let loc = member.loc;
      match &mut member.stx.val {
        ClassOrObjVal::Getter(getter) => self.func(&mut getter.stx.func, None, loc),
        ClassOrObjVal::Setter(setter) => self.func(&mut setter.stx.func, None, loc),
        ClassOrObjVal::Method(method) => self.func(&mut method.stx.func, None, loc),
        ClassOrObjVal::Prop(Some(value)) => {
          // Field initializers run in the instance context where awaiting is
          // off the table; assert instead.
          let outer = self.mode;
          if matches!(self.mode, FrameMode::Convert | FrameMode::AsyncUser) {
            self.mode = FrameMode::Assert;
          }
          self.expr(value, false, false);
          self.mode = outer;
        }
        ClassOrObjVal::Prop(None) => {}
      }
    }
  }

  fn expr(&mut self, node: &mut Node<Expr>, skip: bool, iterate: bool) {
    if self.typeof_probe(node) {
      return;
    }
    let loc = node.loc;
    match node.stx.as_mut() {
      Expr::ArrowFunc(arrow) => self.func(&mut arrow.stx.func, None, loc),
      Expr::Func(func) => {
        let name = func.stx.name.as_ref().map(|n| n.stx.name.clone());
        self.func(&mut func.stx.func, name.as_deref(), loc);
      }
      Expr::Class(class) => {
        if let Some(extends) = &mut class.stx.extends {
          self.expr(extends, false, false);
        }
        self.class_members(&mut class.stx.members);
      }
      Expr::Binary(binary) => {
        let lhs_skip = binary.stx.operator.is_assignment();
        self.expr(&mut binary.stx.left, lhs_skip, false);
        self.expr(&mut binary.stx.right, false, false);
      }
      Expr::Call(call) => {
        // Method callees keep their receiver binding; `eval` must stay a
        // direct call.
        let callee_skip = match call.stx.callee.stx.as_ref() {
          Expr::Member(_) | Expr::ComputedMember(_) => true,
          Expr::Id(id) => id.stx.name == "eval",
          _ => false,
        };
        self.expr(&mut call.stx.callee, callee_skip, false);
        for arg in &mut call.stx.arguments {
          self.expr(&mut arg.stx.value, false, false);
        }
      }
      Expr::ComputedMember(member) => {
        self.expr(&mut member.stx.object, false, false);
        self.expr(&mut member.stx.member, false, false);
      }
      Expr::Cond(cond) => {
        self.expr(&mut cond.stx.test, false, false);
        self.expr(&mut cond.stx.consequent, false, false);
        self.expr(&mut cond.stx.alternate, false, false);
      }
      Expr::Id(_) => {}
      Expr::Import(import) => self.expr(&mut import.stx.module, false, false),
      Expr::Member(member) => self.expr(&mut member.stx.left, false, false),
      Expr::NewTarget(_) | Expr::Super(_) | Expr::This(_) => {}
      Expr::TaggedTemplate(tagged) => {
        self.expr(&mut tagged.stx.function, false, false);
        self.template_parts(&mut tagged.stx.parts);
      }
      Expr::Unary(unary) => match unary.stx.operator {
        OperatorName::Await
        | OperatorName::Delete
        | OperatorName::PrefixIncrement
        | OperatorName::PrefixDecrement => self.expr(&mut unary.stx.argument, true, false),
        OperatorName::New => {
          // The constructor-call syntax itself is never a wrap site; the
          // `new` expression as a whole is.
          if let Expr::Call(call) = unary.stx.argument.stx.as_mut() {
            self.expr(&mut call.stx.callee, false, false);
            for arg in &mut call.stx.arguments {
              self.expr(&mut arg.stx.value, false, false);
            }
          } else {
            self.expr(&mut unary.stx.argument, false, false);
          }
        }
        OperatorName::YieldDelegated => self.expr(&mut unary.stx.argument, false, true),
        _ => self.expr(&mut unary.stx.argument, false, false),
      },
      Expr::UnaryPostfix(unary) => self.expr(&mut unary.stx.argument, true, false),
      Expr::LitArr(arr) => {
        for elem in &mut arr.stx.elements {
          match elem {
            LitArrElem::Single(expr) | LitArrElem::Rest(expr) => self.expr(expr, false, false),
            LitArrElem::Empty => {}
          }
        }
      }
      Expr::LitObj(obj) => {
        for obj_member in &mut obj.stx.members {
          let member_loc = obj_member.loc;
          match &mut obj_member.stx.typ {
            ObjMemberType::Valued { key, val } => {
              if let ClassOrObjKey::Computed(key) = key {
                self.expr(key, false, false);
              }
              match val {
                ClassOrObjVal::Getter(getter) => self.func(&mut getter.stx.func, None, member_loc),
                ClassOrObjVal::Setter(setter) => self.func(&mut setter.stx.func, None, member_loc),
                ClassOrObjVal::Method(method) => self.func(&mut method.stx.func, None, member_loc),
                ClassOrObjVal::Prop(Some(value)) => self.expr(value, false, false),
                ClassOrObjVal::Prop(None) => {}
              }
            }
            ObjMemberType::Shorthand { id } => {
              let loc = id.loc;
              let name = id.stx.name.clone();
              if !loc.is_empty() && self.mode != FrameMode::Untouched && !self.is_bound(&name) {
                let mut value = Node::new(
                  loc,
                  Expr::Id(Node::new(loc, IdExpr { name: name.clone() })),
                );
                self.maybe_wrap(&mut value, false);
                obj_member.stx.typ = ObjMemberType::Valued {
                  key: build::direct_key(&name),
                  val: ClassOrObjVal::Prop(Some(value)),
                };
              }
            }
            ObjMemberType::Rest { val } => self.expr(val, false, false),
          }
        }
      }
      Expr::LitTemplate(template) => self.template_parts(&mut template.stx.parts),
      Expr::LitBigInt(_)
      | Expr::LitBool(_)
      | Expr::LitNull(_)
      | Expr::LitNum(_)
      | Expr::LitRegex(_)
      | Expr::LitStr(_) => {}
      Expr::ArrPat(_) | Expr::IdPat(_) | Expr::ObjPat(_) => {}
    }
    if !skip {
      self.maybe_wrap(node, iterate);
    }
  }

  fn template_parts(&mut self, parts: &mut [LitTemplatePart]) {
    for part in parts {
      if let LitTemplatePart::Substitution(expr) = part {
        self.expr(expr, false, false);
      }
    }
  }

  /// `typeof x` on a free identifier must keep reporting `'undefined'` for
  /// undeclared names instead of throwing out of the wrapper, so the probe
  /// runs on the bare identifier first. Returns true if it replaced the node.
  fn typeof_probe(&mut self, node: &mut Node<Expr>) -> bool {
    let Expr::Unary(unary) = node.stx.as_mut() else {
      return false;
    };
    if unary.stx.operator != OperatorName::Typeof {
      return false;
    }
    let name = match unary.stx.argument.stx.as_ref() {
      Expr::Id(id)
        if !unary.stx.argument.loc.is_empty() && !self.is_bound(&id.stx.name) =>
      {
        id.stx.name.clone()
      }
      _ => return false,
    };
    if self.mode == FrameMode::Untouched {
      return false;
    }
    let mut probed = build::take_expr(&mut unary.stx.argument);
    self.maybe_wrap(&mut probed, false);
    *node = build::cond(
      build::binary(
        OperatorName::StrictEquality,
        build::unary(OperatorName::Typeof, build::id(&name)),
        build::str_lit("undefined"),
      ),
      build::str_lit("undefined"),
      build::unary(OperatorName::Typeof, probed),
    );
    true
  }

  fn maybe_wrap(&mut self, node: &mut Node<Expr>, iterate: bool) {
    if node.loc.is_empty() || self.mode == FrameMode::Untouched {
      return;
    }
    let wrappable = match node.stx.as_ref() {
      Expr::Call(_)
      | Expr::Import(_)
      | Expr::Member(_)
      | Expr::ComputedMember(_)
      | Expr::TaggedTemplate(_) => true,
      Expr::Unary(unary) => unary.stx.operator == OperatorName::New,
      Expr::Id(id) => !self.is_bound(&id.stx.name),
      _ => false,
    };
    if !wrappable {
      return;
    }
    let g = self.g;
    let src =
      source::limit_string_length(source::slice(self.source, node.loc), ERROR_SOURCE_BUDGET);
    let inner = build::take_expr(node);
    *node = match self.mode {
      FrameMode::Convert | FrameMode::AsyncUser => build::seq(
        // The U+FEFF-marked source text identifies this wrapper in engine
        // error messages so demangling can restore the original expression.
        build::str_lit(&format!("\u{feff}{src}\u{feff}")),
        vec![
          build::assign(build::id(&g.ex), inner),
          build::cond(
            build::call(build::id(&g.isp), vec![build::id(&g.ex)]),
            build::await_expr(build::id(&g.ex)),
            build::id(&g.ex),
          ),
        ],
      ),
      FrameMode::Assert => {
        let mut args = vec![inner, build::str_lit(&src)];
        if iterate {
          args.push(build::bool_lit(true));
        }
        build::call(build::id(&g.ansp), args)
      }
      FrameMode::Untouched => unreachable!(),
    };
  }
}

// Association tag carrying a for-of right-hand side's original source text
// across the loop rewrite.
struct ForOfSrc(String);

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analyze::analyze;
  use crate::emit::emit_js;
  use crate::lex::Lexer;
  use crate::parse::Parser;

  fn awaitified(source: &str) -> String {
    let mut top = Parser::new(Lexer::new(source)).parse_top_level().unwrap();
    let analysis = analyze(&mut top).unwrap();
    let mut names = FreshInternalNameGenerator::for_program(&mut top);
    let g = GeneratedNames::generate(&mut names);
    apply(&mut top, source, &analysis, &g, names).unwrap();
    emit_js(&top)
  }

  #[test]
  fn test_async_function_gets_marker_helpers_and_rethrow() {
    let out = awaitified("async function f() { return db.coll.find(); }");
    assert!(out.contains("'<async_rewriter>async%20function%20f"));
    assert!(out.contains("function _de(err)"));
    assert!(out.contains("catch(_err){_err=_de(_err);throw _err;}"));
    // The call site awaits tagged promises.
    assert!(out.contains("_isp(_ex)?await _ex:_ex"));
  }

  #[test]
  fn test_arrow_with_site_becomes_state_machine() {
    let out = awaitified("function outer() { db.test.find(); }");
    assert!(out.contains("let _fs='sync';"));
    assert!(out.contains("const _arv=(async()=>{try{"));
    assert!(out.contains("if(_fs==='returned'){return _srv;}else{if(_fs==='threw'){throw _srv;}}"));
    assert!(out.contains("_fs='async';return _msp(_arv);"));
  }

  #[test]
  fn test_return_value_recorded_synchronously() {
    let out = awaitified("function f() { return g(); }");
    assert!(out.contains("return(_srv="));
    assert!(out.contains("_fs==='async'?_srv:null);"));
  }

  #[test]
  fn test_sort_comparator_gets_assertion() {
    let out = awaitified("function f() { arr.sort((a, b) => a.len - b.len); }");
    assert!(out.contains("_ansp(a.len,'a.len')"));
    assert!(!out.contains("_ansp(a,"));
  }

  #[test]
  fn test_bound_identifiers_not_wrapped() {
    let out = awaitified("function f() { let x = g(); return x; }");
    // `x` is a local binding; only the call is wrapped.
    assert!(!out.contains("\u{feff}x\u{feff}"));
    assert!(out.contains("\u{feff}g()\u{feff}"));
  }

  #[test]
  fn test_typeof_free_identifier_probed() {
    let out = awaitified("function f() { return typeof foo; }");
    assert!(out.contains("typeof foo==='undefined'?'undefined':typeof"));
  }

  #[test]
  fn test_for_of_adapted() {
    let out = awaitified("async function f(xs) { for (const x of xs) { use(x); } }");
    assert!(out.contains("const _ii=_aaitsi("));
    assert!(out.contains("const _isai=_ii.isSyntheticAsyncIterable;"));
    assert!(out.contains("_isai&&await _it.expectNext();"));
    assert!(out.contains("for(const _i of('\u{feff}xs\u{feff}',_it)){const x=_i;"));
    assert!(out.contains("finally{_isai&&await _it.syncReturn();}"));
  }

  #[test]
  fn test_for_await_left_alone() {
    let out = awaitified("async function f(xs) { for await (const x of xs) {} }");
    assert!(!out.contains("_aaitsi("));
    assert!(out.contains("for await(const x of"));
  }

  #[test]
  fn test_shorthand_property_expanded_when_wrapped() {
    let out = awaitified("function f() { return { foo }; }");
    assert!(out.contains("{foo:("));
  }

  #[test]
  fn test_site_free_function_untouched_but_marked() {
    let out = awaitified("function f() { return 1 + 2; }");
    assert!(out.contains("'<async_rewriter>"));
    assert!(!out.contains("_fs"));
    assert!(out.contains("return 1+2;"));
  }
}
