//! Scope and context-frame analysis, run between parsing and rewriting.
//!
//! Every function-like node (and the program itself) gets a [`FrameInfo`]
//! describing whether it may legally become asynchronous and whether its body
//! contains any site whose value could need implicit awaiting. The rewrite
//! stages consult these frames through the [`Frame`] tag left in each node's
//! association data.

use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::class_or_object::ObjMemberType;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::error::RewriteError;
use crate::error::RewriteResult;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::store::DeclKind;
use ahash::HashSet;
use ahash::HashSetExt;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FrameId(pub usize);

/// Association-data tag linking a `Node<Func>` to its frame.
pub struct Frame(pub FrameId);

pub const PROGRAM_FRAME: FrameId = FrameId(0);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FrameKind {
  Program,
  Function,
  Arrow,
  Method,
  Getter,
  Setter,
  Constructor,
}

#[derive(Debug)]
pub struct FrameInfo {
  pub kind: FrameKind,
  pub parent: Option<FrameId>,
  /// The user wrote this function as `async`.
  pub async_user: bool,
  pub generator: bool,
  /// Whether the rewriter may turn this frame into async form. Class
  /// constructors, plain generators, and function literals in
  /// known-synchronous callback positions are excluded.
  pub convertible: bool,
  /// The frame's own body contains a candidate maybe-async site.
  pub has_site: bool,
  /// Set by propagation: this convertible frame must get the dual sync/async
  /// state machine.
  pub needs_async: bool,
}

#[derive(Debug)]
pub struct TopLevelDecl {
  pub name: String,
  pub kind: DeclKind,
  pub loc: Loc,
}

#[derive(Debug)]
pub struct Analysis {
  pub frames: Vec<FrameInfo>,
  /// Every program-level declaration, in source order.
  pub top_level: Vec<TopLevelDecl>,
}

impl Analysis {
  pub fn frame(&self, id: FrameId) -> &FrameInfo {
    &self.frames[id.0]
  }
}

pub fn analyze(top: &mut Node<TopLevel>) -> RewriteResult<Analysis> {
  let top_level = collect_top_level_decls(top)?;
  let mut walker = Walker {
    frames: vec![FrameInfo {
      kind: FrameKind::Program,
      parent: None,
      async_user: false,
      generator: false,
      convertible: true,
      has_site: false,
      needs_async: false,
    }],
    stack: vec![PROGRAM_FRAME],
  };
  walker.stmts(&mut top.stx.body);
  let mut frames = walker.frames;
  propagate(&mut frames);
  Ok(Analysis { frames, top_level })
}

/// Once a frame has a site, every convertible ancestor up to the nearest
/// non-convertible boundary becomes async as well, so synthetic-ness can
/// chain through nested returns. Non-convertible frames absorb the flag.
fn propagate(frames: &mut [FrameInfo]) {
  for i in 0..frames.len() {
    // A site inside a non-convertible frame gets an assertion there; nothing
    // synthetic can escape it, so ancestors stay untouched.
    if !frames[i].has_site || !frames[i].convertible {
      continue;
    }
    frames[i].needs_async = true;
    let mut cur = frames[i].parent;
    while let Some(FrameId(p)) = cur {
      if !frames[p].convertible {
        break;
      }
      frames[p].needs_async = true;
      cur = frames[p].parent;
    }
  }
}

fn collect_top_level_decls(top: &Node<TopLevel>) -> RewriteResult<Vec<TopLevelDecl>> {
  let mut decls = Vec::new();
  let mut lexical_seen = HashSet::<String>::new();
  for stmt in &top.stx.body {
    match stmt.stx.as_ref() {
      Stmt::VarDecl(decl) if decl.stx.mode != VarDeclMode::Var => {
        let kind = match decl.stx.mode {
          VarDeclMode::Let => DeclKind::Let,
          _ => DeclKind::Const,
        };
        for declarator in &decl.stx.declarators {
          let mut names = Vec::new();
          pat_names(&declarator.pattern.stx.pat, &mut names);
          for name in names {
            if !lexical_seen.insert(name.clone()) {
              return Err(RewriteError::DuplicateDeclaration {
                name,
                loc: declarator.pattern.loc,
              });
            }
            decls.push(TopLevelDecl {
              name,
              kind,
              loc: declarator.pattern.loc,
            });
          }
        }
      }
      Stmt::ClassDecl(decl) => {
        if let Some(name) = &decl.stx.name {
          if !lexical_seen.insert(name.stx.name.clone()) {
            return Err(RewriteError::DuplicateDeclaration {
              name: name.stx.name.clone(),
              loc: name.loc,
            });
          }
          decls.push(TopLevelDecl {
            name: name.stx.name.clone(),
            kind: DeclKind::Class,
            loc: name.loc,
          });
        }
      }
      _ => hoisted_decls(stmt, &mut decls),
    }
  }
  Ok(decls)
}

/// `var` and function declarations hoist out of any statement position that
/// has no enclosing function, Annex B block-level functions included, so
/// those names persist exactly like directly top-level ones.
fn hoisted_decls(stmt: &Node<Stmt>, decls: &mut Vec<TopLevelDecl>) {
  match stmt.stx.as_ref() {
    Stmt::VarDecl(decl) if decl.stx.mode == VarDeclMode::Var => {
      for declarator in &decl.stx.declarators {
        let mut names = Vec::new();
        pat_names(&declarator.pattern.stx.pat, &mut names);
        for name in names {
          decls.push(TopLevelDecl {
            name,
            kind: DeclKind::Var,
            loc: declarator.pattern.loc,
          });
        }
      }
    }
    Stmt::FunctionDecl(decl) => {
      if let Some(name) = &decl.stx.name {
        decls.push(TopLevelDecl {
          name: name.stx.name.clone(),
          kind: DeclKind::Func,
          loc: name.loc,
        });
      }
    }
    Stmt::Block(block) => {
      for stmt in &block.stx.body {
        hoisted_decls(stmt, decls);
      }
    }
    Stmt::If(stmt) => {
      hoisted_decls(&stmt.stx.consequent, decls);
      if let Some(alt) = &stmt.stx.alternate {
        hoisted_decls(alt, decls);
      }
    }
    Stmt::While(stmt) => hoisted_decls(&stmt.stx.body, decls),
    Stmt::DoWhile(stmt) => hoisted_decls(&stmt.stx.body, decls),
    Stmt::With(stmt) => hoisted_decls(&stmt.stx.body, decls),
    Stmt::Label(stmt) => hoisted_decls(&stmt.stx.statement, decls),
    Stmt::ForTriple(stmt) => {
      if let ForTripleStmtInit::Decl(decl) = &stmt.stx.init {
        if decl.stx.mode == VarDeclMode::Var {
          for declarator in &decl.stx.declarators {
            let mut names = Vec::new();
            pat_names(&declarator.pattern.stx.pat, &mut names);
            for name in names {
              decls.push(TopLevelDecl {
                name,
                kind: DeclKind::Var,
                loc: declarator.pattern.loc,
              });
            }
          }
        }
      }
      for stmt in &stmt.stx.body.stx.body {
        hoisted_decls(stmt, decls);
      }
    }
    Stmt::ForIn(stmt) => {
      hoisted_for_lhs(&stmt.stx.lhs, decls);
      for stmt in &stmt.stx.body.stx.body {
        hoisted_decls(stmt, decls);
      }
    }
    Stmt::ForOf(stmt) => {
      hoisted_for_lhs(&stmt.stx.lhs, decls);
      for stmt in &stmt.stx.body.stx.body {
        hoisted_decls(stmt, decls);
      }
    }
    Stmt::Try(stmt) => {
      for stmt in &stmt.stx.wrapped.stx.body {
        hoisted_decls(stmt, decls);
      }
      if let Some(catch) = &stmt.stx.catch {
        for stmt in &catch.stx.body {
          hoisted_decls(stmt, decls);
        }
      }
      if let Some(finally) = &stmt.stx.finally {
        for stmt in &finally.stx.body {
          hoisted_decls(stmt, decls);
        }
      }
    }
    Stmt::Switch(stmt) => {
      for branch in &stmt.stx.branches {
        for stmt in &branch.stx.body {
          hoisted_decls(stmt, decls);
        }
      }
    }
    _ => {}
  }
}

fn hoisted_for_lhs(lhs: &ForInOfLhs, decls: &mut Vec<TopLevelDecl>) {
  if let ForInOfLhs::Decl((VarDeclMode::Var, pat_decl)) = lhs {
    let mut names = Vec::new();
    pat_names(&pat_decl.stx.pat, &mut names);
    for name in names {
      decls.push(TopLevelDecl {
        name,
        kind: DeclKind::Var,
        loc: pat_decl.loc,
      });
    }
  }
}

/// Collects every name bound by a pattern, in source order.
pub fn pat_names(pat: &Node<Pat>, out: &mut Vec<String>) {
  match pat.stx.as_ref() {
    Pat::Id(id) => out.push(id.stx.name.clone()),
    Pat::Arr(arr) => {
      for elem in arr.stx.elements.iter().flatten() {
        pat_names(&elem.target, out);
      }
      if let Some(rest) = &arr.stx.rest {
        pat_names(rest, out);
      }
    }
    Pat::Obj(obj) => {
      for prop in &obj.stx.properties {
        pat_names(&prop.stx.target, out);
      }
      if let Some(rest) = &obj.stx.rest {
        out.push(rest.stx.name.clone());
      }
    }
    // Assignment targets reference existing bindings.
    Pat::AssignTarget(_) => {}
  }
}

/// Flat per-function scan of the names a function body can see as bindings,
/// used by the rewriter to decide whether a bare identifier could be an
/// undeclared global. Block scoping is deliberately flattened: treating a
/// block-scoped name as visible merely skips the implicit-await wrapper for
/// an identifier that would throw a ReferenceError anyway.
pub fn scope_names(body: &[Node<Stmt>], out: &mut HashSet<String>) {
  for stmt in body {
    scope_names_stmt(stmt, out);
  }
}

fn scope_names_stmt(stmt: &Node<Stmt>, out: &mut HashSet<String>) {
  match stmt.stx.as_ref() {
    Stmt::VarDecl(decl) => scope_names_var_decl(decl, out),
    Stmt::FunctionDecl(decl) => {
      if let Some(name) = &decl.stx.name {
        out.insert(name.stx.name.clone());
      }
    }
    Stmt::ClassDecl(decl) => {
      if let Some(name) = &decl.stx.name {
        out.insert(name.stx.name.clone());
      }
    }
    Stmt::Block(block) => scope_names(&block.stx.body, out),
    Stmt::If(stmt) => {
      scope_names_stmt(&stmt.stx.consequent, out);
      if let Some(alt) = &stmt.stx.alternate {
        scope_names_stmt(alt, out);
      }
    }
    Stmt::While(stmt) => scope_names_stmt(&stmt.stx.body, out),
    Stmt::DoWhile(stmt) => scope_names_stmt(&stmt.stx.body, out),
    Stmt::With(stmt) => scope_names_stmt(&stmt.stx.body, out),
    Stmt::Label(stmt) => scope_names_stmt(&stmt.stx.statement, out),
    Stmt::ForTriple(stmt) => {
      if let ForTripleStmtInit::Decl(decl) = &stmt.stx.init {
        scope_names_var_decl(decl, out);
      }
      scope_names(&stmt.stx.body.stx.body, out);
    }
    Stmt::ForIn(stmt) => {
      scope_names_for_lhs(&stmt.stx.lhs, out);
      scope_names(&stmt.stx.body.stx.body, out);
    }
    Stmt::ForOf(stmt) => {
      scope_names_for_lhs(&stmt.stx.lhs, out);
      scope_names(&stmt.stx.body.stx.body, out);
    }
    Stmt::Try(stmt) => {
      scope_names(&stmt.stx.wrapped.stx.body, out);
      if let Some(catch) = &stmt.stx.catch {
        if let Some(param) = &catch.stx.parameter {
          let mut names = Vec::new();
          pat_names(&param.stx.pat, &mut names);
          out.extend(names);
        }
        scope_names(&catch.stx.body, out);
      }
      if let Some(finally) = &stmt.stx.finally {
        scope_names(&finally.stx.body, out);
      }
    }
    Stmt::Switch(stmt) => {
      for branch in &stmt.stx.branches {
        scope_names(&branch.stx.body, out);
      }
    }
    _ => {}
  }
}

fn scope_names_var_decl(decl: &Node<VarDecl>, out: &mut HashSet<String>) {
  for declarator in &decl.stx.declarators {
    let mut names = Vec::new();
    pat_names(&declarator.pattern.stx.pat, &mut names);
    out.extend(names);
  }
}

fn scope_names_for_lhs(lhs: &ForInOfLhs, out: &mut HashSet<String>) {
  if let ForInOfLhs::Decl((_, pat_decl)) = lhs {
    let mut names = Vec::new();
    pat_names(&pat_decl.stx.pat, &mut names);
    out.extend(names);
  }
}

struct Walker {
  frames: Vec<FrameInfo>,
  stack: Vec<FrameId>,
}

impl Walker {
  fn current(&mut self) -> &mut FrameInfo {
    let FrameId(i) = *self.stack.last().unwrap();
    &mut self.frames[i]
  }

  fn mark_site(&mut self) {
    self.current().has_site = true;
  }

  fn func(&mut self, node: &mut Node<Func>, kind: FrameKind, sync_callback: bool) {
    let parent = Some(*self.stack.last().unwrap());
    let async_user = node.stx.async_;
    let generator = node.stx.generator;
    let convertible = !sync_callback
      && kind != FrameKind::Constructor
      && !(generator && !async_user);
    let id = FrameId(self.frames.len());
    self.frames.push(FrameInfo {
      kind,
      parent,
      async_user,
      generator,
      convertible,
      has_site: false,
      needs_async: false,
    });
    node.assoc.set(Frame(id));
    self.stack.push(id);
    for param in &mut node.stx.parameters {
      self.pat_decl(&mut param.stx.pattern);
      if let Some(default) = &mut param.stx.default_value {
        self.expr(default);
      }
    }
    match &mut node.stx.body {
      FuncBody::Block(body) => self.stmts(body),
      FuncBody::Expression(expr) => self.expr(expr),
    }
    self.stack.pop();
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
      Stmt::DoWhile(stmt) => {
        self.stmt(&mut stmt.stx.body);
        self.expr(&mut stmt.stx.condition);
      }
      Stmt::Expr(stmt) => self.expr(&mut stmt.stx.expr),
      Stmt::ForIn(stmt) => {
        self.for_lhs(&mut stmt.stx.lhs);
        self.expr(&mut stmt.stx.rhs);
        self.stmts(&mut stmt.stx.body.stx.body);
      }
      Stmt::ForOf(stmt) => {
        // Iterating a synthetic async iterable is itself a site.
        self.mark_site();
        self.for_lhs(&mut stmt.stx.lhs);
        self.expr(&mut stmt.stx.rhs);
        self.stmts(&mut stmt.stx.body.stx.body);
      }
      Stmt::ForTriple(stmt) => {
        match &mut stmt.stx.init {
          ForTripleStmtInit::None => {}
          ForTripleStmtInit::Expr(expr) => self.expr(expr),
          ForTripleStmtInit::Decl(decl) => self.var_decl(decl),
        }
        if let Some(cond) = &mut stmt.stx.cond {
          self.expr(cond);
        }
        if let Some(post) = &mut stmt.stx.post {
          self.expr(post);
        }
        self.stmts(&mut stmt.stx.body.stx.body);
      }
      Stmt::If(stmt) => {
        self.expr(&mut stmt.stx.test);
        self.stmt(&mut stmt.stx.consequent);
        if let Some(alt) = &mut stmt.stx.alternate {
          self.stmt(alt);
        }
      }
      Stmt::Label(stmt) => self.stmt(&mut stmt.stx.statement),
      Stmt::Return(stmt) => {
        if let Some(value) = &mut stmt.stx.value {
          self.expr(value);
        }
      }
      Stmt::Switch(stmt) => {
        self.expr(&mut stmt.stx.test);
        for branch in &mut stmt.stx.branches {
          if let Some(case) = &mut branch.stx.case {
            self.expr(case);
          }
          self.stmts(&mut branch.stx.body);
        }
      }
      Stmt::Throw(stmt) => self.expr(&mut stmt.stx.value),
      Stmt::Try(stmt) => {
        self.stmts(&mut stmt.stx.wrapped.stx.body);
        if let Some(catch) = &mut stmt.stx.catch {
          if let Some(param) = &mut catch.stx.parameter {
            self.pat_decl(param);
          }
          self.stmts(&mut catch.stx.body);
        }
        if let Some(finally) = &mut stmt.stx.finally {
          self.stmts(&mut finally.stx.body);
        }
      }
      Stmt::While(stmt) => {
        self.expr(&mut stmt.stx.condition);
        self.stmt(&mut stmt.stx.body);
      }
      Stmt::With(stmt) => {
        self.expr(&mut stmt.stx.object);
        self.stmt(&mut stmt.stx.body);
      }
      Stmt::ClassDecl(decl) => {
        if let Some(extends) = &mut decl.stx.extends {
          self.expr(extends);
        }
        self.class_members(&mut decl.stx.members);
      }
      Stmt::FunctionDecl(decl) => {
        self.func(&mut decl.stx.function, FrameKind::Function, false);
      }
      Stmt::VarDecl(decl) => self.var_decl(decl),
    }
  }

  fn var_decl(&mut self, decl: &mut Node<VarDecl>) {
    for declarator in &mut decl.stx.declarators {
      self.pat_decl(&mut declarator.pattern);
      if let Some(init) = &mut declarator.initializer {
        self.expr(init);
      }
    }
  }

  fn for_lhs(&mut self, lhs: &mut ForInOfLhs) {
    match lhs {
      ForInOfLhs::Assign(pat) => self.pat(pat),
      ForInOfLhs::Decl((_, pat_decl)) => self.pat_decl(pat_decl),
    }
  }

  fn pat_decl(&mut self, pat_decl: &mut Node<PatDecl>) {
    self.pat(&mut pat_decl.stx.pat);
  }

  // Only default values inside patterns contain expressions.
  fn pat(&mut self, pat: &mut Node<Pat>) {
    match pat.stx.as_mut() {
      Pat::Id(_) => {}
      Pat::Arr(arr) => {
        for elem in arr.stx.elements.iter_mut().flatten() {
          self.pat(&mut elem.target);
          if let Some(default) = &mut elem.default_value {
            self.expr(default);
          }
        }
        if let Some(rest) = &mut arr.stx.rest {
          self.pat(rest);
        }
      }
      Pat::Obj(obj) => {
        for prop in &mut obj.stx.properties {
          if let ClassOrObjKey::Computed(key) = &mut prop.stx.key {
            self.expr(key);
          }
          self.pat(&mut prop.stx.target);
          if let Some(default) = &mut prop.stx.default_value {
            self.expr(default);
          }
        }
      }
      Pat::AssignTarget(expr) => self.expr(expr),
    }
  }

  fn class_members(&mut self, members: &mut [Node<ClassMember>]) {
    for member in members {
      let is_constructor =
        !member.stx.static_ && member.stx.key.direct_name() == Some("constructor");
      if let ClassOrObjKey::Computed(key) = &mut member.stx.key {
        self.expr(key);
      }
      match &mut member.stx.val {
        ClassOrObjVal::Getter(getter) => {
          self.func(&mut getter.stx.func, FrameKind::Getter, false)
        }
        ClassOrObjVal::Setter(setter) => {
          self.func(&mut setter.stx.func, FrameKind::Setter, false)
        }
        ClassOrObjVal::Method(method) => {
          let kind = if is_constructor {
            FrameKind::Constructor
          } else {
            FrameKind::Method
          };
          self.func(&mut method.stx.func, kind, false);
        }
        ClassOrObjVal::Prop(Some(value)) => self.expr(value),
        ClassOrObjVal::Prop(None) => {}
      }
    }
  }

  fn expr(&mut self, expr: &mut Node<Expr>) {
    match expr.stx.as_mut() {
      Expr::ArrowFunc(arrow) => self.func(&mut arrow.stx.func, FrameKind::Arrow, false),
      Expr::Func(func) => self.func(&mut func.stx.func, FrameKind::Function, false),
      Expr::Class(class) => {
        if let Some(extends) = &mut class.stx.extends {
          self.expr(extends);
        }
        self.class_members(&mut class.stx.members);
      }
      Expr::Binary(binary) => {
        self.expr(&mut binary.stx.left);
        self.expr(&mut binary.stx.right);
      }
      Expr::Call(call) => {
        self.mark_site();
        // A function literal handed to `.sort(...)` runs as a synchronous
        // comparator; its frame must not become async.
        let sort_call = matches!(
          call.stx.callee.stx.as_ref(),
          Expr::Member(m) if m.stx.right == "sort"
        );
        self.expr(&mut call.stx.callee);
        for arg in &mut call.stx.arguments {
          match arg.stx.value.stx.as_mut() {
            Expr::ArrowFunc(arrow) if sort_call => {
              self.func(&mut arrow.stx.func, FrameKind::Arrow, true)
            }
            Expr::Func(func) if sort_call => {
              self.func(&mut func.stx.func, FrameKind::Function, true)
            }
            _ => self.expr(&mut arg.stx.value),
          }
        }
      }
      Expr::ComputedMember(member) => {
        self.mark_site();
        self.expr(&mut member.stx.object);
        self.expr(&mut member.stx.member);
      }
      Expr::Cond(cond) => {
        self.expr(&mut cond.stx.test);
        self.expr(&mut cond.stx.consequent);
        self.expr(&mut cond.stx.alternate);
      }
      Expr::Id(_) => self.mark_site(),
      Expr::Import(import) => {
        self.mark_site();
        self.expr(&mut import.stx.module);
      }
      Expr::Member(member) => {
        self.mark_site();
        self.expr(&mut member.stx.left);
      }
      Expr::NewTarget(_) | Expr::Super(_) | Expr::This(_) => {}
      Expr::TaggedTemplate(tagged) => {
        self.mark_site();
        self.expr(&mut tagged.stx.function);
        self.template_parts(&mut tagged.stx.parts);
      }
      Expr::Unary(unary) => {
        match unary.stx.operator {
          OperatorName::New | OperatorName::YieldDelegated => self.mark_site(),
          _ => {}
        }
        self.expr(&mut unary.stx.argument);
      }
      Expr::UnaryPostfix(unary) => self.expr(&mut unary.stx.argument),
      Expr::LitArr(arr) => {
        for elem in &mut arr.stx.elements {
          match elem {
            LitArrElem::Single(expr) | LitArrElem::Rest(expr) => self.expr(expr),
            LitArrElem::Empty => {}
          }
        }
      }
      Expr::LitObj(obj) => {
        for obj_member in &mut obj.stx.members {
          match &mut obj_member.stx.typ {
            ObjMemberType::Valued { key, val } => {
              if let ClassOrObjKey::Computed(key) = key {
                self.expr(key);
              }
              match val {
                ClassOrObjVal::Getter(getter) => {
                  self.func(&mut getter.stx.func, FrameKind::Getter, false)
                }
                ClassOrObjVal::Setter(setter) => {
                  self.func(&mut setter.stx.func, FrameKind::Setter, false)
                }
                ClassOrObjVal::Method(method) => {
                  self.func(&mut method.stx.func, FrameKind::Method, false)
                }
                ClassOrObjVal::Prop(Some(value)) => self.expr(value),
                ClassOrObjVal::Prop(None) => {}
              }
            }
            // Shorthand values are variable usages too.
            ObjMemberType::Shorthand { .. } => self.mark_site(),
            ObjMemberType::Rest { val } => self.expr(val),
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
  }

  fn template_parts(&mut self, parts: &mut [LitTemplatePart]) {
    for part in parts {
      if let LitTemplatePart::Substitution(expr) = part {
        self.expr(expr);
      }
    }
  }
}

#[cfg(test)]
mod tests;
