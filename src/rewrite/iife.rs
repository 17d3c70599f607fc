//! Stage one: wrap the program in an immediately-invoked arrow function.
//!
//! REPL snippets run once each, but their top-level bindings must survive into
//! later snippets. `var`, `function`, and `class` names are hoisted out of the
//! wrapper (as real top-level declarations or assignments to them), which puts
//! them on the host global. `let` and `const` stay inside the wrapper and are
//! copied into the lexical-context store object in an epilogue; the next
//! snippet's prologue re-binds them from there.
//!
//! The wrapper tracks the program's completion value: every top-level
//! expression statement becomes an assignment to the completion record, which
//! the wrapper returns. Declarations never contribute a completion value.

use super::build;
use super::names::GeneratedNames;
use super::SYMBOL_LEXICAL_CONTEXT;
use crate::analyze::Analysis;
use crate::analyze::Frame;
use crate::analyze::TopLevelDecl;
use crate::analyze::PROGRAM_FRAME;
use crate::ast::expr::ClassExpr;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::Stmt;
use crate::ast::stx::TopLevel;
use crate::operator::OperatorName;
use crate::store::DeclKind;
use crate::store::LexicalContextStore;
use ahash::HashSet;
use ahash::HashSetExt;

pub fn wrap_program(
  top: &mut Node<TopLevel>,
  analysis: &Analysis,
  store: &LexicalContextStore,
  g: &GeneratedNames,
) {
  let declared: HashSet<&str> = analysis
    .top_level
    .iter()
    .map(|d| d.name.as_str())
    .collect();

  let mut wrapper_body = vec![build::var_decl(VarDeclMode::Var, &g.cr, None)];
  for (name, kind) in store.iter() {
    if declared.contains(name) {
      continue;
    }
    let mode = match kind {
      DeclKind::Const => VarDeclMode::Const,
      _ => VarDeclMode::Let,
    };
    wrapper_body.push(build::var_decl(mode, name, Some(store_read(name))));
  }

  let mut hoisted_funcs = Vec::new();
  for mut stmt in std::mem::take(&mut top.stx.body) {
    let loc = stmt.loc;
    match stmt.stx.as_mut() {
      Stmt::FunctionDecl(_) => hoisted_funcs.push(stmt),
      Stmt::VarDecl(decl) if decl.stx.mode == VarDeclMode::Var => {
        // The binding itself is hoisted to a top-level `var`; only
        // initializers survive here, as assignments.
        for assign in var_decl_assignments(decl) {
          wrapper_body.push(build::expr_stmt(assign));
        }
      }
      Stmt::ClassDecl(decl) => {
        if let Some(name) = decl.stx.name.take() {
          let target = build::id(&name.stx.name);
          let class_expr = Node::new(
            loc,
            Expr::Class(Node::new(loc, ClassExpr {
              name: Some(name),
              extends: decl.stx.extends.take(),
              members: std::mem::take(&mut decl.stx.members),
            })),
          );
          wrapper_body.push(build::expr_stmt(build::assign(target, class_expr)));
        }
      }
      Stmt::Expr(expr_stmt) => {
        let expr = build::take_expr(&mut expr_stmt.stx.expr);
        wrapper_body.push(build::expr_stmt(build::assign(build::id(&g.cr), expr)));
      }
      _ => {
        hoist_nested(&mut stmt, &mut hoisted_funcs);
        wrapper_body.push(stmt);
      }
    }
  }

  for decl in &analysis.top_level {
    if decl.kind.is_lexical() {
      wrapper_body.push(store_write(&decl.name));
    }
  }
  for (name, _) in store.iter() {
    if !declared.contains(name) {
      wrapper_body.push(store_write(name));
    }
  }
  wrapper_body.push(build::return_stmt(Some(build::id(&g.cr))));

  let mut wrapper = build::arrow(false, vec![], wrapper_body);
  if let Expr::ArrowFunc(arrow) = wrapper.stx.as_mut() {
    arrow.stx.func.assoc.set(Frame(PROGRAM_FRAME));
  }

  let mut program = hoisted_var_decls(&analysis.top_level);
  program.extend(hoisted_funcs);
  program.push(build::expr_stmt(build::call(wrapper, vec![])));
  top.stx.body = program;
}

fn var_decl_assignments(decl: &mut Node<VarDecl>) -> Vec<Node<Expr>> {
  let mut assigns = Vec::new();
  for declarator in decl.stx.declarators.drain(..) {
    if let Some(init) = declarator.initializer {
      let target = declarator.pattern.stx.pat.into_stx::<Expr>();
      assigns.push(build::assign(target, init));
    }
  }
  assigns
}

// Hoisting reaches into every statement position with no enclosing function:
// a nested `var` keeps only its initializers, as assignments, and a nested
// (Annex B) function declaration moves out of the wrapper entirely, leaving
// its name behind.
fn hoist_nested(stmt: &mut Node<Stmt>, hoisted_funcs: &mut Vec<Node<Stmt>>) {
  match stmt.stx.as_mut() {
    Stmt::FunctionDecl(decl) => {
      let Some(name) = decl.stx.name.as_ref().map(|n| n.stx.name.clone()) else {
        return;
      };
      let func = build::take_stmt(stmt);
      hoisted_funcs.push(func);
      *stmt = build::expr_stmt(build::id(&name));
    }
    Stmt::VarDecl(decl) if decl.stx.mode == VarDeclMode::Var => {
      let mut assigns = var_decl_assignments(decl);
      if assigns.is_empty() {
        // Leaves an empty statement behind.
        build::take_stmt(stmt);
      } else {
        let first = assigns.remove(0);
        *stmt = build::expr_stmt(build::seq(first, assigns));
      }
    }
    Stmt::Block(block) => {
      for stmt in &mut block.stx.body {
        hoist_nested(stmt, hoisted_funcs);
      }
    }
    Stmt::If(stmt) => {
      hoist_nested(&mut stmt.stx.consequent, hoisted_funcs);
      if let Some(alt) = &mut stmt.stx.alternate {
        hoist_nested(alt, hoisted_funcs);
      }
    }
    Stmt::While(stmt) => hoist_nested(&mut stmt.stx.body, hoisted_funcs),
    Stmt::DoWhile(stmt) => hoist_nested(&mut stmt.stx.body, hoisted_funcs),
    Stmt::With(stmt) => hoist_nested(&mut stmt.stx.body, hoisted_funcs),
    Stmt::Label(stmt) => hoist_nested(&mut stmt.stx.statement, hoisted_funcs),
    Stmt::ForTriple(stmt) => {
      if let ForTripleStmtInit::Decl(decl) = &mut stmt.stx.init {
        if decl.stx.mode == VarDeclMode::Var {
          let mut assigns = var_decl_assignments(decl);
          stmt.stx.init = if assigns.is_empty() {
            ForTripleStmtInit::None
          } else {
            let first = assigns.remove(0);
            ForTripleStmtInit::Expr(build::seq(first, assigns))
          };
        }
      }
      for stmt in &mut stmt.stx.body.stx.body {
        hoist_nested(stmt, hoisted_funcs);
      }
    }
    Stmt::ForIn(stmt) => {
      hoist_for_lhs(&mut stmt.stx.lhs);
      for stmt in &mut stmt.stx.body.stx.body {
        hoist_nested(stmt, hoisted_funcs);
      }
    }
    Stmt::ForOf(stmt) => {
      hoist_for_lhs(&mut stmt.stx.lhs);
      for stmt in &mut stmt.stx.body.stx.body {
        hoist_nested(stmt, hoisted_funcs);
      }
    }
    Stmt::Try(stmt) => {
      for stmt in &mut stmt.stx.wrapped.stx.body {
        hoist_nested(stmt, hoisted_funcs);
      }
      if let Some(catch) = &mut stmt.stx.catch {
        for stmt in &mut catch.stx.body {
          hoist_nested(stmt, hoisted_funcs);
        }
      }
      if let Some(finally) = &mut stmt.stx.finally {
        for stmt in &mut finally.stx.body {
          hoist_nested(stmt, hoisted_funcs);
        }
      }
    }
    Stmt::Switch(stmt) => {
      for branch in &mut stmt.stx.branches {
        for stmt in &mut branch.stx.body {
          hoist_nested(stmt, hoisted_funcs);
        }
      }
    }
    _ => {}
  }
}

// `for (var x of y)` becomes `for (x of y)`; the binding lives at the top
// level.
fn hoist_for_lhs(lhs: &mut ForInOfLhs) {
  if matches!(lhs, ForInOfLhs::Decl((VarDeclMode::Var, _))) {
    let taken = std::mem::replace(lhs, ForInOfLhs::Assign(build::id_pat("_")));
    let ForInOfLhs::Decl((_, pat_decl)) = taken else {
      return;
    };
    *lhs = ForInOfLhs::Assign(pat_decl.stx.pat);
  }
}

// `var` and `class` names become top-level `var` declarations so assignments
// inside the wrapper reach the host global.
fn hoisted_var_decls(decls: &[TopLevelDecl]) -> Vec<Node<Stmt>> {
  let mut seen = HashSet::new();
  let mut out = Vec::new();
  for decl in decls {
    if !matches!(decl.kind, DeclKind::Var | DeclKind::Class) {
      continue;
    }
    if seen.insert(decl.name.as_str()) {
      out.push(build::var_decl(VarDeclMode::Var, &decl.name, None));
    }
  }
  out
}

fn store_object() -> Node<Expr> {
  build::computed_member(build::id("globalThis"), build::symbol_for(SYMBOL_LEXICAL_CONTEXT))
}

/// `(globalThis[Symbol.for('@@mongosh.lexicalContext')] || {}).name`
fn store_read(name: &str) -> Node<Expr> {
  build::member(
    build::binary(OperatorName::LogicalOr, store_object(), build::empty_obj()),
    name,
  )
}

/// `(globalThis[S] || (globalThis[S] = {})).name = name;`
fn store_write(name: &str) -> Node<Stmt> {
  let ensure = build::binary(
    OperatorName::LogicalOr,
    store_object(),
    build::assign(store_object(), build::empty_obj()),
  );
  build::expr_stmt(build::assign(
    build::member(ensure, name),
    build::id(name),
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::analyze::analyze;
  use crate::emit::emit_js;
  use crate::lex::Lexer;
  use crate::parse::Parser;
  use crate::rewrite::names::FreshInternalNameGenerator;

  fn wrapped(source: &str, store: &LexicalContextStore) -> String {
    let mut top = Parser::new(Lexer::new(source)).parse_top_level().unwrap();
    let analysis = analyze(&mut top).unwrap();
    let mut names = FreshInternalNameGenerator::for_program(&mut top);
    let g = GeneratedNames::generate(&mut names);
    wrap_program(&mut top, &analysis, store, &g);
    emit_js(&top)
  }

  #[test]
  fn test_expression_statement_becomes_completion() {
    let out = wrapped("1 + 2;", &LexicalContextStore::new());
    assert_eq!(out, "(()=>{var _cr;_cr=1+2;return _cr;})();");
  }

  #[test]
  fn test_var_is_hoisted_and_assigned() {
    let out = wrapped("var a = 5; a;", &LexicalContextStore::new());
    assert_eq!(out, "var a;(()=>{var _cr;a=5;_cr=a;return _cr;})();");
  }

  #[test]
  fn test_function_decl_is_hoisted_out() {
    let out = wrapped("function f() {} f;", &LexicalContextStore::new());
    assert_eq!(
      out,
      "function f(){}(()=>{var _cr;_cr=f;return _cr;})();"
    );
  }

  #[test]
  fn test_nested_var_is_hoisted_and_assigned() {
    let out = wrapped("if (true) { var x = 1 }", &LexicalContextStore::new());
    assert_eq!(out, "var x;(()=>{var _cr;if(true){x=1;}return _cr;})();");
  }

  #[test]
  fn test_block_level_function_is_hoisted_out() {
    let out = wrapped("{ function f() {} }", &LexicalContextStore::new());
    assert_eq!(out, "function f(){}(()=>{var _cr;{f;}return _cr;})();");
  }

  #[test]
  fn test_for_head_var_is_hoisted() {
    let out = wrapped("for (var i = 0; i < 2; i++) {}", &LexicalContextStore::new());
    assert_eq!(out, "var i;(()=>{var _cr;for(i=0;i<2;i++){}return _cr;})();");
  }

  #[test]
  fn test_for_of_head_var_is_hoisted() {
    let out = wrapped("for (var x of y) {}", &LexicalContextStore::new());
    assert_eq!(out, "var x;(()=>{var _cr;for(x of y){}return _cr;})();");
  }

  #[test]
  fn test_class_becomes_hoisted_assignment() {
    let out = wrapped("class A {}", &LexicalContextStore::new());
    assert_eq!(out, "var A;(()=>{var _cr;A=class A{};return _cr;})();");
  }

  #[test]
  fn test_lexical_decl_written_to_store() {
    let out = wrapped("let x = 1;", &LexicalContextStore::new());
    assert_eq!(
      out,
      "(()=>{var _cr;let x=1;\
       (globalThis[Symbol.for('@@mongosh.lexicalContext')]||\
       (globalThis[Symbol.for('@@mongosh.lexicalContext')]={})).x=x;\
       return _cr;})();"
    );
  }

  #[test]
  fn test_persisted_name_rebound_in_prologue() {
    let mut store = LexicalContextStore::new();
    store.insert("x", crate::store::DeclKind::Let);
    let out = wrapped("x;", &store);
    assert!(out.contains(
      "let x=(globalThis[Symbol.for('@@mongosh.lexicalContext')]||{}).x;"
    ));
    assert!(out.ends_with(
      "(globalThis[Symbol.for('@@mongosh.lexicalContext')]||\
       (globalThis[Symbol.for('@@mongosh.lexicalContext')]={})).x=x;\
       return _cr;})();"
    ));
  }

  #[test]
  fn test_redeclared_persisted_name_not_rebound() {
    let mut store = LexicalContextStore::new();
    store.insert("x", crate::store::DeclKind::Let);
    let out = wrapped("let x = 2;", &store);
    assert!(!out.contains("||{}).x"));
  }
}
