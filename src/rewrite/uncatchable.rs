//! Stage two: make `try` statements transparent to uncatchable errors.
//!
//! An error tagged with the `@@mongosh.uncatchable` well-known symbol must
//! escape every user `catch` handler and must also skip user `finally`
//! blocks. Each `try` gains a guard that rethrows such errors before the
//! handler body runs; when a finalizer exists, a flag captures whether the
//! in-flight error (including one thrown by the handler itself) is catchable,
//! and the finalizer body only runs if it is.

use super::build;
use super::names::FreshInternalNameGenerator;
use super::SYMBOL_UNCATCHABLE;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::Expr;
use crate::ast::node::Node;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::EmptyStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::TryStmt;
use crate::ast::stx::TopLevel;
use crate::operator::OperatorName;
use derive_visitor::DriveMut;
use derive_visitor::VisitorMut;

type StmtNode = Node<Stmt>;

pub fn apply(
  top: &mut Node<TopLevel>,
  names: FreshInternalNameGenerator,
) -> FreshInternalNameGenerator {
  let mut pass = UncatchableExceptionPass { names };
  top.drive_mut(&mut pass);
  pass.names
}

// Exit-order visiting: by the time a `try` is rewritten, every `try` nested
// inside it has already been rewritten, and the statements this pass generates
// are never visited again.
#[derive(VisitorMut)]
#[visitor(StmtNode(exit))]
struct UncatchableExceptionPass {
  names: FreshInternalNameGenerator,
}

impl UncatchableExceptionPass {
  fn exit_stmt_node(&mut self, node: &mut StmtNode) {
    if !matches!(node.stx.as_ref(), Stmt::Try(_)) {
      return;
    }
    let stmt = std::mem::replace(node.stx.as_mut(), Stmt::Empty(build::node(EmptyStmt {})));
    let Stmt::Try(mut try_node) = stmt else {
      unreachable!();
    };

    let (err_name, mut handler_body) = self.normalized_handler(try_node.stx.catch.take());
    match try_node.stx.finally.take() {
      None => {
        try_node.stx.catch = Some(build::node(CatchBlock {
          parameter: Some(build::pat_decl(build::id_pat(&err_name))),
          body: vec![build::if_stmt(
            catchable_check(&err_name),
            build::block(handler_body),
            Some(build::throw_stmt(build::id(&err_name))),
          )],
        }));
        *node.stx = Stmt::Try(try_node);
      }
      Some(finalizer) => {
        let is_catchable = self.names.fresh("_isCatchable");
        let inner_exc = self.names.fresh("_innerExc");
        // The handler may itself throw; re-evaluate the flag for that error
        // so the finalizer still skips when it is uncatchable.
        let guarded_handler = build::try_stmt(
          build::block_node(std::mem::take(&mut handler_body)),
          Some((&inner_exc, vec![
            build::expr_stmt(build::assign(
              build::id(&is_catchable),
              catchable_check(&inner_exc),
            )),
            build::throw_stmt(build::id(&inner_exc)),
          ])),
          None,
        );
        try_node.stx.catch = Some(build::node(CatchBlock {
          parameter: Some(build::pat_decl(build::id_pat(&err_name))),
          body: vec![
            build::expr_stmt(build::assign(
              build::id(&is_catchable),
              catchable_check(&err_name),
            )),
            build::if_stmt(
              build::id(&is_catchable),
              guarded_handler,
              Some(build::throw_stmt(build::id(&err_name))),
            ),
          ],
        }));
        try_node.stx.finally = Some(build::block_node(vec![build::if_stmt(
          build::id(&is_catchable),
          build::block(finalizer.stx.body),
          None,
        )]));
        *node.stx = Stmt::Block(build::block_node(vec![
          build::var_decl(VarDeclMode::Let, &is_catchable, Some(build::bool_lit(true))),
          build::node(Stmt::Try(try_node)),
        ]));
      }
    }
  }

  /// Returns the handler's error identifier and body, normalizing the three
  /// shapes that have no usable identifier binding: a missing handler (bare
  /// `try`/`finally`), a parameterless `catch`, and a destructuring `catch`
  /// parameter (which becomes a `let` at the top of the handler body).
  fn normalized_handler(
    &mut self,
    catch: Option<Node<CatchBlock>>,
  ) -> (String, Vec<Node<Stmt>>) {
    let Some(mut catch) = catch else {
      let err = self.names.fresh("_err");
      let body = vec![build::throw_stmt(build::id(&err))];
      return (err, body);
    };
    match catch.stx.parameter.take() {
      Some(param) if matches!(param.stx.pat.stx.as_ref(), Pat::Id(_)) => {
        let Pat::Id(id) = param.stx.pat.stx.as_ref() else {
          unreachable!();
        };
        (id.stx.name.clone(), catch.stx.body)
      }
      Some(param) => {
        let err = self.names.fresh("_err");
        let mut body = vec![build::var_decl_pat(
          VarDeclMode::Let,
          param.stx.pat,
          Some(build::id(&err)),
        )];
        body.append(&mut catch.stx.body);
        (err, body)
      }
      None => (self.names.fresh("_err"), catch.stx.body),
    }
  }
}

/// `(!err || !err[Symbol.for('@@mongosh.uncatchable')])`
fn catchable_check(err_name: &str) -> Node<Expr> {
  build::binary(
    OperatorName::LogicalOr,
    build::not(build::id(err_name)),
    build::not(build::computed_member(
      build::id(err_name),
      build::symbol_for(SYMBOL_UNCATCHABLE),
    )),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::emit::emit_js;
  use crate::lex::Lexer;
  use crate::parse::Parser;

  fn rewritten(source: &str) -> String {
    let mut top = Parser::new(Lexer::new(source)).parse_top_level().unwrap();
    let names = FreshInternalNameGenerator::for_program(&mut top);
    apply(&mut top, names);
    emit_js(&top)
  }

  #[test]
  fn test_catch_handler_gains_rethrow_guard() {
    assert_eq!(
      rewritten("try { a(); } catch (e) { b(); }"),
      "try{a();}catch(e){\
       if(!e||!e[Symbol.for('@@mongosh.uncatchable')]){b();}else{throw e;}}"
    );
  }

  #[test]
  fn test_parameterless_catch_gains_binding() {
    let out = rewritten("try { a(); } catch { b(); }");
    assert!(out.contains("catch(_err){if(!_err||!_err[Symbol.for('@@mongosh.uncatchable')])"));
  }

  #[test]
  fn test_destructuring_catch_parameter() {
    let out = rewritten("try { a(); } catch ({ message }) { b(message); }");
    assert!(out.contains("catch(_err){"));
    assert!(out.contains("{let{message}=_err;b(message);}"));
  }

  #[test]
  fn test_finalizer_guarded_by_catchable_flag() {
    let out = rewritten("try { a(); } finally { b(); }");
    assert!(out.starts_with("{let _isCatchable=true;try{a();}catch(_err){"));
    assert!(out.contains("_isCatchable=!_err||!_err[Symbol.for('@@mongosh.uncatchable')];"));
    assert!(out.contains("catch(_innerExc){_isCatchable=!_innerExc||"));
    assert!(out.ends_with("finally{if(_isCatchable){b();}}}"));
  }

  #[test]
  fn test_nested_tries_get_distinct_names() {
    let out = rewritten("try { try { a(); } finally { b(); } } finally { c(); }");
    assert!(out.contains("_isCatchable"));
    assert!(out.contains("_isCatchable_1"));
  }
}
