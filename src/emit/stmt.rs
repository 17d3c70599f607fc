use super::expr::emit_class;
use super::expr::emit_expr;
use super::expr::emit_expr_assign;
use super::expr::emit_func;
use super::expr::expr_stmt_needs_parens;
use super::pat::emit_pat;
use super::pat::emit_pat_decl;
use super::Emitter;
use crate::ast::node::Node;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::ForInOfLhs;
use crate::ast::stmt::ForTripleStmtInit;
use crate::ast::stmt::Stmt;

pub fn emit_stmts(out: &mut Emitter, stmts: &[Node<Stmt>]) {
  for stmt in stmts {
    if matches!(stmt.stx.as_ref(), Stmt::Empty(_)) {
      continue;
    }
    emit_stmt(out, stmt);
  }
}

pub fn emit_stmt(out: &mut Emitter, stmt: &Node<Stmt>) {
  match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block(out, block),
    Stmt::Break(break_stmt) => {
      out.keyword("break");
      if let Some(label) = &break_stmt.stx.label {
        out.identifier(label);
      }
      out.punct(";");
    }
    Stmt::Continue(continue_stmt) => {
      out.keyword("continue");
      if let Some(label) = &continue_stmt.stx.label {
        out.identifier(label);
      }
      out.punct(";");
    }
    Stmt::Debugger(_) => {
      out.keyword("debugger");
      out.punct(";");
    }
    Stmt::DoWhile(do_while) => {
      out.keyword("do");
      emit_stmt_as_block(out, &do_while.stx.body);
      out.keyword("while");
      out.punct("(");
      emit_expr(out, &do_while.stx.condition);
      out.punct(")");
      out.punct(";");
    }
    Stmt::Empty(_) => {}
    Stmt::Expr(expr_stmt) => {
      let needs_parens = expr_stmt_needs_parens(&expr_stmt.stx.expr);
      if needs_parens {
        out.punct("(");
      }
      emit_expr(out, &expr_stmt.stx.expr);
      if needs_parens {
        out.punct(")");
      }
      out.punct(";");
    }
    Stmt::ForIn(for_in) => {
      out.keyword("for");
      out.punct("(");
      emit_for_in_of_lhs(out, &for_in.stx.lhs);
      out.keyword("in");
      emit_expr(out, &for_in.stx.rhs);
      out.punct(")");
      out.punct("{");
      emit_stmts(out, &for_in.stx.body.stx.body);
      out.punct("}");
    }
    Stmt::ForOf(for_of) => {
      out.keyword("for");
      if for_of.stx.await_ {
        out.keyword("await");
      }
      out.punct("(");
      emit_for_in_of_lhs(out, &for_of.stx.lhs);
      out.keyword("of");
      // A sequence or `in` here would be ambiguous with the loop header.
      emit_expr_assign(out, &for_of.stx.rhs);
      out.punct(")");
      out.punct("{");
      emit_stmts(out, &for_of.stx.body.stx.body);
      out.punct("}");
    }
    Stmt::ForTriple(for_triple) => {
      out.keyword("for");
      out.punct("(");
      match &for_triple.stx.init {
        ForTripleStmtInit::None => {}
        ForTripleStmtInit::Expr(expr) => emit_expr(out, expr),
        ForTripleStmtInit::Decl(decl) => emit_var_decl(out, decl),
      }
      out.punct(";");
      if let Some(cond) = &for_triple.stx.cond {
        emit_expr(out, cond);
      }
      out.punct(";");
      if let Some(post) = &for_triple.stx.post {
        emit_expr(out, post);
      }
      out.punct(")");
      out.punct("{");
      emit_stmts(out, &for_triple.stx.body.stx.body);
      out.punct("}");
    }
    Stmt::If(if_stmt) => {
      out.keyword("if");
      out.punct("(");
      emit_expr(out, &if_stmt.stx.test);
      out.punct(")");
      emit_stmt_as_block(out, &if_stmt.stx.consequent);
      if let Some(alternate) = &if_stmt.stx.alternate {
        out.keyword("else");
        emit_stmt_as_block(out, alternate);
      }
    }
    Stmt::Label(label) => {
      out.identifier(&label.stx.name);
      out.punct(":");
      // Wrapping in a block would detach `continue` from a labelled loop.
      emit_stmt(out, &label.stx.statement);
    }
    Stmt::Return(ret) => {
      out.keyword("return");
      if let Some(value) = &ret.stx.value {
        emit_expr(out, value);
      }
      out.punct(";");
    }
    Stmt::Switch(switch) => {
      out.keyword("switch");
      out.punct("(");
      emit_expr(out, &switch.stx.test);
      out.punct(")");
      out.punct("{");
      for branch in &switch.stx.branches {
        match &branch.stx.case {
          Some(case) => {
            out.keyword("case");
            emit_expr(out, case);
          }
          None => out.keyword("default"),
        }
        out.punct(":");
        emit_stmts(out, &branch.stx.body);
      }
      out.punct("}");
    }
    Stmt::Throw(throw) => {
      out.keyword("throw");
      emit_expr(out, &throw.stx.value);
      out.punct(";");
    }
    Stmt::Try(try_stmt) => {
      out.keyword("try");
      emit_block(out, &try_stmt.stx.wrapped);
      if let Some(catch) = &try_stmt.stx.catch {
        out.keyword("catch");
        if let Some(parameter) = &catch.stx.parameter {
          out.punct("(");
          emit_pat_decl(out, parameter);
          out.punct(")");
        }
        out.punct("{");
        emit_stmts(out, &catch.stx.body);
        out.punct("}");
      }
      if let Some(finally) = &try_stmt.stx.finally {
        out.keyword("finally");
        emit_block(out, finally);
      }
    }
    Stmt::While(while_stmt) => {
      out.keyword("while");
      out.punct("(");
      emit_expr(out, &while_stmt.stx.condition);
      out.punct(")");
      emit_stmt_as_block(out, &while_stmt.stx.body);
    }
    Stmt::With(with) => {
      out.keyword("with");
      out.punct("(");
      emit_expr(out, &with.stx.object);
      out.punct(")");
      emit_stmt_as_block(out, &with.stx.body);
    }
    Stmt::ClassDecl(class) => {
      let name = class.stx.name.as_ref().map(|n| n.stx.name.as_str());
      emit_class(out, name, &class.stx.extends, &class.stx.members);
    }
    Stmt::FunctionDecl(func) => {
      let name = func.stx.name.as_ref().map(|n| n.stx.name.as_str());
      emit_func(out, name, &func.stx.function);
    }
    Stmt::VarDecl(decl) => {
      emit_var_decl(out, decl);
      out.punct(";");
    }
  }
}

fn emit_block(out: &mut Emitter, block: &Node<BlockStmt>) {
  out.punct("{");
  emit_stmts(out, &block.stx.body);
  out.punct("}");
}

fn emit_stmt_as_block(out: &mut Emitter, stmt: &Node<Stmt>) {
  match stmt.stx.as_ref() {
    Stmt::Block(block) => emit_block(out, block),
    _ => {
      out.punct("{");
      emit_stmt(out, stmt);
      out.punct("}");
    }
  }
}

fn emit_for_in_of_lhs(out: &mut Emitter, lhs: &ForInOfLhs) {
  match lhs {
    ForInOfLhs::Assign(pat) => emit_pat(out, pat),
    ForInOfLhs::Decl((mode, decl)) => {
      out.keyword(var_decl_keyword(*mode));
      emit_pat_decl(out, decl);
    }
  }
}

// No trailing semicolon; the caller owns the terminator.
pub fn emit_var_decl(out: &mut Emitter, decl: &Node<VarDecl>) {
  out.keyword(var_decl_keyword(decl.stx.mode));
  for (idx, declarator) in decl.stx.declarators.iter().enumerate() {
    if idx > 0 {
      out.punct(",");
    }
    emit_pat_decl(out, &declarator.pattern);
    if let Some(initializer) = &declarator.initializer {
      out.punct("=");
      emit_expr_assign(out, initializer);
    }
  }
}

fn var_decl_keyword(mode: VarDeclMode) -> &'static str {
  match mode {
    VarDeclMode::Const => "const",
    VarDeclMode::Let => "let",
    VarDeclMode::Var => "var",
  }
}
