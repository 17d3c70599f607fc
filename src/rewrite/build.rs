//! Builders for the synthetic AST nodes the rewrite stages splice into the
//! program. Synthetic nodes carry an empty location, which is how later stages
//! tell them apart from nodes that came out of the user's source.

use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjMemberDirectKey;
use crate::ast::expr::lit::LitBoolExpr;
use crate::ast::expr::lit::LitNullExpr;
use crate::ast::expr::lit::LitObjExpr;
use crate::ast::expr::lit::LitStrExpr;
use crate::ast::expr::pat::IdPat;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::ArrowFuncExpr;
use crate::ast::expr::BinaryExpr;
use crate::ast::expr::CallArg;
use crate::ast::expr::CallExpr;
use crate::ast::expr::ComputedMemberExpr;
use crate::ast::expr::CondExpr;
use crate::ast::expr::Expr;
use crate::ast::expr::IdExpr;
use crate::ast::expr::MemberExpr;
use crate::ast::expr::UnaryExpr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::PatDecl;
use crate::ast::stmt::decl::VarDecl;
use crate::ast::stmt::decl::VarDeclMode;
use crate::ast::stmt::decl::VarDeclarator;
use crate::ast::stmt::BlockStmt;
use crate::ast::stmt::CatchBlock;
use crate::ast::stmt::ExprStmt;
use crate::ast::stmt::IfStmt;
use crate::ast::stmt::ReturnStmt;
use crate::ast::stmt::Stmt;
use crate::ast::stmt::ThrowStmt;
use crate::ast::stmt::TryStmt;
use crate::error::SyntaxResult;
use crate::lex::Lexer;
use crate::loc::Loc;
use crate::operator::OperatorName;
use crate::parse::Parser;
use crate::source::to_js_string_lit;
use crate::token::TT;

const SYNTH: Loc = Loc(0, 0);

pub fn node<S: derive_visitor::Drive + derive_visitor::DriveMut>(stx: S) -> Node<S> {
  Node::new(SYNTH, stx)
}

pub fn id(name: &str) -> Node<Expr> {
  node(Expr::Id(node(IdExpr {
    name: name.to_string(),
  })))
}

pub fn id_pat(name: &str) -> Node<Pat> {
  node(Pat::Id(node(IdPat {
    name: name.to_string(),
  })))
}

pub fn pat_decl(pat: Node<Pat>) -> Node<PatDecl> {
  node(PatDecl { pat })
}

/// `value` is the decoded text; the literal is built with quotes and escapes.
pub fn str_lit(value: &str) -> Node<Expr> {
  node(Expr::LitStr(node(LitStrExpr {
    raw: to_js_string_lit(value),
  })))
}

pub fn bool_lit(value: bool) -> Node<Expr> {
  node(Expr::LitBool(node(LitBoolExpr { value })))
}

pub fn null_lit() -> Node<Expr> {
  node(Expr::LitNull(node(LitNullExpr {})))
}

pub fn empty_obj() -> Node<Expr> {
  node(Expr::LitObj(node(LitObjExpr { members: vec![] })))
}

pub fn call(callee: Node<Expr>, arguments: Vec<Node<Expr>>) -> Node<Expr> {
  node(Expr::Call(node(CallExpr {
    optional_chaining: false,
    callee,
    arguments: arguments
      .into_iter()
      .map(|value| {
        node(CallArg {
          spread: false,
          value,
        })
      })
      .collect(),
  })))
}

pub fn member(left: Node<Expr>, right: &str) -> Node<Expr> {
  node(Expr::Member(node(MemberExpr {
    optional_chaining: false,
    left,
    right: right.to_string(),
  })))
}

pub fn computed_member(object: Node<Expr>, member: Node<Expr>) -> Node<Expr> {
  node(Expr::ComputedMember(node(ComputedMemberExpr {
    optional_chaining: false,
    object,
    member,
  })))
}

pub fn binary(operator: OperatorName, left: Node<Expr>, right: Node<Expr>) -> Node<Expr> {
  node(Expr::Binary(node(BinaryExpr {
    operator,
    left,
    right,
  })))
}

pub fn assign(target: Node<Expr>, value: Node<Expr>) -> Node<Expr> {
  binary(OperatorName::Assignment, target, value)
}

pub fn unary(operator: OperatorName, argument: Node<Expr>) -> Node<Expr> {
  node(Expr::Unary(node(UnaryExpr { operator, argument })))
}

pub fn not(argument: Node<Expr>) -> Node<Expr> {
  unary(OperatorName::LogicalNot, argument)
}

pub fn await_expr(argument: Node<Expr>) -> Node<Expr> {
  unary(OperatorName::Await, argument)
}

pub fn cond(test: Node<Expr>, consequent: Node<Expr>, alternate: Node<Expr>) -> Node<Expr> {
  node(Expr::Cond(node(CondExpr {
    test,
    consequent,
    alternate,
  })))
}

/// Left-folds into comma-operator pairs, so `seq(a, [b, c])` is `a, b, c`.
pub fn seq(first: Node<Expr>, rest: Vec<Node<Expr>>) -> Node<Expr> {
  rest
    .into_iter()
    .fold(first, |acc, e| binary(OperatorName::Comma, acc, e))
}

pub fn symbol_for(key: &str) -> Node<Expr> {
  call(member(id("Symbol"), "for"), vec![str_lit(key)])
}

pub fn expr_stmt(expr: Node<Expr>) -> Node<Stmt> {
  node(Stmt::Expr(node(ExprStmt { expr })))
}

pub fn block(body: Vec<Node<Stmt>>) -> Node<Stmt> {
  node(Stmt::Block(block_node(body)))
}

pub fn block_node(body: Vec<Node<Stmt>>) -> Node<BlockStmt> {
  node(BlockStmt { body })
}

pub fn if_stmt(test: Node<Expr>, consequent: Node<Stmt>, alternate: Option<Node<Stmt>>) -> Node<Stmt> {
  node(Stmt::If(node(IfStmt {
    test,
    consequent,
    alternate,
  })))
}

pub fn throw_stmt(value: Node<Expr>) -> Node<Stmt> {
  node(Stmt::Throw(node(ThrowStmt { value })))
}

pub fn return_stmt(value: Option<Node<Expr>>) -> Node<Stmt> {
  node(Stmt::Return(node(ReturnStmt { value })))
}

pub fn try_stmt(
  wrapped: Node<BlockStmt>,
  catch: Option<(&str, Vec<Node<Stmt>>)>,
  finally: Option<Node<BlockStmt>>,
) -> Node<Stmt> {
  node(Stmt::Try(node(TryStmt {
    wrapped,
    catch: catch.map(|(param, body)| {
      node(CatchBlock {
        parameter: Some(pat_decl(id_pat(param))),
        body,
      })
    }),
    finally,
  })))
}

pub fn var_decl(mode: VarDeclMode, name: &str, initializer: Option<Node<Expr>>) -> Node<Stmt> {
  var_decl_pat(mode, id_pat(name), initializer)
}

pub fn var_decl_pat(
  mode: VarDeclMode,
  pattern: Node<Pat>,
  initializer: Option<Node<Expr>>,
) -> Node<Stmt> {
  node(Stmt::VarDecl(node(VarDecl {
    mode,
    declarators: vec![VarDeclarator {
      pattern: pat_decl(pattern),
      initializer,
    }],
  })))
}

pub fn arrow(async_: bool, parameters: Vec<&str>, body: Vec<Node<Stmt>>) -> Node<Expr> {
  node(Expr::ArrowFunc(node(ArrowFuncExpr {
    func: node(Func {
      arrow: true,
      async_,
      generator: false,
      parameters: parameters
        .into_iter()
        .map(|name| {
          node(ParamDecl {
            rest: false,
            pattern: pat_decl(id_pat(name)),
            default_value: None,
          })
        })
        .collect(),
      body: FuncBody::Block(body),
    }),
  })))
}

pub fn direct_key(key: &str) -> ClassOrObjKey {
  ClassOrObjKey::Direct(node(ClassOrObjMemberDirectKey {
    key: key.to_string(),
    tt: TT::Identifier,
  }))
}

/// Swaps the node out, leaving a placeholder behind. Used when replacing an
/// expression with a wrapper that contains it.
pub fn take_expr(expr: &mut Node<Expr>) -> Node<Expr> {
  std::mem::replace(expr, null_lit())
}

pub fn take_stmt(stmt: &mut Node<Stmt>) -> Node<Stmt> {
  std::mem::replace(
    stmt,
    node(Stmt::Empty(node(crate::ast::stmt::EmptyStmt {}))),
  )
}

/// Parses a self-contained statement template (helper function declarations
/// and the like). Placeholder names must be substituted into `src` before
/// parsing. The resulting nodes carry locations into the template string;
/// they are only ever spliced in after a body has been visited, so no stage
/// inspects them again.
pub fn parse_stmts(src: &str) -> SyntaxResult<Vec<Node<Stmt>>> {
  let top = Parser::new(Lexer::new(src)).parse_top_level()?;
  Ok(top.stx.body)
}
