use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

use crate::ast::class_or_object::ObjMember;
use crate::ast::node::Node;

use super::Expr;

// Literal values are carried as raw source slices. The rewriter never needs the decoded value,
// and re-emitting the original bytes keeps output stable (e.g. `Function.prototype.toString`).

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum LitArrElem {
  Single(Node<Expr>),
  Rest(Node<Expr>),
  Empty,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitArrExpr {
  pub elements: Vec<LitArrElem>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitBigIntExpr {
  // Including the trailing `n`.
  #[drive(skip)]
  pub raw: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitBoolExpr {
  #[drive(skip)]
  pub value: bool,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitNullExpr {}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitNumExpr {
  #[drive(skip)]
  pub raw: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitObjExpr {
  pub members: Vec<Node<ObjMember>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitRegexExpr {
  // Including delimiter slashes and any flags.
  #[drive(skip)]
  pub raw: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitStrExpr {
  // Including quotes.
  #[drive(skip)]
  pub raw: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct LitTemplateExpr {
  pub parts: Vec<LitTemplatePart>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum LitTemplatePart {
  Substitution(Node<Expr>),
  // Raw text between delimiters, backslash escapes included.
  #[drive(skip)]
  String(String),
}
