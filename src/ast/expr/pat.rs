use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::node::Node;

use super::Expr;

#[derive(Debug, Drive, DriveMut, From, Serialize)]
#[serde(tag = "$t")]
pub enum Pat {
  Arr(Node<ArrPat>),
  Id(Node<IdPat>),
  Obj(Node<ObjPat>),
  // Assignment targets that aren't bindings, e.g. `a.b` in `for (a.b of x)`.
  AssignTarget(Node<Expr>),
}

impl From<Pat> for Expr {
  fn from(value: Pat) -> Self {
    match value {
      Pat::Arr(arr) => Expr::ArrPat(arr),
      Pat::Id(id) => Expr::IdPat(id),
      Pat::Obj(obj) => Expr::ObjPat(obj),
      Pat::AssignTarget(expr) => *expr.stx,
    }
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ArrPatElem {
  pub target: Node<Pat>,
  pub default_value: Option<Node<Expr>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ArrPat {
  // Holes are allowed.
  pub elements: Vec<Option<ArrPatElem>>,
  pub rest: Option<Node<Pat>>,
}

// Behaves like a binding pattern even though it is just a name.
// This exists as a separate AST node type since it's a binding, not a variable usage.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrFuncName {
  #[drive(skip)]
  pub name: String,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct IdPat {
  #[drive(skip)]
  pub name: String,
}

// In an object pattern the rest target can only be an identifier.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjPat {
  pub properties: Vec<Node<ObjPatProp>>,
  pub rest: Option<Node<IdPat>>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjPatProp {
  pub key: ClassOrObjKey,
  // If `shorthand`, `key` is Direct and `target` is an IdPat of the same name. This way, there is always an IdPat that exists and can be visited.
  pub target: Node<Pat>,
  #[drive(skip)]
  pub shorthand: bool,
  pub default_value: Option<Node<Expr>>,
}
