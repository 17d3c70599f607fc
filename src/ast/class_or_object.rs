use derive_more::derive::From;
use derive_visitor::Drive;
use derive_visitor::DriveMut;
use serde::Serialize;

use crate::token::TT;

use super::expr::Expr;
use super::expr::IdExpr;
use super::func::Func;
use super::node::Node;

/// This is a node as the key may not be the same as source[node.loc], due to quoting.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjMemberDirectKey {
  #[drive(skip)]
  pub key: String,
  // Keeping the token type tells shorthand handling whether the key could stand alone as a name.
  #[drive(skip)]
  pub tt: TT,
}

// WARNING: This enum must exist, and the two variants cannot be merged by representing Direct with an IdExpr, as it's not a usage of a variable.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ClassOrObjKey {
  // An identifier, keyword, string, or number token.
  // NOTE: This isn't used by ObjMemberType::Shorthand.
  Direct(Node<ClassOrObjMemberDirectKey>),
  Computed(Node<Expr>),
}

impl ClassOrObjKey {
  pub fn direct_name(&self) -> Option<&str> {
    match self {
      ClassOrObjKey::Direct(key) => Some(key.stx.key.as_str()),
      ClassOrObjKey::Computed(_) => None,
    }
  }
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjGetter {
  pub func: Node<Func>, // `parameters` is empty.
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjMethod {
  pub func: Node<Func>,
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassOrObjSetter {
  pub func: Node<Func>, // `parameters` contains exactly one ParamDecl with no `default_value` or `rest`.
}

#[derive(Debug, Drive, DriveMut, From, Serialize)]
pub enum ClassOrObjVal {
  Getter(Node<ClassOrObjGetter>),
  Setter(Node<ClassOrObjSetter>),
  Method(Node<ClassOrObjMethod>),
  // Must be Some if object, as shorthands are covered by ObjMemberType::Shorthand.
  Prop(Option<Node<Expr>>),
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub enum ObjMemberType {
  Valued {
    key: ClassOrObjKey,
    val: ClassOrObjVal,
  },
  Shorthand {
    id: Node<IdExpr>,
  },
  Rest {
    val: Node<Expr>,
  },
}

#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ClassMember {
  pub key: ClassOrObjKey,
  #[drive(skip)]
  pub static_: bool,
  pub val: ClassOrObjVal,
}

// This is a node instead of an enum so that it can be replaced in place, e.g. expanding a shorthand to `key: value`.
#[derive(Debug, Drive, DriveMut, Serialize)]
pub struct ObjMember {
  pub typ: ObjMemberType,
}
