use super::expr::emit_expr;
use super::expr::emit_expr_assign;
use super::Emitter;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::expr::pat::ArrPat;
use crate::ast::expr::pat::ObjPat;
use crate::ast::expr::pat::Pat;
use crate::ast::node::Node;
use crate::ast::stmt::decl::ParamDecl;
use crate::ast::stmt::decl::PatDecl;

pub fn emit_pat(out: &mut Emitter, pat: &Node<Pat>) {
  match pat.stx.as_ref() {
    Pat::Id(id) => out.identifier(&id.stx.name),
    Pat::Arr(arr) => emit_arr_pat(out, &arr.stx),
    Pat::Obj(obj) => emit_obj_pat(out, &obj.stx),
    Pat::AssignTarget(expr) => emit_expr(out, expr),
  }
}

pub fn emit_pat_decl(out: &mut Emitter, decl: &Node<PatDecl>) {
  emit_pat(out, &decl.stx.pat);
}

pub fn emit_arr_pat(out: &mut Emitter, arr: &ArrPat) {
  out.punct("[");
  let mut first = true;
  for elem in &arr.elements {
    if !first {
      out.punct(",");
    }
    first = false;
    if let Some(elem) = elem {
      emit_pat(out, &elem.target);
      if let Some(default_value) = &elem.default_value {
        out.punct("=");
        emit_expr_assign(out, default_value);
      }
    }
  }
  if let Some(rest) = &arr.rest {
    if !first {
      out.punct(",");
    }
    out.punct("...");
    emit_pat(out, rest);
  }
  out.punct("]");
}

pub fn emit_obj_pat(out: &mut Emitter, obj: &ObjPat) {
  out.punct("{");
  let mut first = true;
  for prop in &obj.properties {
    if !first {
      out.punct(",");
    }
    first = false;
    if prop.stx.shorthand {
      emit_pat(out, &prop.stx.target);
    } else {
      emit_class_or_obj_key(out, &prop.stx.key);
      out.punct(":");
      emit_pat(out, &prop.stx.target);
    }
    if let Some(default_value) = &prop.stx.default_value {
      out.punct("=");
      emit_expr_assign(out, default_value);
    }
  }
  if let Some(rest) = &obj.rest {
    if !first {
      out.punct(",");
    }
    out.punct("...");
    out.identifier(&rest.stx.name);
  }
  out.punct("}");
}

pub fn emit_param_list(out: &mut Emitter, params: &[Node<ParamDecl>]) {
  out.punct("(");
  for (idx, param) in params.iter().enumerate() {
    if idx > 0 {
      out.punct(",");
    }
    if param.stx.rest {
      out.punct("...");
    }
    emit_pat_decl(out, &param.stx.pattern);
    if let Some(default_value) = &param.stx.default_value {
      out.punct("=");
      emit_expr_assign(out, default_value);
    }
  }
  out.punct(")");
}

pub fn emit_class_or_obj_key(out: &mut Emitter, key: &ClassOrObjKey) {
  match key {
    // The stored key is raw token text, quotes included for string keys.
    ClassOrObjKey::Direct(key) => out.token(&key.stx.key),
    ClassOrObjKey::Computed(expr) => {
      out.punct("[");
      emit_expr_assign(out, expr);
      out.punct("]");
    }
  }
}
