use super::pat::emit_class_or_obj_key;
use super::stmt::emit_stmts;
use super::Emitter;
use crate::ast::class_or_object::ClassMember;
use crate::ast::class_or_object::ClassOrObjKey;
use crate::ast::class_or_object::ClassOrObjVal;
use crate::ast::expr::lit::LitArrElem;
use crate::ast::expr::lit::LitTemplatePart;
use crate::ast::expr::pat::Pat;
use crate::ast::expr::CallArg;
use crate::ast::expr::Expr;
use crate::ast::func::Func;
use crate::ast::func::FuncBody;
use crate::ast::node::Node;
use crate::ast::class_or_object::ObjMemberType;
use crate::operator::Associativity;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::operator::PRECEDENCE_ASSIGNMENT;
use crate::operator::PRECEDENCE_MEMBER;

// One tighter than member access; primaries never need parentheses.
const PRECEDENCE_PRIMARY: u8 = PRECEDENCE_MEMBER + 1;

pub fn emit_expr(out: &mut Emitter, expr: &Node<Expr>) {
  emit_expr_min_prec(out, expr, 1);
}

/// Emits an expression that must bind at least as tightly as an assignment,
/// e.g. a call argument or variable initializer, where a comma would change
/// meaning.
pub fn emit_expr_assign(out: &mut Emitter, expr: &Node<Expr>) {
  emit_expr_min_prec(out, expr, PRECEDENCE_ASSIGNMENT - 1);
}

pub fn emit_expr_min_prec(out: &mut Emitter, expr: &Node<Expr>, min_prec: u8) {
  let needs_parens = expr_precedence(expr) < min_prec;
  if needs_parens {
    out.punct("(");
  }
  emit_expr_no_parens(out, expr);
  if needs_parens {
    out.punct(")");
  }
}

fn emit_expr_no_parens(out: &mut Emitter, expr: &Node<Expr>) {
  match expr.stx.as_ref() {
    Expr::ArrowFunc(arrow) => emit_arrow_func(out, &arrow.stx.func),
    Expr::Binary(binary) => {
      let op = &OPERATORS[&binary.stx.operator];
      if binary.stx.operator == OperatorName::Exponentiation
        && matches!(
          binary.stx.left.stx.as_ref(),
          Expr::Unary(_) | Expr::UnaryPostfix(_)
        )
      {
        // `-a ** b` is a syntax error; the base must be parenthesized.
        out.punct("(");
        emit_expr_no_parens(out, &binary.stx.left);
        out.punct(")");
      } else {
        emit_expr_min_prec(out, &binary.stx.left, op.precedence);
      }
      emit_binary_operator(out, binary.stx.operator);
      let right_prec = op.precedence + (op.associativity == Associativity::Left) as u8;
      emit_expr_min_prec(out, &binary.stx.right, right_prec);
    }
    Expr::Call(call) => {
      emit_expr_min_prec(out, &call.stx.callee, PRECEDENCE_MEMBER);
      if call.stx.optional_chaining {
        out.punct("?.");
      }
      emit_call_args(out, &call.stx.arguments);
    }
    Expr::Class(class) => {
      let name = class.stx.name.as_ref().map(|n| n.stx.name.as_str());
      emit_class(out, name, &class.stx.extends, &class.stx.members);
    }
    Expr::ComputedMember(member) => {
      emit_expr_min_prec(out, &member.stx.object, PRECEDENCE_MEMBER);
      if member.stx.optional_chaining {
        out.punct("?.");
      }
      out.punct("[");
      emit_expr(out, &member.stx.member);
      out.punct("]");
    }
    Expr::Cond(cond) => {
      let prec = OPERATORS[&OperatorName::Conditional].precedence;
      emit_expr_min_prec(out, &cond.stx.test, prec + 1);
      out.punct("?");
      emit_expr_assign(out, &cond.stx.consequent);
      out.punct(":");
      emit_expr_assign(out, &cond.stx.alternate);
    }
    Expr::Func(func) => {
      let name = func.stx.name.as_ref().map(|n| n.stx.name.as_str());
      emit_func(out, name, &func.stx.func);
    }
    Expr::Id(id) => out.identifier(&id.stx.name),
    Expr::Import(import) => {
      out.keyword("import");
      out.punct("(");
      emit_expr_assign(out, &import.stx.module);
      out.punct(")");
    }
    Expr::Member(member) => {
      if !member.stx.optional_chaining && digits_only_number(&member.stx.left) {
        // `1.x` lexes the dot into the number; `1..x` is the member access.
        emit_expr_no_parens(out, &member.stx.left);
        out.raw("..");
      } else {
        emit_expr_min_prec(out, &member.stx.left, PRECEDENCE_MEMBER);
        out.punct(if member.stx.optional_chaining { "?." } else { "." });
      }
      out.identifier(&member.stx.right);
    }
    Expr::NewTarget(_) => {
      out.keyword("new");
      out.punct(".");
      out.identifier("target");
    }
    Expr::Super(_) => out.keyword("super"),
    Expr::TaggedTemplate(tagged) => {
      emit_expr_min_prec(out, &tagged.stx.function, PRECEDENCE_MEMBER);
      emit_template_parts(out, &tagged.stx.parts);
    }
    Expr::This(_) => out.keyword("this"),
    Expr::Unary(unary) => {
      emit_unary_operator(out, unary.stx.operator);
      let prec = OPERATORS[&unary.stx.operator].precedence;
      if matches!(
        unary.stx.argument.stx.as_ref(),
        Expr::Binary(inner) if inner.stx.operator == OperatorName::Exponentiation
      ) && prec >= OPERATORS[&OperatorName::Exponentiation].precedence
      {
        out.punct("(");
        emit_expr_no_parens(out, &unary.stx.argument);
        out.punct(")");
      } else {
        emit_expr_min_prec(out, &unary.stx.argument, prec);
      }
    }
    Expr::UnaryPostfix(unary) => {
      let prec = OPERATORS[&unary.stx.operator].precedence;
      emit_expr_min_prec(out, &unary.stx.argument, prec);
      emit_unary_operator(out, unary.stx.operator);
    }
    Expr::LitArr(arr) => {
      out.punct("[");
      for (idx, elem) in arr.stx.elements.iter().enumerate() {
        if idx > 0 {
          out.punct(",");
        }
        match elem {
          LitArrElem::Single(expr) => emit_expr_assign(out, expr),
          LitArrElem::Rest(expr) => {
            out.punct("...");
            emit_expr_assign(out, expr);
          }
          LitArrElem::Empty => {
            // A hole still needs its comma; written on the next iteration or
            // as a trailing comma below.
            if idx + 1 == arr.stx.elements.len() {
              out.punct(",");
            }
          }
        }
      }
      out.punct("]");
    }
    Expr::LitBigInt(lit) => out.token(&lit.stx.raw),
    Expr::LitBool(lit) => out.keyword(if lit.stx.value { "true" } else { "false" }),
    Expr::LitNull(_) => out.keyword("null"),
    Expr::LitNum(lit) => out.token(&lit.stx.raw),
    Expr::LitObj(obj) => {
      out.punct("{");
      for (idx, member) in obj.stx.members.iter().enumerate() {
        if idx > 0 {
          out.punct(",");
        }
        match &member.stx.typ {
          ObjMemberType::Valued { key, val } => emit_keyed_member(out, key, val, false),
          ObjMemberType::Shorthand { id } => out.identifier(&id.stx.name),
          ObjMemberType::Rest { val } => {
            out.punct("...");
            emit_expr_assign(out, val);
          }
        }
      }
      out.punct("}");
    }
    Expr::LitRegex(lit) => out.token(&lit.stx.raw),
    Expr::LitStr(lit) => out.token(&lit.stx.raw),
    Expr::LitTemplate(lit) => emit_template_parts(out, &lit.stx.parts),
    Expr::ArrPat(_) | Expr::IdPat(_) | Expr::ObjPat(_) => {
      emit_pat_expr(out, expr);
    }
  }
}

// Assignment targets appear in expression position on the left of `=`.
fn emit_pat_expr(out: &mut Emitter, expr: &Node<Expr>) {
  match expr.stx.as_ref() {
    Expr::IdPat(id) => out.identifier(&id.stx.name),
    Expr::ArrPat(arr) => super::pat::emit_arr_pat(out, &arr.stx),
    Expr::ObjPat(obj) => super::pat::emit_obj_pat(out, &obj.stx),
    _ => unreachable!(),
  }
}

pub fn emit_call_args(out: &mut Emitter, args: &[Node<CallArg>]) {
  out.punct("(");
  for (idx, arg) in args.iter().enumerate() {
    if idx > 0 {
      out.punct(",");
    }
    if arg.stx.spread {
      out.punct("...");
    }
    emit_expr_assign(out, &arg.stx.value);
  }
  out.punct(")");
}

fn emit_template_parts(out: &mut Emitter, parts: &[LitTemplatePart]) {
  out.raw("`");
  for part in parts {
    match part {
      LitTemplatePart::String(text) => out.raw(text),
      LitTemplatePart::Substitution(expr) => {
        out.raw("${");
        emit_expr(out, expr);
        out.raw("}");
      }
    }
  }
  out.raw("`");
}

pub fn emit_func(out: &mut Emitter, name: Option<&str>, func: &Node<Func>) {
  debug_assert!(!func.stx.arrow);
  if func.stx.async_ {
    out.keyword("async");
  }
  out.keyword("function");
  if func.stx.generator {
    out.punct("*");
  }
  if let Some(name) = name {
    out.identifier(name);
  }
  emit_func_params_and_body(out, func);
}

fn emit_arrow_func(out: &mut Emitter, func: &Node<Func>) {
  if func.stx.async_ {
    out.keyword("async");
  }
  // A single plain identifier parameter needs no parentheses.
  match func.stx.parameters.as_slice() {
    [param]
      if !param.stx.rest
        && param.stx.default_value.is_none()
        && matches!(param.stx.pattern.stx.pat.stx.as_ref(), Pat::Id(_)) =>
    {
      super::pat::emit_pat_decl(out, &param.stx.pattern)
    }
    params => super::pat::emit_param_list(out, params),
  }
  out.punct("=>");
  match &func.stx.body {
    FuncBody::Block(body) => {
      out.punct("{");
      emit_stmts(out, body);
      out.punct("}");
    }
    // An object literal body would parse as a block.
    FuncBody::Expression(expr) => {
      if expr_starts_with_obj(expr) {
        out.punct("(");
        emit_expr_assign(out, expr);
        out.punct(")");
      } else {
        emit_expr_assign(out, expr);
      }
    }
  }
}

/// Emits `(params) { body }`, shared by functions and class/object methods.
pub fn emit_func_params_and_body(out: &mut Emitter, func: &Node<Func>) {
  super::pat::emit_param_list(out, &func.stx.parameters);
  out.punct("{");
  match &func.stx.body {
    FuncBody::Block(body) => emit_stmts(out, body),
    FuncBody::Expression(_) => debug_assert!(false, "non-arrow function with expression body"),
  }
  out.punct("}");
}

pub fn emit_class(
  out: &mut Emitter,
  name: Option<&str>,
  extends: &Option<Node<Expr>>,
  members: &[Node<ClassMember>],
) {
  out.keyword("class");
  if let Some(name) = name {
    out.identifier(name);
  }
  if let Some(extends) = extends {
    out.keyword("extends");
    emit_expr_min_prec(out, extends, PRECEDENCE_MEMBER);
  }
  out.punct("{");
  for member in members {
    if member.stx.static_ {
      out.keyword("static");
    }
    emit_keyed_member(out, &member.stx.key, &member.stx.val, true);
    if matches!(member.stx.val, ClassOrObjVal::Prop(_)) {
      out.punct(";");
    }
  }
  out.punct("}");
}

/// Emits one keyed class or object member. Method modifiers (`async`, `*`,
/// `get`, `set`) come before the key, so key and value emit together.
fn emit_keyed_member(out: &mut Emitter, key: &ClassOrObjKey, val: &ClassOrObjVal, in_class: bool) {
  match val {
    ClassOrObjVal::Getter(getter) => {
      out.keyword("get");
      emit_class_or_obj_key(out, key);
      emit_func_params_and_body(out, &getter.stx.func);
    }
    ClassOrObjVal::Setter(setter) => {
      out.keyword("set");
      emit_class_or_obj_key(out, key);
      emit_func_params_and_body(out, &setter.stx.func);
    }
    ClassOrObjVal::Method(method) => {
      if method.stx.func.stx.async_ {
        out.keyword("async");
      }
      if method.stx.func.stx.generator {
        out.punct("*");
      }
      emit_class_or_obj_key(out, key);
      emit_func_params_and_body(out, &method.stx.func);
    }
    ClassOrObjVal::Prop(Some(value)) => {
      emit_class_or_obj_key(out, key);
      out.punct(if in_class { "=" } else { ":" });
      emit_expr_assign(out, value);
    }
    ClassOrObjVal::Prop(None) => emit_class_or_obj_key(out, key),
  }
}

fn digits_only_number(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::LitNum(num) => num.stx.raw.bytes().all(|b| b.is_ascii_digit()),
    _ => false,
  }
}

/// Whether the expression's first token would open an object literal.
pub fn expr_starts_with_obj(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::LitObj(_) | Expr::ObjPat(_) => true,
    Expr::Binary(binary) => expr_starts_with_obj(&binary.stx.left),
    Expr::Call(call) => expr_starts_with_obj(&call.stx.callee),
    Expr::ComputedMember(member) => expr_starts_with_obj(&member.stx.object),
    Expr::Cond(cond) => expr_starts_with_obj(&cond.stx.test),
    Expr::Member(member) => expr_starts_with_obj(&member.stx.left),
    Expr::TaggedTemplate(tagged) => expr_starts_with_obj(&tagged.stx.function),
    Expr::UnaryPostfix(unary) => expr_starts_with_obj(&unary.stx.argument),
    _ => false,
  }
}

/// Whether an expression statement starting with this expression needs to be
/// parenthesized to avoid being read as a declaration or block.
pub fn expr_stmt_needs_parens(expr: &Node<Expr>) -> bool {
  match expr.stx.as_ref() {
    Expr::LitObj(_) | Expr::ObjPat(_) | Expr::Func(_) | Expr::Class(_) => true,
    Expr::Binary(binary) => expr_stmt_needs_parens(&binary.stx.left),
    Expr::Call(call) => expr_stmt_needs_parens(&call.stx.callee),
    Expr::ComputedMember(member) => expr_stmt_needs_parens(&member.stx.object),
    Expr::Cond(cond) => expr_stmt_needs_parens(&cond.stx.test),
    Expr::Member(member) => expr_stmt_needs_parens(&member.stx.left),
    Expr::TaggedTemplate(tagged) => expr_stmt_needs_parens(&tagged.stx.function),
    Expr::UnaryPostfix(unary) => expr_stmt_needs_parens(&unary.stx.argument),
    _ => false,
  }
}

fn expr_precedence(expr: &Node<Expr>) -> u8 {
  match expr.stx.as_ref() {
    Expr::ArrowFunc(_) => PRECEDENCE_ASSIGNMENT,
    Expr::Binary(binary) => OPERATORS[&binary.stx.operator].precedence,
    Expr::Cond(_) => OPERATORS[&OperatorName::Conditional].precedence,
    Expr::Unary(unary) => OPERATORS[&unary.stx.operator].precedence,
    Expr::UnaryPostfix(unary) => OPERATORS[&unary.stx.operator].precedence,
    Expr::Call(_) | Expr::ComputedMember(_) | Expr::Member(_) | Expr::TaggedTemplate(_) => {
      PRECEDENCE_MEMBER
    }
    _ => PRECEDENCE_PRIMARY,
  }
}

fn emit_binary_operator(out: &mut Emitter, operator: OperatorName) {
  let punct = match operator {
    OperatorName::Addition => "+",
    OperatorName::Subtraction => "-",
    OperatorName::Multiplication => "*",
    OperatorName::Division => "/",
    OperatorName::Remainder => "%",
    OperatorName::Exponentiation => "**",
    OperatorName::LessThan => "<",
    OperatorName::LessThanOrEqual => "<=",
    OperatorName::GreaterThan => ">",
    OperatorName::GreaterThanOrEqual => ">=",
    OperatorName::Equality => "==",
    OperatorName::Inequality => "!=",
    OperatorName::StrictEquality => "===",
    OperatorName::StrictInequality => "!==",
    OperatorName::BitwiseAnd => "&",
    OperatorName::BitwiseOr => "|",
    OperatorName::BitwiseXor => "^",
    OperatorName::BitwiseLeftShift => "<<",
    OperatorName::BitwiseRightShift => ">>",
    OperatorName::BitwiseUnsignedRightShift => ">>>",
    OperatorName::LogicalAnd => "&&",
    OperatorName::LogicalOr => "||",
    OperatorName::NullishCoalescing => "??",
    OperatorName::Comma => ",",
    OperatorName::Assignment => "=",
    OperatorName::AssignmentAddition => "+=",
    OperatorName::AssignmentBitwiseAnd => "&=",
    OperatorName::AssignmentBitwiseLeftShift => "<<=",
    OperatorName::AssignmentBitwiseOr => "|=",
    OperatorName::AssignmentBitwiseRightShift => ">>=",
    OperatorName::AssignmentBitwiseUnsignedRightShift => ">>>=",
    OperatorName::AssignmentBitwiseXor => "^=",
    OperatorName::AssignmentDivision => "/=",
    OperatorName::AssignmentExponentiation => "**=",
    OperatorName::AssignmentLogicalAnd => "&&=",
    OperatorName::AssignmentLogicalOr => "||=",
    OperatorName::AssignmentMultiplication => "*=",
    OperatorName::AssignmentNullishCoalescing => "??=",
    OperatorName::AssignmentRemainder => "%=",
    OperatorName::AssignmentSubtraction => "-=",
    OperatorName::In => {
      out.keyword("in");
      return;
    }
    OperatorName::Instanceof => {
      out.keyword("instanceof");
      return;
    }
    _ => unreachable!("binary operator {:?}", operator),
  };
  out.punct(punct);
}

fn emit_unary_operator(out: &mut Emitter, operator: OperatorName) {
  match operator {
    OperatorName::LogicalNot => out.punct("!"),
    OperatorName::BitwiseNot => out.punct("~"),
    OperatorName::UnaryPlus => out.punct("+"),
    OperatorName::UnaryNegation => out.punct("-"),
    OperatorName::PrefixIncrement => out.punct("++"),
    OperatorName::PrefixDecrement => out.punct("--"),
    OperatorName::PostfixIncrement => out.punct("++"),
    OperatorName::PostfixDecrement => out.punct("--"),
    OperatorName::Typeof => out.keyword("typeof"),
    OperatorName::Void => out.keyword("void"),
    OperatorName::Delete => out.keyword("delete"),
    OperatorName::Await => out.keyword("await"),
    OperatorName::New => out.keyword("new"),
    OperatorName::Yield => out.keyword("yield"),
    OperatorName::YieldDelegated => {
      out.keyword("yield");
      out.punct("*");
    }
    _ => unreachable!("unary operator {:?}", operator),
  }
}
