use ahash::HashMap;
use ahash::HashMapExt;
use once_cell::sync::Lazy;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum OperatorName {
  Addition,
  Assignment,
  AssignmentAddition,
  AssignmentBitwiseAnd,
  AssignmentBitwiseLeftShift,
  AssignmentBitwiseOr,
  AssignmentBitwiseRightShift,
  AssignmentBitwiseUnsignedRightShift,
  AssignmentBitwiseXor,
  AssignmentDivision,
  AssignmentExponentiation,
  AssignmentLogicalAnd,
  AssignmentLogicalOr,
  AssignmentMultiplication,
  AssignmentNullishCoalescing,
  AssignmentRemainder,
  AssignmentSubtraction,
  Await,
  BitwiseAnd,
  BitwiseLeftShift,
  BitwiseNot,
  BitwiseOr,
  BitwiseRightShift,
  BitwiseUnsignedRightShift,
  BitwiseXor,
  Call,
  Comma,
  ComputedMemberAccess,
  Conditional,
  Delete,
  Division,
  Equality,
  Exponentiation,
  GreaterThan,
  GreaterThanOrEqual,
  In,
  Inequality,
  Instanceof,
  LessThan,
  LessThanOrEqual,
  LogicalAnd,
  LogicalNot,
  LogicalOr,
  MemberAccess,
  Multiplication,
  New,
  NullishCoalescing,
  OptionalChainingCall,
  OptionalChainingComputedMemberAccess,
  OptionalChainingMemberAccess,
  PostfixDecrement,
  PostfixIncrement,
  PrefixDecrement,
  PrefixIncrement,
  Remainder,
  StrictEquality,
  StrictInequality,
  Subtraction,
  Typeof,
  UnaryNegation,
  UnaryPlus,
  Void,
  Yield,
  YieldDelegated,
}

impl OperatorName {
  pub fn is_assignment(&self) -> bool {
    use OperatorName::*;
    matches!(
      self,
      Assignment
        | AssignmentAddition
        | AssignmentBitwiseAnd
        | AssignmentBitwiseLeftShift
        | AssignmentBitwiseOr
        | AssignmentBitwiseRightShift
        | AssignmentBitwiseUnsignedRightShift
        | AssignmentBitwiseXor
        | AssignmentDivision
        | AssignmentExponentiation
        | AssignmentLogicalAnd
        | AssignmentLogicalOr
        | AssignmentMultiplication
        | AssignmentNullishCoalescing
        | AssignmentRemainder
        | AssignmentSubtraction
    )
  }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Associativity {
  Left,
  Right,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Arity {
  Unary,
  Binary,
  Ternary,
}

#[derive(Clone, Debug)]
pub struct Operator {
  pub name: OperatorName,
  pub arity: Arity,
  pub associativity: Associativity,
  // Higher values bind tighter.
  pub precedence: u8,
}

pub const PRECEDENCE_COMMA: u8 = 1;
pub const PRECEDENCE_YIELD: u8 = 2;
pub const PRECEDENCE_ASSIGNMENT: u8 = 3;
pub const PRECEDENCE_CONDITIONAL: u8 = 4;
pub const PRECEDENCE_COALESCE_OR: u8 = 5;
pub const PRECEDENCE_LOGICAL_AND: u8 = 6;
pub const PRECEDENCE_BITWISE_OR: u8 = 7;
pub const PRECEDENCE_BITWISE_XOR: u8 = 8;
pub const PRECEDENCE_BITWISE_AND: u8 = 9;
pub const PRECEDENCE_EQUALITY: u8 = 10;
pub const PRECEDENCE_RELATIONAL: u8 = 11;
pub const PRECEDENCE_SHIFT: u8 = 12;
pub const PRECEDENCE_ADDITIVE: u8 = 13;
pub const PRECEDENCE_MULTIPLICATIVE: u8 = 14;
pub const PRECEDENCE_EXPONENTIATION: u8 = 15;
pub const PRECEDENCE_UNARY: u8 = 16;
pub const PRECEDENCE_POSTFIX: u8 = 17;
pub const PRECEDENCE_MEMBER: u8 = 18;

#[rustfmt::skip]
pub static OPERATORS: Lazy<HashMap<OperatorName, Operator>> = Lazy::new(|| {
  use Arity::*;
  use Associativity::*;
  use OperatorName::*;
  let mut map = HashMap::<OperatorName, Operator>::new();
  let mut add = |name: OperatorName, arity: Arity, associativity: Associativity, precedence: u8| {
    map.insert(name, Operator { name, arity, associativity, precedence });
  };
  add(Comma, Binary, Left, PRECEDENCE_COMMA);
  add(Yield, Unary, Right, PRECEDENCE_YIELD);
  add(YieldDelegated, Unary, Right, PRECEDENCE_YIELD);
  add(Assignment, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentAddition, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentBitwiseAnd, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentBitwiseLeftShift, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentBitwiseOr, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentBitwiseRightShift, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentBitwiseUnsignedRightShift, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentBitwiseXor, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentDivision, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentExponentiation, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentLogicalAnd, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentLogicalOr, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentMultiplication, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentNullishCoalescing, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentRemainder, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(AssignmentSubtraction, Binary, Right, PRECEDENCE_ASSIGNMENT);
  add(Conditional, Ternary, Right, PRECEDENCE_CONDITIONAL);
  add(NullishCoalescing, Binary, Left, PRECEDENCE_COALESCE_OR);
  add(LogicalOr, Binary, Left, PRECEDENCE_COALESCE_OR);
  add(LogicalAnd, Binary, Left, PRECEDENCE_LOGICAL_AND);
  add(BitwiseOr, Binary, Left, PRECEDENCE_BITWISE_OR);
  add(BitwiseXor, Binary, Left, PRECEDENCE_BITWISE_XOR);
  add(BitwiseAnd, Binary, Left, PRECEDENCE_BITWISE_AND);
  add(Equality, Binary, Left, PRECEDENCE_EQUALITY);
  add(Inequality, Binary, Left, PRECEDENCE_EQUALITY);
  add(StrictEquality, Binary, Left, PRECEDENCE_EQUALITY);
  add(StrictInequality, Binary, Left, PRECEDENCE_EQUALITY);
  add(GreaterThan, Binary, Left, PRECEDENCE_RELATIONAL);
  add(GreaterThanOrEqual, Binary, Left, PRECEDENCE_RELATIONAL);
  add(In, Binary, Left, PRECEDENCE_RELATIONAL);
  add(Instanceof, Binary, Left, PRECEDENCE_RELATIONAL);
  add(LessThan, Binary, Left, PRECEDENCE_RELATIONAL);
  add(LessThanOrEqual, Binary, Left, PRECEDENCE_RELATIONAL);
  add(BitwiseLeftShift, Binary, Left, PRECEDENCE_SHIFT);
  add(BitwiseRightShift, Binary, Left, PRECEDENCE_SHIFT);
  add(BitwiseUnsignedRightShift, Binary, Left, PRECEDENCE_SHIFT);
  add(Addition, Binary, Left, PRECEDENCE_ADDITIVE);
  add(Subtraction, Binary, Left, PRECEDENCE_ADDITIVE);
  add(Division, Binary, Left, PRECEDENCE_MULTIPLICATIVE);
  add(Multiplication, Binary, Left, PRECEDENCE_MULTIPLICATIVE);
  add(Remainder, Binary, Left, PRECEDENCE_MULTIPLICATIVE);
  add(Exponentiation, Binary, Right, PRECEDENCE_EXPONENTIATION);
  add(Await, Unary, Right, PRECEDENCE_UNARY);
  add(BitwiseNot, Unary, Right, PRECEDENCE_UNARY);
  add(Delete, Unary, Right, PRECEDENCE_UNARY);
  add(LogicalNot, Unary, Right, PRECEDENCE_UNARY);
  add(PrefixDecrement, Unary, Right, PRECEDENCE_UNARY);
  add(PrefixIncrement, Unary, Right, PRECEDENCE_UNARY);
  add(Typeof, Unary, Right, PRECEDENCE_UNARY);
  add(UnaryNegation, Unary, Right, PRECEDENCE_UNARY);
  add(UnaryPlus, Unary, Right, PRECEDENCE_UNARY);
  add(Void, Unary, Right, PRECEDENCE_UNARY);
  add(PostfixDecrement, Unary, Left, PRECEDENCE_POSTFIX);
  add(PostfixIncrement, Unary, Left, PRECEDENCE_POSTFIX);
  add(Call, Binary, Left, PRECEDENCE_MEMBER);
  add(ComputedMemberAccess, Binary, Left, PRECEDENCE_MEMBER);
  add(MemberAccess, Binary, Left, PRECEDENCE_MEMBER);
  add(New, Unary, Right, PRECEDENCE_MEMBER);
  add(OptionalChainingCall, Binary, Left, PRECEDENCE_MEMBER);
  add(OptionalChainingComputedMemberAccess, Binary, Left, PRECEDENCE_MEMBER);
  add(OptionalChainingMemberAccess, Binary, Left, PRECEDENCE_MEMBER);
  map
});
