use crate::operator::Operator;
use crate::operator::OperatorName;
use crate::operator::OPERATORS;
use crate::token::TT;
use ahash::HashMap;
use once_cell::sync::Lazy;

fn by_token(pairs: &[(TT, OperatorName)]) -> HashMap<TT, &'static Operator> {
  HashMap::from_iter(pairs.iter().map(|&(tt, name)| (tt, &OPERATORS[&name])))
}

#[rustfmt::skip]
pub static MULTARY_OPERATOR_MAPPING: Lazy<HashMap<TT, &'static Operator>> = Lazy::new(|| by_token(&[
  (TT::Plus, OperatorName::Addition),
  (TT::Eq, OperatorName::Assignment),
  (TT::PlusEq, OperatorName::AssignmentAddition),
  (TT::AmpEq, OperatorName::AssignmentBitwiseAnd),
  (TT::LtLtEq, OperatorName::AssignmentBitwiseLeftShift),
  (TT::PipeEq, OperatorName::AssignmentBitwiseOr),
  (TT::GtGtEq, OperatorName::AssignmentBitwiseRightShift),
  (TT::GtGtGtEq, OperatorName::AssignmentBitwiseUnsignedRightShift),
  (TT::CaretEq, OperatorName::AssignmentBitwiseXor),
  (TT::SlashEq, OperatorName::AssignmentDivision),
  (TT::StarStarEq, OperatorName::AssignmentExponentiation),
  (TT::AmpAmpEq, OperatorName::AssignmentLogicalAnd),
  (TT::PipePipeEq, OperatorName::AssignmentLogicalOr),
  (TT::StarEq, OperatorName::AssignmentMultiplication),
  (TT::QuestionQuestionEq, OperatorName::AssignmentNullishCoalescing),
  (TT::PercentEq, OperatorName::AssignmentRemainder),
  (TT::MinusEq, OperatorName::AssignmentSubtraction),
  (TT::Amp, OperatorName::BitwiseAnd),
  (TT::LtLt, OperatorName::BitwiseLeftShift),
  (TT::Pipe, OperatorName::BitwiseOr),
  (TT::GtGt, OperatorName::BitwiseRightShift),
  (TT::GtGtGt, OperatorName::BitwiseUnsignedRightShift),
  (TT::Caret, OperatorName::BitwiseXor),
  (TT::OpenParen, OperatorName::Call),
  (TT::Comma, OperatorName::Comma),
  (TT::OpenBracket, OperatorName::ComputedMemberAccess),
  (TT::Question, OperatorName::Conditional),
  (TT::Slash, OperatorName::Division),
  (TT::EqEq, OperatorName::Equality),
  (TT::StarStar, OperatorName::Exponentiation),
  (TT::Gt, OperatorName::GreaterThan),
  (TT::GtEq, OperatorName::GreaterThanOrEqual),
  (TT::In, OperatorName::In),
  (TT::BangEq, OperatorName::Inequality),
  (TT::Instanceof, OperatorName::Instanceof),
  (TT::Lt, OperatorName::LessThan),
  (TT::LtEq, OperatorName::LessThanOrEqual),
  (TT::AmpAmp, OperatorName::LogicalAnd),
  (TT::PipePipe, OperatorName::LogicalOr),
  (TT::Dot, OperatorName::MemberAccess),
  (TT::Star, OperatorName::Multiplication),
  (TT::QuestionQuestion, OperatorName::NullishCoalescing),
  (TT::QuestionDot, OperatorName::OptionalChainingMemberAccess),
  (TT::QuestionDotOpenBracket, OperatorName::OptionalChainingComputedMemberAccess),
  (TT::QuestionDotOpenParen, OperatorName::OptionalChainingCall),
  (TT::Percent, OperatorName::Remainder),
  (TT::EqEqEq, OperatorName::StrictEquality),
  (TT::BangEqEq, OperatorName::StrictInequality),
  (TT::Minus, OperatorName::Subtraction),
]));

// Postfix increment/decrement and `yield*` never come from this table.
#[rustfmt::skip]
pub static UNARY_OPERATOR_MAPPING: Lazy<HashMap<TT, &'static Operator>> = Lazy::new(|| by_token(&[
  (TT::Await, OperatorName::Await),
  (TT::Tilde, OperatorName::BitwiseNot),
  (TT::Delete, OperatorName::Delete),
  (TT::Bang, OperatorName::LogicalNot),
  (TT::New, OperatorName::New),
  (TT::MinusMinus, OperatorName::PrefixDecrement),
  (TT::PlusPlus, OperatorName::PrefixIncrement),
  (TT::Minus, OperatorName::UnaryNegation),
  (TT::Plus, OperatorName::UnaryPlus),
  (TT::Typeof, OperatorName::Typeof),
  (TT::Void, OperatorName::Void),
  (TT::Yield, OperatorName::Yield),
]));
