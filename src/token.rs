use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use serde::Serialize;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize)]
pub enum TT {
  // End of source. Lexing past the end keeps yielding this, so the parser
  // never has to handle an Option.
  EOF,
  // Unlexable source. Carrying it as a token keeps peeking infallible; the
  // parser raises the error when it actually consumes one.
  Invalid,

  // Lexer-internal; never reaches the parser.
  BinNumber,
  BlockComment,
  BlockCommentEnd,
  HexNumber,
  LineComment,
  Newline,
  OctNumber,
  Whitespace,

  // Punctuators and operators.
  Amp,
  AmpAmp,
  AmpAmpEq,
  AmpEq,
  Arrow,
  Bang,
  BangEq,
  BangEqEq,
  Caret,
  CaretEq,
  CloseBrace,
  CloseBracket,
  CloseParen,
  Colon,
  Comma,
  Dot,
  Ellipsis,
  Eq,
  EqEq,
  EqEqEq,
  Gt,
  GtEq,
  GtGt,
  GtGtEq,
  GtGtGt,
  GtGtGtEq,
  Lt,
  LtEq,
  LtLt,
  LtLtEq,
  Minus,
  MinusEq,
  MinusMinus,
  OpenBrace,
  OpenBracket,
  OpenParen,
  Percent,
  PercentEq,
  Pipe,
  PipeEq,
  PipePipe,
  PipePipeEq,
  Plus,
  PlusEq,
  PlusPlus,
  Question,
  QuestionDot,
  QuestionDotOpenBracket,
  QuestionDotOpenParen,
  QuestionQuestion,
  QuestionQuestionEq,
  Semicolon,
  Slash,
  SlashEq,
  Star,
  StarEq,
  StarStar,
  StarStarEq,
  Tilde,

  // Names and keywords.
  Async,
  Await,
  Break,
  Case,
  Catch,
  Class,
  Const,
  Constructor,
  Continue,
  Debugger,
  Default,
  Delete,
  Do,
  Else,
  Export,
  Extends,
  Finally,
  For,
  Function,
  Get,
  Identifier,
  If,
  Import,
  In,
  Instanceof,
  Let,
  New,
  Of,
  PrivateName,
  Return,
  Set,
  Static,
  Super,
  Switch,
  This,
  Throw,
  Try,
  Typeof,
  Var,
  Void,
  While,
  With,
  Yield,

  // Literals.
  BigIntLit,
  FalseLit,
  NullLit,
  NumberLit,
  RegexLit,
  StringLit,
  TemplateChunk,
  TemplateChunkEnd,
  TrueLit,
}

impl TT {
  // Contextual keywords; usable as parameter and variable names.
  pub fn is_unreserved_keyword(self) -> bool {
    matches!(
      self,
      TT::Async | TT::Constructor | TT::Get | TT::Let | TT::Of | TT::Set | TT::Static
    )
  }
}

#[derive(Clone, Debug)]
pub struct Token {
  pub loc: Loc,
  // True if at least one line terminator sits between this token and the
  // previous one. ASI hangs off this.
  pub preceded_by_line_terminator: bool,
  pub typ: TT,
}

impl Token {
  pub fn error(&self, typ: SyntaxErrorType) -> SyntaxError {
    self.loc.error(typ, Some(self.typ))
  }
}
