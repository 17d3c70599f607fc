use crate::lex::lex_next;
use crate::lex::LexMode;
use crate::lex::Lexer;
use crate::token::TT;
use crate::token::TT::*;

fn check<const N: usize>(code: &str, expecteds: [TT; N]) {
  let mut lexer = Lexer::new(code);
  for expected in expecteds {
    let t = lex_next(&mut lexer, LexMode::Standard);
    assert_eq!(t.typ, expected);
  }
  let t = lex_next(&mut lexer, LexMode::Standard);
  assert_eq!(EOF, t.typ);
}

#[test]
fn test_lex_keywords() {
  check("class", [Class]);
  check("instanceof", [Instanceof]);
  check("awaits", [Identifier]);
}

#[test]
fn test_lex_identifiers() {
  check("h929", [Identifier]);
  check("$_", [Identifier]);
}

#[test]
fn test_lex_literal_numbers() {
  check("1", [NumberLit]);
  check("929", [NumberLit]);
  check(".929", [NumberLit]);
  check(". 929", [Dot, NumberLit]);
  check("1e10", [NumberLit]);
  check("1.5e-3", [NumberLit]);
  check("?.929", [Question, NumberLit]);
  check("?..929", [QuestionDot, NumberLit]);
}

#[test]
fn test_lex_literal_bigints() {
  check("1n", [BigIntLit]);
  check("0x800faceb00cn", [BigIntLit]);
  check("0b110101010n", [BigIntLit]);
  check("0o12077n", [BigIntLit]);
}

#[test]
fn test_lex_literal_strings() {
  check("'hello world'", [StringLit]);
  check("\"hello world\"", [StringLit]);
  check("'hello world\n'", [Invalid]);
  check("'line \\\ncontinuation'", [StringLit]);
}

#[test]
fn test_lex_template_strings() {
  check("`abc`", [TemplateChunkEnd]);
  let mut lexer = Lexer::new("`abc${x}`");
  assert_eq!(
    lex_next(&mut lexer, LexMode::Standard).typ,
    TemplateChunk
  );
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, Identifier);
  assert_eq!(lex_next(&mut lexer, LexMode::Standard).typ, CloseBrace);
  assert_eq!(
    lex_next(&mut lexer, LexMode::TemplateStrContinue).typ,
    TemplateChunkEnd
  );
}

#[test]
fn test_lex_regex() {
  let mut lexer = Lexer::new("/ab[/]c/g");
  let t = lex_next(&mut lexer, LexMode::SlashIsRegex);
  assert_eq!(t.typ, RegexLit);
}

#[test]
fn test_lex_comments() {
  check("a // comment\nb", [Identifier, Identifier]);
  check("a /* x */ b", [Identifier, Identifier]);
}

#[test]
fn test_lex_preceded_by_line_terminator() {
  let mut lexer = Lexer::new("a\nb c");
  let a = lex_next(&mut lexer, LexMode::Standard);
  assert!(!a.preceded_by_line_terminator);
  let b = lex_next(&mut lexer, LexMode::Standard);
  assert!(b.preceded_by_line_terminator);
  let c = lex_next(&mut lexer, LexMode::Standard);
  assert!(!c.preceded_by_line_terminator);
}

#[test]
fn test_lex_optional_chaining() {
  check("a?.b", [Identifier, QuestionDot, Identifier]);
  check("a?.(b)", [
    Identifier,
    QuestionDotOpenParen,
    Identifier,
    CloseParen,
  ]);
  check("a?.[b]", [
    Identifier,
    QuestionDotOpenBracket,
    Identifier,
    CloseBracket,
  ]);
}
