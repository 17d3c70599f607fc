use crate::char::CharFilter;
use crate::char::DIGIT;
use crate::char::DIGIT_BIN;
use crate::char::DIGIT_HEX;
use crate::char::DIGIT_OCT;
use crate::char::ID_CONTINUE;
use crate::char::ID_CONTINUE_CHARSTR;
use crate::char::ID_START;
use crate::char::ID_START_CHARSTR;
use crate::loc::Loc;
use crate::token::Token;
use crate::token::TT;
use ahash::HashMap;
use aho_corasick::AhoCorasick;
use aho_corasick::AhoCorasickBuilder;
use aho_corasick::AhoCorasickKind;
use aho_corasick::Anchored;
use aho_corasick::Input;
use aho_corasick::MatchKind;
use aho_corasick::StartKind;
use core::ops::Index;
use memchr::memchr;
use memchr::memchr3;
use once_cell::sync::Lazy;

#[cfg(test)]
mod tests;

#[derive(Copy, Clone, Eq, PartialEq)]
pub enum LexMode {
  SlashIsRegex,
  Standard,
  TemplateStrContinue,
}

#[derive(Copy, Clone)]
pub struct LexerCheckpoint {
  next: usize,
}

// Length of a matched run of source, in bytes.
#[derive(Copy, Clone)]
struct Run(usize);

impl Run {
  pub fn len(&self) -> usize {
    self.0
  }

  pub fn prefix(&self, n: usize) -> Run {
    debug_assert!(n <= self.len());
    Run(n)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

#[derive(Debug)]
struct NoMatch;

type LexResult<T> = Result<T, NoMatch>;

// Multi-pattern scanner over the upcoming source, each pattern tagged with
// the token type it starts.
struct TokenScanner {
  tags: Vec<TT>,
  automaton: AhoCorasick,
  anchored: bool,
}

impl TokenScanner {
  pub fn new<D: AsRef<str>>(anchored: bool, patterns: Vec<(TT, D)>) -> Self {
    let (tags, pats): (Vec<_>, Vec<_>) = patterns.into_iter().unzip();
    let pat_bytes: Vec<Vec<u8>> = pats.iter().map(|s| s.as_ref().as_bytes().to_vec()).collect();
    let automaton = AhoCorasickBuilder::new()
      .start_kind(if anchored {
        StartKind::Anchored
      } else {
        StartKind::Unanchored
      })
      .kind(Some(AhoCorasickKind::DFA))
      .match_kind(MatchKind::LeftmostLongest)
      .build(pat_bytes)
      .unwrap();
    TokenScanner {
      tags,
      automaton,
      anchored,
    }
  }

  pub fn find(&self, lexer: &Lexer) -> LexResult<(TT, Run)> {
    let input = Input::new(lexer.rest()).anchored(if self.anchored {
      Anchored::Yes
    } else {
      Anchored::No
    });
    self
      .automaton
      .find(input)
      .map(|m| (self.tags[m.pattern().as_usize()], Run(m.end())))
      .ok_or(NoMatch)
  }
}

pub struct Lexer<'a> {
  source: &'a str,
  next: usize,
}

impl<'a> Lexer<'a> {
  pub fn new(code: &'a str) -> Lexer<'a> {
    Lexer {
      source: code,
      next: 0,
    }
  }

  pub fn next(&self) -> usize {
    self.next
  }

  fn end(&self) -> usize {
    self.source.len()
  }

  fn rest(&self) -> &str {
    &self.source[self.next..]
  }

  fn rest_len(&self) -> usize {
    self.end() - self.next
  }

  pub fn source_range(&self) -> Loc {
    Loc(0, self.end())
  }

  fn at_end(&self) -> bool {
    self.next >= self.end()
  }

  fn char_at(&self, n: usize) -> Option<char> {
    self.rest().chars().nth(n)
  }

  fn need_char(&self, n: usize) -> LexResult<char> {
    self.char_at(n).ok_or(NoMatch)
  }

  // The parser rewinds by token index; this re-syncs the lexer to a token
  // boundary it has already produced.
  pub fn set_next(&mut self, next: usize) {
    self.next = next;
  }

  pub fn checkpoint(&self) -> LexerCheckpoint {
    LexerCheckpoint { next: self.next }
  }

  pub fn since_checkpoint(&self, checkpoint: LexerCheckpoint) -> Loc {
    Loc(checkpoint.next, self.next)
  }

  fn match_char(&self, c: char) -> Run {
    match self.rest().chars().next() {
      Some(first) if first == c => Run(c.len_utf8()),
      _ => Run(0),
    }
  }

  // Everything up to and including `c`, or the rest of the source.
  fn run_through(&self, c: char) -> Run {
    if c.is_ascii() {
      memchr(c as u8, self.rest().as_bytes())
        .map(|pos| Run(pos + 1))
        .unwrap_or_else(|| Run(self.rest_len()))
    } else {
      self
        .rest()
        .find(c)
        .map(|pos| Run(pos + c.len_utf8()))
        .unwrap_or_else(|| Run(self.rest_len()))
    }
  }

  fn run_until3(&self, a: char, b: char, c: char) -> Run {
    if a.is_ascii() && b.is_ascii() && c.is_ascii() {
      Run(memchr3(a as u8, b as u8, c as u8, self.rest().as_bytes()).unwrap_or(self.rest_len()))
    } else {
      let rest = self.rest();
      let pos = [rest.find(a), rest.find(b), rest.find(c)]
        .iter()
        .filter_map(|&p| p)
        .min();
      Run(pos.unwrap_or(self.rest_len()))
    }
  }

  fn run_until4(&self, a: char, b: char, c: char, d: char) -> Run {
    let m = self.run_until3(a, b, c);
    debug_assert!(d.is_ascii());
    match self.source[self.next..self.next + m.0].find(d) {
      Some(pos) => Run(pos),
      None => m,
    }
  }

  fn run_of(&self, chars: &CharFilter) -> Run {
    let mut len = 0;
    for ch in self.rest().chars() {
      if !chars.has(ch) {
        break;
      }
      len += ch.len_utf8();
    }
    Run(len)
  }

  fn consume(&mut self, m: Run) -> Run {
    self.next += m.len();
    m
  }

  fn take_char(&mut self) -> LexResult<char> {
    let c = self.need_char(0)?;
    self.next += c.len_utf8();
    Ok(c)
  }

  fn advance(&mut self, n: usize) {
    debug_assert!(self.next + n <= self.end());
    self.next += n;
  }

  // Runs a lexing function, mapping failure to an Invalid token covering
  // whatever it managed to consume.
  fn lex_with(
    &mut self,
    preceded_by_line_terminator: bool,
    f: impl FnOnce(&mut Self) -> LexResult<TT>,
  ) -> Token {
    let cp = self.checkpoint();
    let typ = f(self).unwrap_or(TT::Invalid);
    Token {
      loc: self.since_checkpoint(cp),
      typ,
      preceded_by_line_terminator,
    }
  }
}

impl<'a> Index<Loc> for Lexer<'a> {
  type Output = str;

  fn index(&self, index: Loc) -> &Self::Output {
    &self.source[index.0..index.1]
  }
}

#[rustfmt::skip]
static PUNCTUATORS: &[(TT, &str)] = &[
  (TT::Amp, "&"), (TT::AmpAmp, "&&"), (TT::AmpAmpEq, "&&="), (TT::AmpEq, "&="),
  (TT::Arrow, "=>"),
  (TT::Bang, "!"), (TT::BangEq, "!="), (TT::BangEqEq, "!=="),
  (TT::Caret, "^"), (TT::CaretEq, "^="),
  (TT::CloseBrace, "}"), (TT::CloseBracket, "]"), (TT::CloseParen, ")"),
  (TT::Colon, ":"), (TT::Comma, ","),
  (TT::Dot, "."), (TT::Ellipsis, "..."),
  (TT::Eq, "="), (TT::EqEq, "=="), (TT::EqEqEq, "==="),
  (TT::Gt, ">"), (TT::GtEq, ">="), (TT::GtGt, ">>"), (TT::GtGtEq, ">>="),
  (TT::GtGtGt, ">>>"), (TT::GtGtGtEq, ">>>="),
  (TT::Lt, "<"), (TT::LtEq, "<="), (TT::LtLt, "<<"), (TT::LtLtEq, "<<="),
  (TT::Minus, "-"), (TT::MinusEq, "-="), (TT::MinusMinus, "--"),
  (TT::OpenBrace, "{"), (TT::OpenBracket, "["), (TT::OpenParen, "("),
  (TT::Percent, "%"), (TT::PercentEq, "%="),
  (TT::Pipe, "|"), (TT::PipeEq, "|="), (TT::PipePipe, "||"), (TT::PipePipeEq, "||="),
  (TT::Plus, "+"), (TT::PlusEq, "+="), (TT::PlusPlus, "++"),
  (TT::PrivateName, "#"),
  (TT::Question, "?"), (TT::QuestionDot, "?."),
  (TT::QuestionDotOpenBracket, "?.["), (TT::QuestionDotOpenParen, "?.("),
  (TT::QuestionQuestion, "??"), (TT::QuestionQuestionEq, "??="),
  (TT::Semicolon, ";"), (TT::Slash, "/"), (TT::SlashEq, "/="),
  (TT::Star, "*"), (TT::StarEq, "*="), (TT::StarStar, "**"), (TT::StarStarEq, "**="),
  (TT::Tilde, "~"),
];

#[rustfmt::skip]
static KEYWORD_STRS: &[(TT, &str)] = &[
  (TT::Async, "async"), (TT::Await, "await"), (TT::Break, "break"),
  (TT::Case, "case"), (TT::Catch, "catch"), (TT::Class, "class"),
  (TT::Const, "const"), (TT::Constructor, "constructor"), (TT::Continue, "continue"),
  (TT::Debugger, "debugger"), (TT::Default, "default"), (TT::Delete, "delete"),
  (TT::Do, "do"), (TT::Else, "else"), (TT::Export, "export"),
  (TT::Extends, "extends"), (TT::Finally, "finally"), (TT::For, "for"),
  (TT::Function, "function"), (TT::Get, "get"), (TT::If, "if"),
  (TT::Import, "import"), (TT::In, "in"), (TT::Instanceof, "instanceof"),
  (TT::Let, "let"), (TT::New, "new"), (TT::Of, "of"),
  (TT::Return, "return"), (TT::Set, "set"), (TT::Static, "static"),
  (TT::Super, "super"), (TT::Switch, "switch"), (TT::This, "this"),
  (TT::Throw, "throw"), (TT::Try, "try"), (TT::Typeof, "typeof"),
  (TT::Var, "var"), (TT::Void, "void"), (TT::While, "while"),
  (TT::With, "with"), (TT::Yield, "yield"),
  // Value keywords lex like any other.
  (TT::FalseLit, "false"), (TT::NullLit, "null"), (TT::TrueLit, "true"),
];

pub static KEYWORDS_MAPPING: Lazy<HashMap<TT, &'static str>> =
  Lazy::new(|| HashMap::from_iter(KEYWORD_STRS.iter().copied()));

// Patterns that decide what kind of token starts at the cursor; dedicated
// lex functions take over from there.
static TOKEN_START: Lazy<TokenScanner> = Lazy::new(|| {
  let mut patterns: Vec<(TT, String)> = Vec::new();
  for &(tt, s) in PUNCTUATORS {
    patterns.push((tt, s.into()));
  }
  for &(tt, kw) in KEYWORD_STRS {
    patterns.push((tt, kw.into()));
    // A keyword followed by more identifier characters is an identifier, so
    // add a longer pattern for every such continuation.
    for c in ID_CONTINUE_CHARSTR.chars() {
      let mut extended = kw.to_string();
      extended.push(c);
      if !KEYWORD_STRS.iter().any(|&(_, s)| s == extended) {
        patterns.push((TT::Identifier, extended));
      }
    }
  }
  for c in ID_START_CHARSTR.chars() {
    patterns.push((TT::Identifier, c.to_string()));
  }
  // Unicode escape at the start of an identifier.
  patterns.push((TT::Identifier, "\\".into()));
  // UTF-8 multi-byte leaders, for identifiers beyond ASCII.
  for b in 0..256u32 {
    if b >> 5 == 0b110 || b >> 4 == 0b1110 || b >> 3 == 0b11110 {
      if let Some(c) = char::from_u32(b) {
        patterns.push((TT::Identifier, c.to_string()));
      }
    }
  }
  for c in "0123456789".chars() {
    patterns.push((TT::NumberLit, c.to_string()));
  }
  for radix in [(TT::BinNumber, "b"), (TT::HexNumber, "x"), (TT::OctNumber, "o")] {
    patterns.push((radix.0, format!("0{}", radix.1)));
    patterns.push((radix.0, format!("0{}", radix.1.to_uppercase())));
  }
  for digit in '0'..='9' {
    // `.5` is a number, not the `.` operator.
    patterns.push((TT::NumberLit, format!(".{}", digit)));
    // `a?.5:b` is a conditional, not optional chaining.
    patterns.push((TT::Question, format!("?.{}", digit)));
  }
  patterns.push((TT::StringLit, "\"".into()));
  patterns.push((TT::StringLit, "'".into()));
  patterns.push((TT::TemplateChunk, "`".into()));

  TokenScanner::new(true, patterns)
});

static BLOCK_COMMENT_DELIMS: Lazy<TokenScanner> = Lazy::new(|| {
  TokenScanner::new::<&str>(false, vec![
    (TT::BlockCommentEnd, "*/"),
    // Only \r and \n are recognised as terminators, not the Unicode ones.
    (TT::Newline, "\r"),
    (TT::Newline, "\n"),
  ])
});

static TRIVIA: Lazy<TokenScanner> = Lazy::new(|| {
  let mut patterns: Vec<(TT, &str)> = vec![
    (TT::Newline, "\r"),
    (TT::Newline, "\n"),
    (TT::BlockComment, "/*"),
    (TT::LineComment, "//"),
  ];
  for ws in [
    "\x09", "\x0b", "\x0c", "\x20",
    // Unicode whitespace.
    "\u{00A0}", "\u{1680}", "\u{2000}", "\u{2001}", "\u{2002}", "\u{2003}",
    "\u{2004}", "\u{2005}", "\u{2006}", "\u{2007}", "\u{2008}", "\u{2009}",
    "\u{200A}", "\u{202F}", "\u{205F}", "\u{3000}", "\u{FEFF}",
  ] {
    patterns.push((TT::Whitespace, ws));
  }
  TokenScanner::new(true, patterns)
});

/// Returns whether the comment contains a line terminator, which matters for
/// ASI.
fn lex_block_comment(lexer: &mut Lexer<'_>) -> bool {
  // Past the `/*`.
  lexer.advance(2);
  let mut contains_newline = false;
  loop {
    // An unterminated comment swallows the rest of the source; the lexer has
    // no error channel, so there is nothing better to do.
    let (tt, run) = BLOCK_COMMENT_DELIMS
      .find(lexer)
      .unwrap_or_else(|_| (TT::EOF, Run(lexer.rest_len())));
    lexer.consume(run);
    match tt {
      TT::BlockCommentEnd | TT::EOF => break,
      TT::Newline => contains_newline = true,
      _ => unreachable!(),
    };
  }
  contains_newline
}

fn lex_line_comment(lexer: &mut Lexer<'_>) {
  // Past the `//`.
  lexer.advance(2);
  // Only \n and \r are treated as terminators here, not the Unicode ones.
  lexer.consume(lexer.run_through('\n'));
}

fn lex_unicode_escape(lexer: &mut Lexer<'_>) -> LexResult<()> {
  // Past the backslash.
  lexer.advance(1);
  if lexer.need_char(0)? != 'u' {
    return Err(NoMatch);
  }
  lexer.advance(1);
  if lexer.char_at(0) == Some('{') {
    // `\u{XXXXX}`, one or more hex digits.
    lexer.advance(1);
    let digits = lexer.consume(lexer.run_of(&DIGIT_HEX));
    if digits.is_empty() {
      return Err(NoMatch);
    }
    if lexer.need_char(0)? != '}' {
      return Err(NoMatch);
    }
    lexer.advance(1);
  } else {
    // `\uXXXX`, exactly four hex digits.
    for _ in 0..4 {
      let c = lexer.need_char(0)?;
      if !DIGIT_HEX.has(c) {
        return Err(NoMatch);
      }
      lexer.advance(1);
    }
  }
  Ok(())
}

fn lex_identifier(lexer: &mut Lexer<'_>) -> TT {
  // The starter is a char or a Unicode escape.
  let Some(starter) = lexer.char_at(0) else {
    return TT::Invalid;
  };
  if starter == '\\' {
    if lex_unicode_escape(lexer).is_err() {
      return TT::Invalid;
    }
  } else {
    lexer.advance(starter.len_utf8());
  }

  loop {
    lexer.consume(lexer.run_of(&ID_CONTINUE));
    match lexer.char_at(0) {
      Some('\\') => {
        if lex_unicode_escape(lexer).is_err() {
          break;
        }
      }
      Some(c) if !c.is_ascii() => {
        lexer.advance(c.len_utf8());
      }
      _ => break,
    }
  }
  TT::Identifier
}

fn lex_decimal_number(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  let start_pos = lexer.next();
  let first_char = lexer.need_char(0)?;
  lexer.consume(lexer.run_of(&DIGIT));
  let end_pos = lexer.next();
  if !lexer.consume(lexer.match_char('n')).is_empty() {
    return Ok(TT::BigIntLit);
  }
  // A legacy octal (leading 0, all digits 0-7) cannot have a fraction.
  let integer_part = &lexer[Loc(start_pos, end_pos)];
  let is_legacy_octal = first_char == '0'
    && integer_part.len() > 1
    && integer_part.chars().all(|c| matches!(c, '0'..='7'));
  if lexer.char_at(0) == Some('.') && !is_legacy_octal {
    lexer.consume(lexer.match_char('.'));
    lexer.consume(lexer.run_of(&DIGIT));
  }
  if matches!(lexer.char_at(0), Some('e' | 'E')) {
    lexer.advance(1);
    if matches!(lexer.need_char(0)?, '+' | '-') {
      lexer.advance(1);
    }
    lexer.consume(lexer.run_of(&DIGIT));
  }
  Ok(TT::NumberLit)
}

fn lex_radix_number(lexer: &mut Lexer<'_>, digits: &CharFilter) -> TT {
  // Past the `0x`/`0b`/`0o` prefix.
  lexer.advance(2);
  lexer.consume(lexer.run_of(digits));
  if !lexer.consume(lexer.match_char('n')).is_empty() {
    return TT::BigIntLit;
  }
  TT::NumberLit
}

fn lex_private_name(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // The `#` is part of the token.
  lexer.advance(1);
  let starter = lexer.need_char(0)?;
  if !ID_START.has(starter) {
    return Ok(TT::Invalid);
  };
  lexer.advance(starter.len_utf8());
  loop {
    lexer.consume(lexer.run_of(&ID_CONTINUE));
    match lexer.char_at(0) {
      Some(c) if !c.is_ascii() => lexer.advance(c.len_utf8()),
      _ => break,
    }
  }
  Ok(TT::PrivateName)
}

fn lex_regex(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // Past the opening slash.
  lexer.advance(1);
  let mut in_charset = false;
  loop {
    // Only \n and \r are treated as terminators here, not the Unicode ones.
    match lexer.take_char()? {
      '\\' => {
        // A line terminator cannot be escaped.
        let escaped = lexer.need_char(0)?;
        if escaped == '\n' {
          return Ok(TT::Invalid);
        };
        lexer.advance(escaped.len_utf8());
      }
      '/' if !in_charset => break,
      '[' => in_charset = true,
      ']' if in_charset => in_charset = false,
      '\n' => return Ok(TT::Invalid),
      _ => {}
    };
  }
  // Flags.
  lexer.consume(lexer.run_of(&ID_CONTINUE));
  Ok(TT::RegexLit)
}

fn lex_string(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  let quote = lexer.need_char(0)?;
  lexer.advance(quote.len_utf8());
  let mut invalid = false;
  loop {
    lexer.consume(lexer.run_until4('\\', '\r', quote, '\n'));
    if let Ok(c) = lexer.need_char(0) {
      if c == '\n' || c == '\u{2028}' || c == '\u{2029}' {
        // A bare line terminator is not allowed in a string literal.
        invalid = true;
        lexer.advance(c.len_utf8());
        continue;
      }
    }
    match lexer.need_char(0)? {
      '\\' => {
        lexer.advance(1);
        if let Ok(next_char) = lexer.need_char(0) {
          match next_char {
            '\r' => {
              // Line continuation; a following \n belongs to it (CRLF).
              lexer.advance(1);
              if lexer.char_at(0) == Some('\n') {
                lexer.advance(1);
              }
            }
            _ => {
              // Line continuation or ordinary escape.
              lexer.advance(next_char.len_utf8());
            }
          }
        }
      }
      '\r' => {
        invalid = true;
        lexer.advance(1);
        if lexer.char_at(0) == Some('\n') {
          lexer.advance(1);
        }
      }
      c if c == quote => {
        lexer.advance(c.len_utf8());
        break;
      }
      _ => unreachable!(),
    };
  }
  if invalid {
    Ok(TT::Invalid)
  } else {
    Ok(TT::StringLit)
  }
}

/// A chunk ends at `${` (more template follows) or the closing backtick.
fn lex_template_continue(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  let mut ended = false;
  loop {
    lexer.consume(lexer.run_until3('\\', '`', '$'));
    match lexer.need_char(0)? {
      '\\' => {
        lexer.advance(1);
        if let Ok(next_char) = lexer.need_char(0) {
          lexer.advance(next_char.len_utf8());
        }
      }
      '`' => {
        ended = true;
        lexer.advance(1);
        break;
      }
      '$' => {
        if lexer.need_char(1)? == '{' {
          lexer.advance(2);
          break;
        } else {
          lexer.advance(1);
        }
      }
      _ => unreachable!(),
    };
  }
  Ok(if ended {
    TT::TemplateChunkEnd
  } else {
    TT::TemplateChunk
  })
}

fn lex_template(lexer: &mut Lexer<'_>) -> LexResult<TT> {
  // Past the opening backtick.
  lexer.advance(1);
  lex_template_continue(lexer)
}

pub fn lex_next(lexer: &mut Lexer<'_>, mode: LexMode) -> Token {
  if mode == LexMode::TemplateStrContinue {
    return lexer.lex_with(false, lex_template_continue);
  };

  // Skip whitespace and comments; remember any line terminator for ASI.
  let mut preceded_by_line_terminator = false;
  while let Ok((tt, run)) = TRIVIA.find(lexer) {
    match tt {
      TT::Newline => {
        lexer.consume(run);
        preceded_by_line_terminator = true;
      }
      TT::Whitespace => {
        lexer.consume(run);
      }
      TT::BlockComment => {
        preceded_by_line_terminator |= lex_block_comment(lexer);
      }
      TT::LineComment => {
        // Always ends at a line terminator.
        preceded_by_line_terminator = true;
        lex_line_comment(lexer);
      }
      _ => unreachable!(),
    };
  }

  // EOF must not come out as Invalid.
  if lexer.at_end() {
    return Token {
      loc: Loc(lexer.end(), lexer.end()),
      typ: TT::EOF,
      preceded_by_line_terminator,
    };
  };

  lexer.lex_with(preceded_by_line_terminator, |lexer| {
    // A non-ASCII character matches no pattern; it can only start an
    // identifier.
    if let Some(c) = lexer.char_at(0) {
      if !c.is_ascii() {
        return Ok(lex_identifier(lexer));
      }
    }

    TOKEN_START.find(lexer).and_then(|(tt, mut run)| match tt {
      TT::Identifier => Ok(lex_identifier(lexer)),
      TT::NumberLit => lex_decimal_number(lexer),
      TT::BinNumber => Ok(lex_radix_number(lexer, &DIGIT_BIN)),
      TT::HexNumber => Ok(lex_radix_number(lexer, &DIGIT_HEX)),
      TT::OctNumber => Ok(lex_radix_number(lexer, &DIGIT_OCT)),
      TT::StringLit => lex_string(lexer),
      TT::TemplateChunk => lex_template(lexer),
      TT::PrivateName => lex_private_name(lexer),
      TT::Slash | TT::SlashEq if mode == LexMode::SlashIsRegex => lex_regex(lexer),
      typ => {
        if typ == TT::Question && run.len() != 1 {
          // The scanner matched `?.<digit>`; only the `?` is the token.
          run = run.prefix(1);
        };
        lexer.consume(run);
        Ok(typ)
      }
    })
  })
}
