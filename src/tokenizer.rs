//! Lexical analysis: turns tab-indented source text into a stream of tokens.
//!
//! Block structure is signalled with `Indent`/`Dedent` tokens computed
//! against a stack of previously seen indentation levels. Lexical problems
//! never abort tokenization; they surface as `Illegal` tokens whose literal
//! explains what went wrong, and the parser decides whether that is fatal.
//! Two-character operators are matched before single-character ones.

use std::fmt;

use tracing::{debug, trace};

/// What a token is: a keyword, operator, literal, or one of the layout
/// markers (`Newline`, `Indent`, `Dedent`) derived from tab indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
  Ident,
  Int,
  Str,

  Assign,
  Plus,
  Minus,
  Asterisk,
  Lt,
  Gt,
  LtEq,
  GtEq,
  Eq,
  NotEq,

  LParen,
  RParen,
  Colon,
  Comma,

  Newline,
  Indent,
  Dedent,

  Def,
  Return,
  If,
  Else,
  While,
  Print,

  Eof,
  Illegal,
}

const KEYWORDS: [(&str, TokenKind); 6] = [
  ("def", TokenKind::Def),
  ("return", TokenKind::Return),
  ("if", TokenKind::If),
  ("else", TokenKind::Else),
  ("while", TokenKind::While),
  ("print", TokenKind::Print),
];

const TWO_CHAR_OPERATORS: [(&str, TokenKind); 4] = [
  ("==", TokenKind::Eq),
  ("!=", TokenKind::NotEq),
  ("<=", TokenKind::LtEq),
  (">=", TokenKind::GtEq),
];

pub const SPACE_INDENT_MESSAGE: &str = "spaces for indentation not allowed, use tabs";
pub const CARRIAGE_RETURN_MESSAGE: &str =
  "Windows line endings (\\r\\n) not allowed, use Unix style (\\n)";
pub const INCONSISTENT_DEDENT_MESSAGE: &str =
  "unindent does not match any outer indentation level";

impl TokenKind {
  /// Classify identifier text as a keyword or a plain identifier.
  pub fn lookup_ident(ident: &str) -> Self {
    KEYWORDS
      .iter()
      .find(|(keyword, _)| *keyword == ident)
      .map_or(TokenKind::Ident, |&(_, kind)| kind)
  }

  /// Name used in diagnostics such as `Unexpected token * (*)`.
  pub fn as_str(self) -> &'static str {
    match self {
      TokenKind::Ident => "IDENT",
      TokenKind::Int => "INT",
      TokenKind::Str => "STRING",
      TokenKind::Assign => "=",
      TokenKind::Plus => "+",
      TokenKind::Minus => "-",
      TokenKind::Asterisk => "*",
      TokenKind::Lt => "<",
      TokenKind::Gt => ">",
      TokenKind::LtEq => "<=",
      TokenKind::GtEq => ">=",
      TokenKind::Eq => "==",
      TokenKind::NotEq => "!=",
      TokenKind::LParen => "(",
      TokenKind::RParen => ")",
      TokenKind::Colon => ":",
      TokenKind::Comma => ",",
      TokenKind::Newline => "NEWLINE",
      TokenKind::Indent => "INDENT",
      TokenKind::Dedent => "DEDENT",
      TokenKind::Def => "DEF",
      TokenKind::Return => "RETURN",
      TokenKind::If => "IF",
      TokenKind::Else => "ELSE",
      TokenKind::While => "WHILE",
      TokenKind::Print => "PRINT",
      TokenKind::Eof => "EOF",
      TokenKind::Illegal => "ILLEGAL",
    }
  }
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A single lexeme with the 1-based position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub literal: String,
  pub line: usize,
  pub column: usize,
}

impl Token {
  pub fn new(kind: TokenKind, literal: impl Into<String>, line: usize, column: usize) -> Self {
    Self {
      kind,
      literal: literal.into(),
      line,
      column,
    }
  }
}

/// Pull-based tokenizer; `next_token` yields exactly one token per call and
/// keeps returning `Eof` once the input is exhausted.
pub struct Tokenizer<'a> {
  input: &'a str,
  pos: usize,
  line: usize,
  column: usize,
  indent_stack: Vec<usize>,
  pending_dedents: usize,
  at_line_start: bool,
}

impl<'a> Tokenizer<'a> {
  pub fn new(input: &'a str) -> Self {
    Self {
      input,
      pos: 0,
      line: 1,
      column: 1,
      indent_stack: vec![0],
      pending_dedents: 0,
      at_line_start: true,
    }
  }

  pub fn next_token(&mut self) -> Token {
    let token = self.scan();
    trace!(
      kind = %token.kind,
      line = token.line,
      column = token.column,
      "token"
    );
    token
  }

  fn scan(&mut self) -> Token {
    if self.pending_dedents > 0 {
      self.pending_dedents -= 1;
      return self.structural(TokenKind::Dedent, "");
    }

    if self.at_line_start {
      self.at_line_start = false;
      if let Some(token) = self.indentation() {
        return token;
      }
    }

    loop {
      self.skip_inline_whitespace();
      let (line, column) = (self.line, self.column);
      let Some(c) = self.peek_char() else {
        return self.end_of_input();
      };

      return match c {
        '#' => {
          self.skip_comment();
          continue;
        }
        '\n' => {
          self.bump();
          self.at_line_start = true;
          Token::new(TokenKind::Newline, "\n", line, column)
        }
        '\r' => {
          self.bump();
          Token::new(TokenKind::Illegal, CARRIAGE_RETURN_MESSAGE, line, column)
        }
        '"' => self.string(),
        c if is_letter(c) => self.identifier(),
        c if c.is_ascii_digit() => self.number(),
        _ => self.operator(),
      };
    }
  }

  /// Measure leading tabs of a fresh logical line and report level changes.
  /// Blank and comment-only lines leave the indentation stack untouched.
  fn indentation(&mut self) -> Option<Token> {
    let line = self.line;
    if self.peek_char() == Some(' ') {
      while matches!(self.peek_char(), Some(' ' | '\t')) {
        self.bump();
      }
      return Some(Token::new(TokenKind::Illegal, SPACE_INDENT_MESSAGE, line, 1));
    }

    let mut level = 0;
    while self.peek_char() == Some('\t') {
      self.bump();
      level += 1;
    }

    if matches!(self.peek_char(), None | Some('\n' | '\r' | '#')) {
      return None;
    }

    let current = self.current_indent();
    if level > current {
      self.indent_stack.push(level);
      return Some(self.structural(TokenKind::Indent, "\t"));
    }

    if level < current {
      let mut popped = 0;
      while self.current_indent() > level {
        self.indent_stack.pop();
        popped += 1;
      }
      if self.current_indent() != level {
        self.indent_stack.push(level);
        return Some(Token::new(
          TokenKind::Illegal,
          INCONSISTENT_DEDENT_MESSAGE,
          line,
          1,
        ));
      }
      self.pending_dedents = popped - 1;
      return Some(self.structural(TokenKind::Dedent, ""));
    }

    None
  }

  /// Close every open indentation level before reporting `Eof`.
  fn end_of_input(&mut self) -> Token {
    if self.indent_stack.len() > 1 {
      self.indent_stack.pop();
      return self.structural(TokenKind::Dedent, "");
    }
    Token::new(TokenKind::Eof, "", self.line, self.column)
  }

  fn string(&mut self) -> Token {
    let (line, column) = (self.line, self.column);
    self.bump();
    let start = self.pos;
    while self.peek_char().is_some_and(|c| c != '"') {
      self.bump();
    }
    let literal = &self.input[start..self.pos];
    // Unterminated strings simply run to the end of input.
    self.bump();
    Token::new(TokenKind::Str, literal, line, column)
  }

  fn identifier(&mut self) -> Token {
    let (line, column) = (self.line, self.column);
    let start = self.pos;
    while self
      .peek_char()
      .is_some_and(|c| is_letter(c) || c.is_ascii_digit())
    {
      self.bump();
    }
    let literal = &self.input[start..self.pos];
    Token::new(TokenKind::lookup_ident(literal), literal, line, column)
  }

  fn number(&mut self) -> Token {
    let (line, column) = (self.line, self.column);
    let start = self.pos;
    while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
      self.bump();
    }
    Token::new(TokenKind::Int, &self.input[start..self.pos], line, column)
  }

  fn operator(&mut self) -> Token {
    let (line, column) = (self.line, self.column);
    let input = self.input;
    let rest = &input[self.pos..];

    if let Some(&(text, kind)) = TWO_CHAR_OPERATORS
      .iter()
      .find(|(text, _)| rest.starts_with(*text))
    {
      self.bump();
      self.bump();
      return Token::new(kind, text, line, column);
    }

    let Some(c) = self.bump() else {
      return self.end_of_input();
    };
    let kind = match c {
      '=' => TokenKind::Assign,
      '+' => TokenKind::Plus,
      '-' => TokenKind::Minus,
      '*' => TokenKind::Asterisk,
      '<' => TokenKind::Lt,
      '>' => TokenKind::Gt,
      '(' => TokenKind::LParen,
      ')' => TokenKind::RParen,
      ':' => TokenKind::Colon,
      ',' => TokenKind::Comma,
      _ => TokenKind::Illegal,
    };
    Token::new(kind, c.to_string(), line, column)
  }

  fn skip_inline_whitespace(&mut self) {
    while matches!(self.peek_char(), Some(' ' | '\t')) {
      self.bump();
    }
  }

  fn skip_comment(&mut self) {
    while self.peek_char().is_some_and(|c| c != '\n') {
      self.bump();
    }
  }

  fn structural(&self, kind: TokenKind, literal: &str) -> Token {
    Token::new(kind, literal, self.line, 1)
  }

  fn current_indent(&self) -> usize {
    self.indent_stack.last().copied().unwrap_or(0)
  }

  fn peek_char(&self) -> Option<char> {
    self.input[self.pos..].chars().next()
  }

  fn bump(&mut self) -> Option<char> {
    let c = self.peek_char()?;
    self.pos += c.len_utf8();
    if c == '\n' {
      self.line += 1;
      self.column = 1;
    } else {
      self.column += 1;
    }
    Some(c)
  }
}

fn is_letter(c: char) -> bool {
  c.is_ascii_alphabetic() || c == '_'
}

/// Lex the whole input into a vector terminated by a single `Eof` token.
pub fn tokenize(input: &str) -> Vec<Token> {
  let mut tokenizer = Tokenizer::new(input);
  let mut tokens = Vec::new();
  loop {
    let token = tokenizer.next_token();
    let done = token.kind == TokenKind::Eof;
    tokens.push(token);
    if done {
      break;
    }
  }
  debug!(count = tokens.len(), "tokenized source");
  tokens
}
