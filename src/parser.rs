//! Recursive-descent parser producing a `Program` from the token stream.
//!
//! The parser keeps two tokens of lookahead (`current`, `peek`) plus the
//! previously consumed token. It is fail-fast: the first error aborts the
//! whole program, the error is recorded, and every statement collected so
//! far is discarded. Binary operators have no precedence; a chain groups
//! strictly left to right and parentheses are the only way to regroup.

use std::mem;

use tracing::debug;

use crate::ast::{BinaryOp, Expr, FunctionDef, Program, Stmt};
use crate::error::ParseError;
use crate::tokenizer::{Token, TokenKind, Tokenizer};

pub const NEVER_CLOSED: &str = "'(' was never closed";

type ParseResult<T> = Result<T, ParseError>;

pub struct Parser<'a> {
  tokenizer: Tokenizer<'a>,
  previous: Token,
  current: Token,
  peek: Token,
  /// Open parentheses around the expression being parsed.
  open_parens: usize,
  errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
  pub fn new(mut tokenizer: Tokenizer<'a>) -> Self {
    let current = tokenizer.next_token();
    let peek = tokenizer.next_token();
    Self {
      tokenizer,
      previous: Token::new(TokenKind::Eof, "", 1, 1),
      current,
      peek,
      open_parens: 0,
      errors: Vec::new(),
    }
  }

  pub fn from_source(source: &'a str) -> Self {
    Self::new(Tokenizer::new(source))
  }

  /// Errors recorded by the last `parse_program` call.
  pub fn errors(&self) -> &[ParseError] {
    &self.errors
  }

  /// Parse every statement up to EOF. On error the returned program is empty
  /// and `errors()` holds exactly one entry.
  pub fn parse_program(&mut self) -> Program {
    let mut statements = Vec::new();
    while self.current.kind != TokenKind::Eof {
      match self.parse_statement() {
        Ok(Some(stmt)) => statements.push(stmt),
        Ok(None) => {}
        Err(err) => {
          debug!(%err, "parse aborted");
          self.errors.push(err);
          return Program::default();
        }
      }
    }
    debug!(count = statements.len(), "parsed program");
    Program { statements }
  }

  fn advance(&mut self) {
    let next = self.tokenizer.next_token();
    let current = mem::replace(&mut self.peek, next);
    self.previous = mem::replace(&mut self.current, current);
  }

  /// Statement dispatch. Structural tokens are consumed without a node.
  fn parse_statement(&mut self) -> ParseResult<Option<Stmt>> {
    match self.current.kind {
      TokenKind::Def => self.parse_function_definition().map(Some),
      TokenKind::If => self.parse_if().map(Some),
      TokenKind::While => self.parse_while().map(Some),
      TokenKind::Newline | TokenKind::Indent | TokenKind::Dedent | TokenKind::Else => {
        self.advance();
        Ok(None)
      }
      _ => self.parse_simple_statement().map(Some),
    }
  }

  /// print, return, assignment, or a bare expression, ending the line.
  fn parse_simple_statement(&mut self) -> ParseResult<Stmt> {
    let stmt = match self.current.kind {
      TokenKind::Print => self.parse_print()?,
      TokenKind::Return => {
        self.advance();
        Stmt::Return {
          value: self.parse_expression()?,
        }
      }
      TokenKind::Ident if self.peek.kind == TokenKind::Assign => {
        let name = self.current.literal.clone();
        self.advance();
        self.advance();
        Stmt::Assignment {
          name,
          value: self.parse_expression()?,
        }
      }
      TokenKind::Ident | TokenKind::Int | TokenKind::Str | TokenKind::LParen => {
        Stmt::Expression(self.parse_expression()?)
      }
      _ => return Err(self.unexpected()),
    };
    self.finish_statement()?;
    Ok(stmt)
  }

  /// Simple statements end at a line break, a block end, an inline `else`, or EOF.
  fn finish_statement(&mut self) -> ParseResult<()> {
    match self.current.kind {
      TokenKind::Newline => {
        self.advance();
        Ok(())
      }
      TokenKind::Dedent | TokenKind::Else | TokenKind::Eof => Ok(()),
      _ => Err(self.unexpected()),
    }
  }

  fn parse_function_definition(&mut self) -> ParseResult<Stmt> {
    self.advance();
    if self.current.kind != TokenKind::Ident {
      return Err(self.error("Expected function name after def"));
    }
    let name = self.current.literal.clone();
    self.advance();
    self.expect(TokenKind::LParen, "Expected '(' after function name")?;
    let params = self.parse_parameters()?;
    self.expect(TokenKind::Colon, "Expected ':' after function signature")?;
    let body = self.parse_suite()?;
    Ok(Stmt::FunctionDefinition(FunctionDef { name, params, body }))
  }

  fn parse_parameters(&mut self) -> ParseResult<Vec<String>> {
    let mut params = Vec::new();
    if self.current.kind == TokenKind::RParen {
      self.advance();
      return Ok(params);
    }

    loop {
      if self.current.kind != TokenKind::Ident {
        return Err(self.error("Expected parameter name"));
      }
      params.push(self.current.literal.clone());
      self.advance();
      match self.current.kind {
        TokenKind::Comma => self.advance(),
        TokenKind::RParen => {
          self.advance();
          return Ok(params);
        }
        _ => return Err(self.error("Expected parameter name")),
      }
    }
  }

  fn parse_if(&mut self) -> ParseResult<Stmt> {
    self.advance();
    let condition = self.parse_expression()?;
    self.expect(TokenKind::Colon, "Expected ':' after if condition")?;
    let consequence = self.parse_suite()?;

    let alternative = if self.current.kind == TokenKind::Else {
      self.advance();
      self.expect(TokenKind::Colon, "Expected ':' after else")?;
      Some(self.parse_suite()?)
    } else {
      None
    };

    Ok(Stmt::If {
      condition,
      consequence,
      alternative,
    })
  }

  fn parse_while(&mut self) -> ParseResult<Stmt> {
    self.advance();
    let condition = self.parse_expression()?;
    self.expect(TokenKind::Colon, "Expected ':' after while condition")?;
    let body = self.parse_suite()?;
    Ok(Stmt::While { condition, body })
  }

  /// The body after a `:`, either an indented block or one inline statement.
  fn parse_suite(&mut self) -> ParseResult<Vec<Stmt>> {
    match self.current.kind {
      TokenKind::Newline => {
        while self.current.kind == TokenKind::Newline {
          self.advance();
        }
        self.expect(TokenKind::Indent, "Expected an indented block")?;
        self.parse_block()
      }
      TokenKind::Eof => Err(self.error("Expected an indented block")),
      _ => Ok(vec![self.parse_simple_statement()?]),
    }
  }

  fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
    let mut body = Vec::new();
    while !matches!(self.current.kind, TokenKind::Dedent | TokenKind::Eof) {
      if let Some(stmt) = self.parse_statement()? {
        body.push(stmt);
      }
    }
    if self.current.kind == TokenKind::Dedent {
      self.advance();
    }
    Ok(body)
  }

  fn parse_print(&mut self) -> ParseResult<Stmt> {
    self.advance();
    self.expect(TokenKind::LParen, "Expected '(' after print")?;
    self.open_parens += 1;
    let value = self.parse_expression()?;
    self.open_parens -= 1;
    self.expect(TokenKind::RParen, "Expected ')' after expression")?;
    Ok(Stmt::Print { value })
  }

  /// `primary (op primary)*`, grouped left to right with no precedence.
  fn parse_expression(&mut self) -> ParseResult<Expr> {
    let mut left = self.parse_primary()?;
    while let Some(op) = BinaryOp::from_token(self.current.kind) {
      self.advance();
      let right = self.parse_primary()?;
      left = Expr::binary(left, op, right);
    }
    Ok(left)
  }

  fn parse_primary(&mut self) -> ParseResult<Expr> {
    match self.current.kind {
      TokenKind::LParen => {
        self.advance();
        self.open_parens += 1;
        let expr = self.parse_expression()?;
        self.open_parens -= 1;
        self.close_paren()?;
        Ok(expr)
      }
      TokenKind::Ident if self.peek.kind == TokenKind::LParen => self.parse_call(),
      TokenKind::Ident => {
        let name = self.current.literal.clone();
        self.advance();
        Ok(Expr::Identifier(name))
      }
      TokenKind::Int => {
        let text = self.current.literal.clone();
        self.advance();
        Ok(Expr::IntegerLiteral(text))
      }
      TokenKind::Str => {
        let text = self.current.literal.clone();
        self.advance();
        Ok(Expr::StringLiteral(text))
      }
      TokenKind::Eof => Err(self.error(NEVER_CLOSED)),
      TokenKind::Newline if self.open_parens > 0 => Err(self.error(NEVER_CLOSED)),
      _ => Err(self.unexpected()),
    }
  }

  fn parse_call(&mut self) -> ParseResult<Expr> {
    let name = self.current.literal.clone();
    self.advance();
    self.advance();
    self.open_parens += 1;

    let mut args = Vec::new();
    if self.current.kind != TokenKind::RParen {
      loop {
        args.push(self.parse_expression()?);
        if self.current.kind != TokenKind::Comma {
          break;
        }
        self.advance();
      }
    }

    self.open_parens -= 1;
    self.close_paren()?;
    Ok(Expr::Call { name, args })
  }

  fn close_paren(&mut self) -> ParseResult<()> {
    match self.current.kind {
      TokenKind::RParen => {
        self.advance();
        Ok(())
      }
      TokenKind::Eof | TokenKind::Newline => Err(self.error(NEVER_CLOSED)),
      _ => Err(self.unexpected()),
    }
  }

  fn expect(&mut self, kind: TokenKind, message: &str) -> ParseResult<()> {
    if self.current.kind == kind {
      self.advance();
      Ok(())
    } else {
      Err(self.error(message))
    }
  }

  fn unexpected(&self) -> ParseError {
    let token = &self.current;
    self.error(format!(
      "Unexpected token {} ({})",
      token.kind,
      token.literal.escape_default()
    ))
  }

  /// Errors at EOF are reported on the line of the last real token.
  fn error(&self, message: impl Into<String>) -> ParseError {
    let anchor = if self.current.kind == TokenKind::Eof {
      &self.previous
    } else {
      &self.current
    };
    ParseError::new(anchor.line, anchor.column, message)
  }
}
