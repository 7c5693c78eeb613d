//! rillc-par - Recursive-Descent Parser
//!
//! Parses a pre-materialised token vector into the Rill AST. Each grammar
//! non-terminal is a method; expression precedence is a descent cascade
//! from lowest to highest:
//!
//! ```text
//! expr → pipe → assign → logical → equality → relational
//!      → additive → multiplicative → unary → primary
//! ```
//!
//! The parser has arbitrary lookahead via indexed peeks, which the lambda
//! disambiguation in `expr.rs` relies on. There is no panic-mode recovery:
//! the first syntax error aborts the parse.
//!
//! # Example
//!
//! ```
//! use rillc_lex::tokenize;
//! use rillc_par::Parser;
//!
//! let tokens = tokenize("func main() { return 0; }").unwrap();
//! let program = Parser::new(tokens).parse().unwrap();
//! assert_eq!(program.decls.len(), 1);
//! ```

pub mod ast;
mod edge_cases;
pub mod expr;
pub mod stmt;

pub use ast::*;

use rillc_lex::{SpannedToken, Token};
use rillc_util::{Span, Symbol};
use thiserror::Error;

/// Error raised when the token stream does not match the grammar.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A specific token was required and something else was found.
    #[error("expected {expected}, found '{found}' at {line}:{column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: u32,
        column: u32,
    },

    /// The token stream ended inside a construct.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A token that cannot begin a top-level declaration.
    #[error("unexpected token at top level: '{found}' at {line}:{column}")]
    UnexpectedTopLevel {
        found: String,
        line: u32,
        column: u32,
    },

    /// A token that cannot begin an expression.
    #[error("unexpected token in expression: '{found}' at {line}:{column}")]
    UnexpectedExprToken {
        found: String,
        line: u32,
        column: u32,
    },
}

/// The Rill parser.
///
/// Owns the token vector produced by [`rillc_lex::tokenize`] and a cursor
/// index into it. The final token is always `Eof`.
pub struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    /// Creates a parser over a token vector.
    ///
    /// The vector is expected to be terminated by `Token::Eof`, which is
    /// what [`rillc_lex::tokenize`] produces.
    pub fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Parses a whole program: declarations until end of input.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let mut decls = Vec::new();
        while !self.check(Token::Eof) {
            decls.push(self.parse_decl()?);
        }
        Ok(Program { decls })
    }

    /// Parses one top-level declaration.
    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        match self.peek(0) {
            Token::Extern => self.parse_extern_decl().map(Decl::Extern),
            Token::Func => self.parse_func_decl().map(Decl::Function),
            Token::Let => self.parse_var_decl().map(Decl::Var),
            found => Err(ParseError::UnexpectedTopLevel {
                found: found.to_string(),
                line: self.peek_span().line,
                column: self.peek_span().column,
            }),
        }
    }

    /// `extern func NAME ( params ) ;`
    fn parse_extern_decl(&mut self) -> Result<ExternDecl, ParseError> {
        self.expect(Token::Extern)?;
        self.expect(Token::Func)?;
        let name = self.expect_ident()?;
        self.expect(Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(Token::RParen)?;
        self.expect(Token::Semi)?;
        Ok(ExternDecl { name, params })
    }

    /// `func NAME ( params ) { stmts }`
    fn parse_func_decl(&mut self) -> Result<FunctionDecl, ParseError> {
        self.expect(Token::Func)?;
        let name = self.expect_ident()?;
        self.expect(Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(Token::RParen)?;
        let body = self.parse_block()?;
        Ok(FunctionDecl { name, params, body })
    }

    /// `let NAME = expr ;`
    pub(crate) fn parse_var_decl(&mut self) -> Result<VarDecl, ParseError> {
        self.expect(Token::Let)?;
        let name = self.expect_ident()?;
        self.expect(Token::Assign)?;
        let init = self.parse_expr()?;
        self.expect(Token::Semi)?;
        Ok(VarDecl { name, init })
    }

    /// Comma-separated list of bare identifiers, possibly empty.
    ///
    /// Duplicates are allowed here; semantic analysis rejects them.
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Symbol>, ParseError> {
        let mut params = Vec::new();
        if self.at_ident(0) {
            params.push(self.expect_ident()?);
            while self.eat(Token::Comma) {
                params.push(self.expect_ident()?);
            }
        }
        Ok(params)
    }

    // =========================================================================
    // TOKEN CURSOR HELPERS
    // =========================================================================

    /// Returns the token at `offset` positions ahead without consuming.
    ///
    /// Peeks past the end of the vector answer `Eof`.
    pub(crate) fn peek(&self, offset: usize) -> Token {
        self.tokens
            .get(self.pos + offset)
            .map(|st| st.token)
            .unwrap_or(Token::Eof)
    }

    /// Span of the current token.
    pub(crate) fn peek_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .map(|st| st.span)
            .unwrap_or(Span::DUMMY)
    }

    /// True if the current token equals `token`.
    pub(crate) fn check(&self, token: Token) -> bool {
        self.peek(0) == token
    }

    /// True if the token at `offset` is an identifier.
    pub(crate) fn at_ident(&self, offset: usize) -> bool {
        matches!(self.peek(offset), Token::Ident(_))
    }

    /// Consumes and returns the current token.
    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek(0);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Consumes the current token if it equals `token`.
    pub(crate) fn eat(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consumes the current token, requiring it to equal `expected`.
    pub(crate) fn expect(&mut self, expected: Token) -> Result<Token, ParseError> {
        let found = self.peek(0);
        if found == Token::Eof {
            return Err(ParseError::UnexpectedEof);
        }
        if found != expected {
            return Err(self.unexpected(&format!("'{}'", expected)));
        }
        self.pos += 1;
        Ok(found)
    }

    /// Consumes the current token, requiring it to be an identifier.
    pub(crate) fn expect_ident(&mut self) -> Result<Symbol, ParseError> {
        match self.peek(0) {
            Token::Ident(name) => {
                self.pos += 1;
                Ok(name)
            }
            Token::Eof => Err(ParseError::UnexpectedEof),
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// Builds an `UnexpectedToken` error at the current position.
    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        let span = self.peek_span();
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek(0).to_string(),
            line: span.line,
            column: span.column,
        }
    }
}
