//! Main lexer implementation for the Rill language.
//!
//! This module provides the `Lexer` struct which transforms source code
//! into a stream of tokens, and the [`tokenize`] convenience that drains a
//! lexer into the token vector the parser consumes.

use rillc_util::{Span, Symbol};
use thiserror::Error;

use crate::cursor::Cursor;
use crate::token::{keyword_from_ident, SpannedToken, Token};

/// Error raised when the scanner cannot form a token.
///
/// Lexical errors abort the pipeline; there is no recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// A character that starts no token of the language.
    #[error("unexpected character '{ch}' at {line}:{column}")]
    UnexpectedChar { ch: char, line: u32, column: u32 },

    /// A lone `|` or `&`; only the two-character forms exist.
    #[error("lone '{ch}' is not an operator (expected one of {expected}) at {line}:{column}")]
    LoneOperator {
        ch: char,
        expected: &'static str,
        line: u32,
        column: u32,
    },

    /// A digit run that does not fit a 64-bit signed integer.
    #[error("integer literal does not fit in 64 bits at {line}:{column}")]
    IntegerOverflow { line: u32, column: u32 },
}

/// The lexer for Rill source code.
///
/// The lexer maintains a cursor for position tracking and produces one
/// token per [`Lexer::next_token`] call. After each call,
/// [`Lexer::token_span`] reports the source range of the token just
/// produced.
///
/// # Example
///
/// ```
/// use rillc_lex::{Lexer, Token};
///
/// let mut lexer = Lexer::new("let x = 42;");
/// assert_eq!(lexer.next_token().unwrap(), Token::Let);
/// ```
pub struct Lexer<'a> {
    /// Character cursor for traversing source.
    cursor: Cursor<'a>,

    /// Start position of the current token.
    token_start: usize,

    /// Start line of the current token.
    token_start_line: u32,

    /// Start column of the current token.
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token from the source.
    ///
    /// This is the main entry point for tokenization. It skips whitespace,
    /// then dispatches to the appropriate scanner based on the first
    /// character. At end of input it returns `Token::Eof` (repeatedly, if
    /// called again).
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();

        // Record start position of this token
        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        if self.cursor.is_at_end() {
            return Ok(Token::Eof);
        }

        // Dispatch based on first character
        match self.cursor.current_char() {
            // Single-character delimiters
            '(' => {
                self.cursor.advance();
                Ok(Token::LParen)
            }
            ')' => {
                self.cursor.advance();
                Ok(Token::RParen)
            }
            '{' => {
                self.cursor.advance();
                Ok(Token::LBrace)
            }
            '}' => {
                self.cursor.advance();
                Ok(Token::RBrace)
            }
            ',' => {
                self.cursor.advance();
                Ok(Token::Comma)
            }
            ';' => {
                self.cursor.advance();
                Ok(Token::Semi)
            }

            // Single-character operators
            '+' => {
                self.cursor.advance();
                Ok(Token::Plus)
            }
            '-' => {
                self.cursor.advance();
                Ok(Token::Minus)
            }
            '*' => {
                self.cursor.advance();
                Ok(Token::Star)
            }
            '/' => {
                self.cursor.advance();
                Ok(Token::Slash)
            }

            // One- or two-character operators, disambiguated by peek
            '=' => Ok(self.lex_equals()),
            '!' => Ok(self.lex_bang()),
            '<' => Ok(self.lex_less()),
            '>' => Ok(self.lex_greater()),
            '|' => self.lex_pipe(),
            '&' => self.lex_ampersand(),

            // Numbers
            c if c.is_ascii_digit() => self.lex_number(),

            // Identifiers and keywords
            c if c.is_ascii_alphabetic() => Ok(self.lex_identifier()),

            // Unknown character
            c => {
                let err = LexError::UnexpectedChar {
                    ch: c,
                    line: self.cursor.line(),
                    column: self.cursor.column(),
                };
                self.cursor.advance();
                Err(err)
            }
        }
    }

    /// Returns the span of the token most recently produced.
    pub fn token_span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Lex equals, equals-equals, or fat arrow
    fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            Token::EqEq
        } else if self.cursor.eat('>') {
            Token::FatArrow
        } else {
            Token::Assign
        }
    }

    /// Lex bang or not-equals
    fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            Token::NotEq
        } else {
            Token::Not
        }
    }

    /// Lex less or less-equals
    fn lex_less(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            Token::LtEq
        } else {
            Token::Lt
        }
    }

    /// Lex greater or greater-equals
    fn lex_greater(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.eat('=') {
            Token::GtEq
        } else {
            Token::Gt
        }
    }

    /// Lex pipe-arrow or logical or; a lone `|` is an error
    fn lex_pipe(&mut self) -> Result<Token, LexError> {
        match self.cursor.peek_char() {
            '>' => {
                self.cursor.advance();
                self.cursor.advance();
                Ok(Token::Pipe)
            }
            '|' => {
                self.cursor.advance();
                self.cursor.advance();
                Ok(Token::OrOr)
            }
            _ => Err(self.lone_operator('|', "'|>', '||'")),
        }
    }

    /// Lex logical and; a lone `&` is an error
    fn lex_ampersand(&mut self) -> Result<Token, LexError> {
        if self.cursor.peek_char() == '&' {
            self.cursor.advance();
            self.cursor.advance();
            Ok(Token::AndAnd)
        } else {
            Err(self.lone_operator('&', "'&&'"))
        }
    }

    fn lone_operator(&mut self, ch: char, expected: &'static str) -> LexError {
        let err = LexError::LoneOperator {
            ch,
            expected,
            line: self.cursor.line(),
            column: self.cursor.column(),
        };
        self.cursor.advance();
        err
    }

    /// Lex a base-10 integer literal
    ///
    /// No sign prefix: negative literals are built by the parser from
    /// unary minus. Overflowing i64 is a lexical error.
    fn lex_number(&mut self) -> Result<Token, LexError> {
        let mut digits = String::new();
        while self.cursor.current_char().is_ascii_digit() {
            digits.push(self.cursor.current_char());
            self.cursor.advance();
        }

        digits
            .parse::<i64>()
            .map(Token::Integer)
            .map_err(|_| LexError::IntegerOverflow {
                line: self.token_start_line,
                column: self.token_start_column,
            })
    }

    /// Lex an identifier or keyword
    ///
    /// Identifiers start with a letter, followed by letters, digits, or
    /// underscores.
    fn lex_identifier(&mut self) -> Token {
        let mut text = String::new();
        loop {
            let c = self.cursor.current_char();
            if c.is_ascii_alphanumeric() || c == '_' {
                text.push(c);
                self.cursor.advance();
            } else {
                break;
            }
        }

        keyword_from_ident(&text).unwrap_or_else(|| Token::Ident(Symbol::intern(&text)))
    }

    /// Skip whitespace between tokens
    fn skip_whitespace(&mut self) {
        while self.cursor.current_char().is_whitespace() && !self.cursor.is_at_end() {
            self.cursor.advance();
        }
    }
}

/// Make Lexer an iterator over token results
///
/// Iteration ends after `Eof` or the first error.
impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token::Eof) => None,
            other => Some(other),
        }
    }
}

/// Tokenizes an entire source text.
///
/// Drains the lexer to end of input, producing a vector terminated by
/// exactly one `Eof` token. This is the form the parser consumes.
///
/// # Errors
///
/// Returns the first [`LexError`] encountered; no tokens are produced on
/// failure.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        tokens.push(SpannedToken::new(token, lexer.token_span()));
        if token == Token::Eof {
            return Ok(tokens);
        }
    }
}
