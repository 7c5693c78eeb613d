//! rillc-lex - Lexical Analyzer
//!
//! Transforms Rill source text into a stream of tokens. The scanner is a
//! single pass over an ASCII-clean buffer with one character of lookahead;
//! two-character operators (`==`, `!=`, `<=`, `>=`, `|>`, `||`, `&&`, `=>`)
//! are recognised greedily. There are no comments in the grammar, and a
//! lone `|` or `&` is a hard lexical error.
//!
//! # Example
//!
//! ```
//! use rillc_lex::{tokenize, Token};
//!
//! let tokens = tokenize("let x = 42;").unwrap();
//! assert_eq!(tokens[0].token, Token::Let);
//! assert_eq!(tokens[2].token, Token::Assign);
//! assert_eq!(tokens[3].token, Token::Integer(42));
//! assert_eq!(tokens.last().unwrap().token, Token::Eof);
//! ```

pub mod cursor;
mod edge_cases;
pub mod lexer;
pub mod token;

pub use cursor::Cursor;
pub use lexer::{tokenize, LexError, Lexer};
pub use token::{keyword_from_ident, SpannedToken, Token};
