//! Token definitions for the Rill language.

use rillc_util::{Span, Symbol};

/// Token represents a lexical unit in the source code
///
/// Each variant carries any associated data: integer tokens hold their
/// 64-bit value, identifier tokens hold the interned name. The `Display`
/// impl renders the source lexeme, which is what diagnostics print.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token {
    // =========================================================================
    // LITERALS
    // =========================================================================
    /// Integer literal
    ///
    /// Base-10 digits only; negative literals are produced by unary minus
    /// in the parser, never by the lexer.
    Integer(i64),

    /// Identifier (variable name, function name, parameter name)
    Ident(Symbol),

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    /// "let" - Variable binding keyword
    Let,

    /// "func" - Function declaration keyword
    Func,

    /// "extern" - External function declaration keyword
    Extern,

    /// "return" - Function return keyword
    Return,

    /// "if" - Conditional keyword
    If,

    /// "else" - Alternative branch keyword
    Else,

    /// "while" - Loop keyword
    While,

    /// "repeat" - Counted loop keyword
    Repeat,

    // =========================================================================
    // ARITHMETIC OPERATORS
    // =========================================================================
    /// "+" - Addition
    Plus,

    /// "-" - Subtraction or negation
    Minus,

    /// "*" - Multiplication
    Star,

    /// "/" - Division
    Slash,

    // =========================================================================
    // LOGICAL OPERATORS
    // =========================================================================
    /// "&&" - Logical AND
    AndAnd,

    /// "||" - Logical OR
    OrOr,

    /// "!" - Logical NOT
    Not,

    // =========================================================================
    // COMPARISON OPERATORS
    // =========================================================================
    /// "==" - Equality
    EqEq,

    /// "!=" - Inequality
    NotEq,

    /// "<" - Less than
    Lt,

    /// ">" - Greater than
    Gt,

    /// "<=" - Less than or equal
    LtEq,

    /// ">=" - Greater than or equal
    GtEq,

    // =========================================================================
    // STRUCTURAL OPERATORS
    // =========================================================================
    /// "=" - Assignment
    Assign,

    /// "|>" - Pipe composition
    Pipe,

    /// "=>" - Lambda body arrow
    FatArrow,

    // =========================================================================
    // DELIMITERS
    // =========================================================================
    /// "(" - Left parenthesis
    LParen,

    /// ")" - Right parenthesis
    RParen,

    /// "{" - Left brace
    LBrace,

    /// "}" - Right brace
    RBrace,

    /// "," - Comma
    Comma,

    /// ";" - Semicolon
    Semi,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    /// End of file marker
    ///
    /// Signals that the entire input has been processed. The lexer emits
    /// exactly one of these, as the final token.
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Integer(value) => write!(f, "{}", value),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Let => f.write_str("let"),
            Token::Func => f.write_str("func"),
            Token::Extern => f.write_str("extern"),
            Token::Return => f.write_str("return"),
            Token::If => f.write_str("if"),
            Token::Else => f.write_str("else"),
            Token::While => f.write_str("while"),
            Token::Repeat => f.write_str("repeat"),
            Token::Plus => f.write_str("+"),
            Token::Minus => f.write_str("-"),
            Token::Star => f.write_str("*"),
            Token::Slash => f.write_str("/"),
            Token::AndAnd => f.write_str("&&"),
            Token::OrOr => f.write_str("||"),
            Token::Not => f.write_str("!"),
            Token::EqEq => f.write_str("=="),
            Token::NotEq => f.write_str("!="),
            Token::Lt => f.write_str("<"),
            Token::Gt => f.write_str(">"),
            Token::LtEq => f.write_str("<="),
            Token::GtEq => f.write_str(">="),
            Token::Assign => f.write_str("="),
            Token::Pipe => f.write_str("|>"),
            Token::FatArrow => f.write_str("=>"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::LBrace => f.write_str("{"),
            Token::RBrace => f.write_str("}"),
            Token::Comma => f.write_str(","),
            Token::Semi => f.write_str(";"),
            Token::Eof => f.write_str("<eof>"),
        }
    }
}

/// Looks up an identifier in the keyword table.
///
/// Returns the keyword token on a hit, `None` when the text is an
/// ordinary identifier.
pub fn keyword_from_ident(text: &str) -> Option<Token> {
    match text {
        "let" => Some(Token::Let),
        "func" => Some(Token::Func),
        "extern" => Some(Token::Extern),
        "return" => Some(Token::Return),
        "if" => Some(Token::If),
        "else" => Some(Token::Else),
        "while" => Some(Token::While),
        "repeat" => Some(Token::Repeat),
        _ => None,
    }
}

/// Token with span wrapper
///
/// The parser consumes a pre-materialised vector of these, which gives it
/// arbitrary lookahead via indexed peeks.
#[derive(Debug, Clone, Copy)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

impl SpannedToken {
    pub fn new(token: Token, span: Span) -> Self {
        Self { token, span }
    }
}
