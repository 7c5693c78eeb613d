//! Statement parsing.
//!
//! Statements appear only inside function bodies: `let` declarations,
//! `return`, `if`/`else`, `while`, `repeat`, and bare expression
//! statements. Blocks are brace-delimited and introduce no scope of their
//! own (the language is function-flat).

use crate::{Block, IfStmt, ParseError, Parser, RepeatStmt, Stmt, WhileStmt};
use rillc_lex::Token;

impl Parser {
    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(Token::RBrace) && !self.check(Token::Eof) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(Token::RBrace)?;
        Ok(Block { stmts })
    }

    /// Dispatches on the current token to the statement forms.
    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek(0) {
            Token::Let => self.parse_var_decl().map(Stmt::Var),
            Token::Return => {
                self.expect(Token::Return)?;
                let value = self.parse_expr()?;
                self.expect(Token::Semi)?;
                Ok(Stmt::Return(value))
            }
            Token::If => self.parse_if_stmt().map(Stmt::If),
            Token::While => self.parse_while_stmt().map(Stmt::While),
            Token::Repeat => self.parse_repeat_stmt().map(Stmt::Repeat),
            _ => {
                let expr = self.parse_expr()?;
                self.expect(Token::Semi)?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// `if ( expr ) block ( else block )?`
    fn parse_if_stmt(&mut self) -> Result<IfStmt, ParseError> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let then_branch = self.parse_block()?;

        let else_branch = if self.eat(Token::Else) {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(IfStmt {
            cond,
            then_branch,
            else_branch,
        })
    }

    /// `while ( expr ) block`
    fn parse_while_stmt(&mut self) -> Result<WhileStmt, ParseError> {
        self.expect(Token::While)?;
        self.expect(Token::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let body = self.parse_block()?;
        Ok(WhileStmt { cond, body })
    }

    /// `repeat ( expr ) block`
    fn parse_repeat_stmt(&mut self) -> Result<RepeatStmt, ParseError> {
        self.expect(Token::Repeat)?;
        self.expect(Token::LParen)?;
        let count = self.parse_expr()?;
        self.expect(Token::RParen)?;
        let body = self.parse_block()?;
        Ok(RepeatStmt { count, body })
    }
}
