//! Expression parsing.
//!
//! Expressions are parsed by a descent cascade from lowest to highest
//! precedence; every binary tier is left-associative except the pipe,
//! which recurses to the right.
//!
//! # Operator Precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `\|>` | Right |
//! | 2 | `=` (statement-like assignment) | - |
//! | 3 | `&&`, `\|\|` (one shared tier) | Left |
//! | 4 | `==`, `!=` | Left |
//! | 5 | `<`, `<=`, `>`, `>=` | Left |
//! | 6 | `+`, `-` | Left |
//! | 7 | `*`, `/` | Left |
//! | 8 | prefix `-`, `!` | - |
//!
//! A parenthesised primary is either a grouped expression or a lambda;
//! the two are distinguished by bounded lookahead that consumes nothing.

use crate::{
    AssignExpr, BinOp, BinaryExpr, CallExpr, Expr, LambdaExpr, ParseError, Parser, PipeExpr,
    UnOp, UnaryExpr,
};
use rillc_lex::Token;

impl Parser {
    /// Main expression entry point.
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_pipe_expr()
    }

    /// `pipe := assign ('|>' pipe)?` - right-associative.
    fn parse_pipe_expr(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_assign_expr()?;
        if self.eat(Token::Pipe) {
            let right = self.parse_pipe_expr()?;
            return Ok(Expr::Pipe(PipeExpr {
                left: Box::new(left),
                right: Box::new(right),
            }));
        }
        Ok(left)
    }

    /// `assign := ID '=' logical | logical`
    ///
    /// Recognised only when the current token is an identifier and the
    /// next is `=`; otherwise falls through to the logical tier.
    fn parse_assign_expr(&mut self) -> Result<Expr, ParseError> {
        if self.at_ident(0) && self.peek(1) == Token::Assign {
            let name = self.expect_ident()?;
            self.expect(Token::Assign)?;
            let value = self.parse_logic_expr()?;
            return Ok(Expr::Assign(AssignExpr {
                name,
                value: Box::new(value),
            }));
        }
        self.parse_logic_expr()
    }

    /// `logical := equality (('&&'|'||') equality)*`
    ///
    /// `&&` and `||` share a single tier; mixing them associates left
    /// with no inner precedence.
    fn parse_logic_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality_expr()?;
        loop {
            let op = match self.peek(0) {
                Token::AndAnd => BinOp::And,
                Token::OrOr => BinOp::Or,
                _ => break,
            };
            self.advance();
            let right = self.parse_equality_expr()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// `equality := relational (('=='|'!=') relational)*`
    fn parse_equality_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_rel_expr()?;
        loop {
            let op = match self.peek(0) {
                Token::EqEq => BinOp::Eq,
                Token::NotEq => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_rel_expr()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// `relational := additive (('<'|'>'|'<='|'>=') additive)*`
    fn parse_rel_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_add_expr()?;
        loop {
            let op = match self.peek(0) {
                Token::Lt => BinOp::Lt,
                Token::Gt => BinOp::Gt,
                Token::LtEq => BinOp::Le,
                Token::GtEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_add_expr()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// `additive := mul (('+'|'-') mul)*`
    fn parse_add_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_mul_expr()?;
        loop {
            let op = match self.peek(0) {
                Token::Plus => BinOp::Add,
                Token::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul_expr()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// `mul := unary (('*'|'/') unary)*`
    fn parse_mul_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expr()?;
        loop {
            let op = match self.peek(0) {
                Token::Star => BinOp::Mul,
                Token::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary_expr()?;
            left = Expr::Binary(BinaryExpr {
                left: Box::new(left),
                op,
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// `unary := ('-'|'!') unary | primary`
    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek(0) {
            Token::Minus => UnOp::Neg,
            Token::Not => UnOp::Not,
            _ => return self.parse_primary(),
        };
        self.advance();
        let operand = self.parse_unary_expr()?;
        Ok(Expr::Unary(UnaryExpr {
            op,
            operand: Box::new(operand),
        }))
    }

    /// `primary := INTEGER | ID call? | '(' expr ')' | lambda`
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek(0) {
            Token::Integer(value) => {
                self.advance();
                Ok(Expr::Literal(value))
            }

            Token::Ident(name) => {
                if self.peek(1) == Token::LParen {
                    self.parse_call()
                } else {
                    self.advance();
                    Ok(Expr::Variable(name))
                }
            }

            Token::LParen => {
                if self.is_lambda_ahead() {
                    self.parse_lambda()
                } else {
                    self.expect(Token::LParen)?;
                    let expr = self.parse_expr()?;
                    self.expect(Token::RParen)?;
                    Ok(expr)
                }
            }

            found => {
                let span = self.peek_span();
                Err(ParseError::UnexpectedExprToken {
                    found: found.to_string(),
                    line: span.line,
                    column: span.column,
                })
            }
        }
    }

    /// Bounded lookahead from a `(` to decide lambda vs grouping.
    ///
    /// The sequence is a lambda iff the parentheses enclose an empty list
    /// or a comma-separated list of bare identifiers and the matching `)`
    /// is immediately followed by `=>`. Consumes nothing.
    fn is_lambda_ahead(&self) -> bool {
        // () => expr
        if self.peek(1) == Token::RParen {
            return self.peek(2) == Token::FatArrow;
        }

        // (a, b, …) => expr
        if !self.at_ident(1) {
            return false;
        }
        let mut offset = 2;
        loop {
            match self.peek(offset) {
                Token::RParen => return self.peek(offset + 1) == Token::FatArrow,
                Token::Comma => {
                    if !self.at_ident(offset + 1) {
                        return false;
                    }
                    offset += 2;
                }
                _ => return false,
            }
        }
    }

    /// `lambda := '(' params ')' '=>' expr`
    fn parse_lambda(&mut self) -> Result<Expr, ParseError> {
        self.expect(Token::LParen)?;
        let params = self.parse_params()?;
        self.expect(Token::RParen)?;
        self.expect(Token::FatArrow)?;
        let body = self.parse_expr()?;
        Ok(Expr::Lambda(LambdaExpr {
            params,
            body: Box::new(body),
        }))
    }

    /// `call := ID '(' args ')'`
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let callee = self.expect_ident()?;
        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !self.check(Token::RParen) {
            args.push(self.parse_expr()?);
            while self.eat(Token::Comma) {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(Token::RParen)?;
        Ok(Expr::Call(CallExpr { callee, args }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rillc_lex::tokenize;

    /// Helper to parse a single expression
    fn parse_expr_source(source: &str) -> Result<Expr, ParseError> {
        let mut parser = Parser::new(tokenize(source).unwrap());
        parser.parse_expr()
    }

    /// Helper to check expression type
    fn assert_is_binary(expr: &Expr, op: BinOp) {
        match expr {
            Expr::Binary(b) => assert_eq!(b.op, op, "expected operator {:?}", op),
            _ => panic!("expected Binary expression, got {:?}", expr),
        }
    }

    fn assert_is_unary(expr: &Expr, op: UnOp) {
        match expr {
            Expr::Unary(u) => assert_eq!(u.op, op, "expected unary operator {:?}", op),
            _ => panic!("expected Unary expression, got {:?}", expr),
        }
    }

    // =========================================================================
    // PRIMARY TESTS
    // =========================================================================

    #[test]
    fn test_parse_int_literal() {
        let expr = parse_expr_source("42").unwrap();
        assert_eq!(expr, Expr::Literal(42));
    }

    #[test]
    fn test_parse_variable() {
        let expr = parse_expr_source("counter").unwrap();
        match expr {
            Expr::Variable(name) => assert_eq!(name.as_str(), "counter"),
            other => panic!("expected Variable, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_grouped_expression() {
        // Grouping adds no node; "(x)" is just the variable
        let expr = parse_expr_source("(x)").unwrap();
        assert!(matches!(expr, Expr::Variable(_)));
    }

    // =========================================================================
    // UNARY OPERATOR TESTS
    // =========================================================================

    #[test]
    fn test_parse_unary_negation() {
        let expr = parse_expr_source("-x").unwrap();
        assert_is_unary(&expr, UnOp::Neg);
    }

    #[test]
    fn test_parse_unary_not() {
        let expr = parse_expr_source("!flag").unwrap();
        assert_is_unary(&expr, UnOp::Not);
    }

    #[test]
    fn test_parse_negative_literal() {
        // No negative literals in the lexer; "-5" is Unary(Neg, 5)
        let expr = parse_expr_source("-5").unwrap();
        match expr {
            Expr::Unary(u) => {
                assert_eq!(u.op, UnOp::Neg);
                assert_eq!(*u.operand, Expr::Literal(5));
            }
            other => panic!("expected Unary, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chained_unary() {
        // Should parse as -(!x)
        let expr = parse_expr_source("-!x").unwrap();
        assert_is_unary(&expr, UnOp::Neg);
        if let Expr::Unary(u) = &expr {
            assert_is_unary(&u.operand, UnOp::Not);
        }
    }

    #[test]
    fn test_unary_binds_tighter_than_mul() {
        // -x * y should parse as (-x) * y
        let expr = parse_expr_source("-x * y").unwrap();
        assert_is_binary(&expr, BinOp::Mul);
        if let Expr::Binary(b) = &expr {
            assert_is_unary(&b.left, UnOp::Neg);
        }
    }

    // =========================================================================
    // BINARY OPERATOR PRECEDENCE TESTS
    // =========================================================================

    #[test]
    fn test_precedence_mul_add() {
        // a + b * c should parse as a + (b * c)
        let expr = parse_expr_source("a + b * c").unwrap();
        assert_is_binary(&expr, BinOp::Add);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.right, BinOp::Mul);
        }
    }

    #[test]
    fn test_precedence_multiple_levels() {
        // a + b * c - d / e should parse as (a + (b * c)) - (d / e)
        let expr = parse_expr_source("a + b * c - d / e").unwrap();
        assert_is_binary(&expr, BinOp::Sub);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::Add);
            assert_is_binary(&b.right, BinOp::Div);
        }
    }

    #[test]
    fn test_precedence_equality_over_relational() {
        // a == b < c should parse as a == (b < c)
        let expr = parse_expr_source("a == b < c").unwrap();
        assert_is_binary(&expr, BinOp::Eq);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.right, BinOp::Lt);
        }
    }

    #[test]
    fn test_precedence_logical_lowest() {
        // a && b == c || d: one logical tier, left-assoc
        // parses as (a && (b == c)) || d
        let expr = parse_expr_source("a && b == c || d").unwrap();
        assert_is_binary(&expr, BinOp::Or);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::And);
        }
    }

    #[test]
    fn test_precedence_relational_over_additive() {
        // a + b < c - d should parse as (a + b) < (c - d)
        let expr = parse_expr_source("a + b < c - d").unwrap();
        assert_is_binary(&expr, BinOp::Lt);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::Add);
            assert_is_binary(&b.right, BinOp::Sub);
        }
    }

    #[test]
    fn test_parens_override_precedence() {
        // (a + b) * c keeps the addition on the left
        let expr = parse_expr_source("(a + b) * c").unwrap();
        assert_is_binary(&expr, BinOp::Mul);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::Add);
        }
    }

    // =========================================================================
    // ASSOCIATIVITY TESTS
    // =========================================================================

    #[test]
    fn test_associativity_subtraction() {
        // a - b - c should parse as (a - b) - c (left-associative)
        let expr = parse_expr_source("a - b - c").unwrap();
        assert_is_binary(&expr, BinOp::Sub);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::Sub);
        }
    }

    #[test]
    fn test_associativity_division() {
        // a / b / c should parse as (a / b) / c
        let expr = parse_expr_source("a / b / c").unwrap();
        assert_is_binary(&expr, BinOp::Div);
        if let Expr::Binary(b) = &expr {
            assert_is_binary(&b.left, BinOp::Div);
        }
    }

    #[test]
    fn test_associativity_pipe_right() {
        // a |> b |> c should parse as Pipe(a, Pipe(b, c))
        let expr = parse_expr_source("a |> b |> c").unwrap();
        match expr {
            Expr::Pipe(outer) => {
                assert!(matches!(*outer.left, Expr::Variable(_)));
                assert!(matches!(*outer.right, Expr::Pipe(_)));
            }
            other => panic!("expected Pipe, got {:?}", other),
        }
    }

    // =========================================================================
    // ASSIGNMENT TESTS
    // =========================================================================

    #[test]
    fn test_parse_assignment() {
        let expr = parse_expr_source("x = 1 + 2").unwrap();
        match expr {
            Expr::Assign(assign) => {
                assert_eq!(assign.name.as_str(), "x");
                assert_is_binary(&assign.value, BinOp::Add);
            }
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn test_equality_is_not_assignment() {
        let expr = parse_expr_source("x == 1").unwrap();
        assert_is_binary(&expr, BinOp::Eq);
    }

    #[test]
    fn test_assignment_inside_pipe() {
        // The assign tier sits below the pipe: "x = y |> f" wraps the
        // assignment in the pipe, not the pipe in the assignment
        let expr = parse_expr_source("x = y |> f").unwrap();
        match expr {
            Expr::Pipe(pipe) => assert!(matches!(*pipe.left, Expr::Assign(_))),
            other => panic!("expected Pipe, got {:?}", other),
        }
    }

    // =========================================================================
    // CALL TESTS
    // =========================================================================

    #[test]
    fn test_parse_call_no_args() {
        let expr = parse_expr_source("f()").unwrap();
        match expr {
            Expr::Call(call) => {
                assert_eq!(call.callee.as_str(), "f");
                assert!(call.args.is_empty());
            }
            other => panic!("expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_call_with_args() {
        let expr = parse_expr_source("add(1, 2 + 3)").unwrap();
        match expr {
            Expr::Call(call) => {
                assert_eq!(call.args.len(), 2);
                assert_eq!(call.args[0], Expr::Literal(1));
                assert_is_binary(&call.args[1], BinOp::Add);
            }
            other => panic!("expected Call, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_nested_call() {
        let expr = parse_expr_source("f(g(x))").unwrap();
        match expr {
            Expr::Call(call) => assert!(matches!(call.args[0], Expr::Call(_))),
            other => panic!("expected Call, got {:?}", other),
        }
    }

    // =========================================================================
    // PIPE TESTS
    // =========================================================================

    #[test]
    fn test_parse_pipe_into_variable() {
        let expr = parse_expr_source("x |> f").unwrap();
        match expr {
            Expr::Pipe(pipe) => {
                assert!(matches!(*pipe.left, Expr::Variable(_)));
                assert!(matches!(*pipe.right, Expr::Variable(_)));
            }
            other => panic!("expected Pipe, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_pipe_into_call() {
        let expr = parse_expr_source("x |> f(y)").unwrap();
        match expr {
            Expr::Pipe(pipe) => assert!(matches!(*pipe.right, Expr::Call(_))),
            other => panic!("expected Pipe, got {:?}", other),
        }
    }

    // =========================================================================
    // LAMBDA TESTS
    // =========================================================================

    #[test]
    fn test_parse_lambda_no_params() {
        let expr = parse_expr_source("() => 1").unwrap();
        match expr {
            Expr::Lambda(lambda) => {
                assert!(lambda.params.is_empty());
                assert_eq!(*lambda.body, Expr::Literal(1));
            }
            other => panic!("expected Lambda, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_lambda_one_param() {
        let expr = parse_expr_source("(x) => x + 1").unwrap();
        match expr {
            Expr::Lambda(lambda) => {
                assert_eq!(lambda.params.len(), 1);
                assert_is_binary(&lambda.body, BinOp::Add);
            }
            other => panic!("expected Lambda, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_lambda_multi_params() {
        let expr = parse_expr_source("(a, b, c) => a * b + c").unwrap();
        match expr {
            Expr::Lambda(lambda) => {
                let names: Vec<&str> = lambda.params.iter().map(|p| p.as_str()).collect();
                assert_eq!(names, vec!["a", "b", "c"]);
            }
            other => panic!("expected Lambda, got {:?}", other),
        }
    }

    #[test]
    fn test_lambda_lookahead_rejects_grouping() {
        // "(x)" without "=>" stays a grouped expression
        let expr = parse_expr_source("(x) + 1").unwrap();
        assert_is_binary(&expr, BinOp::Add);
    }

    #[test]
    fn test_lambda_lookahead_rejects_non_ident_params() {
        // "(a, 2)" cannot be a parameter list, so it parses as a grouped
        // expression and fails at the comma
        let err = parse_expr_source("(a, 2) => 1").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_parse_lambda_inside_pipe() {
        // A parenthesised lambda as the pipe RHS
        let expr = parse_expr_source("5 |> ((x) => x + 1)").unwrap();
        match expr {
            Expr::Pipe(pipe) => assert!(matches!(*pipe.right, Expr::Lambda(_))),
            other => panic!("expected Pipe, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_lambda_body_is_full_expr() {
        // The lambda body extends to the whole following expression
        let expr = parse_expr_source("(x) => x |> f").unwrap();
        match expr {
            Expr::Lambda(lambda) => assert!(matches!(*lambda.body, Expr::Pipe(_))),
            other => panic!("expected Lambda, got {:?}", other),
        }
    }

    // =========================================================================
    // ERROR TESTS
    // =========================================================================

    #[test]
    fn test_error_operator_alone() {
        let err = parse_expr_source("*").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedExprToken { .. }));
    }

    #[test]
    fn test_error_trailing_operator() {
        let err = parse_expr_source("1 +").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedExprToken { .. }));
    }

    #[test]
    fn test_error_unclosed_paren() {
        let err = parse_expr_source("(1 + 2").unwrap_err();
        assert_eq!(err, ParseError::UnexpectedEof);
    }
}
