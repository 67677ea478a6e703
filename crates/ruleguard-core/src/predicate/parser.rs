//! Recursive descent parser for custom function sources.
//!
//! ```text
//! program   := item? (';' item?)*
//! item      := 'let' IDENT '=' expr
//!            | 'fn' IDENT '(' IDENT ')' '{' expr '}'
//!            | '|' IDENT '|' expr
//!            | expr
//! expr      := or
//! or        := and (('||' | 'or') and)*
//! and       := compare (('&&' | 'and') compare)*
//! compare   := additive (('==' | '!=' | '<' | '<=' | '>' | '>=' | 'in') additive)?
//! additive  := term (('+' | '-') term)*
//! term      := unary (('*' | '/' | '%') unary)*
//! unary     := ('-' | '!' | 'not') unary | primary
//! primary   := NUMBER | STRING | 'true' | 'false' | 'null' | IDENT | IDENT '(' args ')'
//!            | '[' args ']' | '(' expr ')'
//! ```

use regex::Regex;

use super::ast::{BinaryOp, Builtin, Expr, Item, Operand, UnaryOp};
use super::lexer::{syntax_error, tokenize, Token, TokenKind};
use crate::errors::RuleError;

/// Deepest expression nesting accepted.
pub const MAX_DEPTH: usize = 64;

pub fn parse_program(source: &str) -> Result<Vec<Item>, RuleError> {
    let tokens = tokenize(source)?;
    Parser::new(tokens).program()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos].offset
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<(), RuleError> {
        if self.eat(&kind) {
            Ok(())
        } else {
            Err(syntax_error(self.offset(), format!("expected {}", what)))
        }
    }

    fn ident(&mut self, what: &str) -> Result<String, RuleError> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                self.advance();
                Ok(name)
            }
            _ => Err(syntax_error(self.offset(), format!("expected {}", what))),
        }
    }

    fn program(&mut self) -> Result<Vec<Item>, RuleError> {
        let mut items = Vec::new();
        loop {
            while self.eat(&TokenKind::Semicolon) {}
            if self.peek() == &TokenKind::Eof {
                return Ok(items);
            }
            items.push(self.item()?);
            match self.peek() {
                TokenKind::Semicolon | TokenKind::Eof => {}
                _ => return Err(syntax_error(self.offset(), "expected ';' between items")),
            }
        }
    }

    fn item(&mut self) -> Result<Item, RuleError> {
        match self.peek() {
            TokenKind::Let => {
                self.advance();
                let offset = self.offset();
                let name = self.ident("constant name")?;
                self.expect(TokenKind::Assign, "'='")?;
                let value = self.expr()?.expr;
                Ok(Item::Constant {
                    name,
                    value,
                    offset,
                })
            }
            TokenKind::Fn => {
                self.advance();
                let name = self.ident("function name")?;
                self.expect(TokenKind::LParen, "'('")?;
                let param = self.ident("parameter name")?;
                self.expect(TokenKind::RParen, "')' after the single parameter")?;
                self.expect(TokenKind::LBrace, "'{'")?;
                let body = self.expr()?.expr;
                self.expect(TokenKind::RBrace, "'}'")?;
                Ok(Item::Function {
                    name: Some(name),
                    param,
                    body,
                })
            }
            TokenKind::Pipe => {
                self.advance();
                let param = self.ident("parameter name")?;
                self.expect(TokenKind::Pipe, "'|' after the single parameter")?;
                let body = self.expr()?.expr;
                Ok(Item::Function {
                    name: None,
                    param,
                    body,
                })
            }
            _ => Ok(Item::Statement(self.expr()?.expr)),
        }
    }

    fn expr(&mut self) -> Result<Node, RuleError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(syntax_error(self.offset(), "expression nested too deeply"));
        }
        let expr = self.or();
        self.depth -= 1;
        expr
    }

    // Operator chains fold to the left, so the tree height is checked on every
    // fold as well as on every nested call.
    fn binary(&self, op: BinaryOp, left: Node, right: Node) -> Result<Node, RuleError> {
        let height = left.height.max(right.height) + 1;
        if height > MAX_DEPTH {
            return Err(syntax_error(self.offset(), "expression nested too deeply"));
        }
        Ok(Node {
            expr: Expr::Binary(op, Box::new(left.expr), Box::new(right.expr)),
            height,
        })
    }

    fn or(&mut self) -> Result<Node, RuleError> {
        let mut left = self.and()?;
        while self.eat(&TokenKind::Or) {
            let right = self.and()?;
            left = self.binary(BinaryOp::Or, left, right)?;
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Node, RuleError> {
        let mut left = self.compare()?;
        while self.eat(&TokenKind::And) {
            let right = self.compare()?;
            left = self.binary(BinaryOp::And, left, right)?;
        }
        Ok(left)
    }

    fn compare(&mut self) -> Result<Node, RuleError> {
        let left = self.additive()?;
        let op = match self.peek() {
            TokenKind::Eq => BinaryOp::Eq,
            TokenKind::Ne => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::In => BinaryOp::In,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.additive()?;
        self.binary(op, left, right)
    }

    fn additive(&mut self) -> Result<Node, RuleError> {
        let mut left = self.term()?;
        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.term()?;
            left = self.binary(op, left, right)?;
        }
    }

    fn term(&mut self) -> Result<Node, RuleError> {
        let mut left = self.unary()?;
        loop {
            let op = match self.peek() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => return Ok(left),
            };
            self.advance();
            let right = self.unary()?;
            left = self.binary(op, left, right)?;
        }
    }

    fn unary(&mut self) -> Result<Node, RuleError> {
        let op = match self.peek() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.primary(),
        };
        self.advance();
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(syntax_error(self.offset(), "expression nested too deeply"));
        }
        let operand = self.unary();
        self.depth -= 1;
        let operand = operand?;
        Ok(Node {
            expr: Expr::Unary(op, Box::new(operand.expr)),
            height: operand.height + 1,
        })
    }

    fn primary(&mut self) -> Result<Node, RuleError> {
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Node::leaf(Expr::Literal(Operand::Number(n)))),
            TokenKind::Str(s) => Ok(Node::leaf(Expr::Literal(Operand::Text(s)))),
            TokenKind::True => Ok(Node::leaf(Expr::Literal(Operand::Bool(true)))),
            TokenKind::False => Ok(Node::leaf(Expr::Literal(Operand::Bool(false)))),
            TokenKind::Null => Ok(Node::leaf(Expr::Literal(Operand::Null))),
            TokenKind::LParen => {
                let inner = self.expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => {
                let (items, height) = self.arguments(TokenKind::RBracket, "']'")?;
                Ok(Node {
                    expr: Expr::List(items),
                    height: height + 1,
                })
            }
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    let (args, height) = self.arguments(TokenKind::RParen, "')'")?;
                    Ok(Node {
                        expr: call(name, args, token.offset)?,
                        height: height + 1,
                    })
                } else {
                    Ok(Node::leaf(Expr::Name {
                        name,
                        offset: token.offset,
                    }))
                }
            }
            TokenKind::Eof => Err(syntax_error(token.offset, "unexpected end of input")),
            other => Err(syntax_error(
                token.offset,
                format!("unexpected token {:?}", other),
            )),
        }
    }

    // Returns the arguments and the height of the tallest one.
    fn arguments(
        &mut self,
        close: TokenKind,
        what: &str,
    ) -> Result<(Vec<Expr>, usize), RuleError> {
        let mut args = Vec::new();
        let mut height = 0;
        if self.eat(&close) {
            return Ok((args, height));
        }
        loop {
            let arg = self.expr()?;
            height = height.max(arg.height);
            args.push(arg.expr);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(close.clone(), what)?;
            if height >= MAX_DEPTH {
                return Err(syntax_error(self.offset(), "expression nested too deeply"));
            }
            return Ok((args, height));
        }
    }
}

/// An expression with the height of its tree.
struct Node {
    expr: Expr,
    height: usize,
}

impl Node {
    fn leaf(expr: Expr) -> Self {
        Self { expr, height: 1 }
    }
}
