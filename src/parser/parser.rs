use tracing::trace;

use crate::error::{CompileError, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::ty::ValueType;

use super::{Argument, Declaration, Expr, ShaderDefinition, ShaderPrototype, Stmt};

/// Recursive descent over a single token of lookahead.
#[derive(Debug)]
pub struct Parser {
    lexer: Lexer,
    token: Token,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let token = lexer.next_token()?;
        Ok(Self { lexer, token })
    }

    pub fn parse(&mut self) -> Result<ShaderDefinition> {
        let shader = self.parse_shader()?;
        self.expect(&TokenKind::Eof, "Expected end of input after the shader")?;
        Ok(shader)
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        trace!(token = %next.kind, pos = %next.pos, "lookahead");
        Ok(std::mem::replace(&mut self.token, next))
    }

    fn error<T>(&self, message: &str) -> Result<T> {
        Err(CompileError::Parse {
            message: message.to_string(),
            found: self.token.kind.clone(),
            pos: self.token.pos,
        })
    }

    fn consume(&mut self, kind: &TokenKind) -> Result<bool> {
        if &self.token.kind != kind {
            return Ok(false);
        }
        self.advance()?;
        Ok(true)
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<()> {
        if &self.token.kind != kind {
            return self.error(message);
        }
        self.advance()?;
        Ok(())
    }

    fn expect_ident(&mut self, message: &str) -> Result<String> {
        if let TokenKind::Identifier(name) = &self.token.kind {
            let name = name.clone();
            self.advance()?;
            return Ok(name);
        }
        self.error(message)
    }

    fn expect_number(&mut self, message: &str) -> Result<f64> {
        if let TokenKind::Number(value) = self.token.kind {
            self.advance()?;
            return Ok(value);
        }
        self.error(message)
    }

    /// shader = "surface" prototype body
    fn parse_shader(&mut self) -> Result<ShaderDefinition> {
        self.expect(&TokenKind::Surface, "Expected a surface shader")?;
        let prototype = self.parse_prototype()?;
        let body = self.parse_body()?;
        Ok(ShaderDefinition { prototype, body })
    }

    /// prototype = ident "(" arguments ")"
    fn parse_prototype(&mut self) -> Result<ShaderPrototype> {
        let name = self.expect_ident("Expected shader name")?;
        self.expect(&TokenKind::ParenOpen, "Expected '('")?;
        let arguments = self.parse_arguments()?;
        self.expect(&TokenKind::ParenClose, "Expected ')'")?;
        Ok(ShaderPrototype { name, arguments })
    }

    /// arguments = (argument ("," argument)*)?
    fn parse_arguments(&mut self) -> Result<Vec<Argument>> {
        let mut arguments = vec![];
        if self.token.kind == TokenKind::ParenClose {
            return Ok(arguments);
        }

        arguments.push(self.parse_argument()?);
        while self.consume(&TokenKind::Comma)? {
            arguments.push(self.parse_argument()?);
        }
        if self.token.kind != TokenKind::ParenClose {
            return self.error("Expected ',' or ')' in argument list");
        }
        Ok(arguments)
    }

    /// argument = typename ident ("=" number)?
    fn parse_argument(&mut self) -> Result<Argument> {
        let type_name = self.expect_ident("Expected argument type")?;
        let name = self.expect_ident("Expected argument name")?;

        let ty = ValueType::from_type_name(&type_name);
        if ty == ValueType::Error {
            return Err(CompileError::UnknownType {
                type_name,
                argument: name,
            });
        }

        let default = if self.consume(&TokenKind::Equals)? {
            Some(self.expect_number("Expected a number")?)
        } else {
            None
        };

        Ok(Argument { ty, name, default })
    }

    /// body = "{" stmt* "}"
    fn parse_body(&mut self) -> Result<Vec<Stmt>> {
        self.expect(&TokenKind::BraceOpen, "Expected '{'")?;
        let mut stmts = vec![];
        while !self.consume(&TokenKind::BraceClose)? {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    /// stmt = "normal" ident ";"
    ///      | ident "=" expr ";"
    fn parse_stmt(&mut self) -> Result<Stmt> {
        if self.consume(&TokenKind::Normal)? {
            let name = self.expect_ident("Expected variable name")?;
            self.expect(&TokenKind::Semicolon, "Expected ';'")?;
            return Ok(Stmt::Declaration(Declaration { name }));
        }

        let lhs = self.expect_ident("Expected a declaration or an assignment")?;
        self.expect(&TokenKind::Equals, "Expected '='")?;
        let rhs = self.parse_expr()?;
        self.expect(&TokenKind::Semicolon, "Expected ';'")?;
        Ok(Stmt::Expr(Expr::assignment(Expr::Variable(lhs), rhs)))
    }

    /// expr = primary ("*" primary)*
    fn parse_expr(&mut self) -> Result<Expr> {
        let mut expr = self.parse_primary()?;
        while self.consume(&TokenKind::Star)? {
            let rhs = self.parse_primary()?;
            expr = Expr::multiply(expr, rhs);
        }
        Ok(expr)
    }

    /// primary = num
    ///         | ident ("(" ident? ")")?
    fn parse_primary(&mut self) -> Result<Expr> {
        if let TokenKind::Number(value) = self.token.kind {
            self.advance()?;
            return Ok(Expr::Number(value));
        }

        let name = self.expect_ident("Expected an expression")?;
        if !self.consume(&TokenKind::ParenOpen)? {
            return Ok(Expr::Variable(name));
        }

        let argument = match &self.token.kind {
            TokenKind::Identifier(_) => Some(self.expect_ident("Expected an argument")?),
            _ => None,
        };
        self.expect(&TokenKind::ParenClose, "Expected ')' after call argument")?;
        Ok(Expr::Call {
            callee: name,
            argument,
        })
    }
}
