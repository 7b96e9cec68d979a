use crate::compiler::ast::*;
use crate::compiler::lexer::tokens::Lex;
use crate::compiler::CompilerError;

use super::expression::expression;
use super::parser::variable_type;
use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};

/// Parses statements up to, but not including, the closing `}` or the end of
/// the token stream.
pub(super) fn block(
    stream: &mut TokenStream,
    in_function: bool,
) -> Result<Vec<Statement>, CompilerError<ParserError>> {
    trace!(stream);
    let mut stmts = vec![];
    while stream.peek().is_some() && !stream.test_if(&Lex::RBrace) {
        match statement(stream, in_function)? {
            Some(s) => stmts.push(s),
            None => {
                return Err(CompilerError::new(
                    stream.line(),
                    ParserError::Locked(stream.peek().cloned()),
                ))
            }
        }
    }
    Ok(stmts)
}

fn braced_block(
    stream: &mut TokenStream,
    in_function: bool,
) -> Result<Vec<Statement>, CompilerError<ParserError>> {
    stream.next_must_be(&Lex::LBrace)?;
    let stmts = block(stream, in_function)?;
    stream.next_must_be(&Lex::RBrace)?;
    Ok(stmts)
}

pub(super) fn statement(stream: &mut TokenStream, in_function: bool) -> ParserResult<Statement> {
    trace!(stream);
    if stream.test_if(&Lex::If) {
        if_statement(stream, in_function)
    } else if stream.test_if(&Lex::While) {
        while_statement(stream, in_function)
    } else if stream.test_if(&Lex::Return) {
        return_statement(stream, in_function)
    } else if stream.test_if_one_of(vec![Lex::Int, Lex::Void]) {
        declaration(stream)
    } else {
        expression_statement(stream)
    }
}

fn declaration(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.line();
    let ty = match variable_type(stream)? {
        Some(ty) => ty,
        None => return Ok(None),
    };

    let mut declarators = vec![declarator(stream, Lex::Int)?];
    while stream.next_if(&Lex::Comma).is_some() {
        declarators.push(declarator(stream, Lex::Comma)?);
    }
    stream.next_must_be(&Lex::Semicolon)?;

    Ok(Some(Statement::Declaration(Declaration {
        line,
        ty,
        declarators,
    })))
}

fn declarator(
    stream: &mut TokenStream,
    after: Lex,
) -> Result<Declarator, CompilerError<ParserError>> {
    trace!(stream);
    let (line, name) = stream.next_if_id().ok_or_else(|| {
        CompilerError::new(stream.line(), ParserError::ExpectedIdentifierAfter(after))
    })?;

    let mut dimensions = vec![];
    while let Some(token) = stream.next_if(&Lex::LBracket) {
        let size = expression(stream)?
            .ok_or_else(|| CompilerError::new(token.l, ParserError::ExpectedExprAfter(token.s)))?;
        stream.next_must_be(&Lex::RBracket)?;
        dimensions.push(size);
    }

    let init = match stream.next_if(&Lex::Assign) {
        Some(token) => {
            if !dimensions.is_empty() {
                return Err(CompilerError::new(
                    token.l,
                    ParserError::ArrayInitializer(name),
                ));
            }
            Some(expression(stream)?.ok_or_else(|| {
                CompilerError::new(token.l, ParserError::ExpectedExprAfter(token.s))
            })?)
        }
        None => None,
    };

    Ok(Declarator {
        line,
        name,
        dimensions,
        init,
    })
}

fn condition(stream: &mut TokenStream) -> Result<Expression, CompilerError<ParserError>> {
    let open = stream.next_must_be(&Lex::LParen)?;
    let cond = expression(stream)?
        .ok_or_else(|| CompilerError::new(open.l, ParserError::ExpectedExprAfter(open.s)))?;
    stream.next_must_be(&Lex::RParen)?;
    Ok(cond)
}

fn if_statement(stream: &mut TokenStream, in_function: bool) -> ParserResult<Statement> {
    trace!(stream);
    let token = match stream.next_if(&Lex::If) {
        Some(token) => token,
        None => return Ok(None),
    };

    let cond = condition(stream)?;
    let if_block = braced_block(stream, in_function)?;
    let else_block = match stream.next_if(&Lex::Else) {
        Some(_) => Some(braced_block(stream, in_function)?),
        None => None,
    };

    Ok(Some(Statement::If {
        line: token.l,
        cond,
        if_block,
        else_block,
    }))
}

fn while_statement(stream: &mut TokenStream, in_function: bool) -> ParserResult<Statement> {
    trace!(stream);
    let token = match stream.next_if(&Lex::While) {
        Some(token) => token,
        None => return Ok(None),
    };

    let cond = condition(stream)?;
    let body = braced_block(stream, in_function)?;

    Ok(Some(Statement::While {
        line: token.l,
        cond,
        body,
    }))
}

fn return_statement(stream: &mut TokenStream, in_function: bool) -> ParserResult<Statement> {
    trace!(stream);
    let token = match stream.next_if(&Lex::Return) {
        Some(token) => token,
        None => return Ok(None),
    };

    if !in_function {
        return Err(CompilerError::new(
            token.l,
            ParserError::ReturnOutsideFunction,
        ));
    }

    let value = expression(stream)?;
    stream.next_must_be(&Lex::Semicolon)?;
    Ok(Some(Statement::Return(token.l, value)))
}

fn expression_statement(stream: &mut TokenStream) -> ParserResult<Statement> {
    trace!(stream);
    let line = stream.line();
    match expression(stream)? {
        Some(exp) => {
            stream.next_must_be(&Lex::Semicolon)?;
            Ok(Some(Statement::Expression(line, exp)))
        }
        None => Ok(None),
    }
}
