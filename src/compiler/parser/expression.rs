use crate::compiler::ast::*;
use crate::compiler::lexer::tokens::{Lex, Token};
use crate::compiler::CompilerError;

use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};

impl Expression {
    fn unary_op(op: &Token, operand: Box<Self>) -> ParserResult<Expression> {
        let uop = match op.s {
            Lex::Minus => UnaryOperator::Negate,
            Lex::Not => UnaryOperator::Not,
            Lex::Ampersand => UnaryOperator::AddressOf,
            Lex::Mul => UnaryOperator::Deref,
            _ => {
                return Err(CompilerError::new(
                    op.l,
                    ParserError::NotAUnaryOp(op.s.clone()),
                ))
            }
        };
        Ok(Some(Expression::UnaryOp(op.l, uop, operand)))
    }

    fn binary_op(op: &Token, left: Box<Self>, right: Box<Self>) -> ParserResult<Expression> {
        let bop = match op.s {
            Lex::Add => BinaryOperator::Add,
            Lex::Minus => BinaryOperator::Sub,
            Lex::Mul => BinaryOperator::Mul,
            Lex::Div => BinaryOperator::Div,
            Lex::Mod => BinaryOperator::Mod,
            Lex::BAnd => BinaryOperator::BAnd,
            Lex::BOr => BinaryOperator::BOr,
            Lex::Eq => BinaryOperator::Eq,
            Lex::NEq => BinaryOperator::NEq,
            Lex::Ls => BinaryOperator::Ls,
            Lex::LsEq => BinaryOperator::LsEq,
            Lex::Gr => BinaryOperator::Gr,
            Lex::GrEq => BinaryOperator::GrEq,
            _ => {
                return Err(CompilerError::new(
                    op.l,
                    ParserError::NotABinaryOp(op.s.clone()),
                ))
            }
        };
        Ok(Some(Expression::BinaryOp(op.l, bop, left, right)))
    }
}

fn expected_expr_after(op: &Token) -> CompilerError<ParserError> {
    CompilerError::new(op.l, ParserError::ExpectedExprAfter(op.s.clone()))
}

pub(super) fn expression(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    assignment(stream)
}

/// Assignment is right associative: `a = b = c` assigns `c` to `b` and then
/// the result to `a`.
fn assignment(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let target = match logical_or(stream)? {
        Some(target) => target,
        None => return Ok(None),
    };

    match stream.next_if(&Lex::Assign) {
        Some(op) => {
            let value = assignment(stream)?.ok_or_else(|| expected_expr_after(&op))?;
            Ok(Some(Expression::Assign(
                op.l,
                Box::new(target),
                Box::new(value),
            )))
        }
        None => Ok(Some(target)),
    }
}

fn logical_or(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_op(stream, &vec![Lex::BOr], logical_and)
}

fn logical_and(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_op(stream, &vec![Lex::BAnd], equality)
}

fn equality(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_op(stream, &vec![Lex::Eq, Lex::NEq], comparison)
}

fn comparison(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_op(
        stream,
        &vec![Lex::Ls, Lex::LsEq, Lex::Gr, Lex::GrEq],
        sum,
    )
}

fn sum(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_op(stream, &vec![Lex::Add, Lex::Minus], term)
}

fn term(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    binary_op(stream, &vec![Lex::Mul, Lex::Div, Lex::Mod], unary)
}

/// Parses a left associative chain of the operators in `test`.
fn binary_op(
    stream: &mut TokenStream,
    test: &Vec<Lex>,
    operand: fn(&mut TokenStream) -> ParserResult<Expression>,
) -> ParserResult<Expression> {
    trace!(stream);
    let mut left = match operand(stream)? {
        Some(left) => left,
        None => return Ok(None),
    };

    while let Some(op) = stream.next_if_one_of(test.clone()) {
        let right = operand(stream)?.ok_or_else(|| expected_expr_after(&op))?;
        left = match Expression::binary_op(&op, Box::new(left), Box::new(right))? {
            Some(exp) => exp,
            None => return Err(expected_expr_after(&op)),
        };
    }

    Ok(Some(left))
}

fn unary(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    match stream.next_if_one_of(vec![Lex::Minus, Lex::Not, Lex::Mul, Lex::Ampersand]) {
        Some(op) => {
            let operand = unary(stream)?.ok_or_else(|| expected_expr_after(&op))?;
            Expression::unary_op(&op, Box::new(operand))
        }
        None => index(stream),
    }
}

fn index(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let mut exp = match factor(stream)? {
        Some(exp) => exp,
        None => return Ok(None),
    };

    while let Some(open) = stream.next_if(&Lex::LBracket) {
        let idx = expression(stream)?.ok_or_else(|| expected_expr_after(&open))?;
        stream.next_must_be(&Lex::RBracket)?;
        exp = Expression::Index(open.l, Box::new(exp), Box::new(idx));
    }

    Ok(Some(exp))
}

fn factor(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    if let Some(open) = stream.next_if(&Lex::LParen) {
        let exp = expression(stream)?.ok_or_else(|| expected_expr_after(&open))?;
        stream.next_must_be(&Lex::RParen)?;
        return Ok(Some(exp));
    }

    match builtin_call(stream)? {
        Some(call) => Ok(Some(call)),
        None => match function_call_or_variable(stream)? {
            Some(exp) => Ok(Some(exp)),
            None => constant(stream),
        },
    }
}

fn constant(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    match stream.next_if(&Lex::Integer("".into())) {
        Some(Token {
            l,
            s: Lex::Integer(i),
        }) => Ok(Some(Expression::Integer(l, i))),
        _ => Ok(None),
    }
}

fn function_call_or_variable(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let (line, id) = match stream.next_if_id() {
        Some(id) => id,
        None => return Ok(None),
    };

    if stream.next_if(&Lex::LParen).is_some() {
        let args = arguments(stream)?;
        Ok(Some(Expression::Call(line, id, args)))
    } else {
        Ok(Some(Expression::Identifier(line, id)))
    }
}

/// Parses the arguments of a call up to and including the closing `)`.
fn arguments(stream: &mut TokenStream) -> Result<Vec<Expression>, CompilerError<ParserError>> {
    trace!(stream);
    let mut args = vec![];
    if stream.next_if(&Lex::RParen).is_some() {
        return Ok(args);
    }

    loop {
        let line = stream.line();
        let arg = expression(stream)?.ok_or_else(|| {
            CompilerError::new(
                line,
                ParserError::ExpectedButFound(
                    vec![Lex::RParen],
                    stream.peek().map(|t| t.s.clone()),
                ),
            )
        })?;
        args.push(arg);

        match stream.next_if_one_of(vec![Lex::Comma, Lex::RParen]) {
            Some(Token { s: Lex::Comma, .. }) => (),
            Some(_) => break,
            None => {
                return Err(CompilerError::new(
                    stream.line(),
                    ParserError::ExpectedButFound(
                        vec![Lex::Comma, Lex::RParen],
                        stream.peek().map(|t| t.s.clone()),
                    ),
                ))
            }
        }
    }

    Ok(args)
}

fn builtin_call(stream: &mut TokenStream) -> ParserResult<Expression> {
    trace!(stream);
    let token = match stream.next_if_one_of(vec![Lex::Printf, Lex::Scanf]) {
        Some(token) => token,
        None => return Ok(None),
    };
    let builtin = match token.s {
        Lex::Printf => Builtin::Printf,
        _ => Builtin::Scanf,
    };

    stream.next_must_be(&Lex::LParen)?;
    let format = match stream.next_if(&Lex::StringLiteral("".into())) {
        Some(Token {
            s: Lex::StringLiteral(s),
            ..
        }) => s,
        _ => {
            return Err(CompilerError::new(
                token.l,
                ParserError::ExpectedFormatString(token.s),
            ))
        }
    };

    let args = match stream.next_if(&Lex::Comma) {
        Some(_) => arguments(stream)?,
        None => {
            stream.next_must_be(&Lex::RParen)?;
            vec![]
        }
    };

    Ok(Some(Expression::Builtin(token.l, builtin, format, args)))
}
