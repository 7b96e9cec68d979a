use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::compiler::ast::*;
use crate::compiler::lexer::tokens::{Lex, Token};
use crate::compiler::CompilerError;
use crate::diagnostics::config::TracingConfig;

use super::statement::{block, statement};
use super::tokenstream::TokenStream;
use super::{ParserError, ParserResult};

/*
    Grammar
    TYPE := (int | void) *
    PARAM := TYPE [IDENTIFIER]
    PARAMS := LPAREN [void | PARAM [, PARAM]*] RPAREN
    PROTOTYPE := TYPE IDENTIFIER PARAMS SEMICOLON
    FUNCTION := TYPE IDENTIFIER PARAMS LBRACE STATEMENT* RBRACE
    DECLARATOR := IDENTIFIER [LBRACKET EXPRESSION RBRACKET]* [= EXPRESSION]
    DECLARATION := TYPE DECLARATOR [, DECLARATOR]* SEMICOLON
    BLOCK := LBRACE STATEMENT* RBRACE
    IF := if LPAREN EXPRESSION RPAREN BLOCK [else BLOCK]
    WHILE := while LPAREN EXPRESSION RPAREN BLOCK
    RETURN := return [EXPRESSION] SEMICOLON
    STATEMENT := DECLARATION | IF | WHILE | RETURN | EXPRESSION SEMICOLON
    PROGRAM := [PROTOTYPE | FUNCTION | STATEMENT]*

    tokenize - takes a string of text and converts it to a string of tokens
    parse - takes a string of tokens and converts it into an AST
    translate - takes an AST and converts it to assembly
*/

static ENABLE_TRACING: AtomicBool = AtomicBool::new(false);
static TRACE_START: AtomicUsize = AtomicUsize::new(0);
static TRACE_END: AtomicUsize = AtomicUsize::new(0);

pub fn set_tracing(config: TracingConfig) {
    let (enable, start, end) = match config {
        TracingConfig::All => (true, 0, 0),
        TracingConfig::After(start) => (true, start, 0),
        TracingConfig::Before(end) => (true, 0, end),
        TracingConfig::Between(start, end) => (true, start, end),
        TracingConfig::Only(line) => (true, line, line),
        TracingConfig::Off => (false, 0, 0),
    };
    ENABLE_TRACING.store(enable, Ordering::SeqCst);
    TRACE_START.store(start, Ordering::SeqCst);
    TRACE_END.store(end, Ordering::SeqCst);
}

pub(super) fn tracing_includes(line: u32) -> bool {
    if !ENABLE_TRACING.load(Ordering::SeqCst) {
        return false;
    }

    let line = line as usize;
    let start = TRACE_START.load(Ordering::SeqCst);
    let end = TRACE_END.load(Ordering::SeqCst);
    (start == 0 || start <= line) && (end == 0 || line <= end)
}

pub fn parse(tokens: &Vec<Token>) -> Result<Program, CompilerError<ParserError>> {
    let mut stream = TokenStream::new(tokens);
    program(&mut stream)
}

fn program(stream: &mut TokenStream) -> Result<Program, CompilerError<ParserError>> {
    trace!(stream);
    let mut items = vec![];

    while stream.peek().is_some() {
        let start_index = stream.index();

        if let Some(item) = item(stream)? {
            items.push(item);
        }

        if stream.index() == start_index {
            return Err(CompilerError::new(
                stream.line(),
                ParserError::Locked(stream.peek().cloned()),
            ));
        }
    }

    Ok(Program { items })
}

fn item(stream: &mut TokenStream) -> ParserResult<Item> {
    trace!(stream);
    match function(stream)? {
        Some(f) => Ok(Some(f)),
        None => Ok(statement(stream, false)?.map(Item::Statement)),
    }
}

/// Parses a function prototype or definition.  If the tokens under the cursor
/// are not the start of a function then the stream is left unchanged.
fn function(stream: &mut TokenStream) -> ParserResult<Item> {
    trace!(stream);
    let start = stream.index();
    let ret_ty = match return_type(stream)? {
        Some(ty) => ty,
        None => return Ok(None),
    };

    let (line, name) = match stream.next_if_id() {
        Some(id) if stream.test_if(&Lex::LParen) => id,
        _ => {
            stream.set_index(start);
            return Ok(None);
        }
    };

    let params = fn_params(stream)?;
    let decl = FunctionDecl {
        line,
        name,
        ret_ty,
        params,
    };

    if stream.next_if(&Lex::Semicolon).is_some() {
        return Ok(Some(Item::Prototype(decl)));
    }

    if let Some(p) = decl.params.iter().find(|p| p.name.is_none()) {
        return Err(CompilerError::new(
            p.line,
            ParserError::UnnamedParameter(decl.name.clone()),
        ));
    }

    stream.next_must_be(&Lex::LBrace)?;
    let body = block(stream, true)?;
    let close = stream.next_must_be(&Lex::RBrace)?;

    if decl.ret_ty.is_some() {
        match body.last() {
            Some(Statement::Return(_, Some(_))) => (),
            _ => {
                return Err(CompilerError::new(
                    close.l,
                    ParserError::FnExpectedReturn(decl.name.clone()),
                ))
            }
        }
    }

    Ok(Some(Item::Function(decl, body)))
}

fn fn_params(stream: &mut TokenStream) -> Result<Vec<Parameter>, CompilerError<ParserError>> {
    trace!(stream);
    stream.next_must_be(&Lex::LParen)?;

    // `f(void)` declares a function without parameters
    if stream.test_ifn(vec![Lex::Void, Lex::RParen]) {
        stream.next();
        stream.next();
        return Ok(vec![]);
    }

    let mut params = vec![];
    if stream.next_if(&Lex::RParen).is_some() {
        return Ok(params);
    }

    loop {
        let line = stream.line();
        let ty = variable_type(stream)?.ok_or_else(|| {
            CompilerError::new(
                line,
                ParserError::ExpectedButFound(vec![Lex::Int], stream.peek().map(|t| t.s.clone())),
            )
        })?;
        let name = stream.next_if_id().map(|(_, id)| id);
        params.push(Parameter { line, name, ty });

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

    Ok(params)
}

/// Parses `void`, or `int` followed by any number of `*`.  Returns
/// `Some(None)` for `void`.
fn return_type(stream: &mut TokenStream) -> ParserResult<Option<Type>> {
    trace!(stream);
    if stream.next_if(&Lex::Void).is_some() {
        return Ok(Some(None));
    }

    if stream.next_if(&Lex::Int).is_none() {
        return Ok(None);
    }

    let mut ty = Type::Int;
    while stream.next_if(&Lex::Mul).is_some() {
        ty = ty.pointer_to();
    }

    Ok(Some(Some(ty)))
}

/// Parses the type of a variable or parameter. `void` is rejected.
pub(super) fn variable_type(stream: &mut TokenStream) -> ParserResult<Type> {
    trace!(stream);
    let line = stream.line();
    match return_type(stream)? {
        Some(Some(ty)) => Ok(Some(ty)),
        Some(None) => Err(CompilerError::new(line, ParserError::VoidVariable)),
        None => Ok(None),
    }
}
