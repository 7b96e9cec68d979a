/*!
 The compiler takes the text of a program and converts it into 32-bit x86
 assembly in NASM syntax.

 Compilation runs through three stages:
 1. The lexer converts the source text into a sequence of tokens.
 2. The parser converts the tokens into an abstract syntax tree in which every
 node carries the line it came from.
 3. The translator walks the syntax tree and emits assembly.  Semantic checks
 (declarations, types, arity) happen during this walk, at the node that is
 being translated, so translation stops at the first semantic error.

 Every stage reports its errors as a `CompilerError` which carries the line
 on which the error was found.
 */

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantics;
pub mod stringpool;
pub mod translator;
pub mod x86;

pub use error::CompilerError;

use log::debug;

use crate::diagnostics::TracingConfig;

use ast::Program;
use lexer::lexer::Lexer;
use lexer::tokens::Token;
use lexer::LexerError;
use parser::ParserError;
use semantics::TranslationError;
use x86::Assembly;

/// An error from any stage of compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum CompileError {
    Lexer(CompilerError<LexerError>),
    Parser(CompilerError<ParserError>),
    Translation(CompilerError<TranslationError>),
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lexer(e) => write!(f, "Lexer error @ {}", e),
            CompileError::Parser(e) => write!(f, "Parser error @ {}", e),
            CompileError::Translation(e) => write!(f, "Semantic error @ {}", e),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<CompilerError<LexerError>> for CompileError {
    fn from(e: CompilerError<LexerError>) -> Self {
        CompileError::Lexer(e)
    }
}

impl From<CompilerError<ParserError>> for CompileError {
    fn from(e: CompilerError<ParserError>) -> Self {
        CompileError::Parser(e)
    }
}

impl From<CompilerError<TranslationError>> for CompileError {
    fn from(e: CompilerError<TranslationError>) -> Self {
        CompileError::Translation(e)
    }
}

/// Converts source text into tokens, stopping at the first lexer error.
pub fn tokenize(text: &str) -> Result<Vec<Token>, CompilerError<LexerError>> {
    tokenize_with_tracing(text, TracingConfig::Off)
}

pub fn tokenize_with_tracing(
    text: &str,
    tracing: TracingConfig,
) -> Result<Vec<Token>, CompilerError<LexerError>> {
    let mut lexer = Lexer::new(text);
    lexer.set_tracing(tracing);
    let tokens = lexer
        .tokenize()
        .into_iter()
        .collect::<Result<Vec<_>, _>>()?;
    debug!("Lexed {} tokens", tokens.len());
    Ok(tokens)
}

pub fn parse(tokens: &Vec<Token>) -> Result<Program, CompilerError<ParserError>> {
    let program = parser::parse(tokens)?;
    debug!("Parsed {} items", program.items.len());
    Ok(program)
}

pub fn translate(program: &Program) -> Result<Assembly, CompilerError<TranslationError>> {
    translator::translate(program)
}

/// Runs every stage of compilation over `text`.
pub fn compile(text: &str) -> Result<Assembly, CompileError> {
    let tokens = tokenize(text)?;
    let program = parse(&tokens)?;
    Ok(translate(&program)?)
}
