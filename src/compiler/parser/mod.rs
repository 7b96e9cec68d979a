/// Prints the name of the parser function being entered along with the
/// token under the cursor, when parser tracing covers that token's line.
macro_rules! trace {
    ($ts:expr) => {
        if $crate::compiler::parser::parser::tracing_includes($ts.line()) {
            println!(
                "{} <- {}",
                stdext::function_name!(),
                $ts.peek().map_or("EOF".to_string(), |t| t.to_string())
            )
        }
    };
}

mod expression;
mod statement;
mod tokenstream;

pub mod parser;

pub use parser::{parse, set_tracing};

use super::lexer::tokens::{Lex, Token};
use super::CompilerError;

pub type ParserResult<T> = Result<Option<T>, CompilerError<ParserError>>;

/// Compiler errors that happen within the Parser stage of compilation.
#[derive(Clone, Debug, PartialEq)]
pub enum ParserError {
    Locked(Option<Token>),
    ExpectedButFound(Vec<Lex>, Option<Lex>),
    ExpectedExprAfter(Lex),
    ExpectedIdentifierAfter(Lex),
    ExpectedFormatString(Lex),
    NotAUnaryOp(Lex),
    NotABinaryOp(Lex),
    FnExpectedReturn(String),
    UnnamedParameter(String),
    VoidVariable,
    ReturnOutsideFunction,
    ArrayInitializer(String),
}

impl std::fmt::Display for ParserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ParserError::*;
        match self {
            Locked(token) => write!(f, "Parser cannot advance past {}", token_to_string(token)),
            ExpectedButFound(expected, actual) => write!(
                f,
                "Expected {}, but found {}",
                expected
                    .iter()
                    .map(|l| l.to_string())
                    .collect::<Vec<_>>()
                    .join(" or "),
                actual.as_ref().map_or("EOF".into(), |l| l.to_string())
            ),
            ExpectedExprAfter(lex) => write!(f, "Expected expression after {}", lex),
            ExpectedIdentifierAfter(lex) => write!(f, "Expected identifier after {}", lex),
            ExpectedFormatString(lex) => write!(f, "Expected format string after {}(", lex),
            NotAUnaryOp(op) => write!(f, "{} is not a unary operator", op),
            NotABinaryOp(op) => write!(f, "{} is not a binary operator", op),
            FnExpectedReturn(name) => write!(
                f,
                "Function {} must end with a return statement that returns a value",
                name
            ),
            UnnamedParameter(name) => {
                write!(f, "Every parameter in the definition of {} must be named", name)
            }
            VoidVariable => f.write_str("Variables and parameters cannot have type void"),
            ReturnOutsideFunction => f.write_str("return can only be used within a function"),
            ArrayInitializer(name) => write!(f, "Array {} cannot have an initializer", name),
        }
    }
}

fn token_to_string(token: &Option<Token>) -> String {
    token
        .as_ref()
        .map_or("EOF".into(), |t| t.to_string())
}
