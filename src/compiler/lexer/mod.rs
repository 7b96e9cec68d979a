
pub mod lexer;
pub mod tokens;

use super::CompilerError;

pub type LexerResult<T> = Result<T, CompilerError<LexerError>>;

/// Errors which can be encountered while tokenizing the source text
#[derive(Clone, Debug, PartialEq)]
pub enum LexerError {
    Locked(Option<char>),
    InvalidInteger,
    UnterminatedString,
    UnterminatedComment,
}

impl std::fmt::Display for LexerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use LexerError::*;
        match self {
            Locked(None) => f.write_str("Lexer locked on EOF"),
            Locked(Some(c)) => write!(f, "Lexer locked on {}", c),
            InvalidInteger => f.write_str("Invalid integer, should not contain characters"),
            UnterminatedString => f.write_str("String literal is missing its closing \""),
            UnterminatedComment => f.write_str("Block comment is missing its closing */"),
        }
    }
}
