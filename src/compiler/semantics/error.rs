use crate::compiler::ast::{fmt_return, BinaryOperator, Type, UnaryOperator};

/// Errors raised while translating a program to assembly.  Translation stops
/// at the first error.
#[derive(Clone, Debug, PartialEq)]
pub enum TranslationError {
    Redeclaration(String),
    UndeclaredSymbol(String),
    TypeMismatch(Mismatch),
    InvalidLValue,
    Arity {
        routine: String,
        expected: usize,
        found: usize,
    },
    MalformedLiteral(String),
    InvalidOperator(String),
}

/// The ways in which a value can have the wrong type.
#[derive(Clone, Debug, PartialEq)]
pub enum Mismatch {
    Operands(BinaryOperator, Type, Type),
    Unary(UnaryOperator, Type),
    Index(Type),
    IndexType(Type),
    Assignment(Type, Type),
    Argument(String, usize, Type, Type),
    Return(String, Option<Type>, Option<Type>),
    VoidValue(String),
    NotAFunction(String),
    NotAVariable(String),
    Signature(String),
    Dimension(Type),
}

impl std::fmt::Display for TranslationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TranslationError::*;
        match self {
            Redeclaration(name) => write!(f, "{} is already declared", name),
            UndeclaredSymbol(name) => write!(f, "{} is not declared", name),
            TypeMismatch(m) => write!(f, "Type mismatch: {}", m),
            InvalidLValue => f.write_str("Expression cannot be assigned to or addressed"),
            Arity {
                routine,
                expected,
                found,
            } => write!(
                f,
                "{} expects {} arguments, but {} were given",
                routine, expected, found
            ),
            MalformedLiteral(lit) => write!(f, "{} is not a valid 32-bit integer", lit),
            InvalidOperator(op) => write!(f, "{} cannot be used here", op),
        }
    }
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Mismatch::*;
        match self {
            Operands(op, l, r) => write!(f, "{} cannot be applied to {} and {}", op, l, r),
            Unary(op, ty) => write!(f, "{} cannot be applied to {}", op, ty),
            Index(ty) => write!(f, "{} cannot be indexed", ty),
            IndexType(ty) => write!(f, "an index must be int, found {}", ty),
            Assignment(target, value) => write!(f, "{} cannot be assigned to {}", value, target),
            Argument(routine, idx, expected, found) => write!(
                f,
                "argument {} of {} expects {}, found {}",
                idx + 1,
                routine,
                expected,
                found
            ),
            Return(routine, expected, found) => write!(
                f,
                "{} returns {}, but return has {}",
                routine,
                fmt_return(expected),
                fmt_return(found)
            ),
            VoidValue(routine) => write!(f, "{} does not return a value", routine),
            NotAFunction(name) => write!(f, "{} is not a function", name),
            NotAVariable(name) => write!(f, "{} is a function, not a variable", name),
            Signature(routine) => write!(f, "{} does not match its prototype", routine),
            Dimension(ty) => write!(f, "an array dimension must be int, found {}", ty),
        }
    }
}

impl From<Mismatch> for TranslationError {
    fn from(m: Mismatch) -> Self {
        TranslationError::TypeMismatch(m)
    }
}
