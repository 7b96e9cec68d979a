pub type Line = u32;

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    /// Integer literals keep their source text until they are translated
    Integer(Line, String),
    Identifier(Line, String),
    BinaryOp(Line, BinaryOperator, Box<Expression>, Box<Expression>),
    UnaryOp(Line, UnaryOperator, Box<Expression>),
    Index(Line, Box<Expression>, Box<Expression>),
    Call(Line, String, Vec<Expression>),
    /// A call to `printf` or `scanf` with its format string
    Builtin(Line, Builtin, String, Vec<Expression>),
    Assign(Line, Box<Expression>, Box<Expression>),
}

impl Expression {
    pub fn line(&self) -> Line {
        use Expression::*;
        match self {
            Integer(l, ..)
            | Identifier(l, ..)
            | BinaryOp(l, ..)
            | UnaryOp(l, ..)
            | Index(l, ..)
            | Call(l, ..)
            | Builtin(l, ..)
            | Assign(l, ..) => *l,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    BAnd,
    BOr,
    Eq,
    NEq,
    Ls,
    LsEq,
    Gr,
    GrEq,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use BinaryOperator::*;
        match self {
            Add => f.write_str("+"),
            Sub => f.write_str("-"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            BAnd => f.write_str("&&"),
            BOr => f.write_str("||"),
            Eq => f.write_str("=="),
            NEq => f.write_str("!="),
            Ls => f.write_str("<"),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            GrEq => f.write_str(">="),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UnaryOperator {
    Negate,
    Not,
    AddressOf,
    Deref,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        use UnaryOperator::*;
        match self {
            Negate => f.write_str("-"),
            Not => f.write_str("!"),
            AddressOf => f.write_str("&"),
            Deref => f.write_str("*"),
        }
    }
}

/// Routines provided by the C runtime which take a format string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Builtin {
    Printf,
    Scanf,
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Builtin::Printf => "printf",
            Builtin::Scanf => "scanf",
        }
    }
}

impl std::fmt::Display for Builtin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        f.write_str(self.name())
    }
}
