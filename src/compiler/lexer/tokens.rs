#[derive(Debug, Clone, PartialEq)]
pub enum Lex {
    Integer(String),
    Identifier(String),
    StringLiteral(String),
    Int,
    Void,
    If,
    Else,
    While,
    Return,
    Printf,
    Scanf,
    Mul,
    Div,
    Mod,
    Add,
    Minus,
    Not,
    Ampersand,
    BAnd,
    BOr,
    GrEq,
    LsEq,
    Gr,
    Ls,
    Eq,
    NEq,
    Assign,
    Semicolon,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

impl std::fmt::Display for Lex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Lex::*;
        match self {
            Integer(i) => f.write_str(&format!("literal {}", i)),
            Identifier(id) => f.write_str(&format!("identifier {}", id)),
            StringLiteral(str) => f.write_str(&format!("literal \"{}\"", str)),
            Int => f.write_str("int"),
            Void => f.write_str("void"),
            If => f.write_str("if"),
            Else => f.write_str("else"),
            While => f.write_str("while"),
            Return => f.write_str("return"),
            Printf => f.write_str("printf"),
            Scanf => f.write_str("scanf"),
            Mul => f.write_str("*"),
            Div => f.write_str("/"),
            Mod => f.write_str("%"),
            Add => f.write_str("+"),
            Minus => f.write_str("-"),
            Not => f.write_str("!"),
            Ampersand => f.write_str("&"),
            BAnd => f.write_str("&&"),
            BOr => f.write_str("||"),
            GrEq => f.write_str(">="),
            LsEq => f.write_str("<="),
            Gr => f.write_str(">"),
            Ls => f.write_str("<"),
            Eq => f.write_str("=="),
            NEq => f.write_str("!="),
            Assign => f.write_str("="),
            Semicolon => f.write_str(";"),
            Comma => f.write_str(","),
            LParen => f.write_str("("),
            RParen => f.write_str(")"),
            LBrace => f.write_str("{"),
            RBrace => f.write_str("}"),
            LBracket => f.write_str("["),
            RBracket => f.write_str("]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub l: u32,
    pub s: Lex,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("L{}: {}", self.l, self.s))
    }
}

impl Token {
    pub fn new(l: u32, s: Lex) -> Token {
        Token { l, s }
    }

    /// Compares only the kind of token, ignoring any value it carries.
    pub fn token_eq(&self, a: &Lex) -> bool {
        std::mem::discriminant(&self.s) == std::mem::discriminant(a)
    }
}
