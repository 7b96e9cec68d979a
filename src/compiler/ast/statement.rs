use super::expression::{Expression, Line};
use super::ty::Type;

#[derive(Clone, Debug, PartialEq)]
pub enum Statement {
    Declaration(Declaration),
    Expression(Line, Expression),
    If {
        line: Line,
        cond: Expression,
        if_block: Vec<Statement>,
        else_block: Option<Vec<Statement>>,
    },
    While {
        line: Line,
        cond: Expression,
        body: Vec<Statement>,
    },
    Return(Line, Option<Expression>),
}

impl Statement {
    pub fn line(&self) -> Line {
        match self {
            Statement::Declaration(decl) => decl.line,
            Statement::Expression(l, _) | Statement::Return(l, _) => *l,
            Statement::If { line, .. } | Statement::While { line, .. } => *line,
        }
    }
}

/// `int *a, b[n], c = 5;` declares every name with the same base type.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub line: Line,
    pub ty: Type,
    pub declarators: Vec<Declarator>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    pub line: Line,
    pub name: String,
    pub dimensions: Vec<Expression>,
    pub init: Option<Expression>,
}

impl Declarator {
    /// The type of the declared variable after array decay.
    pub fn ty(&self, base: &Type) -> Type {
        Type::decay_array(base.clone(), self.dimensions.len())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    pub line: Line,
    pub name: Option<String>,
    pub ty: Type,
}

/// The signature of a function as written in the source.  A return type of
/// `None` is `void`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDecl {
    pub line: Line,
    pub name: String,
    pub ret_ty: Option<Type>,
    pub params: Vec<Parameter>,
}

impl FunctionDecl {
    pub fn param_types(&self) -> Vec<Type> {
        self.params.iter().map(|p| p.ty.clone()).collect()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Item {
    Prototype(FunctionDecl),
    Function(FunctionDecl, Vec<Statement>),
    Statement(Statement),
}

impl Item {
    pub fn line(&self) -> Line {
        match self {
            Item::Prototype(decl) | Item::Function(decl, _) => decl.line,
            Item::Statement(s) => s.line(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Program {
    pub items: Vec<Item>,
}
