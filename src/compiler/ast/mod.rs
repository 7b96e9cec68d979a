mod expression;
mod statement;
mod ty;

pub use expression::*;
pub use statement::*;
pub use ty::*;
