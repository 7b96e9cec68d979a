use std::collections::HashMap;

use log::trace;

use crate::compiler::ast::{fmt_return, Type};

use super::error::{Mismatch, TranslationError};

/// The signature of a function along with whether its body has been
/// translated.  A return type of `None` is `void`.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionSignature {
    pub name: String,
    pub ret: Option<Type>,
    pub params: Vec<Type>,
    pub defined: bool,
}

impl FunctionSignature {
    pub fn new(name: &str, ret: Option<Type>, params: Vec<Type>) -> FunctionSignature {
        FunctionSignature {
            name: name.into(),
            ret,
            params,
            defined: false,
        }
    }

    fn same_shape(&self, other: &FunctionSignature) -> bool {
        self.ret == other.ret && self.params == other.params
    }
}

impl std::fmt::Display for FunctionSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<_> = self.params.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "{} {}({})",
            fmt_return(&self.ret),
            self.name,
            params.join(", ")
        )
    }
}

#[derive(Debug, Default)]
pub struct FunctionTable {
    table: HashMap<String, FunctionSignature>,
    order: Vec<String>,
}

impl FunctionTable {
    pub fn new() -> FunctionTable {
        FunctionTable {
            table: HashMap::new(),
            order: vec![],
        }
    }

    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.table.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    /// Signatures in the order they were first declared.
    pub fn iter(&self) -> impl Iterator<Item = &FunctionSignature> {
        self.order.iter().filter_map(move |name| self.table.get(name))
    }

    /// Records a prototype.  A function may only be prototyped once and
    /// only before it is defined.
    pub fn declare(&mut self, sig: FunctionSignature) -> Result<(), TranslationError> {
        if self.table.contains_key(&sig.name) {
            return Err(TranslationError::Redeclaration(sig.name));
        }

        trace!("Prototype {}", sig);
        self.order.push(sig.name.clone());
        self.table.insert(sig.name.clone(), sig);
        Ok(())
    }

    /// Records the definition of a function.  If the function was
    /// prototyped then the definition must have the same signature.
    pub fn define(&mut self, mut sig: FunctionSignature) -> Result<(), TranslationError> {
        match self.table.get_mut(&sig.name) {
            Some(existing) if existing.defined => Err(TranslationError::Redeclaration(sig.name)),
            Some(existing) if !existing.same_shape(&sig) => {
                Err(Mismatch::Signature(sig.name).into())
            }
            Some(existing) => {
                trace!("Define prototyped {}", existing);
                existing.defined = true;
                Ok(())
            }
            None => {
                trace!("Define {}", sig);
                sig.defined = true;
                self.order.push(sig.name.clone());
                self.table.insert(sig.name.clone(), sig);
                Ok(())
            }
        }
    }
}
