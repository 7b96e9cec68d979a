use std::collections::HashMap;

use log::trace;

use crate::compiler::ast::Type;

use super::error::{Mismatch, TranslationError};
use super::function_table::{FunctionSignature, FunctionTable};

/// Offset from the frame base of the first parameter: above it sit the saved
/// frame base and the return address.
pub const FIRST_PARAM_OFFSET: i32 = 8;

/// Every argument occupies one stack slot.
const PARAM_SLOT: i32 = 4;

const RESERVED: [&str; 3] = ["calloc", "__globals_init", "__globals_ready"];
pub const STRING_LABEL_PREFIX: &str = "__str_";

/// Where a variable lives at run time.
#[derive(Clone, Debug, PartialEq)]
pub enum Location {
    /// A signed offset from the frame base
    Frame(i32),
    /// A label in the data section
    Global(String),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Frame(offset) if *offset < 0 => write!(f, "[ebp-{}]", -offset),
            Location::Frame(offset) => write!(f, "[ebp+{}]", offset),
            Location::Global(label) => write!(f, "[{}]", label),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub ty: Type,
    pub location: Location,
}

impl Symbol {
    pub fn new(name: &str, ty: Type, location: Location) -> Symbol {
        Symbol {
            name: name.into(),
            ty,
            location,
        }
    }
}

/// The symbols of the function currently being translated.
#[derive(Debug)]
struct LocalScope {
    function: String,
    symbols: HashMap<String, Symbol>,
    next_offset: i32,
}

/**
 Two level scope: globals live for the whole program while the local scope
 lives from the prologue to the epilogue of a single function.  Names are
 resolved in the local scope first, so a local may shadow a global.

 Functions share a namespace with global variables.
*/
#[derive(Debug)]
pub struct SymbolTable {
    globals: HashMap<String, Symbol>,
    global_order: Vec<String>,
    functions: FunctionTable,
    local: Option<LocalScope>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable {
            globals: HashMap::new(),
            global_order: vec![],
            functions: FunctionTable::new(),
            local: None,
        }
    }

    pub fn is_reserved(name: &str) -> bool {
        RESERVED.contains(&name) || name.starts_with(STRING_LABEL_PREFIX)
    }

    fn check_global_name(&self, name: &str) -> Result<(), TranslationError> {
        if Self::is_reserved(name) || self.globals.contains_key(name) || self.functions.contains(name)
        {
            Err(TranslationError::Redeclaration(name.into()))
        } else {
            Ok(())
        }
    }

    pub fn declare_global(&mut self, name: &str, ty: Type) -> Result<Location, TranslationError> {
        self.check_global_name(name)?;

        let location = Location::Global(name.into());
        trace!("Global {}: {} at {}", name, ty, location);
        self.globals
            .insert(name.into(), Symbol::new(name, ty, location.clone()));
        self.global_order.push(name.into());
        Ok(location)
    }

    /// Allocates the next slot below the frame base.
    pub fn declare_local(&mut self, name: &str, ty: Type) -> Result<Location, TranslationError> {
        let scope = self.local_scope_mut(name)?;
        if scope.symbols.contains_key(name) {
            return Err(TranslationError::Redeclaration(name.into()));
        }

        scope.next_offset -= ty.size_of();
        let location = Location::Frame(scope.next_offset);
        trace!("Local {}: {} at {}", name, ty, location);
        scope
            .symbols
            .insert(name.into(), Symbol::new(name, ty, location.clone()));
        Ok(location)
    }

    /// Parameters are given ascending offsets above the frame base in the
    /// order in which they appear in the call.
    pub fn declare_parameter(
        &mut self,
        name: &str,
        ty: Type,
        ordinal: usize,
    ) -> Result<Location, TranslationError> {
        let scope = self.local_scope_mut(name)?;
        if scope.symbols.contains_key(name) {
            return Err(TranslationError::Redeclaration(name.into()));
        }

        let location = Location::Frame(FIRST_PARAM_OFFSET + PARAM_SLOT * ordinal as i32);
        trace!("Parameter {}: {} at {}", name, ty, location);
        scope
            .symbols
            .insert(name.into(), Symbol::new(name, ty, location.clone()));
        Ok(location)
    }

    fn local_scope_mut(&mut self, name: &str) -> Result<&mut LocalScope, TranslationError> {
        self.local
            .as_mut()
            .ok_or_else(|| TranslationError::UndeclaredSymbol(name.into()))
    }

    /// Finds the variable with the given name, looking in the local scope
    /// before the global scope.
    pub fn resolve(&self, name: &str) -> Result<&Symbol, TranslationError> {
        let local = self.local.as_ref().and_then(|scope| scope.symbols.get(name));
        match local.or_else(|| self.globals.get(name)) {
            Some(symbol) => Ok(symbol),
            None if self.functions.contains(name) => {
                Err(Mismatch::NotAVariable(name.into()).into())
            }
            None => Err(TranslationError::UndeclaredSymbol(name.into())),
        }
    }

    /// Finds the function with the given name.  A variable with that name
    /// hides it.
    pub fn function(&self, name: &str) -> Result<&FunctionSignature, TranslationError> {
        let is_variable = self
            .local
            .as_ref()
            .map_or(false, |scope| scope.symbols.contains_key(name))
            || self.globals.contains_key(name);
        if is_variable {
            return Err(Mismatch::NotAFunction(name.into()).into());
        }

        self.functions
            .get(name)
            .ok_or_else(|| TranslationError::UndeclaredSymbol(name.into()))
    }

    pub fn declare_function(&mut self, sig: FunctionSignature) -> Result<(), TranslationError> {
        self.check_global_name(&sig.name)?;
        self.functions.declare(sig)
    }

    pub fn define_function(&mut self, sig: FunctionSignature) -> Result<(), TranslationError> {
        if Self::is_reserved(&sig.name) || self.globals.contains_key(&sig.name) {
            return Err(TranslationError::Redeclaration(sig.name));
        }
        self.functions.define(sig)
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    /// Global variables in declaration order.
    pub fn globals(&self) -> impl Iterator<Item = &Symbol> {
        self.global_order
            .iter()
            .filter_map(move |name| self.globals.get(name))
    }

    /// Creates the local scope for the body of `function`.
    pub fn enter_function(&mut self, function: &str) {
        debug_assert!(self.local.is_none(), "Function bodies cannot be nested");
        trace!("Enter {}", function);
        self.local = Some(LocalScope {
            function: function.into(),
            symbols: HashMap::new(),
            next_offset: 0,
        });
    }

    /// Destroys the local scope, resetting the local offset allocator.
    pub fn leave_function(&mut self) {
        if let Some(scope) = self.local.take() {
            trace!("Leave {}", scope.function);
        }
    }

    /// The name of the function whose body is being translated.
    pub fn current_function(&self) -> Option<&str> {
        self.local.as_ref().map(|scope| scope.function.as_str())
    }

    pub fn in_function(&self) -> bool {
        self.local.is_some()
    }

    /// The number of bytes of locals allocated so far in the current function.
    pub fn frame_size(&self) -> i32 {
        self.local.as_ref().map_or(0, |scope| -scope.next_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_and_local_offsets() {
        let mut st = SymbolTable::new();
        st.enter_function("f");
        assert_eq!(
            st.declare_parameter("a", Type::Int, 0),
            Ok(Location::Frame(8))
        );
        assert_eq!(
            st.declare_parameter("b", Type::Int.pointer_to(), 1),
            Ok(Location::Frame(12))
        );
        assert_eq!(st.declare_local("x", Type::Int), Ok(Location::Frame(-4)));
        assert_eq!(st.declare_local("y", Type::Int), Ok(Location::Frame(-8)));
        assert_eq!(st.frame_size(), 8);

        assert_eq!(st.resolve("b").map(|s| s.ty.clone()), Ok(Type::Int.pointer_to()));
        assert_eq!(st.resolve("y").map(|s| s.location.clone()), Ok(Location::Frame(-8)));
    }

    #[test]
    fn leaving_resets_offsets() {
        let mut st = SymbolTable::new();
        st.enter_function("f");
        st.declare_local("x", Type::Int).unwrap();
        st.leave_function();
        assert_eq!(st.resolve("x"), Err(TranslationError::UndeclaredSymbol("x".into())));

        st.enter_function("g");
        assert_eq!(st.declare_local("x", Type::Int), Ok(Location::Frame(-4)));
        assert_eq!(st.current_function(), Some("g"));
    }

    #[test]
    fn local_shadows_global() {
        let mut st = SymbolTable::new();
        assert_eq!(
            st.declare_global("x", Type::Int),
            Ok(Location::Global("x".into()))
        );
        st.enter_function("f");
        st.declare_local("x", Type::Int.pointer_to()).unwrap();
        let x = st.resolve("x").unwrap();
        assert_eq!(x.location, Location::Frame(-4));
        assert_eq!(x.ty, Type::Int.pointer_to());

        st.leave_function();
        assert_eq!(
            st.resolve("x").map(|s| s.location.clone()),
            Ok(Location::Global("x".into()))
        );
    }

    #[test]
    fn duplicate_local_is_redeclaration() {
        let mut st = SymbolTable::new();
        st.enter_function("f");
        st.declare_parameter("a", Type::Int, 0).unwrap();
        assert_eq!(
            st.declare_local("a", Type::Int),
            Err(TranslationError::Redeclaration("a".into()))
        );
        st.declare_local("x", Type::Int).unwrap();
        assert_eq!(
            st.declare_local("x", Type::Int),
            Err(TranslationError::Redeclaration("x".into()))
        );
    }

    #[test]
    fn globals_and_functions_share_a_namespace() {
        let mut st = SymbolTable::new();
        st.declare_global("x", Type::Int).unwrap();
        assert_eq!(
            st.declare_global("x", Type::Int),
            Err(TranslationError::Redeclaration("x".into()))
        );
        assert_eq!(
            st.define_function(FunctionSignature::new("x", None, vec![])),
            Err(TranslationError::Redeclaration("x".into()))
        );

        st.declare_function(FunctionSignature::new("f", None, vec![]))
            .unwrap();
        assert_eq!(
            st.declare_global("f", Type::Int),
            Err(TranslationError::Redeclaration("f".into()))
        );
    }

    #[test]
    fn reserved_names() {
        let mut st = SymbolTable::new();
        for name in vec!["calloc", "__globals_init", "__globals_ready", "__str_0"] {
            assert_eq!(
                st.declare_global(name, Type::Int),
                Err(TranslationError::Redeclaration(name.into()))
            );
            assert_eq!(
                st.define_function(FunctionSignature::new(name, None, vec![])),
                Err(TranslationError::Redeclaration(name.into()))
            );
        }
    }

    #[test]
    fn resolving_functions_and_variables() {
        let mut st = SymbolTable::new();
        st.declare_global("x", Type::Int).unwrap();
        st.define_function(FunctionSignature::new("f", Some(Type::Int), vec![]))
            .unwrap();

        assert_eq!(
            st.resolve("f"),
            Err(TranslationError::TypeMismatch(Mismatch::NotAVariable("f".into())))
        );
        assert_eq!(
            st.function("x"),
            Err(TranslationError::TypeMismatch(Mismatch::NotAFunction("x".into())))
        );
        assert_eq!(
            st.function("g"),
            Err(TranslationError::UndeclaredSymbol("g".into()))
        );
        assert_eq!(st.function("f").map(|f| f.ret.clone()), Ok(Some(Type::Int)));
    }

    #[test]
    fn location_display() {
        assert_eq!(Location::Frame(-4).to_string(), "[ebp-4]");
        assert_eq!(Location::Frame(12).to_string(), "[ebp+12]");
        assert_eq!(Location::Global("x".into()).to_string(), "[x]");
    }
}
