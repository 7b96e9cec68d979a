/*
 * Scope and type bookkeeping for translation:
 * 1. The symbol table which maps variable names to their type and run time
 *    location, with a global scope and the local scope of the function being
 *    translated.
 * 2. The function table which records the signature of every prototyped or
 *    defined function.
 * 3. The errors which can be raised while translating.
 */
mod error;
mod function_table;
pub mod symbol_table;

pub use error::{Mismatch, TranslationError};
pub use function_table::{FunctionSignature, FunctionTable};
pub use symbol_table::{Location, Symbol, SymbolTable};
