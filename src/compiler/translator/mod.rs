/*!
 # Translator
 Translates the AST of a program into x86 assembly.

 The `Translator` is the context of a single translation: it owns the symbol
 table, the label counter, the string pool and the code sink.  Each
 operation of the translator corresponds to one construct of the source
 language.  An operation consumes the [`Descriptor`]s of the values it
 operates on, appends code to the code sink, and returns the `Descriptor` of
 its own result.  The driver walks the AST bottom up and calls one operation
 per node.

 Every intermediate value is computed in `eax`, with `ebx` holding the second
 operand of binary operators.  Values which must survive the evaluation of
 another expression are pushed onto the stack.
 */

mod control;
mod driver;
mod expression;
mod function;
mod logical;
mod operand;
mod pointer;

#[cfg(test)]
mod tests;

use log::{debug, trace};

use crate::compiler::ast::Line;
use crate::compiler::semantics::{SymbolTable, TranslationError};
use crate::compiler::stringpool::StringPool;
use crate::compiler::x86::assembly::*;
use crate::compiler::x86::{Assembly, CodeSink};
use crate::compiler::CompilerError;
use crate::{assembly, binary_op, operand, register, unary_op, unit_op};

pub use control::{IfBlock, WhileLoop};
pub use driver::translate;
pub use logical::ShortCircuit;
pub use operand::Descriptor;

pub type TranslationResult<T> = Result<T, CompilerError<TranslationError>>;

/// The routine which runs the global initializers and top level statements.
pub const GLOBALS_INIT: &str = "__globals_init";

/// Set once the global initializers have run, so that a recursive call to
/// `main` does not run them again.
pub const GLOBALS_READY: &str = "__globals_ready";

/// Attaches the line being translated to an error raised by the symbol
/// table.
pub(crate) trait AtLine<T> {
    fn at(self, line: Line) -> TranslationResult<T>;
}

impl<T> AtLine<T> for Result<T, TranslationError> {
    fn at(self, line: Line) -> TranslationResult<T> {
        self.map_err(|e| CompilerError::new(line, e))
    }
}

pub struct Translator {
    symbols: SymbolTable,
    code: CodeSink,
    strings: StringPool,
    next_label: u32,
    line: Line,
}

impl Translator {
    pub fn new() -> Translator {
        Translator {
            symbols: SymbolTable::new(),
            code: CodeSink::new(),
            strings: StringPool::new(),
            next_label: 0,
            line: 0,
        }
    }

    /// Sets the source line which is attached to any error raised by the
    /// following operations.
    pub fn set_line(&mut self, line: Line) {
        self.line = line;
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn code(&self) -> &CodeSink {
        &self.code
    }

    /// Allocates a new label id.  Ids are never reused, so every label built
    /// from one is unique within the program.
    pub(super) fn next_label(&mut self) -> u32 {
        let id = self.next_label;
        self.next_label += 1;
        trace!("Allocated label id {}", id);
        id
    }

    pub(super) fn error<T, E: Into<TranslationError>>(&self, e: E) -> TranslationResult<T> {
        Err(CompilerError::new(self.line, e.into()))
    }

    /// Completes the translation and lays out the final program: the data
    /// section, then the routine which initializes globals, then the user
    /// functions.  The initializer routine does nothing after its first run.
    pub fn finish(self) -> TranslationResult<Assembly> {
        let main_defined = self
            .symbols
            .functions()
            .get("main")
            .map_or(false, |main| main.defined);
        if !main_defined {
            return self.error(TranslationError::UndeclaredSymbol("main".into()));
        }

        for sig in self.symbols.functions().iter() {
            trace!("Function {}", sig);
        }
        for global in self.symbols.globals() {
            trace!("Global {}: {}", global.name, global.ty);
        }
        debug!(
            "Laying out {} data, {} strings, {} init and {} text instructions",
            self.code.data().len(),
            self.strings.len(),
            self.code.init().len(),
            self.code.text().len()
        );

        let mut code = vec![];
        assembly! {(code) {
            extern printf;
            extern scanf;
            extern calloc;
            global main;
            section ".data";
        }};
        code.push(Inst::Data(GLOBALS_READY.into(), 0));
        code.extend(self.code.data().iter().cloned());

        for (label, s) in self.strings.entries() {
            code.push(Inst::DataString(label, s));
        }

        assembly! {(code) {
            section ".text";
        @{GLOBALS_INIT}:
            push %ebp;
            mov %ebp, %esp;
            mov %eax, [@{GLOBALS_READY}];
            cmp %eax, 0;
            jne ^initialized;
            mov %eax, 1;
            mov [@{GLOBALS_READY}], %eax;
            {{self.code.init()}}
        ^initialized:
            mov %esp, %ebp;
            pop %ebp;
            ret;
            {{self.code.text()}}
        }};

        Ok(Assembly::new(code))
    }
}
