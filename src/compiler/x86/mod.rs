/*!
 # x86
 ## About
 This module provides a DSL that models the subset of 32-bit x86 assembly
 that the translator emits, along with the code sink that collects the
 emitted instructions and prints them as NASM source.

 ## Example
 ```ignore
 assembly!{(code){
     mov %eax, %ebx;
     add %eax, %eax;
     push %eax;
 }}
 ```

## Syntax
1. `%<register>` - The `%` prefix indicates that the next token will be a register.
2. `{expression}` - This is an expression which will be evaluated and whose result
    will be used as an integer literal in the generated x86 assembly.
3. `(expression)` - An `Operand` that was already built, e.g. the location of a
    variable that was looked up in the symbol table.
4. `@label` - is a global label named `label`.
5. `@{"label"}` - is a global label named `label`.  The braces indicate an expresion
    to be evaluated.
6. `^label` - is a local label and will be prefixed with a `.` in the generated
    x86.  Local labels are only unique within the scope of the global label
    that precedes them, so every construct that needs one asks the translator
    for a fresh id and appends it to the label name.
7. `{{iterable of instructions}}` - injects any iterable which contains `Inst`. This
    allows x86 code generated in helper functions to be easily injected into an
    assembly macro.
 */

pub mod assembly;

#[cfg(test)]
pub mod simulator;

use assembly::*;

/// The NASM spelling of a user symbol.  With the `$` prefix NASM reads the
/// name as an identifier even when it is also a register or an instruction.
pub fn identifier(name: &str) -> String {
    format!("${}", name)
}

/// Where `CodeSink::push` appends instructions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// The routine which initializes globals and runs top level statements
    Init,
    /// User function bodies
    Text,
}

/// Append only collector of emitted code.  Data declarations are kept apart
/// from code, and code is split between the global initializer routine and
/// the bodies of user functions.
#[derive(Debug)]
pub struct CodeSink {
    data: Vec<Inst>,
    init: Vec<Inst>,
    text: Vec<Inst>,
    segment: Segment,
}

impl CodeSink {
    pub fn new() -> CodeSink {
        CodeSink {
            data: vec![],
            init: vec![],
            text: vec![],
            segment: Segment::Init,
        }
    }

    pub fn push(&mut self, inst: Inst) {
        match self.segment {
            Segment::Init => self.init.push(inst),
            Segment::Text => self.text.push(inst),
        }
    }

    pub fn declare(&mut self, inst: Inst) {
        self.data.push(inst)
    }

    pub fn set_segment(&mut self, segment: Segment) {
        self.segment = segment;
    }

    pub fn data(&self) -> &[Inst] {
        &self.data
    }

    pub fn init(&self) -> &[Inst] {
        &self.init
    }

    pub fn text(&self) -> &[Inst] {
        &self.text
    }
}

/// A complete, assemblable program.
#[derive(Debug)]
pub struct Assembly {
    code: Vec<Inst>,
}

impl Assembly {
    pub fn new(code: Vec<Inst>) -> Assembly {
        Assembly { code }
    }

    pub fn instructions(&self) -> &[Inst] {
        &self.code
    }

    pub fn print(&self, output: &mut dyn std::io::Write) -> std::io::Result<()> {
        for inst in self.code.iter() {
            writeln!(output, "{}", inst)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for inst in self.code.iter() {
            writeln!(f, "{}", inst)?;
        }
        Ok(())
    }
}
