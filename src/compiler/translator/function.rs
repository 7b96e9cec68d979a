use log::{debug, trace};

use crate::compiler::ast::{Builtin, FunctionDecl, Type};
use crate::compiler::semantics::{FunctionSignature, Location, Mismatch, TranslationError};
use crate::compiler::stringpool::StringPool;
use crate::compiler::x86::assembly::*;
use crate::compiler::x86::{identifier, Segment};
use crate::{assembly, binary_op, operand, register, unary_op, unit_op};

use super::{AtLine, Descriptor, TranslationResult, Translator, GLOBALS_INIT};

fn signature(decl: &FunctionDecl) -> FunctionSignature {
    FunctionSignature::new(&decl.name, decl.ret_ty.clone(), decl.param_types())
}

impl Translator {
    pub fn declare_prototype(&mut self, decl: &FunctionDecl) -> TranslationResult<()> {
        debug!("Prototype {}", decl.name);
        self.symbols
            .declare_function(signature(decl))
            .at(self.line)
    }

    /**
     Starts the body of a function: records its definition, creates its local
     scope with the parameters in it and emits its prologue.  `main` runs the
     global initializers before its body.
     */
    pub fn begin_function(&mut self, decl: &FunctionDecl) -> TranslationResult<()> {
        debug!("Function {}", decl.name);
        self.symbols
            .define_function(signature(decl))
            .at(self.line)?;

        self.code.set_segment(Segment::Text);
        self.symbols.enter_function(&decl.name);
        assembly! {(self.code) {
        @{identifier(&decl.name)}:
            push %ebp;
            mov %ebp, %esp;
        }}
        if decl.name == "main" {
            assembly! {(self.code) {call @{GLOBALS_INIT};}}
        }

        for (ordinal, param) in decl.params.iter().enumerate() {
            match &param.name {
                Some(name) => {
                    self.symbols
                        .declare_parameter(name, param.ty.clone(), ordinal)
                        .at(param.line)?;
                }
                None => {
                    return self.error(TranslationError::UndeclaredSymbol(format!(
                        "parameter {} of {}",
                        ordinal + 1,
                        decl.name
                    )))
                }
            }
        }
        Ok(())
    }

    /// Closes the scope of a function.  A body which does not end with a
    /// `return` gets an epilogue.  Code which follows goes back to the
    /// global initializer.
    pub fn end_function(&mut self) {
        if let Some(name) = self.symbols.current_function() {
            trace!("End of {}", name);
        }
        if self.code.text().last() != Some(&Inst::Ret) {
            self.epilogue();
        }
        self.symbols.leave_function();
        self.code.set_segment(Segment::Init);
    }

    fn epilogue(&mut self) {
        assembly! {(self.code) {
            mov %esp, %ebp;
            pop %ebp;
            ret;
        }}
    }

    /// Declares a variable in the current scope.  A local is given a slot
    /// in the frame, and the stack pointer is moved to cover it.  A global is
    /// given a label in the data section.
    pub fn declare_variable(&mut self, name: &str, ty: Type) -> TranslationResult<Location> {
        if self.symbols.in_function() {
            let location = self.symbols.declare_local(name, ty).at(self.line)?;
            let frame_size = self.symbols.frame_size();
            assembly! {(self.code) {
                lea %esp, [%ebp-{frame_size}];
            }}
            Ok(location)
        } else {
            let location = self.symbols.declare_global(name, ty).at(self.line)?;
            self.code.declare(Inst::Data(identifier(name), 0));
            Ok(location)
        }
    }

    /// Pushes one argument of a call.  Arguments are pushed from last to
    /// first.  Returns the type of the argument.
    pub fn push_argument(&mut self, arg: Descriptor) -> Type {
        self.materialize(arg).ty().clone()
    }

    /**
     Calls a user function whose arguments, with the types in `args`, have
     been pushed.  The caller removes the arguments from the stack.  The
     result is `None` when the function returns `void`.
     */
    pub fn call(&mut self, name: &str, args: &[Type]) -> TranslationResult<Option<Descriptor>> {
        let sig = self.symbols.function(name).at(self.line)?.clone();

        if sig.params.len() != args.len() {
            return self.error(TranslationError::Arity {
                routine: name.into(),
                expected: sig.params.len(),
                found: args.len(),
            });
        }
        for (idx, (expected, found)) in sig.params.iter().zip(args.iter()).enumerate() {
            if !expected.is_compatible(found) {
                return self.error(Mismatch::Argument(
                    name.into(),
                    idx,
                    expected.clone(),
                    found.clone(),
                ));
            }
        }

        assembly! {(self.code) {call @{identifier(name)};}}
        if !args.is_empty() {
            assembly! {(self.code) {add %esp, {4 * args.len() as i32};}}
        }

        Ok(sig.ret.map(|ty| {
            assembly! {(self.code) {push %eax;}}
            Descriptor::Materialized(ty)
        }))
    }

    /// Calls `printf` or `scanf`.  The format string is pushed after the
    /// `argc` arguments, so it is the first argument.  The number of `%d`
    /// in the format must match the number of arguments.
    pub fn call_builtin(
        &mut self,
        builtin: Builtin,
        format: &str,
        argc: usize,
    ) -> TranslationResult<Descriptor> {
        let expected = format.matches("%d").count();
        if expected != argc {
            return self.error(TranslationError::Arity {
                routine: builtin.name().into(),
                expected,
                found: argc,
            });
        }

        let label = StringPool::label(self.strings.insert(format));
        trace!("{} uses {}", builtin, label);
        assembly! {(self.code) {
            push @{label};
            call @{builtin.name()};
            add %esp, {4 * (argc as i32 + 1)};
            push %eax;
        }}
        Ok(Descriptor::Materialized(Type::Int))
    }

    /// Moves the returned value into `eax` and leaves the function.
    pub fn return_value(&mut self, value: Option<Descriptor>) -> TranslationResult<()> {
        let function = self.symbols.current_function().map(|name| name.to_string());
        let expected = function
            .as_ref()
            .and_then(|name| self.symbols.functions().get(name))
            .map(|sig| sig.ret.clone());
        let (function, expected) = match (function, expected) {
            (Some(function), Some(expected)) => (function, expected),
            _ => return self.error(TranslationError::InvalidOperator("return".into())),
        };

        match (&expected, &value) {
            (None, None) => (),
            (Some(ty), Some(v)) if ty.is_compatible(v.ty()) => self.load(v, Reg32::Eax),
            _ => {
                return self.error(Mismatch::Return(
                    function,
                    expected.clone(),
                    value.as_ref().map(|v| v.ty().clone()),
                ))
            }
        }

        self.epilogue();
        Ok(())
    }
}
