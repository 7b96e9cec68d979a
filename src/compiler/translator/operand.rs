use crate::compiler::ast::Type;
use crate::compiler::semantics::Location;
use crate::compiler::x86::assembly::*;
use crate::compiler::x86::identifier;
use crate::{assembly, binary_op, operand, register, unary_op};

use super::Translator;

/**
 Describes where the value of an expression can be found once the code which
 computes it has been emitted.  The consumer of a value chooses how to read it
 purely from the variant.
 */
#[derive(Clone, Debug, PartialEq)]
pub enum Descriptor {
    /// A constant which is used directly as an operand
    Immediate(Type, i32),
    /// A variable which is read from its location
    Named(Type, Location),
    /// A value which has been pushed onto the stack and must be popped by
    /// whichever operation consumes it
    Materialized(Type),
}

impl Descriptor {
    pub fn ty(&self) -> &Type {
        match self {
            Descriptor::Immediate(ty, _) | Descriptor::Named(ty, _) | Descriptor::Materialized(ty) => {
                ty
            }
        }
    }

    pub fn is_materialized(&self) -> bool {
        match self {
            Descriptor::Materialized(_) => true,
            _ => false,
        }
    }
}

impl From<&Location> for Operand {
    fn from(loc: &Location) -> Self {
        match loc {
            Location::Frame(offset) => Operand::MemoryAddr(Reg32::Ebp, *offset),
            Location::Global(name) => Operand::Memory(DirectOperand::Label(identifier(name))),
        }
    }
}

impl Translator {
    /// Emits the code which moves the value described by `desc` into `reg`.
    pub(super) fn load(&mut self, desc: &Descriptor, reg: Reg32) {
        let dst = Operand::Direct(DirectOperand::Register(reg));
        match desc {
            Descriptor::Immediate(_, v) => self.code.push(Inst::Mov(dst, operand!({ *v }))),
            Descriptor::Named(_, loc) => self.code.push(Inst::Mov(dst, loc.into())),
            Descriptor::Materialized(_) => self.code.push(Inst::Pop(dst)),
        }
    }

    /// The source operand of an instruction whose destination is `eax`.
    /// Immediates are used as they are, anything else is first moved into
    /// `ebx`.
    pub(super) fn source(&mut self, desc: &Descriptor) -> Operand {
        match desc {
            Descriptor::Immediate(_, v) => operand!({ *v }),
            _ => {
                self.load(desc, Reg32::Ebx);
                operand!(%ebx)
            }
        }
    }

    /// Makes sure that the value of `desc` is on top of the stack.
    pub fn materialize(&mut self, desc: Descriptor) -> Descriptor {
        match desc {
            Descriptor::Immediate(ty, v) => {
                assembly! {(self.code) {push {v};}}
                Descriptor::Materialized(ty)
            }
            Descriptor::Named(ty, loc) => {
                let op: Operand = (&loc).into();
                assembly! {(self.code) {push (op);}}
                Descriptor::Materialized(ty)
            }
            Descriptor::Materialized(ty) => Descriptor::Materialized(ty),
        }
    }

    /// Drops a value which is not used.  Only a materialized value has
    /// anything to clean up.
    pub fn discard(&mut self, desc: Descriptor) {
        if desc.is_materialized() {
            assembly! {(self.code) {add %esp, 4;}}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_operands() {
        assert_eq!(
            Operand::from(&Location::Frame(-8)),
            Operand::MemoryAddr(Reg32::Ebp, -8)
        );
        assert_eq!(
            Operand::from(&Location::Global("x".into())).to_string(),
            "[$x]"
        );
    }

    #[test]
    fn load_by_variant() {
        let mut t = Translator::new();
        t.load(&Descriptor::Immediate(Type::Int, 5), Reg32::Eax);
        t.load(
            &Descriptor::Named(Type::Int, Location::Frame(12)),
            Reg32::Ebx,
        );
        t.load(&Descriptor::Materialized(Type::Int), Reg32::Eax);
        let text: Vec<_> = t.code().init().iter().map(|i| i.to_string()).collect();
        assert_eq!(
            text,
            vec![
                "    mov eax, DWORD 5",
                "    mov ebx, DWORD [ebp+12]",
                "    pop eax"
            ]
        );
    }

    #[test]
    fn materialize_and_discard() {
        let mut t = Translator::new();
        let named = Descriptor::Named(Type::Int.pointer_to(), Location::Global("p".into()));
        assert_eq!(
            t.materialize(named),
            Descriptor::Materialized(Type::Int.pointer_to())
        );
        assert_eq!(
            t.materialize(Descriptor::Immediate(Type::Int, 3)),
            Descriptor::Materialized(Type::Int)
        );
        assert_eq!(
            t.materialize(Descriptor::Materialized(Type::Int)),
            Descriptor::Materialized(Type::Int)
        );
        t.discard(Descriptor::Immediate(Type::Int, 1));
        t.discard(Descriptor::Materialized(Type::Int));

        let text: Vec<_> = t.code().init().iter().map(|i| i.to_string()).collect();
        assert_eq!(
            text,
            vec!["    push DWORD [$p]", "    push 3", "    add esp, 4"]
        );
    }
}
