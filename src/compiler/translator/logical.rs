use crate::compiler::ast::{BinaryOperator, Type};
use crate::compiler::semantics::TranslationError;
use crate::compiler::x86::assembly::*;
use crate::{assembly, binary_op, operand, register, unary_op};

use super::{Descriptor, TranslationResult, Translator};

/// An `&&` or `||` whose first operand has been translated and which is
/// waiting for its second operand.
#[derive(Debug)]
pub struct ShortCircuit {
    id: u32,
    op: BinaryOperator,
}

impl ShortCircuit {
    /// The result of the operator when the first operand decides it.
    fn default(&self) -> i32 {
        match self.op {
            BinaryOperator::BOr => 1,
            _ => 0,
        }
    }

    fn label(&self) -> String {
        format!("shortcut{}", self.id)
    }

    /// Jumps to the shortcut label when `eax` decides the result.
    fn jump(&self) -> Inst {
        let target = operand!(^{ self.label() });
        match self.op {
            BinaryOperator::BOr => Inst::Jne(target),
            _ => Inst::Je(target),
        }
    }
}

impl Translator {
    /**
     Translates the first operand of `a && b` or `a || b`.  The value the
     operator has when `a` alone decides it is pushed as the result and, if
     `a` does decide it, control jumps past the code of `b`.
     */
    pub fn short_circuit_first(
        &mut self,
        op: BinaryOperator,
        a: Descriptor,
    ) -> TranslationResult<ShortCircuit> {
        match op {
            BinaryOperator::BAnd | BinaryOperator::BOr => (),
            _ => return self.error(TranslationError::InvalidOperator(op.to_string())),
        }
        let sc = ShortCircuit {
            id: self.next_label(),
            op,
        };

        self.load(&a, Reg32::Eax);
        assembly! {(self.code) {
            push {sc.default()};
            cmp %eax, 0;
        }}
        self.code.push(sc.jump());
        Ok(sc)
    }

    /// Translates the second operand.  When the shortcut was not taken the
    /// result is decided by `b`, so the pushed default is replaced.
    pub fn short_circuit_second(&mut self, sc: ShortCircuit, b: Descriptor) -> Descriptor {
        let label = sc.label();
        self.load(&b, Reg32::Eax);
        assembly! {(self.code) {
            cmp %eax, 0;
        }}
        self.code.push(sc.jump());
        assembly! {(self.code) {
            mov %eax, {1 - sc.default()};
            pop %ebx;
            push %eax;
        ^{label}:
        }}
        Descriptor::Materialized(Type::Int)
    }
}
