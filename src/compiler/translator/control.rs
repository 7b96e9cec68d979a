use crate::compiler::x86::assembly::*;
use crate::{assembly, binary_op, operand, register, unary_op};

use super::{Descriptor, Translator};

/// An `if` statement whose condition has been translated.
#[derive(Debug)]
pub struct IfBlock {
    id: u32,
    has_else: bool,
}

/// A `while` loop whose start label has been emitted.
#[derive(Debug)]
pub struct WhileLoop {
    id: u32,
}

impl Translator {
    /// Jumps past the then block when `cond` is zero.
    pub fn begin_if(&mut self, cond: Descriptor) -> IfBlock {
        let id = self.next_label();
        self.load(&cond, Reg32::Eax);
        assembly! {(self.code) {
            cmp %eax, 0;
            je ^{format!("false{}", id)};
        }}
        IfBlock {
            id,
            has_else: false,
        }
    }

    /// Ends the then block and starts the else block.
    pub fn begin_else(&mut self, block: &mut IfBlock) {
        block.has_else = true;
        let id = block.id;
        assembly! {(self.code) {
            jmp ^{format!("final{}", id)};
        ^{format!("false{}", id)}:
        }}
    }

    pub fn end_if(&mut self, block: IfBlock) {
        if block.has_else {
            assembly! {(self.code) {^{format!("final{}", block.id)}:}}
        } else {
            assembly! {(self.code) {^{format!("false{}", block.id)}:}}
        }
    }

    /// Emits the label which each iteration of the loop starts at.  This
    /// precedes the code of the condition.
    pub fn begin_while(&mut self) -> WhileLoop {
        let id = self.next_label();
        assembly! {(self.code) {^{format!("start{}", id)}:}}
        WhileLoop { id }
    }

    /// Leaves the loop when `cond` is zero.
    pub fn while_condition(&mut self, lp: &WhileLoop, cond: Descriptor) {
        self.load(&cond, Reg32::Eax);
        assembly! {(self.code) {
            cmp %eax, 0;
            je ^{format!("final{}", lp.id)};
        }}
    }

    pub fn end_while(&mut self, lp: WhileLoop) {
        assembly! {(self.code) {
            jmp ^{format!("start{}", lp.id)};
        ^{format!("final{}", lp.id)}:
        }}
    }
}
