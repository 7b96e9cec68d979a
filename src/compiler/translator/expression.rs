use log::trace;

use crate::compiler::ast::{BinaryOperator, Type, UnaryOperator};
use crate::compiler::semantics::{Mismatch, TranslationError};
use crate::compiler::x86::assembly::*;
use crate::{assembly, binary_op, operand, register, unary_op, unit_op};

use super::{AtLine, Descriptor, TranslationResult, Translator};

impl Translator {
    pub fn integer(&self, text: &str) -> TranslationResult<Descriptor> {
        match text.parse::<i32>() {
            Ok(v) => Ok(Descriptor::Immediate(Type::Int, v)),
            Err(_) => self.error(TranslationError::MalformedLiteral(text.into())),
        }
    }

    pub fn identifier(&self, name: &str) -> TranslationResult<Descriptor> {
        let symbol = self.symbols.resolve(name).at(self.line)?;
        Ok(Descriptor::Named(symbol.ty.clone(), symbol.location.clone()))
    }

    /// Translates any binary operator which does not short circuit.
    pub fn binary(
        &mut self,
        op: BinaryOperator,
        a: Descriptor,
        b: Descriptor,
    ) -> TranslationResult<Descriptor> {
        use BinaryOperator::*;
        match op {
            Add | Sub | Mul | Div | Mod => self.arithmetic(op, a, b),
            Eq | NEq | Ls | LsEq | Gr | GrEq => self.relational(op, a, b),
            BAnd | BOr => self.error(TranslationError::InvalidOperator(op.to_string())),
        }
    }

    fn check_operands(
        &self,
        op: BinaryOperator,
        a: &Descriptor,
        b: &Descriptor,
    ) -> TranslationResult<()> {
        if a.ty().is_compatible(b.ty()) {
            Ok(())
        } else {
            self.error(Mismatch::Operands(op, a.ty().clone(), b.ty().clone()))
        }
    }

    /// `b` is loaded before `a` because when both are materialized `b` is on
    /// top of the stack.  The result has the type of `a`.
    pub fn arithmetic(
        &mut self,
        op: BinaryOperator,
        a: Descriptor,
        b: Descriptor,
    ) -> TranslationResult<Descriptor> {
        self.check_operands(op, &a, &b)?;
        trace!("{} {} {}", a.ty(), op, b.ty());

        match op {
            BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul => {
                let src = self.source(&b);
                self.load(&a, Reg32::Eax);
                match op {
                    BinaryOperator::Add => {
                        assembly! {(self.code) {add %eax, (src);}}
                    }
                    BinaryOperator::Sub => {
                        assembly! {(self.code) {sub %eax, (src);}}
                    }
                    _ => {
                        assembly! {(self.code) {imul %eax, (src);}}
                    }
                }
                assembly! {(self.code) {push %eax;}}
            }
            BinaryOperator::Div | BinaryOperator::Mod => {
                self.load(&b, Reg32::Ebx);
                self.load(&a, Reg32::Eax);
                assembly! {(self.code) {
                    cdq;
                    idiv %ebx;
                }}
                if op == BinaryOperator::Div {
                    assembly! {(self.code) {push %eax;}}
                } else {
                    assembly! {(self.code) {push %edx;}}
                }
            }
            _ => return self.error(TranslationError::InvalidOperator(op.to_string())),
        }

        Ok(Descriptor::Materialized(a.ty().clone()))
    }

    /// Produces 1 when the comparison holds and 0 otherwise.  The comparison
    /// is `a <op> b` using signed conditions.
    pub fn relational(
        &mut self,
        op: BinaryOperator,
        a: Descriptor,
        b: Descriptor,
    ) -> TranslationResult<Descriptor> {
        let jump: fn(Operand) -> Inst = match op {
            BinaryOperator::Eq => Inst::Je,
            BinaryOperator::NEq => Inst::Jne,
            BinaryOperator::Ls => Inst::Jl,
            BinaryOperator::LsEq => Inst::Jle,
            BinaryOperator::Gr => Inst::Jg,
            BinaryOperator::GrEq => Inst::Jge,
            _ => return self.error(TranslationError::InvalidOperator(op.to_string())),
        };
        let id = self.next_label();
        self.check_operands(op, &a, &b)?;

        let cond_true = format!("condTrue{}", id);
        let src = self.source(&b);
        self.load(&a, Reg32::Eax);
        assembly! {(self.code) {
            cmp %eax, (src);
            mov %eax, 1;
        }}
        self.code.push(jump(operand!(^{ cond_true })));
        assembly! {(self.code) {
            mov %eax, 0;
        ^{cond_true}:
            push %eax;
        }}

        Ok(Descriptor::Materialized(Type::Int))
    }

    pub fn unary(&mut self, op: UnaryOperator, a: Descriptor) -> TranslationResult<Descriptor> {
        match op {
            UnaryOperator::Negate => self.negate(a),
            UnaryOperator::Not => Ok(self.not(a)),
            UnaryOperator::AddressOf => self.address_of(a),
            UnaryOperator::Deref => self.dereference(a),
        }
    }

    pub fn negate(&mut self, a: Descriptor) -> TranslationResult<Descriptor> {
        if *a.ty() != Type::Int {
            return self.error(Mismatch::Unary(UnaryOperator::Negate, a.ty().clone()));
        }

        self.load(&a, Reg32::Eax);
        assembly! {(self.code) {
            imul %eax, {-1};
            push %eax;
        }}
        Ok(Descriptor::Materialized(Type::Int))
    }

    /// Produces 1 when `a` is zero and 0 otherwise.
    pub fn not(&mut self, a: Descriptor) -> Descriptor {
        let id = self.next_label();
        let neg_final = format!("negFinal{}", id);

        self.load(&a, Reg32::Eax);
        assembly! {(self.code) {
            cmp %eax, 0;
            mov %eax, 1;
            je ^{neg_final};
            mov %eax, 0;
        ^{neg_final}:
            push %eax;
        }}
        Descriptor::Materialized(Type::Int)
    }

    /// Stores `value` in the variable `target`.  The result of the assignment
    /// is the variable itself, so nothing is left on the stack.
    pub fn assign(
        &mut self,
        target: Descriptor,
        value: Descriptor,
    ) -> TranslationResult<Descriptor> {
        match target {
            Descriptor::Named(ty, loc) => {
                if !ty.is_compatible(value.ty()) {
                    return self.error(Mismatch::Assignment(ty, value.ty().clone()));
                }

                self.load(&value, Reg32::Eax);
                let dst: Operand = (&loc).into();
                assembly! {(self.code) {mov (dst), %eax;}}
                Ok(Descriptor::Named(ty, loc))
            }
            _ => self.error(TranslationError::InvalidLValue),
        }
    }
}
