use crate::compiler::ast::{Type, UnaryOperator};
use crate::compiler::semantics::{Location, Mismatch, TranslationError};
use crate::compiler::x86::assembly::*;
use crate::{assembly, binary_op, operand, register, unary_op};

use super::{Descriptor, TranslationResult, Translator};

impl Translator {
    /// `&x`: only a variable has an address.
    pub fn address_of(&mut self, a: Descriptor) -> TranslationResult<Descriptor> {
        match a {
            Descriptor::Named(ty, loc) => {
                let src: Operand = (&loc).into();
                assembly! {(self.code) {
                    lea %eax, (src);
                    push %eax;
                }}
                Ok(Descriptor::Materialized(ty.pointer_to()))
            }
            _ => self.error(TranslationError::InvalidLValue),
        }
    }

    /// `*p`: reads the value that `p` points to.
    pub fn dereference(&mut self, p: Descriptor) -> TranslationResult<Descriptor> {
        let referent = match p.ty().referent() {
            Some(ty) => ty.clone(),
            None => return self.error(Mismatch::Unary(UnaryOperator::Deref, p.ty().clone())),
        };

        self.load(&p, Reg32::Eax);
        assembly! {(self.code) {
            mov %eax, [%eax];
            push %eax;
        }}
        Ok(Descriptor::Materialized(referent))
    }

    /// Leaves the address of `p[i]` in `eax` and returns the element type.
    fn element(&mut self, p: &Descriptor, i: &Descriptor) -> TranslationResult<Type> {
        let element = match p.ty().referent() {
            Some(ty) => ty.clone(),
            None => return self.error(Mismatch::Index(p.ty().clone())),
        };
        if *i.ty() != Type::Int {
            return self.error(Mismatch::IndexType(i.ty().clone()));
        }

        self.load(i, Reg32::Ebx);
        assembly! {(self.code) {
            imul %ebx, {element.size_of()};
        }}
        self.load(p, Reg32::Eax);
        assembly! {(self.code) {
            add %eax, %ebx;
        }}
        Ok(element)
    }

    /// `p[i]`: reads the element at offset `i * sizeof(*p)` from `p`.
    pub fn index(&mut self, p: Descriptor, i: Descriptor) -> TranslationResult<Descriptor> {
        let element = self.element(&p, &i)?;
        assembly! {(self.code) {
            mov %eax, [%eax];
            push %eax;
        }}
        Ok(Descriptor::Materialized(element))
    }

    /// The address of `p[i]`, for use as the target of an assignment.
    pub fn element_address(
        &mut self,
        p: Descriptor,
        i: Descriptor,
    ) -> TranslationResult<Descriptor> {
        let element = self.element(&p, &i)?;
        assembly! {(self.code) {
            push %eax;
        }}
        Ok(Descriptor::Materialized(element.pointer_to()))
    }

    /// The address held by `p`, for use as the target of an assignment
    /// through `*p`.
    pub fn pointer_target(&mut self, p: Descriptor) -> TranslationResult<Descriptor> {
        if p.ty().referent().is_none() {
            return self.error(Mismatch::Unary(UnaryOperator::Deref, p.ty().clone()));
        }
        Ok(self.materialize(p))
    }

    /// Stores `value` at the materialized `address`.  Unlike assignment to a
    /// variable, the stored value is left on the stack as the result.
    pub fn assign_through(
        &mut self,
        address: Descriptor,
        value: Descriptor,
    ) -> TranslationResult<Descriptor> {
        let target = match &address {
            Descriptor::Materialized(Type::Pointer(ty)) => ty.as_ref().clone(),
            _ => return self.error(TranslationError::InvalidLValue),
        };
        if !target.is_compatible(value.ty()) {
            return self.error(Mismatch::Assignment(target, value.ty().clone()));
        }

        self.load(&value, Reg32::Eax);
        assembly! {(self.code) {
            pop %ebx;
            mov [%ebx], %eax;
            push %eax;
        }}
        Ok(Descriptor::Materialized(target))
    }

    /**
     Allocates the storage of an array and stores its address in `location`.
     The dimensions have already been evaluated in declaration order, so any
     that were materialized are popped innermost first.  The element count
     is their product.
     */
    pub fn allocate_array(
        &mut self,
        location: &Location,
        element: &Type,
        dimensions: Vec<Descriptor>,
    ) -> TranslationResult<()> {
        if let Some(d) = dimensions.iter().find(|d| *d.ty() != Type::Int) {
            return self.error(Mismatch::Dimension(d.ty().clone()));
        }

        assembly! {(self.code) {
            ; "allocate array"
            mov %eax, 1;
        }}
        for dim in dimensions.iter().rev() {
            match dim {
                Descriptor::Immediate(_, n) => {
                    assembly! {(self.code) {imul %eax, {*n};}}
                }
                Descriptor::Named(_, loc) => {
                    let src: Operand = loc.into();
                    assembly! {(self.code) {imul %eax, (src);}}
                }
                Descriptor::Materialized(_) => {
                    assembly! {(self.code) {
                        pop %ebx;
                        imul %eax, %ebx;
                    }}
                }
            }
        }

        let dst: Operand = location.into();
        assembly! {(self.code) {
            imul %eax, {element.size_of()};
            push %eax;
            push 1;
            call @calloc;
            add %esp, 8;
            mov (dst), %eax;
        }}
        Ok(())
    }
}
