//! Walks the AST of a program and calls one operation of the `Translator`
//! for each node, in the order the nodes would be reduced by a bottom up
//! parse.

use log::{debug, trace};

use crate::compiler::ast::*;
use crate::compiler::semantics::{Mismatch, TranslationError};
use crate::compiler::x86::Assembly;

use super::{Descriptor, TranslationResult, Translator};

/// Translates a complete program to assembly.
pub fn translate(program: &Program) -> TranslationResult<Assembly> {
    debug!("Translating {} items", program.items.len());
    let mut translator = Translator::new();
    translator.program(program)?;
    translator.finish()
}

impl Translator {
    fn program(&mut self, program: &Program) -> TranslationResult<()> {
        for item in program.items.iter() {
            self.item(item)?;
        }
        Ok(())
    }

    fn item(&mut self, item: &Item) -> TranslationResult<()> {
        self.set_line(item.line());
        match item {
            Item::Prototype(decl) => self.declare_prototype(decl),
            Item::Function(decl, body) => self.function(decl, body),
            Item::Statement(statement) => self.statement(statement),
        }
    }

    fn function(&mut self, decl: &FunctionDecl, body: &Vec<Statement>) -> TranslationResult<()> {
        self.begin_function(decl)?;
        self.block(body)?;
        self.end_function();
        debug!("Translated {}", decl.name);
        Ok(())
    }

    fn block(&mut self, block: &Vec<Statement>) -> TranslationResult<()> {
        for statement in block.iter() {
            self.statement(statement)?;
        }
        Ok(())
    }

    pub(super) fn statement(&mut self, statement: &Statement) -> TranslationResult<()> {
        self.set_line(statement.line());
        match statement {
            Statement::Declaration(decl) => self.declaration(decl),
            Statement::Expression(_, expr) => self.expression_statement(expr),
            Statement::If {
                cond,
                if_block,
                else_block,
                ..
            } => {
                let cond = self.expression(cond)?;
                let mut block = self.begin_if(cond);
                self.block(if_block)?;
                if let Some(else_block) = else_block {
                    self.begin_else(&mut block);
                    self.block(else_block)?;
                }
                self.end_if(block);
                Ok(())
            }
            Statement::While { cond, body, .. } => {
                let lp = self.begin_while();
                let cond = self.expression(cond)?;
                self.while_condition(&lp, cond);
                self.block(body)?;
                self.end_while(lp);
                Ok(())
            }
            Statement::Return(line, value) => {
                let value = match value {
                    Some(value) => Some(self.expression(value)?),
                    None => None,
                };
                self.set_line(*line);
                self.return_value(value)
            }
        }
    }

    /// Each declarator is declared before its dimensions and its initializer
    /// are translated, so `int n = 5, a[n];` is valid.
    fn declaration(&mut self, decl: &Declaration) -> TranslationResult<()> {
        for declarator in decl.declarators.iter() {
            self.set_line(declarator.line);
            let ty = declarator.ty(&decl.ty);
            trace!("Declare {}: {}", declarator.name, ty);
            let location = self.declare_variable(&declarator.name, ty.clone())?;

            if !declarator.dimensions.is_empty() {
                let mut dimensions = vec![];
                for dim in declarator.dimensions.iter() {
                    dimensions.push(self.expression(dim)?);
                }
                self.set_line(declarator.line);
                self.allocate_array(&location, &decl.ty, dimensions)?;
            }

            if let Some(init) = &declarator.init {
                let value = self.expression(init)?;
                self.set_line(declarator.line);
                let result = self.assign(Descriptor::Named(ty, location), value)?;
                self.discard(result);
            }
        }
        Ok(())
    }

    fn expression_statement(&mut self, expr: &Expression) -> TranslationResult<()> {
        let result = match expr {
            Expression::Call(line, name, args) => self.call_expression(*line, name, args)?,
            _ => Some(self.expression(expr)?),
        };
        if let Some(result) = result {
            self.discard(result);
        }
        Ok(())
    }

    pub(super) fn expression(&mut self, expr: &Expression) -> TranslationResult<Descriptor> {
        match expr {
            Expression::Integer(line, text) => {
                self.set_line(*line);
                self.integer(text)
            }
            Expression::Identifier(line, name) => {
                self.set_line(*line);
                self.identifier(name)
            }
            Expression::BinaryOp(line, op, l, r) => match op {
                BinaryOperator::BAnd | BinaryOperator::BOr => {
                    let a = self.expression(l)?;
                    self.set_line(*line);
                    let sc = self.short_circuit_first(*op, a)?;
                    let b = self.expression(r)?;
                    Ok(self.short_circuit_second(sc, b))
                }
                _ => {
                    let a = self.expression(l)?;
                    let b = self.expression(r)?;
                    self.set_line(*line);
                    self.binary(*op, a, b)
                }
            },
            Expression::UnaryOp(line, op, operand) => self.unary_expression(*line, *op, operand),
            Expression::Index(line, p, i) => {
                let p = self.expression(p)?;
                let i = self.expression(i)?;
                self.set_line(*line);
                self.index(p, i)
            }
            Expression::Call(line, name, args) => match self.call_expression(*line, name, args)? {
                Some(result) => Ok(result),
                None => self.error(Mismatch::VoidValue(name.clone())),
            },
            Expression::Builtin(line, builtin, format, args) => {
                for arg in args.iter().rev() {
                    let arg = self.expression(arg)?;
                    self.push_argument(arg);
                }
                self.set_line(*line);
                self.call_builtin(*builtin, format, args.len())
            }
            Expression::Assign(line, target, value) => self.assignment(*line, target, value),
        }
    }

    /// `&a[i]` and `&*p` take the address of an element rather than of a
    /// variable.
    fn unary_expression(
        &mut self,
        line: Line,
        op: UnaryOperator,
        operand: &Expression,
    ) -> TranslationResult<Descriptor> {
        match (op, operand) {
            (UnaryOperator::AddressOf, Expression::Index(_, p, i)) => {
                let p = self.expression(p)?;
                let i = self.expression(i)?;
                self.set_line(line);
                self.element_address(p, i)
            }
            (UnaryOperator::AddressOf, Expression::UnaryOp(_, UnaryOperator::Deref, p)) => {
                let p = self.expression(p)?;
                self.set_line(line);
                self.pointer_target(p)
            }
            _ => {
                let a = self.expression(operand)?;
                self.set_line(line);
                self.unary(op, a)
            }
        }
    }

    /// The address of a pointer target is computed before the value which
    /// is stored through it.
    fn assignment(
        &mut self,
        line: Line,
        target: &Expression,
        value: &Expression,
    ) -> TranslationResult<Descriptor> {
        match target {
            Expression::Identifier(_, name) => {
                self.set_line(line);
                let target = self.identifier(name)?;
                let value = self.expression(value)?;
                self.set_line(line);
                self.assign(target, value)
            }
            Expression::UnaryOp(_, UnaryOperator::Deref, p) => {
                let p = self.expression(p)?;
                self.set_line(line);
                let address = self.pointer_target(p)?;
                let value = self.expression(value)?;
                self.set_line(line);
                self.assign_through(address, value)
            }
            Expression::Index(_, p, i) => {
                let p = self.expression(p)?;
                let i = self.expression(i)?;
                self.set_line(line);
                let address = self.element_address(p, i)?;
                let value = self.expression(value)?;
                self.set_line(line);
                self.assign_through(address, value)
            }
            _ => {
                self.set_line(line);
                self.error(TranslationError::InvalidLValue)
            }
        }
    }

    /// Arguments are pushed from last to first.  The result is `None` if
    /// the called function is `void`.
    fn call_expression(
        &mut self,
        line: Line,
        name: &str,
        args: &Vec<Expression>,
    ) -> TranslationResult<Option<Descriptor>> {
        let mut types = vec![];
        for arg in args.iter().rev() {
            let arg = self.expression(arg)?;
            types.push(self.push_argument(arg));
        }
        types.reverse();

        self.set_line(line);
        self.call(name, &types)
    }
}
