//! ADD/SUB/MUL/IDIV/DIV, LT/GT/EQ, AND/OR/NOT and their `*S` stack-form
//! counterparts. The three-address and stack-form variants share a single
//! implementation per operation, parametrized over [`Form`].

use crate::error::{Error, Result};
use crate::value::Value;

use super::{Arithmetic, Bool, Compare, Executor, Flow, Form};
use crate::reader::InputReader;

impl<R: InputReader> Executor<R> {
    fn operands(&mut self, form: Form) -> Result<(Value, Value)> {
        match form {
            Form::ThreeAddress => {
                let instr = self.instr();
                let s1 = instr.args[1].clone();
                let s2 = instr.args[2].clone();
                Ok((self.resolve(&s1)?, self.resolve(&s2)?))
            }
            Form::StackForm => self.operand_stack.pop_pair(),
        }
    }

    fn store_result(&mut self, form: Form, value: Value) -> Result<Flow> {
        match form {
            Form::ThreeAddress => {
                let target = self.instr().args[0].clone();
                let (frame, name) = self.target_var(&target)?;
                self.frames.set(frame, &name, value)?;
            }
            Form::StackForm => self.operand_stack.push(value),
        }
        Ok(Flow::Next)
    }

    pub(super) fn op_arith(&mut self, op: Arithmetic, form: Form) -> Result<Flow> {
        let (s1, s2) = self.operands(form)?;
        let result = match (s1, s2) {
            (Value::Int(a), Value::Int(b)) => Value::Int(match op {
                Arithmetic::Add => a.wrapping_add(b),
                Arithmetic::Sub => a.wrapping_sub(b),
                Arithmetic::Mul => a.wrapping_mul(b),
            }),
            (Value::Float(a), Value::Float(b)) => Value::Float(match op {
                Arithmetic::Add => a + b,
                Arithmetic::Sub => a - b,
                Arithmetic::Mul => a * b,
            }),
            _ => return Err(Error::TypeMismatch("ADD/SUB/MUL (both Int or both Float required)")),
        };
        self.store_result(form, result)
    }

    pub(super) fn op_idiv(&mut self, form: Form) -> Result<Flow> {
        let (s1, s2) = self.operands(form)?;
        let result = match (s1, s2) {
            (Value::Int(_), Value::Int(0)) => return Err(Error::DivisionByZero),
            (Value::Int(a), Value::Int(b)) => Value::Int(a.wrapping_div(b)),
            _ => return Err(Error::TypeMismatch("IDIV (both Int required)")),
        };
        self.store_result(form, result)
    }

    pub(super) fn op_div(&mut self, form: Form) -> Result<Flow> {
        let (s1, s2) = self.operands(form)?;
        let result = match (s1, s2) {
            (Value::Float(_), Value::Float(b)) if b == 0.0 => return Err(Error::DivisionByZero),
            (Value::Float(a), Value::Float(b)) => Value::Float(a / b),
            _ => return Err(Error::TypeMismatch("DIV (both Float required)")),
        };
        self.store_result(form, result)
    }

    pub(super) fn op_compare(&mut self, op: Compare, form: Form) -> Result<Flow> {
        let (s1, s2) = self.operands(form)?;
        let result = compare(op, &s1, &s2)?;
        self.store_result(form, Value::Bool(result))
    }

    pub(super) fn op_bool(&mut self, op: Bool, form: Form) -> Result<Flow> {
        let (s1, s2) = self.operands(form)?;
        let result = match (s1, s2) {
            (Value::Bool(a), Value::Bool(b)) => match op {
                Bool::And => a && b,
                Bool::Or => a || b,
            },
            _ => return Err(Error::TypeMismatch("AND/OR (both Bool required)")),
        };
        self.store_result(form, Value::Bool(result))
    }

    pub(super) fn op_not(&mut self, form: Form) -> Result<Flow> {
        let operand = match form {
            Form::ThreeAddress => {
                let source = self.instr().args[1].clone();
                self.resolve(&source)?
            }
            Form::StackForm => self.operand_stack.pop()?,
        };
        let result = match operand {
            Value::Bool(b) => !b,
            _ => return Err(Error::TypeMismatch("NOT (Bool required)")),
        };
        self.store_result(form, Value::Bool(result))
    }
}

/// `EQ` treats Nil-Nil as equal and Nil-anything-else as unequal; `LT`/`GT`
/// forbid Nil on either side. Used both by `EQ`/`LT`/`GT` and by
/// `JUMPIFEQ`/`JUMPIFNEQ`.
pub(crate) fn compare(op: Compare, s1: &Value, s2: &Value) -> Result<bool> {
    if let Compare::Eq = op {
        if matches!(s1, Value::Nil) || matches!(s2, Value::Nil) {
            return Ok(matches!((s1, s2), (Value::Nil, Value::Nil)));
        }
    }
    match (s1, s2) {
        (Value::Nil, _) | (_, Value::Nil) => Err(Error::TypeMismatch("LT/GT (Nil operand forbidden)")),
        (Value::Int(a), Value::Int(b)) => Ok(order(op, a, b)),
        (Value::Float(a), Value::Float(b)) => Ok(order(op, a, b)),
        (Value::Bool(a), Value::Bool(b)) => Ok(order(op, a, b)),
        (Value::String(a), Value::String(b)) => Ok(order(op, a, b)),
        _ => Err(Error::TypeMismatch("LT/GT/EQ (operands must share a kind)")),
    }
}

fn order<T: PartialOrd + PartialEq>(op: Compare, a: &T, b: &T) -> bool {
    match op {
        Compare::Lt => a < b,
        Compare::Gt => a > b,
        Compare::Eq => a == b,
    }
}
