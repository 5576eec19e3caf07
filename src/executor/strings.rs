//! String and conversion instructions, including the `INT2CHARS` and
//! `STRI2INTS` stack-form variants.

use crate::error::{Error, Result};
use crate::reader::InputReader;
use crate::value::Value;

use super::{Executor, Flow, Form};

impl<R: InputReader> Executor<R> {
    pub(super) fn op_int2char(&mut self, form: Form) -> Result<Flow> {
        let code = match form {
            Form::ThreeAddress => {
                let source = self.instr().args[1].clone();
                self.resolve(&source)?
            }
            Form::StackForm => self.operand_stack.pop()?,
        };
        let code = match code {
            Value::Int(n) => n,
            _ => return Err(Error::TypeMismatch("INT2CHAR (Int required)")),
        };
        let scalar = u32::try_from(code)
            .ok()
            .and_then(char::from_u32)
            .ok_or(Error::InvalidUnicodeScalar(code))?;
        self.store(form, Value::String(scalar.to_string()))
    }

    pub(super) fn op_stri2int(&mut self, form: Form) -> Result<Flow> {
        let (s_str, s_idx) = match form {
            Form::ThreeAddress => {
                let instr = self.instr();
                let a = instr.args[1].clone();
                let b = instr.args[2].clone();
                (self.resolve(&a)?, self.resolve(&b)?)
            }
            Form::StackForm => self.operand_stack.pop_pair()?,
        };
        let (s, idx) = match (s_str, s_idx) {
            (Value::String(s), Value::Int(idx)) => (s, idx),
            _ => return Err(Error::TypeMismatch("STRI2INT (String, Int required)")),
        };
        let chars: Vec<char> = s.chars().collect();
        let c = char_at(&chars, idx)?;
        self.store(form, Value::Int(c as i64))
    }

    pub(super) fn op_int2float(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let source = instr.args[1].clone();
        let value = match self.resolve(&source)? {
            Value::Int(n) => Value::Float(n as f64),
            _ => return Err(Error::TypeMismatch("INT2FLOAT (Int required)")),
        };
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, value)?;
        Ok(Flow::Next)
    }

    pub(super) fn op_float2int(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let source = instr.args[1].clone();
        let value = match self.resolve(&source)? {
            Value::Float(f) => Value::Int(f as i64),
            _ => return Err(Error::TypeMismatch("FLOAT2INT (Float required)")),
        };
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, value)?;
        Ok(Flow::Next)
    }

    pub(super) fn op_concat(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let a = instr.args[1].clone();
        let b = instr.args[2].clone();
        let (s1, s2) = (self.resolve(&a)?, self.resolve(&b)?);
        let result = match (s1, s2) {
            (Value::String(a), Value::String(b)) => a + &b,
            _ => return Err(Error::TypeMismatch("CONCAT (String required)")),
        };
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, Value::String(result))?;
        Ok(Flow::Next)
    }

    pub(super) fn op_strlen(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let source = instr.args[1].clone();
        let len = match self.resolve(&source)? {
            Value::String(s) => s.chars().count() as i64,
            _ => return Err(Error::TypeMismatch("STRLEN (String required)")),
        };
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, Value::Int(len))?;
        Ok(Flow::Next)
    }

    pub(super) fn op_getchar(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let a = instr.args[1].clone();
        let b = instr.args[2].clone();
        let (s_str, s_idx) = (self.resolve(&a)?, self.resolve(&b)?);
        let (s, idx) = match (s_str, s_idx) {
            (Value::String(s), Value::Int(idx)) => (s, idx),
            _ => return Err(Error::TypeMismatch("GETCHAR (String, Int required)")),
        };
        let chars: Vec<char> = s.chars().collect();
        let c = char_at(&chars, idx)?;
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, Value::String(c.to_string()))?;
        Ok(Flow::Next)
    }

    pub(super) fn op_setchar(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let idx_arg = instr.args[1].clone();
        let repl_arg = instr.args[2].clone();
        let (frame, name) = self.target_var(&target)?;
        let current = match self.frames.get(frame, &name)? {
            Value::String(s) => s,
            _ => return Err(Error::TypeMismatch("SETCHAR (target must be a String)")),
        };
        let idx = match self.resolve(&idx_arg)? {
            Value::Int(n) => n,
            _ => return Err(Error::TypeMismatch("SETCHAR (Int index required)")),
        };
        let replacement = match self.resolve(&repl_arg)? {
            Value::String(s) => s,
            _ => return Err(Error::TypeMismatch("SETCHAR (String replacement required)")),
        };
        let replacement_first = replacement.chars().next().ok_or(Error::EmptyStringOperand)?;

        let mut chars: Vec<char> = current.chars().collect();
        let slot = usize::try_from(idx)
            .ok()
            .filter(|&i| i < chars.len())
            .ok_or(Error::StringIndexOutOfRange { index: idx, len: chars.len() })?;
        chars[slot] = replacement_first;
        let updated: String = chars.into_iter().collect();
        self.frames.set(frame, &name, Value::String(updated))?;
        Ok(Flow::Next)
    }

    pub(super) fn op_type(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let source = instr.args[1].clone();
        let kind = match self.resolve_for_type(&source)? {
            Some(value) => value.kind_name(),
            None => "",
        };
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, Value::String(kind.to_owned()))?;
        Ok(Flow::Next)
    }

    /// Stores `value` back to the three-address target variable, or pushes
    /// it to the operand stack for the `*S` form.
    fn store(&mut self, form: Form, value: Value) -> Result<Flow> {
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
}

/// Looks up the code point at `idx` in an already-decoded `chars` slice,
/// raising the shared `STRI2INT`/`GETCHAR` bounds error otherwise.
fn char_at(chars: &[char], idx: i64) -> Result<char> {
    usize::try_from(idx)
        .ok()
        .and_then(|i| chars.get(i).copied())
        .ok_or(Error::StringIndexOutOfRange { index: idx, len: chars.len() })
}
