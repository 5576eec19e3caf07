//! JUMP/JUMPIF*/CALL/RETURN/EXIT. `LABEL` is handled inline in `dispatch`
//! since it is a pure no-op at execution time.

use crate::error::{Error, Result};
use crate::instruction::ArgKind;
use crate::reader::InputReader;
use crate::value::Value;

use super::arithmetic::compare;
use super::{Compare, Executor, Flow};

impl<R: InputReader> Executor<R> {
    pub(super) fn op_jump(&mut self) -> Result<Flow> {
        let label = self.instr().args[0].clone();
        debug_assert_eq!(label.kind, ArgKind::Label);
        let target = self.labels.resolve(&label.body)?;
        Ok(Flow::Jump(target))
    }

    /// `want_eq == true` for `JUMPIFEQ`, `false` for `JUMPIFNEQ`.
    pub(super) fn op_jumpifeq(&mut self, want_eq: bool) -> Result<Flow> {
        let instr = self.instr();
        let label = instr.args[0].clone();
        let s1 = instr.args[1].clone();
        let s2 = instr.args[2].clone();
        let lhs = self.resolve(&s1)?;
        let rhs = self.resolve(&s2)?;
        self.jump_if(&label.body, want_eq, &lhs, &rhs)
    }

    pub(super) fn op_jumpifeqs(&mut self, want_eq: bool) -> Result<Flow> {
        let label = self.instr().args[0].clone();
        let (lhs, rhs) = self.operand_stack.pop_pair()?;
        self.jump_if(&label.body, want_eq, &lhs, &rhs)
    }

    fn jump_if(&self, label: &str, want_eq: bool, lhs: &Value, rhs: &Value) -> Result<Flow> {
        let equal = equality(lhs, rhs)?;
        if equal == want_eq {
            Ok(Flow::Jump(self.labels.resolve(label)?))
        } else {
            Ok(Flow::Next)
        }
    }

    pub(super) fn op_call(&mut self) -> Result<Flow> {
        let label = self.instr().args[0].clone();
        let target = self.labels.resolve(&label.body)?;
        // `Flow::Jump` sets the PC directly with no post-increment (unlike
        // `Flow::Next`), so the return address pushed here must already
        // point past this instruction.
        self.call_stack.push(self.pc + 1);
        Ok(Flow::Jump(target))
    }

    pub(super) fn op_return(&mut self) -> Result<Flow> {
        let target = self.call_stack.pop()?;
        Ok(Flow::Jump(target))
    }

    pub(super) fn op_exit(&mut self) -> Result<Flow> {
        let source = self.instr().args[0].clone();
        let code = match self.resolve(&source)? {
            Value::Int(n) => n,
            _ => return Err(Error::TypeMismatch("EXIT (Int required)")),
        };
        if !(0..=49).contains(&code) {
            return Err(Error::ExitCodeOutOfRange(code));
        }
        Ok(Flow::Exit(code as i32))
    }
}

/// `JUMPIFEQ`/`JUMPIFNEQ` share the same kind-and-Nil rules as `EQ`.
fn equality(s1: &Value, s2: &Value) -> Result<bool> {
    compare(Compare::Eq, s1, s2)
}
