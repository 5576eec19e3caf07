//! PUSHS/POPS/CLEARS.

use crate::error::Result;
use crate::reader::InputReader;

use super::{Executor, Flow};

impl<R: InputReader> Executor<R> {
    pub(super) fn op_pushs(&mut self) -> Result<Flow> {
        let source = self.instr().args[0].clone();
        let value = self.resolve(&source)?;
        self.operand_stack.push(value);
        Ok(Flow::Next)
    }

    pub(super) fn op_pops(&mut self) -> Result<Flow> {
        let target = self.instr().args[0].clone();
        let value = self.operand_stack.pop()?;
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, value)?;
        Ok(Flow::Next)
    }

    pub(super) fn op_clears(&mut self) -> Result<Flow> {
        self.operand_stack.clear();
        Ok(Flow::Next)
    }
}
