use crate::error::Result;
use crate::reader::InputReader;

use super::{Executor, Flow};

impl<R: InputReader> Executor<R> {
    pub(super) fn op_defvar(&mut self) -> Result<Flow> {
        let target = self.instr().args[0].clone();
        let (frame, name) = self.target_var(&target)?;
        self.frames.defvar(frame, &name)?;
        Ok(Flow::Next)
    }

    pub(super) fn op_move(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let source = instr.args[1].clone();
        let (frame, name) = self.target_var(&target)?;
        let value = self.resolve(&source)?;
        self.frames.set(frame, &name, value)?;
        Ok(Flow::Next)
    }

    pub(super) fn op_createframe(&mut self) -> Result<Flow> {
        self.frames.create_frame();
        Ok(Flow::Next)
    }

    pub(super) fn op_pushframe(&mut self) -> Result<Flow> {
        self.frames.push_frame()?;
        Ok(Flow::Next)
    }

    pub(super) fn op_popframe(&mut self) -> Result<Flow> {
        self.frames.pop_frame()?;
        Ok(Flow::Next)
    }
}
