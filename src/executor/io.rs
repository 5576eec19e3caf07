//! READ/WRITE/DPRINT/BREAK.

use std::io::Write as IoWrite;

use crate::error::{Error, Result};
use crate::instruction::ArgKind;
use crate::reader::InputReader;
use crate::value::{parse_hex_float, Value};

use super::{Executor, Flow};

impl<R: InputReader> Executor<R> {
    pub(super) fn op_read(&mut self) -> Result<Flow> {
        let instr = self.instr();
        let target = instr.args[0].clone();
        let type_arg = instr.args[1].clone();
        debug_assert_eq!(type_arg.kind, ArgKind::Type);

        let value = match self.input.read_line() {
            None => Value::Nil,
            Some(line) => parse_by_kind(&type_arg.body, &line),
        };
        let (frame, name) = self.target_var(&target)?;
        self.frames.set(frame, &name, value)?;
        Ok(Flow::Next)
    }

    pub(super) fn op_write(&mut self, stdout: &mut dyn IoWrite) -> Result<Flow> {
        let source = self.instr().args[0].clone();
        let value = self.resolve(&source)?;
        let _ = stdout.write_all(value.write_repr().as_bytes());
        Ok(Flow::Next)
    }

    pub(super) fn op_dprint(&mut self, stderr: &mut dyn IoWrite) -> Result<Flow> {
        let source = self.instr().args[0].clone();
        let value = self.resolve(&source)?;
        let _ = stderr.write_all(value.write_repr().as_bytes());
        Ok(Flow::Next)
    }

    pub(super) fn op_break(&mut self, stderr: &mut dyn IoWrite) -> Result<Flow> {
        let snapshot = format!(
            "pc={} operand_stack_depth={} call_stack_depth={}\n",
            self.pc,
            self.operand_stack.len(),
            self.call_stack.len(),
        );
        let _ = stderr.write_all(snapshot.as_bytes());
        Ok(Flow::Next)
    }
}

/// Parses `line` per the `READ` `type` literal ("int", "float", "bool",
/// "string"); a parse failure yields Nil rather than an error.
fn parse_by_kind(kind: &str, line: &str) -> Value {
    match kind {
        "int" => line.parse::<i64>().map(Value::Int).unwrap_or(Value::Nil),
        "float" => parse_hex_float(line).map(Value::Float).unwrap_or(Value::Nil),
        "bool" => Value::Bool(line.eq_ignore_ascii_case("true")),
        "string" => Value::String(line.to_owned()),
        _ => Value::Nil,
    }
}
