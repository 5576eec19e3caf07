use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::instruction::{ArgKind, Instruction, Opcode};

/// Maps label names to the dense instruction index they target. Built once,
/// before execution starts, by [`build`]; immutable for the rest of the run.
#[derive(Default)]
pub struct LabelTable {
    indices: HashMap<String, usize>,
}

impl LabelTable {
    pub fn resolve(&self, name: &str) -> Result<usize> {
        self.indices
            .get(name)
            .copied()
            .ok_or_else(|| Error::UndefinedOrDuplicateLabel(name.to_owned()))
    }
}

/// Scans `instructions` once in index order, recording `name -> index` for
/// every `LABEL name`. Forward references are fine; a label defined twice
/// is a fatal error.
pub fn build(instructions: &[Instruction]) -> Result<LabelTable> {
    let mut indices = HashMap::new();
    for (index, instr) in instructions.iter().enumerate() {
        if instr.opcode != Opcode::LABEL {
            continue;
        }
        let name = &instr.args[0].body;
        debug_assert_eq!(instr.args[0].kind, ArgKind::Label);
        if indices.insert(name.clone(), index).is_some() {
            return Err(Error::UndefinedOrDuplicateLabel(name.clone()));
        }
    }
    Ok(LabelTable { indices })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::instruction::Arg;

    fn label(order: i64, name: &str) -> Instruction {
        Instruction::new(order, Opcode::LABEL, vec![Arg::new(ArgKind::Label, name)])
    }

    #[test]
    fn forward_reference_resolves() {
        let instructions = vec![label(1, "start"), label(2, "end")];
        let table = build(&instructions).unwrap();
        assert_eq!(table.resolve("end"), Ok(1));
        assert_eq!(table.resolve("start"), Ok(0));
    }

    #[test]
    fn duplicate_label_is_error() {
        let instructions = vec![label(1, "dup"), label(2, "dup")];
        assert!(matches!(build(&instructions), Err(Error::UndefinedOrDuplicateLabel(_))));
    }

    #[test]
    fn undefined_label_is_error() {
        let table = build(&[]).unwrap();
        assert!(matches!(table.resolve("missing"), Err(Error::UndefinedOrDuplicateLabel(_))));
    }
}
