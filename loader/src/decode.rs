//! Turns the raw, loosely-typed tree from [`crate::xml`] into the core's
//! `Vec<Instruction>`: sorts by `order`, rejects duplicate/non-positive
//! orders, parses opcodes and argument kinds, checks arity, and validates
//! the syntactic shape of `var` argument bodies. Everything a `var`
//! body might still get wrong at runtime — an undefined frame or variable —
//! is left to the executor, which is the only place with live frame state.

use std::collections::HashSet;
use std::str::FromStr;

use ippvm::{Arg, ArgKind, Instruction, Opcode};

use crate::error::{Error, Result};
use crate::xml::RawInstruction;

pub fn decode(mut raw: Vec<RawInstruction>) -> Result<Vec<Instruction>> {
    raw.sort_by_key(|instr| instr.order);
    reject_duplicate_or_nonpositive_orders(&raw)?;

    raw.into_iter().map(decode_instruction).collect()
}

fn reject_duplicate_or_nonpositive_orders(raw: &[RawInstruction]) -> Result<()> {
    let mut seen = HashSet::new();
    for instr in raw {
        if instr.order <= 0 {
            return Err(Error::Structural(format!("instruction order {} is not positive", instr.order)));
        }
        if !seen.insert(instr.order) {
            return Err(Error::Structural(format!("instruction order {} appears more than once", instr.order)));
        }
    }
    Ok(())
}

fn decode_instruction(raw: RawInstruction) -> Result<Instruction> {
    let mnemonic = raw.opcode.to_ascii_uppercase();
    let opcode = Opcode::from_str(&mnemonic)
        .map_err(|_| Error::Structural(format!("unknown opcode \"{}\"", raw.opcode)))?;

    if raw.args.len() != opcode.arity() {
        return Err(Error::Structural(format!(
            "{} requires {} argument(s), found {}",
            mnemonic,
            opcode.arity(),
            raw.args.len()
        )));
    }

    let args = raw.args.into_iter().map(decode_arg).collect::<Result<Vec<_>>>()?;
    Ok(Instruction::new(raw.order, opcode, args))
}

fn decode_arg(raw: crate::xml::RawArg) -> Result<Arg> {
    let kind = ArgKind::from_str(&raw.kind)
        .map_err(|_| Error::Structural(format!("unknown argument type \"{}\"", raw.kind)))?;
    if kind == ArgKind::Var {
        validate_var_shape(&raw.body)?;
    }
    Ok(Arg::new(kind, raw.body))
}

/// A `var` body must have the syntactic form `FRAME@name` with `FRAME` one
/// of `GF`, `LF`, `TF`. The executor still resolves `name` against live
/// frame state; this only rules out a malformed document.
fn validate_var_shape(body: &str) -> Result<()> {
    let (frame, name) = body
        .split_once('@')
        .ok_or_else(|| Error::Structural(format!("\"{}\" is not a valid var of the form FRAME@name", body)))?;
    if !matches!(frame, "GF" | "LF" | "TF") {
        return Err(Error::Structural(format!("\"{}\" does not name GF, LF or TF", frame)));
    }
    if name.is_empty() {
        return Err(Error::Structural(format!("\"{}\" has an empty variable name", body)));
    }
    Ok(())
}
