//! The fetch/dispatch loop and its instruction handlers, split into one
//! submodule per instruction family: arithmetic, control flow, frame/
//! variable ops, I/O, stack ops, strings.

mod arithmetic;
mod control;
mod frames_ops;
mod io;
mod stackops;
mod strings;

use std::io::Write;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::frame::{FrameId, FrameStore};
use crate::instruction::{Arg, ArgKind, Instruction, Opcode};
use crate::label::{self, LabelTable};
use crate::reader::InputReader;
use crate::stack::{CallStack, OperandStack};
use crate::value::{decode_string_escapes, parse_hex_float, Value};

/// What the dispatch loop should do after an instruction handler returns.
pub(crate) enum Flow {
    /// Advance to the next dense index.
    Next,
    /// Set the program counter to this dense index.
    Jump(usize),
    /// Stop the run with this process exit code.
    Exit(i32),
}

/// All mutable execution state: frames, the two auxiliary stacks, the
/// program counter, the immutable label table and the input cursor.
/// Constructed once per run from an already-loaded instruction sequence.
pub struct Executor<R: InputReader> {
    instructions: Vec<Instruction>,
    labels: LabelTable,
    frames: FrameStore,
    operand_stack: OperandStack,
    call_stack: CallStack,
    input: R,
    pc: usize,
}

impl<R: InputReader> Executor<R> {
    /// Runs the label pre-pass over `instructions` and builds a fresh
    /// executor ready to run from PC 0.
    pub fn new(instructions: Vec<Instruction>, input: R) -> Result<Executor<R>> {
        let labels = label::build(&instructions)?;
        Ok(Executor {
            instructions,
            labels,
            frames: FrameStore::new(),
            operand_stack: OperandStack::new(),
            call_stack: CallStack::new(),
            input,
            pc: 0,
        })
    }

    /// Runs to completion: either the instruction sequence is exhausted
    /// (exit code 0) or an `EXIT` instruction sets the code explicitly.
    /// Any error aborts the run and propagates to the caller, which is
    /// responsible for turning it into a process exit.
    pub fn run(&mut self, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<i32> {
        loop {
            if self.pc >= self.instructions.len() {
                return Ok(0);
            }

            let opcode = self.instructions[self.pc].opcode;
            log::trace!("dispatch pc={} opcode={:?}", self.pc, opcode);

            match self.dispatch(opcode, stdout, stderr)? {
                Flow::Next => self.pc += 1,
                Flow::Jump(target) => self.pc = target,
                Flow::Exit(code) => return Ok(code),
            }
        }
    }

    fn dispatch(&mut self, opcode: Opcode, stdout: &mut dyn Write, stderr: &mut dyn Write) -> Result<Flow> {
        use Opcode::*;
        match opcode {
            // Frames and variables
            DEFVAR => self.op_defvar(),
            MOVE => self.op_move(),
            CREATEFRAME => self.op_createframe(),
            PUSHFRAME => self.op_pushframe(),
            POPFRAME => self.op_popframe(),

            // Control flow
            LABEL => Ok(Flow::Next),
            JUMP => self.op_jump(),
            JUMPIFEQ => self.op_jumpifeq(true),
            JUMPIFNEQ => self.op_jumpifeq(false),
            JUMPIFEQS => self.op_jumpifeqs(true),
            JUMPIFNEQS => self.op_jumpifeqs(false),
            CALL => self.op_call(),
            RETURN => self.op_return(),
            EXIT => self.op_exit(),

            // Stack operations
            PUSHS => self.op_pushs(),
            POPS => self.op_pops(),
            CLEARS => self.op_clears(),

            // Arithmetic, logic, comparison
            ADD => self.op_arith(Arithmetic::Add, Form::ThreeAddress),
            SUB => self.op_arith(Arithmetic::Sub, Form::ThreeAddress),
            MUL => self.op_arith(Arithmetic::Mul, Form::ThreeAddress),
            IDIV => self.op_idiv(Form::ThreeAddress),
            DIV => self.op_div(Form::ThreeAddress),
            LT => self.op_compare(Compare::Lt, Form::ThreeAddress),
            GT => self.op_compare(Compare::Gt, Form::ThreeAddress),
            EQ => self.op_compare(Compare::Eq, Form::ThreeAddress),
            AND => self.op_bool(Bool::And, Form::ThreeAddress),
            OR => self.op_bool(Bool::Or, Form::ThreeAddress),
            NOT => self.op_not(Form::ThreeAddress),
            ADDS => self.op_arith(Arithmetic::Add, Form::StackForm),
            SUBS => self.op_arith(Arithmetic::Sub, Form::StackForm),
            MULS => self.op_arith(Arithmetic::Mul, Form::StackForm),
            IDIVS => self.op_idiv(Form::StackForm),
            LTS => self.op_compare(Compare::Lt, Form::StackForm),
            GTS => self.op_compare(Compare::Gt, Form::StackForm),
            EQS => self.op_compare(Compare::Eq, Form::StackForm),
            ANDS => self.op_bool(Bool::And, Form::StackForm),
            ORS => self.op_bool(Bool::Or, Form::StackForm),
            NOTS => self.op_not(Form::StackForm),

            // Strings and conversions
            INT2CHAR => self.op_int2char(Form::ThreeAddress),
            STRI2INT => self.op_stri2int(Form::ThreeAddress),
            INT2CHARS => self.op_int2char(Form::StackForm),
            STRI2INTS => self.op_stri2int(Form::StackForm),
            INT2FLOAT => self.op_int2float(),
            FLOAT2INT => self.op_float2int(),
            CONCAT => self.op_concat(),
            STRLEN => self.op_strlen(),
            GETCHAR => self.op_getchar(),
            SETCHAR => self.op_setchar(),
            TYPE => self.op_type(),

            // I/O
            READ => self.op_read(),
            WRITE => self.op_write(stdout),
            DPRINT => self.op_dprint(stderr),
            BREAK => self.op_break(stderr),
        }
    }

    fn instr(&self) -> &Instruction {
        &self.instructions[self.pc]
    }

    /// Resolves a `symb` argument: variables are looked up live; literals
    /// are decoded from their textual body.
    fn resolve(&self, arg: &Arg) -> Result<Value> {
        match arg.kind {
            ArgKind::Var => {
                let (frame, name) = split_var(&arg.body)?;
                self.frames.get(frame, name)
            }
            ArgKind::Int => arg
                .body
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| Error::InvalidLiteral("a signed decimal int literal")),
            ArgKind::Float => parse_hex_float(&arg.body)
                .map(Value::Float)
                .ok_or(Error::InvalidLiteral("a hexadecimal float literal")),
            ArgKind::Bool => match arg.body.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(Error::InvalidLiteral("\"true\" or \"false\"")),
            },
            ArgKind::Nil => {
                if arg.body == "nil" {
                    Ok(Value::Nil)
                } else {
                    Err(Error::InvalidLiteral("the literal \"nil\""))
                }
            }
            ArgKind::String => Ok(Value::String(decode_string_escapes(&arg.body))),
            ArgKind::Label | ArgKind::Type => {
                unreachable!("label/type arguments are consumed literally, never resolved")
            }
        }
    }

    /// Like [`resolve`](Self::resolve), but an uninitialized variable
    /// yields `None` rather than an error — the one exception `TYPE` needs.
    fn resolve_for_type(&self, arg: &Arg) -> Result<Option<Value>> {
        match arg.kind {
            ArgKind::Var => {
                let (frame, name) = split_var(&arg.body)?;
                self.frames.get_for_type(frame, &name)
            }
            _ => self.resolve(arg).map(Some),
        }
    }

    /// Splits a `var` argument's target frame and variable name. Returns an
    /// owned name so callers are not left holding a borrow of a transient
    /// `Arg` (the instruction stream itself is always borrowed from `self`).
    fn target_var(&self, arg: &Arg) -> Result<(FrameId, String)> {
        debug_assert_eq!(arg.kind, ArgKind::Var);
        split_var(&arg.body)
    }
}

fn split_var(body: &str) -> Result<(FrameId, String)> {
    let (frame_str, name) = body
        .split_once('@')
        .ok_or(Error::InvalidLiteral("a var argument of the form FRAME@name"))?;
    let frame = FrameId::from_str(frame_str)
        .map_err(|_| Error::InvalidLiteral("a var argument naming GF, LF or TF"))?;
    Ok((frame, name.to_owned()))
}

#[derive(Clone, Copy)]
pub(crate) enum Form {
    ThreeAddress,
    StackForm,
}

#[derive(Clone, Copy)]
pub(crate) enum Arithmetic {
    Add,
    Sub,
    Mul,
}

#[derive(Clone, Copy)]
pub(crate) enum Compare {
    Lt,
    Gt,
    Eq,
}

#[derive(Clone, Copy)]
pub(crate) enum Bool {
    And,
    Or,
}
