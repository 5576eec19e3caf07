//! The IPPcode23 execution engine: value model, frames/stacks, the
//! fetch/dispatch loop and its instruction handlers, label resolution, the
//! input reader and the error taxonomy. Turning XML into a `Vec<Instruction>`
//! is the `loader` crate's job; selecting files and process exit codes is
//! the `cli` crate's job. This crate only runs an already-decoded program.

pub mod error;
pub mod executor;
pub mod frame;
pub mod instruction;
pub mod label;
pub mod reader;
pub mod stack;
pub mod value;

pub use error::{Error, Result};
pub use executor::Executor;
pub use instruction::{Arg, ArgKind, Instruction, Opcode};
pub use reader::{InputReader, LineReader};
pub use value::Value;

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    fn instr(order: i64, opcode: Opcode, args: Vec<Arg>) -> Instruction {
        Instruction::new(order, opcode, args)
    }

    fn var(body: &str) -> Arg {
        Arg::new(ArgKind::Var, body)
    }

    fn int(body: &str) -> Arg {
        Arg::new(ArgKind::Int, body)
    }

    fn string(body: &str) -> Arg {
        Arg::new(ArgKind::String, body)
    }

    fn label(body: &str) -> Arg {
        Arg::new(ArgKind::Label, body)
    }

    fn run(instructions: Vec<Instruction>) -> (i32, String, String) {
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let input = LineReader::new(Cursor::new(Vec::<u8>::new()));
        let mut executor = Executor::new(instructions, input).unwrap();
        let code = executor.run(&mut stdout, &mut stderr).unwrap();
        (code, String::from_utf8(stdout).unwrap(), String::from_utf8(stderr).unwrap())
    }

    #[test]
    fn scenario_arithmetic_and_write() {
        // DEFVAR GF@x; MOVE GF@x int@40; ADD GF@x GF@x int@2; WRITE GF@x
        let instructions = vec![
            instr(1, Opcode::DEFVAR, vec![var("GF@x")]),
            instr(2, Opcode::MOVE, vec![var("GF@x"), int("40")]),
            instr(3, Opcode::ADD, vec![var("GF@x"), var("GF@x"), int("2")]),
            instr(4, Opcode::WRITE, vec![var("GF@x")]),
        ];
        let (code, stdout, _) = run(instructions);
        assert_eq!(code, 0);
        assert_eq!(stdout, "42");
    }

    #[test]
    fn scenario_string_escape_and_strlen() {
        let instructions = vec![
            instr(1, Opcode::DEFVAR, vec![var("GF@s")]),
            instr(2, Opcode::MOVE, vec![var("GF@s"), string("hel\\032lo")]),
            instr(3, Opcode::WRITE, vec![var("GF@s")]),
            instr(4, Opcode::DEFVAR, vec![var("GF@n")]),
            instr(5, Opcode::STRLEN, vec![var("GF@n"), var("GF@s")]),
            instr(6, Opcode::WRITE, vec![var("GF@n")]),
        ];
        let (code, stdout, _) = run(instructions);
        assert_eq!(code, 0);
        assert_eq!(stdout, "hel lo6");
    }

    #[test]
    fn scenario_call_return() {
        let instructions = vec![
            instr(1, Opcode::LABEL, vec![label("main")]),
            instr(2, Opcode::CALL, vec![label("f")]),
            instr(3, Opcode::WRITE, vec![string("done")]),
            instr(4, Opcode::EXIT, vec![int("0")]),
            instr(5, Opcode::LABEL, vec![label("f")]),
            instr(6, Opcode::WRITE, vec![string("in-f\\010")]),
            instr(7, Opcode::RETURN, vec![]),
        ];
        let (code, stdout, _) = run(instructions);
        assert_eq!(code, 0);
        assert_eq!(stdout, "in-f\ndone");
    }

    #[test]
    fn scenario_pushframe_shadows_redefinition() {
        let instructions = vec![
            instr(1, Opcode::CREATEFRAME, vec![]),
            instr(2, Opcode::DEFVAR, vec![var("TF@a")]),
            instr(3, Opcode::MOVE, vec![var("TF@a"), int("1")]),
            instr(4, Opcode::PUSHFRAME, vec![]),
            instr(5, Opcode::DEFVAR, vec![var("LF@a")]),
        ];
        let (code, _, _) = run(instructions);
        assert_eq!(code, 52);
    }

    #[test]
    fn scenario_idiv_by_zero_is_exit_57() {
        let instructions = vec![
            instr(1, Opcode::DEFVAR, vec![var("GF@r")]),
            instr(2, Opcode::IDIV, vec![var("GF@r"), int("5"), int("0")]),
        ];
        let (code, _, _) = run(instructions);
        assert_eq!(code, 57);
    }

    #[test]
    fn scenario_stack_form_lt() {
        let instructions = vec![
            instr(1, Opcode::DEFVAR, vec![var("GF@r")]),
            instr(2, Opcode::PUSHS, vec![int("3")]),
            instr(3, Opcode::PUSHS, vec![int("5")]),
            instr(4, Opcode::LTS, vec![]),
            instr(5, Opcode::POPS, vec![var("GF@r")]),
            instr(6, Opcode::WRITE, vec![var("GF@r")]),
        ];
        let (code, stdout, _) = run(instructions);
        assert_eq!(code, 0);
        assert_eq!(stdout, "true");
    }

    #[test]
    fn property_jump_round_trip() {
        // JUMP L; WRITE int@2 (skipped); LABEL L; WRITE int@1
        let instructions = vec![
            instr(1, Opcode::JUMP, vec![label("skip")]),
            instr(2, Opcode::WRITE, vec![int("2")]),
            instr(3, Opcode::LABEL, vec![label("skip")]),
            instr(4, Opcode::WRITE, vec![int("1")]),
        ];
        let (code, stdout, _) = run(instructions);
        assert_eq!(code, 0);
        assert_eq!(stdout, "1");
    }

    #[test]
    fn property_stack_form_equivalence_with_three_address() {
        let stack_form = vec![
            instr(1, Opcode::DEFVAR, vec![var("GF@r")]),
            instr(2, Opcode::PUSHS, vec![int("3")]),
            instr(3, Opcode::PUSHS, vec![int("4")]),
            instr(4, Opcode::ADDS, vec![]),
            instr(5, Opcode::POPS, vec![var("GF@r")]),
            instr(6, Opcode::WRITE, vec![var("GF@r")]),
        ];
        let three_address = vec![
            instr(1, Opcode::DEFVAR, vec![var("GF@r")]),
            instr(2, Opcode::ADD, vec![var("GF@r"), int("3"), int("4")]),
            instr(3, Opcode::WRITE, vec![var("GF@r")]),
        ];
        assert_eq!(run(stack_form).1, run(three_address).1);
    }
}
