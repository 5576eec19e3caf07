//! Decodes an IPPcode23 `program` XML document into the sequence of
//! `ippvm::Instruction`s the executor runs. This crate performs no
//! execution semantics: it validates the document shape, normalises
//! opcodes and argument kinds, and syntactically checks `var` bodies, but
//! leaves frame/variable resolution and literal decoding to the executor.

pub mod decode;
pub mod error;
mod xml;

pub use error::Error;

/// Parses and decodes `xml` into an ordered, dense instruction sequence
/// ready for [`ippvm::Executor::new`].
pub fn load(xml: &str) -> error::Result<Vec<ippvm::Instruction>> {
    log::debug!("parsing program document ({} bytes)", xml.len());
    let raw = self::xml::parse(xml)?;
    log::trace!("parsed {} raw instruction(s)", raw.len());
    let instructions = decode::decode(raw)?;
    log::debug!("decoded {} instruction(s)", instructions.len());
    Ok(instructions)
}


/// Whole-program integration tests: an in-memory XML document runs through
/// the full `load` -> `ippvm::Executor` pipeline, with an in-memory
/// stdout/stderr sink and an in-memory input source, exactly as the CLI
/// front-end wires the two crates together.
#[cfg(test)]
mod integration_test {
    use std::io::Cursor;

    use ippvm::{Executor, LineReader};

    use super::load;

    fn run(xml: &str, input: &str) -> (i32, String, String) {
        let instructions = load(xml).unwrap();
        let reader = LineReader::new(Cursor::new(input.as_bytes().to_vec()));
        let mut executor = Executor::new(instructions, reader).unwrap();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let code = executor.run(&mut stdout, &mut stderr).unwrap();
        (code, String::from_utf8(stdout).unwrap(), String::from_utf8(stderr).unwrap())
    }

    #[test]
    fn scenario_arithmetic() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@x</arg1></instruction>
    <instruction order="2" opcode="MOVE"><arg1 type="var">GF@x</arg1><arg2 type="int">40</arg2></instruction>
    <instruction order="3" opcode="ADD"><arg1 type="var">GF@x</arg1><arg2 type="var">GF@x</arg2><arg3 type="int">2</arg3></instruction>
    <instruction order="4" opcode="WRITE"><arg1 type="var">GF@x</arg1></instruction>
</program>"#;
        let (code, stdout, _) = run(xml, "");
        assert_eq!(code, 0);
        assert_eq!(stdout, "42");
    }

    #[test]
    fn scenario_string_escape_and_length() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@s</arg1></instruction>
    <instruction order="2" opcode="MOVE"><arg1 type="var">GF@s</arg1><arg2 type="string">hel\032lo</arg2></instruction>
    <instruction order="3" opcode="WRITE"><arg1 type="var">GF@s</arg1></instruction>
    <instruction order="4" opcode="DEFVAR"><arg1 type="var">GF@n</arg1></instruction>
    <instruction order="5" opcode="STRLEN"><arg1 type="var">GF@n</arg1><arg2 type="var">GF@s</arg2></instruction>
    <instruction order="6" opcode="WRITE"><arg1 type="var">GF@n</arg1></instruction>
</program>"#;
        let (code, stdout, _) = run(xml, "");
        assert_eq!(code, 0);
        assert_eq!(stdout, "hel lo6");
    }

    #[test]
    fn scenario_call_return() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="LABEL"><arg1 type="label">main</arg1></instruction>
    <instruction order="2" opcode="CALL"><arg1 type="label">f</arg1></instruction>
    <instruction order="3" opcode="WRITE"><arg1 type="string">done</arg1></instruction>
    <instruction order="4" opcode="EXIT"><arg1 type="int">0</arg1></instruction>
    <instruction order="5" opcode="LABEL"><arg1 type="label">f</arg1></instruction>
    <instruction order="6" opcode="WRITE"><arg1 type="string">in-f\010</arg1></instruction>
    <instruction order="7" opcode="RETURN"></instruction>
</program>"#;
        let (code, stdout, _) = run(xml, "");
        assert_eq!(code, 0);
        assert_eq!(stdout, "in-f\ndone");
    }

    #[test]
    fn scenario_frame_lifecycle_shadows_redefinition() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="CREATEFRAME"></instruction>
    <instruction order="2" opcode="DEFVAR"><arg1 type="var">TF@a</arg1></instruction>
    <instruction order="3" opcode="MOVE"><arg1 type="var">TF@a</arg1><arg2 type="int">1</arg2></instruction>
    <instruction order="4" opcode="PUSHFRAME"></instruction>
    <instruction order="5" opcode="DEFVAR"><arg1 type="var">LF@a</arg1></instruction>
</program>"#;
        let (code, _, _) = run(xml, "");
        assert_eq!(code, 52);
    }

    #[test]
    fn scenario_division_by_zero() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@r</arg1></instruction>
    <instruction order="2" opcode="IDIV"><arg1 type="var">GF@r</arg1><arg2 type="int">5</arg2><arg3 type="int">0</arg3></instruction>
</program>"#;
        let (code, _, _) = run(xml, "");
        assert_eq!(code, 57);
    }

    #[test]
    fn scenario_stack_form_comparison() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@r</arg1></instruction>
    <instruction order="2" opcode="PUSHS"><arg1 type="int">3</arg1></instruction>
    <instruction order="3" opcode="PUSHS"><arg1 type="int">5</arg1></instruction>
    <instruction order="4" opcode="LTS"></instruction>
    <instruction order="5" opcode="POPS"><arg1 type="var">GF@r</arg1></instruction>
    <instruction order="6" opcode="WRITE"><arg1 type="var">GF@r</arg1></instruction>
</program>"#;
        let (code, stdout, _) = run(xml, "");
        assert_eq!(code, 0);
        assert_eq!(stdout, "true");
    }

    #[test]
    fn read_pulls_from_the_supplied_input_stream() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="DEFVAR"><arg1 type="var">GF@n</arg1></instruction>
    <instruction order="2" opcode="READ"><arg1 type="var">GF@n</arg1><arg2 type="type">int</arg2></instruction>
    <instruction order="3" opcode="WRITE"><arg1 type="var">GF@n</arg1></instruction>
</program>"#;
        let (code, stdout, _) = run(xml, "7\n");
        assert_eq!(code, 0);
        assert_eq!(stdout, "7");
    }

    #[test]
    fn undefined_label_at_execution_is_exit_52() {
        let xml = r#"<program language="IPPcode23">
    <instruction order="1" opcode="JUMP"><arg1 type="label">nowhere</arg1></instruction>
</program>"#;
        let instructions = load(xml).unwrap();
        let reader = LineReader::new(Cursor::new(Vec::<u8>::new()));
        let mut executor = Executor::new(instructions, reader).unwrap();
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();
        let err = executor.run(&mut stdout, &mut stderr).unwrap_err();
        assert_eq!(err.exit_code(), 52);
    }
}
