use std::str::FromStr;

use util::EnumFromStr;
use util_derive::EnumFromStr;

/// The complete IPPcode23 instruction set. Variant names are spelled
/// exactly as the uppercased opcode mnemonic, so `EnumFromStr` can parse
/// one straight from the loader's normalised `opcode` attribute.
#[derive(Clone, Copy, PartialEq, Eq, Debug, EnumFromStr)]
pub enum Opcode {
    // Frames and variables --------------------------------------------
    MOVE,
    CREATEFRAME,
    PUSHFRAME,
    POPFRAME,
    DEFVAR,
    // Control flow ------------------------------------------------------
    CALL,
    RETURN,
    LABEL,
    JUMP,
    JUMPIFEQ,
    JUMPIFNEQ,
    EXIT,
    // Stack operations --------------------------------------------------
    PUSHS,
    POPS,
    CLEARS,
    // Arithmetic, logic, comparison --------------------------------------
    ADD,
    SUB,
    MUL,
    IDIV,
    DIV,
    LT,
    GT,
    EQ,
    AND,
    OR,
    NOT,
    ADDS,
    SUBS,
    MULS,
    IDIVS,
    LTS,
    GTS,
    EQS,
    ANDS,
    ORS,
    NOTS,
    // Strings and conversions --------------------------------------------
    INT2CHAR,
    STRI2INT,
    INT2FLOAT,
    FLOAT2INT,
    CONCAT,
    STRLEN,
    GETCHAR,
    SETCHAR,
    TYPE,
    INT2CHARS,
    STRI2INTS,
    // Stack-form jumps ----------------------------------------------------
    JUMPIFEQS,
    JUMPIFNEQS,
    // I/O -----------------------------------------------------------------
    READ,
    WRITE,
    DPRINT,
    BREAK,
}

impl Opcode {
    /// Number of `arg*` elements this opcode's instructions must carry.
    /// Used by the loader and, defensively, by the executor right before
    /// dispatch.
    pub fn arity(self) -> usize {
        use Opcode::*;
        match self {
            CREATEFRAME | PUSHFRAME | POPFRAME | RETURN | BREAK | CLEARS | ADDS | SUBS | MULS
            | IDIVS | LTS | GTS | EQS | ANDS | ORS | NOTS | INT2CHARS | STRI2INTS => 0,
            DEFVAR | CALL | PUSHS | POPS | LABEL | JUMP | EXIT | DPRINT | WRITE | JUMPIFEQS
            | JUMPIFNEQS => 1,
            MOVE | NOT | INT2CHAR | INT2FLOAT | FLOAT2INT | READ | STRLEN | TYPE => 2,
            ADD | SUB | MUL | IDIV | DIV | LT | GT | EQ | AND | OR | STRI2INT | CONCAT
            | GETCHAR | SETCHAR | JUMPIFEQ | JUMPIFNEQ => 3,
        }
    }
}

/// The declared kind of an argument, exactly as named by its XML `type`
/// attribute. `label` and `type` arguments are consumed literally by their
/// owning instructions and never resolved to a [`crate::value::Value`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ArgKind {
    Int,
    Float,
    Bool,
    String,
    Nil,
    Label,
    Type,
    Var,
}

impl FromStr for ArgKind {
    type Err = util::ParseEnumError;

    fn from_str(s: &str) -> Result<ArgKind, util::ParseEnumError> {
        match s {
            "int" => Ok(ArgKind::Int),
            "float" => Ok(ArgKind::Float),
            "bool" => Ok(ArgKind::Bool),
            "string" => Ok(ArgKind::String),
            "nil" => Ok(ArgKind::Nil),
            "label" => Ok(ArgKind::Label),
            "type" => Ok(ArgKind::Type),
            "var" => Ok(ArgKind::Var),
            _ => Err(util::ParseEnumError {
                value: s.to_owned(),
                enum_name: "ArgKind",
            }),
        }
    }
}

/// A decoded-but-unresolved argument: the declared kind plus its raw
/// textual body. Resolution against live frames/escapes happens at
/// execution time, since it needs runtime state the loader lacks.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub kind: ArgKind,
    pub body: String,
}

impl Arg {
    pub fn new(kind: ArgKind, body: impl Into<String>) -> Arg {
        Arg { kind, body: body.into() }
    }
}

/// One decoded instruction: its original source `order` (kept for
/// diagnostics; execution addresses instructions by dense index), its
/// opcode, and its ordered arguments.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub order: i64,
    pub opcode: Opcode,
    pub args: Vec<Arg>,
}

impl Instruction {
    pub fn new(order: i64, opcode: Opcode, args: Vec<Arg>) -> Instruction {
        Instruction { order, opcode, args }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn opcode_parses_from_uppercase_mnemonic() {
        assert_eq!(Opcode::from_str("ADD"), Ok(Opcode::ADD));
        assert_eq!(Opcode::from_str("JUMPIFEQS"), Ok(Opcode::JUMPIFEQS));
        assert!(Opcode::from_str("ADDSS").is_err());
    }

    #[test]
    fn arity_table_matches_spec() {
        assert_eq!(Opcode::CREATEFRAME.arity(), 0);
        assert_eq!(Opcode::DEFVAR.arity(), 1);
        assert_eq!(Opcode::MOVE.arity(), 2);
        assert_eq!(Opcode::ADD.arity(), 3);
        assert_eq!(Opcode::JUMPIFEQS.arity(), 1);
    }

    #[test]
    fn arg_kind_parses_lowercase_keywords() {
        assert_eq!(ArgKind::from_str("var"), Ok(ArgKind::Var));
        assert_eq!(ArgKind::from_str("string"), Ok(ArgKind::String));
        assert!(ArgKind::from_str("VAR").is_err());
    }
}
