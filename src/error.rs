use std::fmt;

/// Every failure class the executor can raise, each mapping to exactly one
/// process exit code.
///
/// Loader-only failures (malformed XML, structural violations before
/// execution starts) are not represented here: they are owned by the
/// `loader` crate and converted to a process exit directly by the CLI,
/// since the executor never observes them.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Label referenced by JUMP/CALL/JUMPIF* is not defined, or a label is
    /// defined twice during the pre-pass.
    UndefinedOrDuplicateLabel(String),
    /// Operands have incompatible or wrong kinds for the instruction.
    TypeMismatch(&'static str),
    /// A literal argument body (an `int`, `float`, `bool`, `nil` or `var`
    /// textual form) does not decode per its declared kind. This is a
    /// structural defect in the loaded document, not a type error, so it
    /// shares exit code 32 with the loader's own structural violations.
    InvalidLiteral(&'static str),
    /// Read/write access to a variable that was never `DEFVAR`-ed.
    UndefinedVariable(String),
    /// Access to `LF`/`TF` when no such frame currently exists.
    UndefinedFrame(&'static str),
    /// Read of a slot that is declared but never assigned; pop of an empty
    /// operand/call stack; or a variable redefinition via `DEFVAR`.
    UninitializedValue,
    VariableRedefinition(String),
    StackUnderflow(&'static str),
    CallStackUnderflow,
    /// Division by zero, or an `EXIT` argument outside `[0, 49]`.
    DivisionByZero,
    ExitCodeOutOfRange(i64),
    /// Index out of range, empty `SETCHAR` replacement, or an `INT2CHAR`
    /// argument outside the Unicode scalar range.
    StringIndexOutOfRange { index: i64, len: usize },
    EmptyStringOperand,
    InvalidUnicodeScalar(i64),
}

impl Error {
    /// The numeric process exit code this error class maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::UndefinedOrDuplicateLabel(_) => 52,
            Error::VariableRedefinition(_) => 52,
            Error::TypeMismatch(_) => 53,
            Error::InvalidLiteral(_) => 32,
            Error::UndefinedVariable(_) => 54,
            Error::UndefinedFrame(_) => 55,
            Error::UninitializedValue => 56,
            Error::StackUnderflow(_) => 56,
            Error::CallStackUnderflow => 56,
            Error::DivisionByZero => 57,
            Error::ExitCodeOutOfRange(_) => 57,
            Error::StringIndexOutOfRange { .. } => 58,
            Error::EmptyStringOperand => 58,
            Error::InvalidUnicodeScalar(_) => 58,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UndefinedOrDuplicateLabel(name) => {
                write!(f, "label \"{}\" is undefined or defined more than once", name)
            }
            Error::VariableRedefinition(name) => {
                write!(f, "variable \"{}\" is already defined in its frame", name)
            }
            Error::TypeMismatch(context) => write!(f, "wrong operand type(s) for {}", context),
            Error::InvalidLiteral(context) => write!(f, "malformed literal: expected {}", context),
            Error::UndefinedVariable(name) => write!(f, "variable \"{}\" does not exist", name),
            Error::UndefinedFrame(frame) => write!(f, "frame {} does not exist", frame),
            Error::UninitializedValue => write!(f, "read of an uninitialized value"),
            Error::StackUnderflow(which) => write!(f, "{} is empty", which),
            Error::CallStackUnderflow => write!(f, "RETURN with an empty call stack"),
            Error::DivisionByZero => write!(f, "division by zero"),
            Error::ExitCodeOutOfRange(code) => {
                write!(f, "EXIT code {} is out of the allowed range [0, 49]", code)
            }
            Error::StringIndexOutOfRange { index, len } => {
                write!(f, "index {} is out of range for a string of length {}", index, len)
            }
            Error::EmptyStringOperand => write!(f, "operand string must not be empty"),
            Error::InvalidUnicodeScalar(code) => {
                write!(f, "{} is not a valid Unicode scalar value", code)
            }
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
