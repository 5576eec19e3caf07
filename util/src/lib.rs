use std::{error::Error, fmt};

/// Error produced when a textual keyword does not name any variant of an
/// `EnumFromStr` enum (an opcode mnemonic, a frame name, a value-kind keyword, ...).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseEnumError {
    pub value: String,
    pub enum_name: &'static str,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "\"{}\" is not a valid {}",
            &self.value, &self.enum_name
        )
    }
}

impl Error for ParseEnumError {
    fn description(&self) -> &str {
        "failed to parse enum from string"
    }
}

/// Derivable on a fieldless enum via `util_derive::EnumFromStr` to parse its
/// variants from the exact textual spelling of their identifiers.
pub trait EnumFromStr: Sized {
    fn from_str(s: &str) -> Result<Self, ParseEnumError>;
}
