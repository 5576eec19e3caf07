use std::fmt;

/// Failures that can occur before the core ever sees an instruction: a
/// malformed XML document (exit 31) or a well-formed document that
/// violates the expected `program`/`instruction`/`arg*` shape (exit 32).
/// The core's own `Error` is a separate enum entirely — the two
/// never overlap, since the loader runs to completion before execution
/// starts.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    Malformed(String),
    Structural(String),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Malformed(_) => 31,
            Error::Structural(_) => 32,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Malformed(msg) => write!(f, "malformed XML: {}", msg),
            Error::Structural(msg) => write!(f, "malformed program document: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Error {
        Error::Malformed(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
