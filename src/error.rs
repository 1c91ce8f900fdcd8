// Error types for the task store and codec

use std::path::PathBuf;
use thiserror::Error;

/// Which text field of a task a bounded-length check applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Description,
    DueDate,
}

impl Field {
    /// Maximum length of the field, in characters
    pub fn max_len(self) -> usize {
        match self {
            Field::Description => crate::task::MAX_DESCRIPTION_LEN,
            Field::DueDate => crate::task::MAX_DUE_DATE_LEN,
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Field::Description => write!(f, "description"),
            Field::DueDate => write!(f, "due date"),
        }
    }
}

/// Text exceeded the bounded length of its field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} is {len} characters long (max {max})")]
pub struct Oversized {
    pub field: Field,
    pub len: usize,
    pub max: usize,
}

/// Why a persisted line could not be turned into a task
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("expected 3 fields, found {0}")]
    FieldCount(usize),

    #[error("invalid escape sequence `\\{0}`")]
    BadEscape(char),

    #[error("line ends with a dangling escape character")]
    DanglingEscape,

    #[error("completion flag must be `0` or `1`, found `{0}`")]
    BadFlag(String),

    #[error(transparent)]
    Oversized(#[from] Oversized),

    #[error("line is not valid UTF-8")]
    NotUtf8,
}

/// A persisted line that was skipped during decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct MalformedLine {
    /// 1-based line number within the file
    pub line: usize,
    pub reason: LineError,
}

/// Errors surfaced by store and codec operations
///
/// None of these are fatal: the store remains usable after any of them.
#[derive(Debug, Error)]
pub enum TodoError {
    /// Position passed to `mark_completed`/`remove` is out of range.
    #[error("no task at position {index} (store holds {size})")]
    InvalidIndex { index: usize, size: usize },

    /// Text passed to `add` exceeds the bounded length.
    #[error(transparent)]
    OversizedField(#[from] Oversized),

    /// A persisted line did not decode into a task.
    #[error(transparent)]
    MalformedLine(#[from] MalformedLine),

    /// The persistence destination could not be opened, read, or written.
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Factorial input is above the representable ceiling.
    #[error("factorial of {n} overflows (max input {max})")]
    FactorialOverflow { n: u32, max: u32 },
}

/// Result type for store and codec operations
pub type Result<T> = std::result::Result<T, TodoError>;

impl TodoError {
    /// Create an IO error with the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
