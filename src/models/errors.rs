use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Log data truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("Array {word} word does not fit in the addressable range")]
    WordOutOfRange { word: &'static str },
    #[error("Array length {len} exceeds the ceiling of {max} addresses")]
    LengthExceedsCeiling { len: usize, max: usize },
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Invalid transaction hash on line {line}: {value}")]
    InvalidTxHash { line: usize, value: String },
}
