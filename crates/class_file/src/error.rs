use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClassFileError {
    #[error("Unexpected end of class file")]
    UnexpectedEof,
    #[error(transparent)]
    IOError(io::Error),
    #[error("Invalid magic identifier: 0x{0:X}")]
    InvalidMagic(u32),
    #[error("Invalid cp info tag: {0}")]
    InvalidConstantTag(u8),
    #[error("Invalid constant pool index: {0}")]
    InvalidIndex(u16),
    #[error("Expected {expected} at constant pool index {index}, found {found}")]
    TypeMismatch {
        index: u16,
        expected: &'static str,
        found: &'static str,
    },
    #[error("Malformed modified UTF-8 at constant pool index {0}")]
    InvalidUtf8(u16),
}

impl From<io::Error> for ClassFileError {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof => ClassFileError::UnexpectedEof,
            _ => ClassFileError::IOError(e),
        }
    }
}
