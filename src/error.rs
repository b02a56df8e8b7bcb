use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced to the host; none of them are retried internally.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("program is too large ({size} bytes), max size is {max_size} bytes")]
    ProgramTooLarge { size: usize, max_size: usize },

    #[error("unrecognized instruction {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    #[error("stack overflow: call at {pc:#05X} with a full call stack")]
    StackOverflow { pc: u16 },

    #[error("stack underflow: return at {pc:#05X} with an empty call stack")]
    StackUnderflow { pc: u16 },
}
