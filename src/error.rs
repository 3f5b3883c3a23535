use std::io;

/// everything that can go wrong at the boundary between the machine and its
/// host. the machine itself never fails mid-cycle; stack faults, unknown
/// opcodes and out-of-range block transfers are dropped by policy instead
#[derive(Debug, thiserror::Error)]
pub enum Chip8Error {
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("render buffer holds {actual} pixels, display needs {expected}")]
    RenderBufferSize { expected: usize, actual: usize },

    #[error("key {0:#04x} is outside the 16-key pad")]
    BadKey(u8),

    #[error("sound device failed: {0}")]
    Sound(String),
}

pub type Result<T> = std::result::Result<T, Chip8Error>;
