//! I/O collaborator contracts for the execution engine
//!
//! The engine performs ReadByte/WriteByte through these one-method traits
//! rather than talking to file descriptors. Both are infallible by contract:
//! end-of-input is a value (`None`), not an error, and a sink that cannot
//! accept a byte drops it.

use std::io::{Read, Write};

/// Byte-at-a-time input collaborator.
pub trait ByteSource {
    /// Next byte, or `None` at end of input.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Byte-at-a-time output collaborator.
pub trait ByteSink {
    fn write_byte(&mut self, byte: u8);
}

/// Any reader is a byte source. A read error is treated as end of input;
/// ReadByte stores 0 for both, which is the engine's end-of-input policy.
impl<R: Read> ByteSource for R {
    fn read_byte(&mut self) -> Option<u8> {
        let mut buf = [0u8; 1];
        match self.read(&mut buf) {
            Ok(1) => Some(buf[0]),
            _ => None,
        }
    }
}

/// Any writer is a byte sink.
impl<W: Write> ByteSink for W {
    fn write_byte(&mut self, byte: u8) {
        let _ = self.write_all(&[byte]);
    }
}
