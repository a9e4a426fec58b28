//! Session convenience layer
//!
//! Pairs the compiler with an engine at the historical default tape size,
//! and offers a "current session" slot for callers that drive one program
//! at a time. The slot is a plain value the caller owns — one per driving
//! thread — so no state is shared and no locking exists.

use crate::compiler::{self, CompileError};
use crate::engine::io::{ByteSink, ByteSource};
use crate::engine::{Engine, RunStatus, RuntimeError};

/// Default tape size in cells.
pub const DEFAULT_TAPE_CELLS: usize = 65_535;

/// A compiled program bound to a fresh engine.
pub struct Session {
    engine: Engine,
}

impl Session {
    /// Compile `source` and bind it to an engine with the default tape.
    pub fn new(source: &str) -> Result<Self, CompileError> {
        Self::with_tape_cells(source, DEFAULT_TAPE_CELLS)
    }

    pub fn with_tape_cells(source: &str, cells: usize) -> Result<Self, CompileError> {
        let program = compiler::compile(source)?;
        Ok(Self {
            engine: Engine::new(program, cells),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn run<R, W>(
        &mut self,
        input: &mut R,
        output: &mut W,
        max_steps: u64,
    ) -> Result<RunStatus, RuntimeError>
    where
        R: ByteSource + ?Sized,
        W: ByteSink + ?Sized,
    {
        self.engine.run(input, output, max_steps)
    }

    /// Restore the session to a just-compiled state.
    pub fn reset(&mut self) {
        self.engine.reset();
    }
}

/// Caller-owned "current session" slot.
///
/// Each thread that wants a selected session owns one of these; selecting a
/// session hands back the previously selected one.
#[derive(Default)]
pub struct SessionRegistry {
    current: Option<Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `session` current, returning the session it displaces.
    pub fn select(&mut self, session: Session) -> Option<Session> {
        self.current.replace(session)
    }

    /// Clear the slot, returning the session that was current.
    pub fn deselect(&mut self) -> Option<Session> {
        self.current.take()
    }

    pub fn current(&mut self) -> Option<&mut Session> {
        self.current.as_mut()
    }
}
