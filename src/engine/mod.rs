//! bfk execution engine — loop-table dispatch over a growable tape
//!
//! Design notes:
//! - Instructions are Copy enums; the hot loop is fetch, advance, match.
//! - Loop boundaries never rescan source: each consults one LoopRecord and
//!   adjusts the program counter by a precomputed distance.
//! - Loop numbers are threaded through a register, not derived from the
//!   program counter. Entering a loop loads its inner link, leaving it loads
//!   its sibling link; a missing link leaves the register unchanged, which
//!   keeps the right record selected for siblings of a just-exited loop.

pub mod io;
pub mod tape;

use std::fmt;

use tracing::{debug, trace};

use crate::compiler::instruction::{Instruction, Program};
use io::{ByteSink, ByteSource};
use tape::Tape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeError {
    /// MoveLeft executed with the cursor at cell 0.
    CursorUnderflow,
    /// Tape growth could not be allocated.
    OutOfMemory,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::CursorUnderflow => {
                write!(f, "runtime error: cursor moved left of cell 0")
            }
            RuntimeError::OutOfMemory => {
                write!(f, "runtime error: tape growth allocation failed")
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Outcome of a `run` call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// The program reached its End instruction.
    Completed,
    /// The step budget ran out first; call `run` again to resume.
    Paused,
}

/// One interpreter session: a compiled program, its tape, and the execution
/// registers. Exclusively owned by the thread driving it.
pub struct Engine {
    program: Program,
    tape: Tape,
    pc: usize,
    current_loop: usize,
    fault: Option<RuntimeError>,
}

impl Engine {
    pub fn new(program: Program, tape_cells: usize) -> Self {
        Self {
            program,
            tape: Tape::new(tape_cells),
            pc: 0,
            current_loop: 0,
            fault: None,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// True once the engine has hit its End instruction.
    pub fn finished(&self) -> bool {
        self.program.code[self.pc] == Instruction::End
    }

    /// Return the session to its initial state: zeroed tape, cursor and
    /// program counter at 0, loop register cleared, any fault forgotten.
    pub fn reset(&mut self) {
        self.tape.clear();
        self.pc = 0;
        self.current_loop = 0;
        self.fault = None;
    }

    /// Execute up to `max_steps` instructions (0 = unbounded).
    ///
    /// Returns `Completed` when the End sentinel is reached, `Paused` when
    /// the step budget runs out first; a paused engine resumes on the next
    /// call. A fatal error halts execution where it stands and latches: the
    /// session replays the error until `reset` or disposal.
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
        if let Some(err) = self.fault {
            return Err(err);
        }
        debug!(pc = self.pc, max_steps, "run");

        let mut steps: u64 = 0;
        loop {
            if max_steps != 0 && steps == max_steps {
                debug!(pc = self.pc, steps, "step budget exhausted");
                return Ok(RunStatus::Paused);
            }

            let inst = self.program.code[self.pc];
            steps += 1;
            match inst {
                Instruction::Increment => self.tape.increment(),
                Instruction::Decrement => self.tape.decrement(),
                Instruction::MoveLeft => self.checked(Tape::move_left)?,
                Instruction::MoveRight => self.checked(Tape::move_right)?,
                Instruction::ReadByte => {
                    // End of input stores 0; a dry input is not an error.
                    self.tape.set(input.read_byte().unwrap_or(0));
                }
                Instruction::WriteByte => output.write_byte(self.tape.get()),
                Instruction::LoopStart => {
                    let record = self.program.loops[self.current_loop];
                    if self.tape.get() == 0 {
                        self.pc += record.body_len;
                        self.relink(record.sibling);
                        trace!(pc = self.pc, loop_no = self.current_loop, "loop skipped");
                    } else {
                        self.relink(record.inner);
                        trace!(pc = self.pc, loop_no = self.current_loop, "loop entered");
                    }
                }
                Instruction::LoopEnd => {
                    let record = self.program.loops[self.current_loop];
                    if self.tape.get() != 0 {
                        self.pc -= record.body_len;
                        self.relink(record.inner);
                        trace!(pc = self.pc, loop_no = self.current_loop, "loop repeated");
                    } else {
                        self.relink(record.sibling);
                        trace!(pc = self.pc, loop_no = self.current_loop, "loop exited");
                    }
                }
                Instruction::End => {
                    // pc stays on the sentinel; a later run completes at once.
                    debug!(steps, "program completed");
                    return Ok(RunStatus::Completed);
                }
            }
            self.pc += 1;
        }
    }

    /// Follow a loop link, leaving the register unchanged when the link is
    /// absent. Loops that are siblings of the loop most recently exited
    /// depend on this exact fallback.
    fn relink(&mut self, link: Option<usize>) {
        if let Some(loop_no) = link {
            self.current_loop = loop_no;
        }
    }

    /// Run a fallible tape operation, latching any fatal error.
    fn checked(
        &mut self,
        op: fn(&mut Tape) -> Result<(), RuntimeError>,
    ) -> Result<(), RuntimeError> {
        match op(&mut self.tape) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.fault = Some(err);
                Err(err)
            }
        }
    }
}
