//! bfk instruction set and compiled program representation

use std::fmt;

/// One interpreter instruction.
///
/// The compiler emits these as a dense `Vec<Instruction>` indexed by the
/// program counter, terminated by a single `End` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `+` — tape[cursor] += 1, wrapping at the byte boundary
    Increment,
    /// `-` — tape[cursor] -= 1, wrapping at the byte boundary
    Decrement,
    /// `<` — cursor -= 1; underflow is fatal
    MoveLeft,
    /// `>` — cursor += 1; the tape doubles when the cursor reaches its end
    MoveRight,
    /// `,` — one byte from the input collaborator into tape[cursor]
    ReadByte,
    /// `.` — tape[cursor] to the output collaborator
    WriteByte,
    /// `[` — skip the loop body when tape[cursor] == 0
    LoopStart,
    /// `]` — repeat the loop body when tape[cursor] != 0
    LoopEnd,
    /// Sentinel appended by the compiler; terminates execution
    End,
}

impl Instruction {
    /// Map a source character to its instruction. Anything outside the
    /// eight-symbol command alphabet is a comment and maps to None.
    pub fn from_symbol(c: char) -> Option<Instruction> {
        match c {
            '+' => Some(Instruction::Increment),
            '-' => Some(Instruction::Decrement),
            '<' => Some(Instruction::MoveLeft),
            '>' => Some(Instruction::MoveRight),
            ',' => Some(Instruction::ReadByte),
            '.' => Some(Instruction::WriteByte),
            '[' => Some(Instruction::LoopStart),
            ']' => Some(Instruction::LoopEnd),
            _ => None,
        }
    }

    /// True for the two loop-boundary instructions.
    pub fn is_loop_boundary(self) -> bool {
        matches!(self, Instruction::LoopStart | Instruction::LoopEnd)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Instruction::Increment => write!(f, "INC"),
            Instruction::Decrement => write!(f, "DEC"),
            Instruction::MoveLeft => write!(f, "MOVE_LEFT"),
            Instruction::MoveRight => write!(f, "MOVE_RIGHT"),
            Instruction::ReadByte => write!(f, "READ_BYTE"),
            Instruction::WriteByte => write!(f, "WRITE_BYTE"),
            Instruction::LoopStart => write!(f, "LOOP_START"),
            Instruction::LoopEnd => write!(f, "LOOP_END"),
            Instruction::End => write!(f, "END"),
        }
    }
}

/// Precomputed jump metadata for one matched `[...]` pair.
///
/// Records are indexed by loop number, assigned in the order LoopStart
/// instructions are encountered during compilation (0-based). Execution does
/// not resolve loop numbers from the program counter; it threads them through
/// a register, following `inner`/`sibling` links at each boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopRecord {
    /// Distance in instructions from the LoopStart to its matching LoopEnd.
    pub body_len: usize,
    /// First loop nested immediately inside this one, if any.
    pub inner: Option<usize>,
    /// Next loop opening at the same depth after this loop closes, or the
    /// enclosing loop when the next bracket in the stream is a LoopEnd.
    pub sibling: Option<usize>,
}

impl fmt::Display for LoopRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let link = |l: Option<usize>| match l {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "body_len={} inner={} sibling={}",
            self.body_len,
            link(self.inner),
            link(self.sibling)
        )
    }
}

/// A compiled program: the instruction stream plus its loop-jump table.
#[derive(Debug, Clone)]
pub struct Program {
    pub code: Vec<Instruction>,
    pub loops: Vec<LoopRecord>,
}

impl Program {
    /// Number of instructions, including the End sentinel.
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        // A compiled program always carries at least the End sentinel.
        self.code.len() <= 1
    }

    /// Number of matched loops in the program.
    pub fn loop_count(&self) -> usize {
        self.loops.len()
    }
}
