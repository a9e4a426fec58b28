//! bfk compiler — source text to instruction stream + loop-jump table
//!
//! Two passes over cheap data:
//! 1. Token mapping: command characters become `Instruction`s, everything
//!    else is a comment; an `End` sentinel terminates the stream.
//! 2. Loop-table construction: one walk over the instruction stream with an
//!    explicit stack of open loops; each LoopEnd finalizes the body length
//!    and the inner/sibling links its record needs for O(1) jumps at runtime.

pub mod instruction;

use std::fmt;

use tracing::debug;

use instruction::{Instruction, LoopRecord, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileError {
    /// A LoopEnd with no matching open LoopStart, or a LoopStart never
    /// closed. `offset` is the byte position of the bracket in the source.
    UnbalancedLoop { offset: usize },
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnbalancedLoop { offset } => {
                write!(f, "unbalanced loop bracket at source offset {}", offset)
            }
        }
    }
}

impl std::error::Error for CompileError {}

/// Compile source text into a runnable `Program`.
///
/// Unbalanced brackets fail compilation outright; a `Program` is only
/// produced when every loop record is fully linked.
pub fn compile(source: &str) -> Result<Program, CompileError> {
    let (code, offsets) = encode(source);
    let loops = build_loop_table(&code, &offsets)?;
    debug!(
        instructions = code.len(),
        loops = loops.len(),
        "compiled program"
    );
    Ok(Program { code, loops })
}

/// Token mapping. Returns the instruction stream (with the End sentinel)
/// and, for each instruction, the source byte offset it came from — kept
/// only long enough to report bracket errors in source terms.
fn encode(source: &str) -> (Vec<Instruction>, Vec<usize>) {
    let mut code = Vec::with_capacity(source.len() + 1);
    let mut offsets = Vec::with_capacity(source.len() + 1);
    for (offset, c) in source.char_indices() {
        if let Some(inst) = Instruction::from_symbol(c) {
            code.push(inst);
            offsets.push(offset);
        }
    }
    code.push(Instruction::End);
    offsets.push(source.len());
    (code, offsets)
}

/// Build one `LoopRecord` per matched `[...]` pair, indexed by loop number
/// in LoopStart-encounter order.
///
/// While a loop is open its record holds the start position in `body_len`;
/// the matching LoopEnd rewrites it to the true distance. The first loop
/// opened strictly inside loop L is always L + 1 in encounter order, so the
/// inner link falls out of comparing allocation counts. The sibling link
/// comes from a forward scan to the next bracket: a LoopStart there will be
/// assigned the next free number, a LoopEnd there belongs to the enclosing
/// loop sitting on the stack.
fn build_loop_table(
    code: &[Instruction],
    offsets: &[usize],
) -> Result<Vec<LoopRecord>, CompileError> {
    let count = code
        .iter()
        .filter(|i| matches!(i, Instruction::LoopStart))
        .count();
    let mut loops: Vec<LoopRecord> = Vec::with_capacity(count);
    let mut open_offsets: Vec<usize> = Vec::with_capacity(count);
    let mut stack: Vec<usize> = Vec::new();

    for (i, inst) in code.iter().enumerate() {
        match inst {
            Instruction::LoopStart => {
                let id = loops.len();
                loops.push(LoopRecord {
                    body_len: i,
                    inner: None,
                    sibling: None,
                });
                open_offsets.push(offsets[i]);
                stack.push(id);
            }
            Instruction::LoopEnd => {
                let id = stack
                    .pop()
                    .ok_or(CompileError::UnbalancedLoop { offset: offsets[i] })?;
                let start = loops[id].body_len;
                loops[id].body_len = i - start;
                loops[id].inner = if loops.len() > id + 1 {
                    Some(id + 1)
                } else {
                    None
                };
                loops[id].sibling = match next_boundary(code, i + 1) {
                    Some(Instruction::LoopStart) => Some(loops.len()),
                    Some(Instruction::LoopEnd) => stack.last().copied(),
                    _ => None,
                };
            }
            _ => {}
        }
    }

    if let Some(&unclosed) = stack.last() {
        return Err(CompileError::UnbalancedLoop {
            offset: open_offsets[unclosed],
        });
    }
    Ok(loops)
}

/// Next loop-boundary instruction at or after `from`, if any.
fn next_boundary(code: &[Instruction], from: usize) -> Option<Instruction> {
    code[from..].iter().copied().find(|i| i.is_loop_boundary())
}
