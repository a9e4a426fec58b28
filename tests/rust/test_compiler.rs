//! Compiler tests -- token mapping + loop-table construction

use bfk::compiler::instruction::{Instruction, Program};
use bfk::compiler::{compile, CompileError};

// ── Helpers ──────────────────────────────────────────────────────

fn compile_ok(source: &str) -> Program {
    compile(source).expect("program should compile")
}

fn compile_err(source: &str) -> CompileError {
    compile(source).expect_err("program should not compile")
}

/// Instruction indices of the LoopStart instructions, in encounter order --
/// the position loop N was opened at.
fn loop_starts(program: &Program) -> Vec<usize> {
    program
        .code
        .iter()
        .enumerate()
        .filter(|(_, i)| matches!(i, Instruction::LoopStart))
        .map(|(pos, _)| pos)
        .collect()
}

// ── 1. Token mapping ─────────────────────────────────────────────

#[test]
fn maps_all_eight_symbols() {
    let program = compile_ok("+-<>,.[]");
    assert_eq!(
        program.code,
        vec![
            Instruction::Increment,
            Instruction::Decrement,
            Instruction::MoveLeft,
            Instruction::MoveRight,
            Instruction::ReadByte,
            Instruction::WriteByte,
            Instruction::LoopStart,
            Instruction::LoopEnd,
            Instruction::End,
        ]
    );
}

#[test]
fn skips_comment_characters() {
    let program = compile_ok("say + hello - world\n");
    assert_eq!(
        program.code,
        vec![
            Instruction::Increment,
            Instruction::Decrement,
            Instruction::End,
        ]
    );
}

#[test]
fn output_length_is_command_count_plus_sentinel() {
    let program = compile_ok("++ comment ++");
    assert_eq!(program.len(), 5);
    assert_eq!(program.code.last(), Some(&Instruction::End));
}

#[test]
fn empty_source_compiles_to_lone_sentinel() {
    let program = compile_ok("");
    assert_eq!(program.code, vec![Instruction::End]);
    assert!(program.is_empty());
    assert_eq!(program.loop_count(), 0);
}

// ── 2. Loop counting ─────────────────────────────────────────────

#[test]
fn one_record_per_open_bracket() {
    let program = compile_ok("[[-][>[.]]]");
    let opens = "[[-][>[.]]]".matches('[').count();
    assert_eq!(program.loop_count(), opens);
}

// ── 3. Loop-table shape ──────────────────────────────────────────

#[test]
fn simple_loop_record() {
    let program = compile_ok("[-]");
    assert_eq!(program.loops.len(), 1);
    let record = program.loops[0];
    assert_eq!(record.body_len, 2);
    assert_eq!(record.inner, None);
    assert_eq!(record.sibling, None);
}

#[test]
fn nested_loops_link_inner_and_enclosing() {
    // code: [ [ ] ] END
    let program = compile_ok("[[]]");
    let outer = program.loops[0];
    let inner = program.loops[1];

    assert_eq!(outer.body_len, 3);
    assert_eq!(outer.inner, Some(1));
    assert_eq!(outer.sibling, None);

    assert_eq!(inner.body_len, 1);
    assert_eq!(inner.inner, None);
    // the bracket after the inner loop closes is the outer LoopEnd
    assert_eq!(inner.sibling, Some(0));
}

#[test]
fn sibling_loops_link_forward() {
    // code: [ ] [ ] END
    let program = compile_ok("[][]");
    let first = program.loops[0];
    let second = program.loops[1];

    assert_eq!(first.inner, None);
    assert_eq!(first.sibling, Some(1));
    assert_eq!(second.inner, None);
    assert_eq!(second.sibling, None);
}

#[test]
fn sibling_link_survives_intervening_commands() {
    let program = compile_ok("[-] >+< [+]");
    assert_eq!(program.loops[0].sibling, Some(1));
}

#[test]
fn body_len_points_at_matching_end() {
    let source = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]";
    let program = compile_ok(source);
    assert_eq!(program.loop_count(), 3);
    for (loop_no, &start) in loop_starts(&program).iter().enumerate() {
        let record = program.loops[loop_no];
        assert_eq!(
            program.code[start + record.body_len],
            Instruction::LoopEnd,
            "loop {} opened at {} should close body_len={} later",
            loop_no,
            start,
            record.body_len
        );
    }
}

#[test]
fn hello_world_loop_links() {
    // Outer loop 0 contains loops 1 and 2; loop 2 closes against the
    // outer LoopEnd, so its sibling is the enclosing loop.
    let program = compile_ok("++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]");
    assert_eq!(program.loops[0].inner, Some(1));
    assert_eq!(program.loops[0].sibling, None);
    assert_eq!(program.loops[1].inner, None);
    assert_eq!(program.loops[1].sibling, Some(2));
    assert_eq!(program.loops[2].inner, None);
    assert_eq!(program.loops[2].sibling, Some(0));
}

// ── 4. Unbalanced brackets ───────────────────────────────────────

#[test]
fn stray_close_is_an_error() {
    assert_eq!(compile_err("]"), CompileError::UnbalancedLoop { offset: 0 });
}

#[test]
fn stray_close_reports_source_offset() {
    assert_eq!(
        compile_err("++]"),
        CompileError::UnbalancedLoop { offset: 2 }
    );
}

#[test]
fn unclosed_open_is_an_error() {
    assert_eq!(
        compile_err("++["),
        CompileError::UnbalancedLoop { offset: 2 }
    );
}

#[test]
fn unclosed_open_reports_innermost_bracket() {
    // the outer bracket never closes; the inner pair is fine
    assert_eq!(
        compile_err("[[]"),
        CompileError::UnbalancedLoop { offset: 0 }
    );
}

#[test]
fn offsets_count_comment_characters() {
    assert_eq!(
        compile_err("comment ]"),
        CompileError::UnbalancedLoop { offset: 8 }
    );
}

#[test]
fn error_display_is_human_readable() {
    let err = compile_err("]");
    assert_eq!(
        err.to_string(),
        "unbalanced loop bracket at source offset 0"
    );
}
