//! Step-by-step execution table written while a program runs.

use std::io::Write;

use crate::engine::{Engine, Signal};
use crate::program::Instruction;

/// Engine state captured just before a step is dispatched.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Snapshot {
    pub ip: usize,
    pub ptr: usize,
    pub cell: u8,
    pub skipping: bool,
}

impl Snapshot {
    pub(crate) fn of(engine: &Engine) -> Self {
        Self {
            ip: engine.program().offset(),
            ptr: engine.tape().pointer(),
            cell: engine.tape().current(),
            skipping: engine.is_skipping(),
        }
    }
}

/// Writes one table row per dispatched instruction.
pub struct Trace {
    out: Box<dyn Write + Send>,
}

impl Trace {
    pub fn new<W: Write + Send + 'static>(out: W) -> Self {
        Self { out: Box::new(out) }
    }

    pub(crate) fn header(&mut self) {
        let _ = writeln!(self.out, "STEP | IP  | PTR | CELL | INSTR | ACTION");
        let _ = writeln!(
            self.out,
            "-----+-----+-----+------+-------+------------------------------------------------"
        );
    }

    pub(crate) fn step(
        &mut self,
        step: usize,
        before: Snapshot,
        instruction: Instruction,
        engine: &Engine,
        signal: Signal,
    ) {
        let action = describe(before, instruction, engine, signal);
        let _ = writeln!(
            self.out,
            "{:<4} | {:<3} | {:<3} | {:<4} |  {}    | {}",
            step, before.ip, before.ptr, before.cell, instruction, action
        );
    }

    pub(crate) fn input(&mut self, ptr: usize, byte: u8) {
        let _ = writeln!(
            self.out,
            "{:<4} | {:<3} | {:<3} | {:<4} |       | Stored input byte {} in cell[{}]",
            "", "", ptr, "", byte, ptr
        );
    }

    pub(crate) fn flush(&mut self) {
        let _ = self.out.flush();
    }
}

fn describe(before: Snapshot, instruction: Instruction, engine: &Engine, signal: Signal) -> String {
    let ptr = engine.tape().pointer();
    let depth = engine.loop_depth();
    match instruction {
        Instruction::LoopOpen if before.skipping => {
            format!("Nested '[' inside skipped loop (depth {depth})")
        }
        Instruction::LoopOpen if engine.is_skipping() => {
            format!("Cell is 0; skip loop body (depth {depth})")
        }
        Instruction::LoopOpen => format!("Enter loop (cell != 0, depth {depth})"),
        Instruction::LoopClose if before.skipping && !engine.is_skipping() => {
            "Reached end of skipped loop".to_string()
        }
        Instruction::LoopClose if before.skipping => {
            "Nested ']' inside skipped loop".to_string()
        }
        Instruction::LoopClose if engine.program().offset() <= before.ip => {
            format!(
                "Cell != 0; jump back to matching '[' at IP {}",
                engine.program().offset()
            )
        }
        Instruction::LoopClose => "Exit loop (cell is 0)".to_string(),
        _ if before.skipping => format!("Skipped '{instruction}' inside zero-guard loop"),
        Instruction::Right => format!("Moved pointer head to index {ptr}"),
        Instruction::Left if ptr == before.ptr => "Pointer already at index 0; stayed put".to_string(),
        Instruction::Left => format!("Moved pointer head to index {ptr}"),
        Instruction::Increment => format!(
            "Increment cell[{}] from {} to {}",
            before.ptr,
            before.cell,
            engine.tape().current()
        ),
        Instruction::Decrement => format!(
            "Decrement cell[{}] from {} to {}",
            before.ptr,
            before.cell,
            engine.tape().current()
        ),
        Instruction::Output => match signal {
            Signal::Output(b) => format!("Output byte {b}"),
            _ => "Output".to_string(),
        },
        Instruction::Input => "Requested one byte of input".to_string(),
        Instruction::Comment(_) => "No-op".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn describe_step(engine: &mut Engine, byte: u8) -> String {
        let before = Snapshot::of(engine);
        let signal = engine.step(byte).unwrap();
        describe(before, Instruction::from(byte), engine, signal)
    }

    #[test]
    fn describes_pointer_moves() {
        let mut engine = Engine::new("><<");
        assert_eq!(describe_step(&mut engine, b'>'), "Moved pointer head to index 1");
        assert_eq!(describe_step(&mut engine, b'<'), "Moved pointer head to index 0");
        assert_eq!(describe_step(&mut engine, b'<'), "Pointer already at index 0; stayed put");
    }

    #[test]
    fn describes_skip_transitions() {
        let mut engine = Engine::new("[.]");
        assert_eq!(describe_step(&mut engine, b'['), "Cell is 0; skip loop body (depth 1)");
        assert_eq!(describe_step(&mut engine, b'.'), "Skipped '.' inside zero-guard loop");
        assert_eq!(describe_step(&mut engine, b']'), "Reached end of skipped loop");
    }

    #[test]
    fn describes_loop_repeat() {
        let mut engine = Engine::new("+[]");
        describe_step(&mut engine, b'+');
        describe_step(&mut engine, b'[');
        assert_eq!(
            describe_step(&mut engine, b']'),
            "Cell != 0; jump back to matching '[' at IP 1"
        );
    }
}
