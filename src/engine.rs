//! The single-pass execution engine.
//!
//! The engine consumes one instruction byte per [`Engine::step`] and keeps
//! every piece of run state in one place: the tape, the program cursor, the
//! stack of open loops and the skip controller. Loop boundaries are found on
//! the fly; there is no jump table. A `[` whose guard cell is zero switches the
//! engine into skipping mode, and the `]` that closes that same loop switches
//! it back.
//!
//! The engine never touches an I/O channel. `.` hands the byte back as
//! [`Signal::Output`], and `,` answers [`Signal::NeedInput`], after which the
//! next byte given to `step` is stored as data instead of being dispatched.

use crate::error::{InterpreterError, UnmatchedBracketKind};
use crate::program::{Instruction, Program};
use crate::tape::{Tape, TAPE_CAPACITY};

/// What the driver has to do after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Nothing to do; feed the next program byte.
    Continue,
    /// Write this byte to the output channel.
    Output(u8),
    /// Read one byte from the input channel and feed it to `step` next.
    NeedInput,
}

/// Whether the engine is skipping the body of a loop entered with a zero guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipState {
    #[default]
    Inactive,
    /// Skipping until the loop that sits at this stack depth is closed.
    Active { depth: usize },
}

/// Offsets just past every loop-open that has not been closed yet.
#[derive(Debug, Clone, Default)]
pub struct LoopStack {
    offsets: Vec<usize>,
}

impl LoopStack {
    pub fn push(&mut self, offset: usize) {
        self.offsets.push(offset);
    }

    pub fn pop(&mut self) -> Option<usize> {
        self.offsets.pop()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn last(&self) -> Option<usize> {
        self.offsets.last().copied()
    }
}

/// Interpreter state for one run.
#[derive(Debug, Clone)]
pub struct Engine {
    tape: Tape,
    program: Program,
    loops: LoopStack,
    skip: SkipState,
    pending_input: bool,
}

impl Engine {
    /// Create an engine for `code` on a tape of [`TAPE_CAPACITY`] cells.
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self::with_capacity(code, TAPE_CAPACITY)
    }

    /// Create an engine for `code` with a custom tape size.
    ///
    /// A `capacity` of 0 gives a one-cell tape; use [`Engine::try_with_capacity`]
    /// to reject it instead.
    pub fn with_capacity(code: impl Into<Vec<u8>>, capacity: usize) -> Self {
        Self::from_parts(Tape::new(capacity), Program::new(code))
    }

    /// Like [`Engine::with_capacity`], but a zero or unallocatable tape is an error.
    pub fn try_with_capacity(
        code: impl Into<Vec<u8>>,
        capacity: usize,
    ) -> Result<Self, InterpreterError> {
        Ok(Self::from_parts(Tape::try_new(capacity)?, Program::new(code)))
    }

    fn from_parts(tape: Tape, program: Program) -> Self {
        Self {
            tape,
            program,
            loops: LoopStack::default(),
            skip: SkipState::Inactive,
            pending_input: false,
        }
    }

    /// Consume one byte.
    ///
    /// While an input request is pending the byte is data: it is stored in the
    /// current cell and the program cursor does not move. Otherwise the cursor
    /// advances past the byte and the byte is dispatched as an instruction.
    pub fn step(&mut self, byte: u8) -> Result<Signal, InterpreterError> {
        if self.pending_input {
            self.tape.set_current(byte);
            self.pending_input = false;
            return Ok(Signal::Continue);
        }

        let ip = self.program.offset();
        let next = self.program.advance();

        match Instruction::from(byte) {
            Instruction::LoopClose => {
                let depth = self.loops.len();
                let Some(open) = self.loops.pop() else {
                    return Err(InterpreterError::UnmatchedBracket {
                        ip,
                        kind: UnmatchedBracketKind::Close,
                    });
                };
                match self.skip {
                    SkipState::Inactive => {
                        if self.tape.current() != 0 {
                            // Back onto the '[' itself so the guard is checked again.
                            self.program.jump_to(open - 1);
                        }
                    }
                    SkipState::Active { depth: skip_depth } if skip_depth == depth => {
                        self.skip = SkipState::Inactive;
                    }
                    SkipState::Active { .. } => {}
                }
            }
            Instruction::LoopOpen => {
                self.loops.push(next);
                if self.skip == SkipState::Inactive && self.tape.current() == 0 {
                    self.skip = SkipState::Active {
                        depth: self.loops.len(),
                    };
                }
            }
            _ if self.is_skipping() => {}
            Instruction::Right => {
                if !self.tape.move_right() {
                    return Err(InterpreterError::PointerOutOfBounds {
                        ip,
                        ptr: self.tape.pointer(),
                    });
                }
            }
            Instruction::Left => self.tape.move_left(),
            Instruction::Increment => {
                self.tape.increment();
            }
            Instruction::Decrement => {
                self.tape.decrement();
            }
            Instruction::Output => return Ok(Signal::Output(self.tape.current())),
            Instruction::Input => {
                self.pending_input = true;
                return Ok(Signal::NeedInput);
            }
            Instruction::Comment(_) => {}
        }

        Ok(Signal::Continue)
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Number of loops currently open in the execution trace.
    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }

    pub fn skip_state(&self) -> SkipState {
        self.skip
    }

    pub fn is_skipping(&self) -> bool {
        matches!(self.skip, SkipState::Active { .. })
    }

    /// True between a `,` and the byte that answers it.
    pub fn awaiting_input(&self) -> bool {
        self.pending_input
    }

    pub fn is_finished(&self) -> bool {
        self.program.is_finished()
    }

    /// Offset of the innermost `[` that is still open, if any.
    pub fn innermost_open_loop(&self) -> Option<usize> {
        self.loops.last().map(|after| after - 1)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
