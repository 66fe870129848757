//! A single-pass Brainfuck interpreter.
//!
//! The interpreter operates on a memory tape (default 30,000 cells) with a
//! single data pointer and never builds a jump table: loop boundaries are
//! resolved while the program runs.
//!
//! Features and behaviors:
//! - Memory tape initialized to 0; cells wrap modulo 256.
//! - Moving left from cell 0 is a no-op; moving right past the last cell
//!   stops the run with an error.
//! - Input `,` reads a single byte; running out of input stops the run.
//! - Output `.` writes the byte at the current cell, unchanged.
//! - A `]` without an open loop stops the run; a loop still open at the end
//!   of the program is reported once every byte has been processed.
//! - Any byte outside `><+-.,[]` is ignored.
//!
//! Quick start:
//!
//! ```
//! use brainguck::Interpreter;
//!
//! let mut out = Vec::new();
//! let mut bf = Interpreter::new(",+.");
//! let processed = bf.run_with_io(&b"a"[..], &mut out).expect("program should run");
//! assert_eq!(out, b"b");
//! assert_eq!(processed, 3);
//! ```
//!
//! The [`Engine`] can also be driven by hand, one byte at a time:
//!
//! ```
//! use brainguck::{Engine, Signal};
//!
//! let mut engine = Engine::new("+.");
//! assert_eq!(engine.step(b'+').unwrap(), Signal::Continue);
//! assert_eq!(engine.step(b'.').unwrap(), Signal::Output(1));
//! assert!(engine.is_finished());
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod interpreter;
pub mod program;
pub mod tape;
pub mod theme;
pub mod trace;

pub use engine::{Engine, LoopStack, Signal, SkipState};
pub use error::{InterpreterError, RunError, UnmatchedBracketKind};
pub use interpreter::{Interpreter, StepControl};
pub use program::{load_program, Instruction, Program};
pub use tape::{Tape, TAPE_CAPACITY};
pub use trace::Trace;
