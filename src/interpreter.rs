//! The driver: feeds program bytes into an [`Engine`] and services its I/O.

use std::io::{self, Read, Write};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::engine::{Engine, Signal};
use crate::error::{InterpreterError, RunError, UnmatchedBracketKind};
use crate::program::Instruction;
use crate::tape::TAPE_CAPACITY;
use crate::trace::{Snapshot, Trace};

/// Controls for cooperative cancellation and step limiting.
#[derive(Clone)]
pub struct StepControl {
    pub max_steps: Option<usize>,
    pub cancel_flag: Arc<AtomicBool>,
}

impl StepControl {
    pub fn new(max_steps: Option<usize>, cancel_flag: Arc<AtomicBool>) -> Self {
        Self { max_steps, cancel_flag }
    }
}

/// Runs a whole program against an input and an output channel.
///
/// Every program byte fed to the engine counts as one processed byte,
/// including bytes that are executed again by a loop. Bytes read from the
/// input channel in answer to `,` are not counted. A step the engine rejects,
/// or a `,` whose read fails, is not counted; a `.` whose write fails is.
pub struct Interpreter {
    engine: Engine,
    control: Option<StepControl>,
    trace: Option<Trace>,
}

impl Interpreter {
    /// Create an interpreter for `code` on a tape of 30,000 cells.
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self::with_capacity(code, TAPE_CAPACITY)
    }

    /// Create an interpreter for `code` with a custom tape size.
    ///
    /// A `capacity` of 0 gives a one-cell tape, and a capacity too large to
    /// allocate aborts the process; [`Interpreter::try_with_capacity`] reports
    /// both as errors.
    pub fn with_capacity(code: impl Into<Vec<u8>>, capacity: usize) -> Self {
        Self::from_engine(Engine::with_capacity(code, capacity))
    }

    /// Like [`Interpreter::with_capacity`], but fails with
    /// [`InterpreterError::TapeAllocation`] instead of clamping or aborting.
    pub fn try_with_capacity(
        code: impl Into<Vec<u8>>,
        capacity: usize,
    ) -> Result<Self, InterpreterError> {
        Ok(Self::from_engine(Engine::try_with_capacity(code, capacity)?))
    }

    fn from_engine(engine: Engine) -> Self {
        Self {
            engine,
            control: None,
            trace: None,
        }
    }

    /// Check for cancellation and the step limit before every step.
    pub fn set_step_control(&mut self, control: StepControl) {
        self.control = Some(control);
    }

    /// Write a step-by-step table of operations while running.
    pub fn set_trace(&mut self, trace: Trace) {
        self.trace = Some(trace);
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run against the process's stdin and stdout.
    pub fn run(&mut self) -> Result<usize, RunError> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run_with_io(stdin.lock(), stdout.lock())
    }

    /// Run until the program is consumed or the first failure.
    ///
    /// Returns the number of program bytes processed. A loop still open when
    /// the program ends is reported as an unmatched `[`.
    pub fn run_with_io<R: Read, W: Write>(
        &mut self,
        mut input: R,
        mut output: W,
    ) -> Result<usize, RunError> {
        let mut processed = 0usize;
        if let Some(trace) = self.trace.as_mut() {
            trace.header();
        }

        let result = self.drive(&mut input, &mut output, &mut processed);
        if let Some(trace) = self.trace.as_mut() {
            trace.flush();
        }
        result.map_err(|source| RunError { processed, source })?;

        if let Some(ip) = self.engine.innermost_open_loop() {
            return Err(RunError {
                processed,
                source: InterpreterError::UnmatchedBracket {
                    ip,
                    kind: UnmatchedBracketKind::Open,
                },
            });
        }
        Ok(processed)
    }

    fn drive<R: Read, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
        processed: &mut usize,
    ) -> Result<(), InterpreterError> {
        while let Some(byte) = self.engine.program().current() {
            if let Some(ctrl) = self.control.as_ref() {
                if ctrl.cancel_flag.load(Ordering::Relaxed) {
                    return Err(InterpreterError::Canceled);
                }
                if let Some(max) = ctrl.max_steps {
                    if *processed >= max {
                        return Err(InterpreterError::StepLimitExceeded { limit: max });
                    }
                }
            }

            let before = Snapshot::of(&self.engine);
            let ip = before.ip;
            let signal = self.engine.step(byte)?;
            if let Some(trace) = self.trace.as_mut() {
                trace.step(*processed, before, Instruction::from(byte), &self.engine, signal);
            }

            match signal {
                Signal::Continue => {}
                Signal::Output(b) => {
                    if let Err(source) = output.write_all(&[b]).and_then(|_| output.flush()) {
                        *processed += 1;
                        return Err(InterpreterError::Io { ip, source });
                    }
                }
                Signal::NeedInput => {
                    let data = read_byte(input)
                        .map_err(|source| InterpreterError::Io { ip, source })?
                        .ok_or(InterpreterError::InputExhausted { ip })?;
                    self.engine.step(data)?;
                    if let Some(trace) = self.trace.as_mut() {
                        trace.input(self.engine.tape().pointer(), data);
                    }
                }
            }

            *processed += 1;
        }
        Ok(())
    }
}

/// Read exactly one byte, `None` on end of input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
