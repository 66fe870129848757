use clap::Args;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use crate::cli_util::{print_byte_count, print_run_error};
use crate::config;
use crate::error::{InterpreterError, RunError};
use crate::interpreter::{Interpreter, StepControl};
use crate::program::load_program;
use crate::trace::Trace;

/// How often the waiting thread checks for Ctrl-C and the deadline.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Exit status used when the run is interrupted with Ctrl-C.
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Print the number of program bytes processed when the run ends
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Write a step-by-step table of operations to stderr while executing
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read the program from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file", visible_alias = "in", value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Concatenated program parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,

    /// Number of tape cells (fallback BRAINGUCK_TAPE_SIZE; default 30000)
    #[arg(long = "tape-size", value_name = "CELLS")]
    pub tape_size: Option<usize>,

    /// Wall-clock timeout in milliseconds (fallback BRAINGUCK_TIMEOUT_MS; default none)
    #[arg(long = "timeout", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Maximum interpreter steps before abort (fallback BRAINGUCK_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Never colour diagnostics
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        verbose,
        debug,
        file,
        code,
        tape_size,
        timeout_ms,
        max_steps,
        no_color,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let code_bytes = if let Some(path) = file {
        match load_program(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{program}: failed to read program file {}: {e}", path.display());
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("").into_bytes()
    };

    // Resolve limits: flags -> env -> config file -> defaults
    let settings = config::settings();
    let tape_size = tape_size.unwrap_or(settings.tape_size);
    if tape_size == 0 {
        eprintln!("{program}: --tape-size must be at least 1");
        usage_and_exit(program, 2);
    }
    let timeout_ms = timeout_ms.or(settings.timeout_ms);
    let max_steps = max_steps.or(settings.max_steps);
    let color = settings.color && !no_color && io::stderr().is_terminal();

    let cancel = Arc::new(AtomicBool::new(false));
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        let interrupted = interrupted.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            interrupted.store(true, Ordering::Relaxed);
            cancel.store(true, Ordering::Relaxed);
        }) {
            eprintln!("{program}: failed to set ctrl+c handler: {e}");
        }
    }

    let mut interp = match Interpreter::try_with_capacity(code_bytes.clone(), tape_size) {
        Ok(interp) => interp,
        Err(e) => {
            eprintln!("{program}: {e}");
            usage_and_exit(program, 2);
        }
    };
    interp.set_step_control(StepControl::new(max_steps, cancel.clone()));
    if debug {
        interp.set_trace(Trace::new(io::stderr()));
    }

    // Execute on a worker thread with cooperative cancellation
    let (tx, rx) = mpsc::channel::<Result<usize, RunError>>();
    thread::spawn(move || {
        let _ = tx.send(interp.run());
    });

    let deadline = timeout_ms.map(|ms| Instant::now() + Duration::from_millis(ms));
    let outcome = loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(res) => break res,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                // The worker may be blocked reading stdin and never see the flag.
                if interrupted.load(Ordering::Relaxed) {
                    eprintln!("Execution aborted: interrupted");
                    let _ = io::stderr().flush();
                    return EXIT_INTERRUPTED;
                }
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    cancel.store(true, Ordering::Relaxed);
                    eprintln!(
                        "Execution aborted: wall-clock timeout exceeded ({} ms)",
                        timeout_ms.unwrap_or_default()
                    );
                    let _ = io::stderr().flush();
                    return 1;
                }
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => return 1,
        }
    };

    let processed = match &outcome {
        Ok(processed) => *processed,
        Err(err) => err.processed,
    };

    let exit_code = match outcome {
        Ok(_) => 0,
        Err(RunError { source: InterpreterError::StepLimitExceeded { limit }, .. }) => {
            eprintln!("Execution aborted: step limit exceeded ({limit})");
            1
        }
        Err(RunError { source: InterpreterError::Canceled, .. }) => {
            if interrupted.load(Ordering::Relaxed) {
                eprintln!("Execution aborted: interrupted");
                EXIT_INTERRUPTED
            } else {
                eprintln!(
                    "Execution aborted: wall-clock timeout exceeded ({} ms)",
                    timeout_ms.unwrap_or_default()
                );
                1
            }
        }
        Err(err) => {
            print_run_error(Some(program), &code_bytes, &err, color);
            1
        }
    };

    if verbose {
        print_byte_count(processed, color);
    }

    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
    exit_code
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [OPTIONS] "<code>"
  {0} run [OPTIONS] --file <PATH>

Options:
  --file, --in, -f <PATH>  Read the program from PATH instead of positional "<code>"
  --verbose, -v            Print "<N> bytes read." to stderr when the run ends
  --debug,   -d            Write a step-by-step table of operations to stderr
  --tape-size <CELLS>      Number of tape cells (default 30000)
  --timeout <MS>           Abort after MS milliseconds of wall-clock time
  --max-steps <N>          Abort after N program bytes have been processed
  --no-color               Never colour diagnostics
  --help,    -h            Show this help

Notes:
- Input (`,`) reads a single byte from stdin; running out of input is an error.
- Characters outside of ><+-.,[] are ignored.
- Moving right past the last cell, or a `]` without a matching `[`, stops the run.

Examples:
- Run a program from a file:
    {0} run --file ./hello.bf
- Echo the first two bytes of a file:
    {0} run ",.,." < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
