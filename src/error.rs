use std::fmt;

/// Errors that can stop a run.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// `,` asked for a byte and the input channel had none left.
    #[error("Input exhausted at instruction {ip}")]
    InputExhausted { ip: usize },

    /// `]` with no open loop, or a loop still open when the program ends.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: UnmatchedBracketKind },

    /// `>` attempted to move past the last cell.
    #[error("Pointer out of bounds at instruction {ip} (ptr={ptr})")]
    PointerOutOfBounds { ip: usize, ptr: usize },

    /// Reading input or writing output failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Io {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// The tape could not be allocated, or was asked for with zero cells.
    #[error("Cannot allocate a tape of {capacity} cells")]
    TapeAllocation { capacity: usize },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },

    /// Execution aborted due to cooperative cancellation (Ctrl-C or timeout).
    #[error("Execution aborted: cancelled")]
    Canceled,
}

impl InterpreterError {
    /// Program offset the error points at, when there is one.
    pub fn ip(&self) -> Option<usize> {
        match self {
            InterpreterError::InputExhausted { ip }
            | InterpreterError::UnmatchedBracket { ip, .. }
            | InterpreterError::PointerOutOfBounds { ip, .. }
            | InterpreterError::Io { ip, .. } => Some(*ip),
            InterpreterError::TapeAllocation { .. }
            | InterpreterError::StepLimitExceeded { .. }
            | InterpreterError::Canceled => None,
        }
    }
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// A failed run: the cause plus how many program bytes were processed first.
#[derive(Debug, thiserror::Error)]
#[error("{source} ({processed} bytes processed)")]
pub struct RunError {
    pub processed: usize,
    #[source]
    pub source: InterpreterError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_location_and_count() {
        let err = RunError {
            processed: 7,
            source: InterpreterError::UnmatchedBracket {
                ip: 3,
                kind: UnmatchedBracketKind::Close,
            },
        };
        assert_eq!(
            err.to_string(),
            "Unmatched bracket ']' at instruction 3 (7 bytes processed)"
        );
        assert_eq!(err.source.ip(), Some(3));
    }

    #[test]
    fn aborts_have_no_location() {
        assert_eq!(InterpreterError::Canceled.ip(), None);
        assert_eq!(InterpreterError::StepLimitExceeded { limit: 1 }.ip(), None);
        assert_eq!(InterpreterError::TapeAllocation { capacity: 0 }.ip(), None);
    }
}
