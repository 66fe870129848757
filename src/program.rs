use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// One decoded instruction byte.
///
/// Anything outside `><+-.,[]` decodes to [`Instruction::Comment`] and is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Right,
    Left,
    Increment,
    Decrement,
    Output,
    Input,
    LoopOpen,
    LoopClose,
    Comment(u8),
}

impl From<u8> for Instruction {
    fn from(byte: u8) -> Self {
        match byte {
            b'>' => Instruction::Right,
            b'<' => Instruction::Left,
            b'+' => Instruction::Increment,
            b'-' => Instruction::Decrement,
            b'.' => Instruction::Output,
            b',' => Instruction::Input,
            b'[' => Instruction::LoopOpen,
            b']' => Instruction::LoopClose,
            other => Instruction::Comment(other),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Instruction::Right => '>',
            Instruction::Left => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopOpen => '[',
            Instruction::LoopClose => ']',
            Instruction::Comment(b) if b.is_ascii_graphic() => *b as char,
            Instruction::Comment(_) => '?',
        };
        write!(f, "{ch}")
    }
}

/// Program bytes plus the read offset that serves as the instruction pointer.
#[derive(Debug, Clone, Default)]
pub struct Program {
    code: Vec<u8>,
    offset: usize,
}

impl Program {
    pub fn new(code: impl Into<Vec<u8>>) -> Self {
        Self {
            code: code.into(),
            offset: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_finished(&self) -> bool {
        self.offset >= self.code.len()
    }

    /// The byte at the current offset, or `None` once the program is consumed.
    pub fn current(&self) -> Option<u8> {
        self.code.get(self.offset).copied()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.code
    }

    pub(crate) fn advance(&mut self) -> usize {
        self.offset += 1;
        self.offset
    }

    pub(crate) fn jump_to(&mut self, offset: usize) {
        debug_assert!(offset <= self.code.len());
        self.offset = offset;
    }
}

/// Read a program's raw bytes from `path`. No encoding is assumed.
pub fn load_program(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
    fs::read(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_eight_instructions() {
        let decoded: Vec<Instruction> = b"><+-.,[]".iter().map(|&b| b.into()).collect();
        assert_eq!(
            decoded,
            vec![
                Instruction::Right,
                Instruction::Left,
                Instruction::Increment,
                Instruction::Decrement,
                Instruction::Output,
                Instruction::Input,
                Instruction::LoopOpen,
                Instruction::LoopClose,
            ]
        );
    }

    #[test]
    fn unknown_bytes_are_comments() {
        assert_eq!(Instruction::from(b'a'), Instruction::Comment(b'a'));
        assert_eq!(Instruction::from(b'\n'), Instruction::Comment(b'\n'));
        assert_eq!(Instruction::from(b'\n').to_string(), "?");
    }

    #[test]
    fn cursor_advances_to_end() {
        let mut program = Program::new("+-");
        assert_eq!(program.current(), Some(b'+'));
        program.advance();
        assert_eq!(program.current(), Some(b'-'));
        program.advance();
        assert!(program.is_finished());
        assert_eq!(program.current(), None);
    }

    #[test]
    fn loads_raw_bytes_from_file() {
        use std::io::Write;
        let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
        tf.write_all(b"+\xff.").unwrap();
        let code = load_program(tf.path()).unwrap();
        assert_eq!(code, b"+\xff.");
    }
}
