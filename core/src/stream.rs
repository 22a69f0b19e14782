//! Character-level I/O channels
//!
//! `CharSource` is the single input abstraction shared by the reader and
//! the `getchar` primitive: an unbounded character stream with one-character
//! pushback and line tracking. `Channels` pairs it with the output sink
//! consumed by `print`.

use std::io::{self, Cursor, Read, Write};

/// A character stream with one-character pushback.
///
/// End of input is a normal terminal signal (`Ok(None)`), not an error.
pub struct CharSource {
    input: Box<dyn Read>,
    pending: Option<char>,
    line: u32,
}

impl CharSource {
    pub fn new(input: Box<dyn Read>) -> Self {
        CharSource {
            input,
            pending: None,
            line: 1,
        }
    }

    /// Source backed by an in-memory string, mainly for tests.
    pub fn from_text(text: &str) -> Self {
        Self::new(Box::new(Cursor::new(text.as_bytes().to_vec())))
    }

    /// Read the next character, or `Ok(None)` once the channel is exhausted.
    /// Blocks until a character is available.
    pub fn next(&mut self) -> io::Result<Option<char>> {
        if let Some(c) = self.pending.take() {
            if c == '\n' {
                self.line += 1;
            }
            return Ok(Some(c));
        }
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    let c = buf[0] as char;
                    if c == '\n' {
                        self.line += 1;
                    }
                    return Ok(Some(c));
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Return exactly one character to the front of the stream.
    ///
    /// At most one pushback may be pending; a second call without an
    /// intervening `next` is a contract violation.
    pub fn pushback(&mut self, c: char) {
        assert!(
            self.pending.is_none(),
            "pushback called twice without an intervening next"
        );
        if c == '\n' {
            self.line -= 1;
        }
        self.pending = Some(c);
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> io::Result<Option<char>> {
        match self.next()? {
            Some(c) => {
                self.pushback(c);
                Ok(Some(c))
            }
            None => Ok(None),
        }
    }

    /// Current 1-based line number, for diagnostics.
    pub fn line(&self) -> u32 {
        self.line
    }
}

/// The I/O dependency injected into the evaluator: the shared input source
/// and the append-only output sink. The reader, the driver, and the I/O
/// primitives all go through the same pair.
pub struct Channels {
    pub input: CharSource,
    pub output: Box<dyn Write>,
}

impl Channels {
    pub fn new(input: CharSource, output: Box<dyn Write>) -> Self {
        Channels { input, output }
    }
}
