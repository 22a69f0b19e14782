//! Minim driver: selects the input channel, then repeatedly calls
//! `evaluate_one` until the core signals end of input.

use std::env;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;
use std::process;

use minim::{evaluate_one, register_basis, Channels, CharSource, Environment};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

const PROMPT: &str = "> ";
const HISTORY_FILE: &str = ".minim_history";

/// Adapts the rustyline editor to a plain byte stream, so interactive
/// input goes through the same `CharSource` as file input. Each refill
/// prompts for one line; Ctrl-D ends the stream.
struct LineInput {
    editor: DefaultEditor,
    buffer: Vec<u8>,
    pos: usize,
    done: bool,
    history: Option<PathBuf>,
}

impl LineInput {
    fn new() -> rustyline::Result<Self> {
        let mut editor = DefaultEditor::new()?;
        let history = dirs::home_dir().map(|home| home.join(HISTORY_FILE));
        if let Some(path) = &history {
            let _ = editor.load_history(path);
        }
        Ok(LineInput {
            editor,
            buffer: Vec::new(),
            pos: 0,
            done: false,
            history,
        })
    }

    fn finish(&mut self) {
        self.done = true;
        if let Some(path) = &self.history {
            let _ = self.editor.save_history(path);
        }
    }
}

/// What a prompt attempt means for the stream: a line to consume, a
/// discarded line (Ctrl-C) to re-prompt after, or the end (Ctrl-D).
enum LineEvent {
    Line(String),
    Discard,
    End,
}

fn classify(result: rustyline::Result<String>) -> io::Result<LineEvent> {
    match result {
        Ok(line) => Ok(LineEvent::Line(line)),
        Err(ReadlineError::Interrupted) => Ok(LineEvent::Discard),
        Err(ReadlineError::Eof) => Ok(LineEvent::End),
        Err(e) => Err(io::Error::other(e.to_string())),
    }
}

impl Read for LineInput {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        while self.pos >= self.buffer.len() {
            if self.done {
                return Ok(0);
            }
            match classify(self.editor.readline(PROMPT))? {
                LineEvent::Line(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());
                    self.buffer = line.into_bytes();
                    self.buffer.push(b'\n');
                    self.pos = 0;
                }
                LineEvent::Discard => continue,
                LineEvent::End => {
                    self.finish();
                    return Ok(0);
                }
            }
        }
        let n = out.len().min(self.buffer.len() - self.pos);
        out[..n].copy_from_slice(&self.buffer[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn basis_env() -> Environment {
    let env = Environment::new();
    register_basis(&env);
    env
}

fn repl() {
    let input = match LineInput::new() {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Failed to start line editor: {e}");
            process::exit(1);
        }
    };

    println!("Minim REPL");
    println!("Type expressions to evaluate; Ctrl-D to exit");
    println!();

    let env = basis_env();
    let mut io = Channels::new(CharSource::new(Box::new(input)), Box::new(io::stdout()));

    loop {
        match evaluate_one(&mut io, &env) {
            Ok(Some(result)) => println!("{result}"),
            // The source survives a Parse error positioned just past the
            // failure; keep going.
            Err(e) => eprintln!("{e}"),
            Ok(None) => break,
        }
    }
}

fn run_file(filename: &str) -> Result<(), String> {
    let file =
        File::open(filename).map_err(|e| format!("Failed to open file '{filename}': {e}"))?;

    let env = basis_env();
    let mut io = Channels::new(
        CharSource::new(Box::new(BufReader::new(file))),
        Box::new(io::stdout()),
    );

    loop {
        match evaluate_one(&mut io, &env) {
            Ok(Some(_)) => continue,
            Ok(None) => return Ok(()), // file closes when the channel drops
            Err(e) => {
                return Err(format!(
                    "{e} (line {} of {filename})",
                    io.input.line()
                ))
            }
        }
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl(),
        2 => {
            if let Err(e) = run_file(&args[1]) {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        _ => {
            eprintln!("Usage: {} [script.mim]", args[0]);
            process::exit(1);
        }
    }
}
