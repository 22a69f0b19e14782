//! Core library for Minim
//!
//! A small s-expression interpreter: a stream-based reader with
//! one-character pushback, a recursive evaluator over chained lexical
//! frames with shared mutable binding cells, and a fixed basis of
//! primitive functions including character-level I/O. The execution
//! drivers (REPL, batch runner) live in the `mim` binary crate.

pub mod basis;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod interner;
pub mod language;
pub mod reader;
pub mod stream;

// Re-export commonly used items for convenience
pub use basis::register_basis;
pub use environment::{Binding, Environment};
pub use error::{MinimError, MinimResult};
pub use evaluator::{eval, evaluate_one};
pub use interner::InternedSymbol;
pub use language::{cons, ConsCell, LambdaCell, NativeFn, Primitive, Value};
pub use reader::read_sexp;
pub use stream::{Channels, CharSource};
