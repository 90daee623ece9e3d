//! A tiny interactive command interpreter.
//!
//! This crate reads a line of user input, splits it into a command and
//! arguments, and executes that command as a separate operating-system
//! process. It understands trailing `&` for background execution, `<` and
//! `>` for input/output redirection, a single two-stage `|` pipeline, and
//! the `!!` repeat-last-command shortcut. Directive handling lives in
//! [`parser`], process creation in [`executor`], and the read-eval loop in
//! [`Interpreter`].

pub mod executor;
pub mod history;
mod interpreter;
pub mod lexer;
pub mod parser;

/// Just a convenient re-export of the interactive loop and its types.
///
/// See [`Interpreter`] for the high-level API and examples.
pub use interpreter::{Interpreter, LineOutcome, MAX_LINE};
