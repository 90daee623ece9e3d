//! The interactive read–eval loop and its per-session state.

use crate::executor::{Launcher, UnixLauncher};
use crate::history::{History, HistoryError};
use crate::{lexer, parser};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Upper bound in bytes on an accepted input line. Longer lines are
/// rejected whole with a warning rather than truncated, so a turn never
/// executes half a command.
pub const MAX_LINE: usize = 80;

const DEFAULT_PROMPT: &str = "osh> ";

/// What the loop should do after interpreting one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Keep prompting.
    Continue,
    /// The `exit` built-in was issued; the loop terminates cleanly.
    Exit,
}

/// The interactive command interpreter.
///
/// Owns the session state — the `!!` cache and the launcher — which is
/// created once at startup, mutated once per loop turn, and torn down at
/// program exit. Argument vectors live only within a single turn, so no
/// token storage leaks across commands.
///
/// Example
/// ```no_run
/// use osh::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.repl().unwrap();
/// ```
pub struct Interpreter<L> {
    history: History,
    launcher: L,
    prompt: String,
}

impl Interpreter<UnixLauncher> {
    /// Create an interpreter that runs commands as real processes.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self::with_launcher(prompt, UnixLauncher)
    }
}

impl Default for Interpreter<UnixLauncher> {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}

impl<L: Launcher> Interpreter<L> {
    /// Create an interpreter with a custom launcher implementation.
    pub fn with_launcher(prompt: impl Into<String>, launcher: L) -> Self {
        Self {
            history: History::new(),
            launcher,
            prompt: prompt.into(),
        }
    }

    /// Run the prompt/read/dispatch loop until `exit` or end of input.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        loop {
            match rl.readline(&self.prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    if self.interpret_line(&line) == LineOutcome::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Interpret a single raw input line: history resolution, tokenizing,
    /// directive extraction and dispatch to the launcher.
    ///
    /// Every failure is reported to the user and confined to this turn;
    /// only the `exit` built-in ends the loop.
    pub fn interpret_line(&mut self, raw: &str) -> LineOutcome {
        if raw.len() > MAX_LINE {
            eprintln!("Input line too long ({} bytes, limit is {MAX_LINE})", raw.len());
            return LineOutcome::Continue;
        }
        let resolved = match self.history.resolve(raw) {
            Ok(resolved) => resolved,
            Err(HistoryError::NoHistory) => {
                eprintln!("No commands in history!");
                return LineOutcome::Continue;
            }
        };
        if resolved.recalled {
            println!("{}", resolved.line);
        }
        let tokens = lexer::tokenize(&resolved.line);
        if tokens.is_empty() {
            println!("Please enter the command! (or type \"exit\" to exit)");
            return LineOutcome::Continue;
        }
        if tokens[0] == "exit" {
            return LineOutcome::Exit;
        }
        let Some(invocation) = parser::extract(tokens) else {
            println!("Please enter the command! (or type \"exit\" to exit)");
            return LineOutcome::Continue;
        };
        if let Err(err) = self.launcher.launch(&invocation) {
            eprintln!("{err}");
        }
        LineOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Invocation;

    /// Records every dispatched invocation instead of forking.
    #[derive(Default)]
    struct RecordingLauncher {
        launched: Vec<Invocation>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&mut self, invocation: &Invocation) -> Result<()> {
            self.launched.push(invocation.clone());
            Ok(())
        }
    }

    fn interpreter() -> Interpreter<RecordingLauncher> {
        Interpreter::with_launcher(DEFAULT_PROMPT, RecordingLauncher::default())
    }

    #[test]
    fn test_exit_terminates_without_launching() {
        let mut sh = interpreter();
        assert_eq!(sh.interpret_line("exit"), LineOutcome::Exit);
        assert!(sh.launcher.launched.is_empty());
    }

    #[test]
    fn test_exit_with_arguments_still_exits() {
        let mut sh = interpreter();
        assert_eq!(sh.interpret_line("exit now"), LineOutcome::Exit);
    }

    #[test]
    fn test_blank_line_launches_nothing() {
        let mut sh = interpreter();
        assert_eq!(sh.interpret_line("   \t "), LineOutcome::Continue);
        assert!(sh.launcher.launched.is_empty());
    }

    #[test]
    fn test_command_is_dispatched() {
        let mut sh = interpreter();
        sh.interpret_line("ls -la /tmp");
        assert_eq!(sh.launcher.launched.len(), 1);
        let invocation = &sh.launcher.launched[0];
        assert_eq!(invocation.first.argv, vec!["ls", "-la", "/tmp"]);
        assert!(!invocation.background);
    }

    #[test]
    fn test_background_marker_reaches_the_launcher() {
        let mut sh = interpreter();
        sh.interpret_line("sleep 5 &");
        assert!(sh.launcher.launched[0].background);
        assert_eq!(sh.launcher.launched[0].first.argv, vec!["sleep", "5"]);
    }

    #[test]
    fn test_history_shortcut_with_no_history_launches_nothing() {
        let mut sh = interpreter();
        assert_eq!(sh.interpret_line("!!"), LineOutcome::Continue);
        assert!(sh.launcher.launched.is_empty());
    }

    #[test]
    fn test_history_shortcut_replays_the_previous_line() {
        let mut sh = interpreter();
        sh.interpret_line("echo hi");
        sh.interpret_line("!!");
        assert_eq!(sh.launcher.launched.len(), 2);
        assert_eq!(sh.launcher.launched[0], sh.launcher.launched[1]);
    }

    #[test]
    fn test_overlong_line_is_rejected() {
        let mut sh = interpreter();
        let long = "x".repeat(MAX_LINE + 1);
        assert_eq!(sh.interpret_line(&long), LineOutcome::Continue);
        assert!(sh.launcher.launched.is_empty());
    }

    #[test]
    fn test_directive_only_line_launches_nothing() {
        let mut sh = interpreter();
        assert_eq!(sh.interpret_line("&"), LineOutcome::Continue);
        assert!(sh.launcher.launched.is_empty());
    }
}
