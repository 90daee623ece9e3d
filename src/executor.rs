//! Process launching: the fork/exec/wait choreography for one- and
//! two-stage command lines.
//!
//! The shell forks one child per command line. For a pipeline that child
//! forks again: the grandchild becomes the first stage with its standard
//! output wired to a pipe, and the child itself becomes the second stage
//! reading from the pipe. The second stage waits for the first to fully
//! terminate before replacing its process image, so the two stages never
//! overlap in execution: stage one's output is fully flushed into the pipe
//! before stage two consumes it, trading pipeline parallelism for
//! simplicity.

use crate::parser::{Invocation, RedirectSpec, Stage};
use anyhow::{Context, Result};
use nix::libc;
use nix::sys::wait::{self, waitpid};
use nix::unistd::{self, ForkResult};
use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::os::fd::{AsRawFd, OwnedFd};
use std::os::unix::fs::OpenOptionsExt;

/// Strategy for running an extracted command line.
///
/// The interactive loop depends only on this trait, so tests can observe
/// dispatch decisions with a recording implementation instead of creating
/// real processes.
pub trait Launcher {
    /// Launch the invocation, waiting for it unless it is backgrounded.
    fn launch(&mut self, invocation: &Invocation) -> Result<()>;
}

/// An anonymous unidirectional pipe connecting two pipeline stages.
struct Pipe {
    read: OwnedFd,
    write: OwnedFd,
}

impl Pipe {
    fn new() -> Result<Self> {
        let (read, write) = unistd::pipe().context("Failed to create the pipe!")?;
        Ok(Pipe { read, write })
    }
}

/// Launches commands as real operating-system processes via fork/exec.
#[derive(Debug, Default)]
pub struct UnixLauncher;

impl Launcher for UnixLauncher {
    /// Fork a child for the command line and wait for it unless the
    /// background flag is set. A backgrounded child is not tracked any
    /// further. Fork failure abandons the command with no child created.
    fn launch(&mut self, invocation: &Invocation) -> Result<()> {
        match unsafe { unistd::fork() } {
            Err(err) => Err(anyhow::Error::new(err).context("Failed to fork!")),
            Ok(ForkResult::Child) => match &invocation.second {
                Some(second) => run_pipeline(&invocation.first, second),
                None => exec_stage(&invocation.first),
            },
            Ok(ForkResult::Parent { child }) => {
                if !invocation.background {
                    let _ = waitpid(child, None);
                }
                Ok(())
            }
        }
    }
}

/// Connect two stages with a pipe. Runs inside the forked child: forks a
/// grandchild that becomes the first stage, then becomes the second stage
/// itself once the first has terminated. Never returns.
fn run_pipeline(first: &Stage, second: &Stage) -> ! {
    let Pipe { read, write } = match Pipe::new() {
        Ok(pipe) => pipe,
        Err(err) => {
            eprintln!("{err}");
            exit_child(1);
        }
    };
    match unsafe { unistd::fork() } {
        Err(_) => {
            eprintln!("Failed to fork!");
            exit_child(1);
        }
        Ok(ForkResult::Child) => {
            // First stage: standard output feeds the pipe.
            drop(read);
            if unistd::dup2(write.as_raw_fd(), libc::STDOUT_FILENO).is_err() {
                eprintln!("Failed to attach the pipe!");
                exit_child(1);
            }
            drop(write);
            exec_stage(first);
        }
        Ok(ForkResult::Parent { .. }) => {
            // Second stage: standard input comes from the pipe, and the
            // first stage must have fully terminated before control moves
            // to the target program.
            drop(write);
            if unistd::dup2(read.as_raw_fd(), libc::STDIN_FILENO).is_err() {
                eprintln!("Failed to attach the pipe!");
                exit_child(1);
            }
            drop(read);
            let _ = wait::wait();
            exec_stage(second);
        }
    }
}

/// Apply a stage's redirections and replace the current process image with
/// its program, resolved through `PATH`. Never returns: on any failure the
/// process reports to stderr and exits, leaving the interactive loop in
/// the parent untouched.
fn exec_stage(stage: &Stage) -> ! {
    if !apply_redirections(&stage.redirect) {
        exit_child(1);
    }
    let argv: Vec<CString> = match stage
        .argv
        .iter()
        .map(|arg| CString::new(arg.as_str()))
        .collect()
    {
        Ok(argv) => argv,
        Err(_) => {
            eprintln!("Argument contains an embedded NUL byte");
            exit_child(126);
        }
    };
    let err = unistd::execvp(&argv[0], &argv).unwrap_err();
    eprintln!("Failed to launch {}: {}", stage.argv[0], err);
    exit_child(127);
}

/// Open the stage's redirection targets and splice them onto the standard
/// streams. Output targets are created or truncated with mode 0666; input
/// targets are opened read-only and must already exist. Returns `false`
/// after reporting the failing filename; the opened `File` handles close
/// on drop, while the dup'ed descriptors survive the exec.
fn apply_redirections(spec: &RedirectSpec) -> bool {
    if let Some(path) = &spec.output {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o666)
            .open(path);
        match file {
            Ok(file) => {
                if unistd::dup2(file.as_raw_fd(), libc::STDOUT_FILENO).is_err() {
                    eprintln!("Failed to open the output file: {path}");
                    return false;
                }
            }
            Err(_) => {
                eprintln!("Failed to open the output file: {path}");
                return false;
            }
        }
    }
    if let Some(path) = &spec.input {
        match File::open(path) {
            Ok(file) => {
                if unistd::dup2(file.as_raw_fd(), libc::STDIN_FILENO).is_err() {
                    eprintln!("Failed to open the input file: {path}");
                    return false;
                }
            }
            Err(_) => {
                eprintln!("Failed to open the input file: {path}");
                return false;
            }
        }
    }
    true
}

/// Terminate a forked child without running the parent's exit machinery.
fn exit_child(code: i32) -> ! {
    unsafe { libc::_exit(code) }
}
