//! Directive extraction: turning a token vector into an executable
//! [`Invocation`].
//!
//! Three ordered passes run over the tokens of a line. The background
//! marker is stripped first (it trails the whole line, so the pipe split
//! must not see it), the line is then split at the first `|`, and finally
//! redirections are extracted independently per pipeline stage. Each pass
//! builds a fresh filtered vector rather than splicing in place.

/// Which files, if any, a stage's standard streams have been retargeted to.
///
/// Derived once per stage from that stage's own tokens and never shared
/// across stages. A `Some` field is the "redirection bit" for that stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RedirectSpec {
    /// File to read standard input from, opened read-only.
    pub input: Option<String>,
    /// File to write standard output to, created or truncated.
    pub output: Option<String>,
}

/// One side of a (possibly single-stage) pipeline: a cleaned argument
/// vector plus its redirections.
///
/// The argument vector never contains directive tokens (`&`, `<`, `>`, `|`)
/// or their filename operands; its first element is the program name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub argv: Vec<String>,
    pub redirect: RedirectSpec,
}

/// A fully extracted command line, ready for the launcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// The first (or only) pipeline stage.
    pub first: Stage,
    /// The second stage, present when the line contained a `|` separator
    /// with tokens on both sides.
    pub second: Option<Stage>,
    /// Whether the caller should skip waiting for the command to finish.
    pub background: bool,
}

/// Run all extraction passes over a token vector.
///
/// Returns `None` when no program name is left to execute: either the
/// vector held nothing but directives (e.g. a lone `&`) or a pipeline
/// stage came out empty. Malformed redirections are reported on stderr by
/// the redirection pass but do not abort extraction; dispatch proceeds
/// best-effort with whatever was extracted (see [`extract_redirections`]).
pub fn extract(mut tokens: Vec<String>) -> Option<Invocation> {
    let background = extract_background(&mut tokens);
    let (left, right) = split_pipeline(tokens);
    match right {
        Some(right) => {
            let (argv, mut redirect) = extract_redirections(left);
            let (argv2, mut redirect2) = extract_redirections(right);
            if argv.is_empty() || argv2.is_empty() {
                return None;
            }
            // The pipe always wins on the shared ends: stage one writes to
            // it and stage two reads from it, even when the user also named
            // a file there. The file tokens are consumed regardless.
            redirect.output = None;
            redirect2.input = None;
            Some(Invocation {
                first: Stage { argv, redirect },
                second: Some(Stage {
                    argv: argv2,
                    redirect: redirect2,
                }),
                background,
            })
        }
        None => {
            let (argv, redirect) = extract_redirections(left);
            if argv.is_empty() {
                return None;
            }
            Some(Invocation {
                first: Stage { argv, redirect },
                second: None,
                background,
            })
        }
    }
}

/// Strip a trailing background marker from the token vector.
///
/// A final token that is exactly `&` is removed; a final token merely
/// ending in `&` has that character stripped in place. Returns whether a
/// marker was found. An empty vector yields `false`.
pub fn extract_background(tokens: &mut Vec<String>) -> bool {
    let Some(last) = tokens.last_mut() else {
        return false;
    };
    if last == "&" {
        tokens.pop();
        return true;
    }
    if last.ends_with('&') {
        last.pop();
        return true;
    }
    false
}

/// Split the token vector at the first `|` separator.
///
/// The separator itself is discarded. Only the first separator is honored:
/// any later `|` tokens are passed through as literal arguments of the
/// second stage. A trailing `|` (nothing after the separator) is treated
/// as if no pipe were present.
pub fn split_pipeline(tokens: Vec<String>) -> (Vec<String>, Option<Vec<String>>) {
    match tokens.iter().position(|token| token == "|") {
        Some(pos) => {
            let mut left = tokens;
            let right = left.split_off(pos + 1);
            left.pop();
            if right.is_empty() {
                (left, None)
            } else {
                (left, Some(right))
            }
        }
        None => (tokens, None),
    }
}

/// Extract `< file` and `> file` directives from one stage's tokens.
///
/// The scan runs left to right; an operator and its following filename are
/// both consumed. At most two operators are processed, after which the
/// remaining tokens pass through untouched; a repeated operator within
/// that allowance overwrites the previously captured filename. An operator
/// with no filename after it is reported on stderr, consumed, and ends the
/// scan — the partially extracted result is still returned so the caller
/// can dispatch best-effort.
pub fn extract_redirections(tokens: Vec<String>) -> (Vec<String>, RedirectSpec) {
    let mut spec = RedirectSpec::default();
    let mut cleaned = Vec::with_capacity(tokens.len());
    let mut operators = 0;
    let mut rest = tokens.into_iter();
    while let Some(token) = rest.next() {
        if operators == 2 || !matches!(token.as_str(), "<" | ">") {
            cleaned.push(token);
            continue;
        }
        operators += 1;
        match rest.next() {
            Some(target) if token == "<" => spec.input = Some(target),
            Some(target) => spec.output = Some(target),
            None => {
                if token == "<" {
                    eprintln!("No input file provided!");
                } else {
                    eprintln!("No output file provided!");
                }
                break;
            }
        }
    }
    (cleaned, spec)
}
