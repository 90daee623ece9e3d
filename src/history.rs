//! The repeat-last-command cache backing the `!!` shortcut.

/// The two-character prefix that requests re-execution of the previous line.
const SHORTCUT: &str = "!!";

/// Errors that can occur while resolving a raw line against the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryError {
    /// The `!!` shortcut was used before any command had been recorded.
    NoHistory,
}

/// A raw input line after history resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// The line the rest of the pipeline should parse.
    pub line: String,
    /// True when the line was recalled from the cache; the loop echoes it
    /// back so the user sees what is about to run.
    pub recalled: bool,
}

/// Stores the single most recently read raw command line.
///
/// The cache is empty before the first read. Every non-shortcut read
/// overwrites it unconditionally, blank lines included; invoking the
/// shortcut leaves it untouched.
#[derive(Debug, Default)]
pub struct History {
    last: String,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the stored line.
    pub fn record(&mut self, line: &str) {
        self.last.clear();
        self.last.push_str(line);
    }

    /// Resolve a raw input line against the cache.
    ///
    /// A line starting with `!!` recalls the stored line verbatim, or fails
    /// with [`HistoryError::NoHistory`] when nothing has been recorded yet.
    /// Any other line is recorded and returned unchanged.
    pub fn resolve(&mut self, raw: &str) -> Result<Resolved, HistoryError> {
        if raw.starts_with(SHORTCUT) {
            if self.last.is_empty() {
                return Err(HistoryError::NoHistory);
            }
            return Ok(Resolved {
                line: self.last.clone(),
                recalled: true,
            });
        }
        self.record(raw);
        Ok(Resolved {
            line: raw.to_owned(),
            recalled: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcut_with_empty_cache_fails() {
        let mut history = History::new();
        assert_eq!(history.resolve("!!"), Err(HistoryError::NoHistory));
    }

    #[test]
    fn test_shortcut_recalls_previous_line() {
        let mut history = History::new();
        history.resolve("echo hi").unwrap();
        let resolved = history.resolve("!!").unwrap();
        assert_eq!(resolved.line, "echo hi");
        assert!(resolved.recalled);
    }

    #[test]
    fn test_shortcut_does_not_update_cache() {
        let mut history = History::new();
        history.resolve("echo first").unwrap();
        history.resolve("!!").unwrap();
        let resolved = history.resolve("!!").unwrap();
        assert_eq!(resolved.line, "echo first");
    }

    #[test]
    fn test_shortcut_is_a_prefix_check() {
        let mut history = History::new();
        history.resolve("echo hi").unwrap();
        // The shortcut is a prefix match: anything after the two shortcut
        // characters is ignored.
        let resolved = history.resolve("!!trailing").unwrap();
        assert_eq!(resolved.line, "echo hi");
    }

    #[test]
    fn test_regular_line_overwrites_cache() {
        let mut history = History::new();
        history.resolve("echo one").unwrap();
        history.resolve("echo two").unwrap();
        assert_eq!(history.resolve("!!").unwrap().line, "echo two");
    }

    #[test]
    fn test_regular_line_is_not_marked_recalled() {
        let mut history = History::new();
        let resolved = history.resolve("ls").unwrap();
        assert_eq!(resolved.line, "ls");
        assert!(!resolved.recalled);
    }
}
