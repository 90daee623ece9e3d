//! Lexical analysis for the shell: splitting a raw input line into tokens.

/// The characters that separate tokens: space, tab, newline, vertical tab,
/// form feed and carriage return.
const DELIMITERS: [char; 6] = [' ', '\t', '\n', '\x0B', '\x0C', '\r'];

/// Split a raw input line into whitespace-delimited tokens.
///
/// Tokens keep their original order and empty tokens (runs of consecutive
/// delimiters) are dropped, so an empty or all-whitespace line yields an
/// empty vector. The function is pure: it only allocates the token storage.
///
/// # Examples
/// ```
/// use osh::lexer::tokenize;
/// assert_eq!(tokenize("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
/// assert!(tokenize(" \t ").is_empty());
/// ```
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(DELIMITERS)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_line_yields_no_tokens() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_all_whitespace_yields_no_tokens() {
        assert!(tokenize(" \t\n\x0B\x0C\r").is_empty());
    }

    #[test]
    fn test_simple_command_line() {
        assert_eq!(tokenize("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
    }

    #[test]
    fn test_consecutive_delimiters_are_collapsed() {
        assert_eq!(tokenize("  echo \t hi  \n"), vec!["echo", "hi"]);
    }

    #[test]
    fn test_order_is_preserved() {
        assert_eq!(tokenize("a b c b a"), vec!["a", "b", "c", "b", "a"]);
    }
}
