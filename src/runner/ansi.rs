//! ANSI escape sequence stripping for log output.

use regex::Regex;
use std::sync::LazyLock;

// SGR sequences only (`ESC [ ... m`): the crawler emits colors, and the
// terminal copy keeps them. Pattern is a literal, so the unwrap cannot fire.
static ANSI_SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\x1b\\[[0-9;]*m").unwrap());

/// Remove ANSI color escape sequences from a line of child output.
///
/// Applied to the run log copy only; the terminal copy is left intact.
pub fn strip_ansi(line: &str) -> String {
    ANSI_SGR.replace_all(line, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_color_sequences() {
        let line = "\x1b[92mID: 1 - URL: https://example.com/\x1b[0m";
        assert_eq!(strip_ansi(line), "ID: 1 - URL: https://example.com/");
    }

    #[test]
    fn plain_line_is_unchanged() {
        let line = "Todas las URLs únicas se han guardado en urls_encontradas.txt";
        assert_eq!(strip_ansi(line), line);
    }

    #[test]
    fn strips_multiple_sequences_in_one_line() {
        let line = "\x1b[1;31merror\x1b[0m and \x1b[92mok\x1b[0m";
        assert_eq!(strip_ansi(line), "error and ok");
    }

    #[test]
    fn empty_line_is_unchanged() {
        assert_eq!(strip_ansi(""), "");
    }

    #[test]
    fn bare_escape_without_sgr_is_kept() {
        // Only color (SGR) sequences are stripped, matching the original
        // wrapper's behavior.
        let line = "\x1b[2Jcleared";
        assert_eq!(strip_ansi(line), "\x1b[2Jcleared");
    }
}
