use thiserror::Error;

/// Why a run of lines could not be parsed as a list.
///
/// All variants are recoverable: the caller logs the diagnostic and falls
/// through to default editor behavior. Indent strings in messages are
/// rendered with `S`/`T` placeholders so mixed-whitespace bugs stay legible.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("inconsistent indent on line {line}: expected `{expected}`, got `{actual}`")]
    InconsistentIndent {
        line: usize,
        expected: String,
        actual: String,
    },

    #[error("note indent mismatch on line {line}: expected `{expected}`, got `{actual}`")]
    NoteIndentMismatch {
        line: usize,
        expected: String,
        actual: String,
    },

    #[error("line {line} looks like a continuation but no list item precedes it")]
    OrphanContinuation { line: usize },
}

/// Renders whitespace as `S` (space) / `T` (tab) placeholders.
pub fn render_whitespace(indent: &str) -> String {
    indent
        .chars()
        .map(|c| match c {
            ' ' => 'S',
            '\t' => 'T',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_spaces_and_tabs_as_placeholders() {
        assert_eq!(render_whitespace("  \t "), "SSTS");
        assert_eq!(render_whitespace(""), "");
    }

    #[test]
    fn error_messages_name_expected_and_actual() {
        let err = ParseError::InconsistentIndent {
            line: 3,
            expected: render_whitespace("\t"),
            actual: render_whitespace("  "),
        };
        assert_eq!(
            err.to_string(),
            "inconsistent indent on line 3: expected `T`, got `SS`"
        );
    }
}
