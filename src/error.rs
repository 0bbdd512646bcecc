use thiserror::Error;

/// Errors raised while decoding TOON text.
///
/// Each variant is a closed kind carrying the source position where the
/// problem was detected. Encoding never fails, so there is no encode-side
/// family. In lenient mode only [`Error::LengthMismatch`] is recoverable;
/// every other kind aborts the decode in both modes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A tab in leading whitespace, or a dedent whose width matches no
    /// enclosing indentation level.
    #[error("invalid indentation at line {line}, column {column}")]
    InvalidIndentation { line: usize, column: usize },

    /// A double quote was opened but never closed before the end of the
    /// line or input. Positioned at the opening quote.
    #[error("unterminated string at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    /// An unknown escape sequence inside a quoted string.
    #[error("invalid escape sequence '\\{escape}' at line {line}, column {column}")]
    InvalidEscape {
        escape: char,
        line: usize,
        column: usize,
    },

    /// A declared array-header count disagrees with the actual number of
    /// inline values, tabular rows, or list items.
    #[error("array '{key}' declares {declared} elements but has {actual} at line {line}")]
    LengthMismatch {
        key: String,
        declared: usize,
        actual: usize,
        line: usize,
    },

    /// Any other grammar violation: malformed array headers, wrong tabular
    /// row width, unexpected indentation, trailing content.
    #[error("{message} at line {line}, column {column}")]
    Syntax {
        message: String,
        line: usize,
        column: usize,
    },
}

impl Error {
    pub(crate) fn syntax(message: impl Into<String>, line: usize, column: usize) -> Self {
        Error::Syntax {
            message: message.into(),
            line,
            column,
        }
    }

    /// Source line of the error.
    pub fn line(&self) -> usize {
        match self {
            Error::InvalidIndentation { line, .. }
            | Error::UnterminatedString { line, .. }
            | Error::InvalidEscape { line, .. }
            | Error::LengthMismatch { line, .. }
            | Error::Syntax { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_display_carries_position() {
        let err = Error::UnterminatedString { line: 3, column: 8 };
        assert_eq!(err.to_string(), "unterminated string at line 3, column 8");
        assert_eq!(err.line(), 3);

        let err = Error::LengthMismatch {
            key: "x".to_string(),
            declared: 2,
            actual: 1,
            line: 1,
        };
        assert_eq!(
            err.to_string(),
            "array 'x' declares 2 elements but has 1 at line 1"
        );
    }
}
