//! Error types for vita operations.

use thiserror::Error;

use crate::style::FontWeight;

/// Errors that can occur while loading or rendering a resume.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown style '{name}' (available: {})", available.join(", "))]
    UnknownStyle {
        name: String,
        available: Vec<String>,
    },

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("malformed date '{value}': {reason}")]
    DateFormat { value: String, reason: &'static str },

    #[error("font '{family}' ({weight}) is not available")]
    FontUnavailable { family: String, weight: FontWeight },

    #[error("I/O error: {0}")]
    Render(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("invalid resume JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Fieldless discriminant of [`Error`], for callers that map errors to
/// exit statuses or messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownStyle,
    UnsupportedFormat,
    DateFormat,
    FontUnavailable,
    Render,
    Input,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownStyle { .. } => ErrorKind::UnknownStyle,
            Error::UnsupportedFormat(_) => ErrorKind::UnsupportedFormat,
            Error::DateFormat { .. } => ErrorKind::DateFormat,
            Error::FontUnavailable { .. } => ErrorKind::FontUnavailable,
            Error::Render(_) | Error::Zip(_) => ErrorKind::Render,
            Error::Json(_) => ErrorKind::Input,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_style_lists_available() {
        let err = Error::UnknownStyle {
            name: "fancy".to_string(),
            available: vec!["professional".to_string(), "modern".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown style 'fancy' (available: professional, modern)"
        );
        assert_eq!(err.kind(), ErrorKind::UnknownStyle);
    }

    #[test]
    fn test_io_errors_are_render_errors() {
        let err: Error = std::io::Error::other("disk full").into();
        assert_eq!(err.kind(), ErrorKind::Render);
    }
}
