//! Structured error types for the table renderer.
//!
//! Structural misuse of the node tree, JSON input errors, and font loading
//! failures. Text measurement failures never reach this type: they fall back
//! to an approximate width inside [`crate::config::SvgConfig`].

use crate::font::FontError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A child was attached to a node kind that must stay childless
    /// (primitives and layout directives).
    #[error("cannot add child to {kind}")]
    ChildNotAllowed { kind: &'static str },

    /// JSON input failed to parse as a valid document description.
    #[error("failed to parse document: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A font could not be loaded or registered.
    #[error(transparent)]
    Font(#[from] FontError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the document schema. Check node types and field names.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        Error::Parse { source: e, hint }
    }
}
