//! Error types for the transcription engine

use std::fmt;

/// Errors that halt a transcription operation
///
/// Weak signal, unknown names and missing features are never reported here; those
/// conditions simply produce no output. Only input/decoding/setup problems are errors.
#[derive(Debug, Clone)]
pub enum TranscriptionError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Audio-processing pipeline could not be set up
    SetupError(String),

    /// Processing error during transcription
    ProcessingError(String),
}

impl fmt::Display for TranscriptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranscriptionError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            TranscriptionError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            TranscriptionError::SetupError(msg) => write!(f, "Setup error: {}", msg),
            TranscriptionError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
        }
    }
}

impl std::error::Error for TranscriptionError {}

/// Failures of the remote palette-generation service
///
/// Always recoverable: the palette manager substitutes the local curated palette.
#[derive(Debug, Clone)]
pub enum PaletteError {
    /// Request could not be sent or the connection failed
    Transport(String),

    /// Service answered with a non-success HTTP status
    Status(u16),

    /// Response body did not match the expected shape
    Malformed(String),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::Transport(msg) => write!(f, "Palette service unreachable: {}", msg),
            PaletteError::Status(code) => write!(f, "Palette service returned HTTP {}", code),
            PaletteError::Malformed(msg) => write!(f, "Malformed palette response: {}", msg),
        }
    }
}

impl std::error::Error for PaletteError {}

impl From<serde_json::Error> for PaletteError {
    fn from(err: serde_json::Error) -> Self {
        PaletteError::Malformed(err.to_string())
    }
}
