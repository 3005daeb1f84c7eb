/// Error types shared by ingestion, the edit client and downloads
///
/// Every failure is converted into one of these values before it reaches
/// the session, so nothing is ever left as an unhandled task error.
/// All variants are `Clone` because they travel inside iced messages.

use thiserror::Error;

/// Input rejected locally, before any I/O or network call is made
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The selected file does not declare an image content type
    #[error("Please upload a valid image file ({0} is not an image)")]
    NotAnImage(String),

    /// The selected file has no content
    #[error("The selected image file is empty")]
    EmptyImage,

    /// Generation was requested with a blank instruction
    #[error("Please enter instructions first.")]
    BlankInstruction,
}

/// Top-level error type of the application
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The edit service (or the transport to it) rejected the request
    #[error("{0}")]
    ExternalService(String),

    /// Local file read/write failure
    #[error("{context}: {message}")]
    Io { context: String, message: String },

    /// Service configuration is missing or malformed
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a `std::io::Error` with a short description of what was attempted
    pub fn io(context: impl Into<String>, err: std::io::Error) -> Self {
        Error::Io {
            context: context.into(),
            message: err.to_string(),
        }
    }

    pub fn service(message: impl Into<String>) -> Self {
        Error::ExternalService(message.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::service("The edit service did not respond in time.")
        } else if err.is_decode() {
            Error::service(format!("Malformed response from the edit service: {err}"))
        } else {
            Error::service(format!("Request to the edit service failed: {err}"))
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
