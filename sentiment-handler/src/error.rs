use backtrace::Backtrace;
use hf_hub::api::sync::ApiError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub struct WrappedError {
    pub error: Box<dyn std::error::Error + Send + Sync>,
    pub backtrace: Backtrace,
}

impl fmt::Display for WrappedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl std::error::Error for WrappedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.error.as_ref())
    }
}

// `sentiment-handler` main error type
#[derive(thiserror::Error, Debug)]
pub enum Error {
    // -----------------------------------
    // Model loading errors
    // -----------------------------------
    #[error("Checkpoint '{0}' not found. The model directory must contain a `best_model.bin` file.")]
    CheckpointNotFound(PathBuf),

    #[error("Repository '{0}' not found.")]
    RepositoryNotFound(String),

    // -----------------------------------
    // Load tokenizer errors
    // -----------------------------------
    #[error("Tokenizer files not found. Expected a `tokenizer.json` or `vocab.txt` file.")]
    TokenizerFilesNotFound,

    #[error("Tokenizer build error: {0}")]
    TokenizerBuildError(String),

    #[error("Missing the special token `{0}`.")]
    MissingSpecialToken(String),

    #[error("Missing the id of the special token `{0}`.")]
    MissingSpecialTokenId(String),

    #[error("Tokenizer encoding error: {0}.")]
    TokenizerEncodingError(String),

    // -----------------------------------
    // Content negotiation errors
    // -----------------------------------
    #[error("Requested unsupported ContentType in Content-Type: {0}")]
    UnsupportedContentType(String),

    #[error("Requested unsupported ContentType in Accept: {0}")]
    UnsupportedAccept(String),

    // -----------------------------------
    // Prediction errors
    // -----------------------------------
    #[error("Input record has no key '{0}'.")]
    MissingInputKey(String),

    #[error("Input field '{key}' must be a {expected}.")]
    InvalidInputField { key: String, expected: String },

    #[error("Forward param {0} cannot be `None`.")]
    MissingForwardParam(String),

    #[error("{0}")]
    Msg(String),

    // Wrapped errors from other crates
    #[error(transparent)]
    Wrapped(#[from] WrappedError),
}

impl Error {
    pub fn wrap(e: impl std::error::Error + Send + Sync + 'static) -> Self {
        Error::Wrapped(WrappedError {
            error: Box::new(e),
            backtrace: Backtrace::new(),
        })
    }

    pub fn msg<T: std::fmt::Display>(msg: T) -> Self {
        Error::Msg(msg.to_string())
    }
}

impl From<candle_core::Error> for Error {
    fn from(e: candle_core::Error) -> Self {
        Error::wrap(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::wrap(e)
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Error::wrap(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::wrap(e)
    }
}

#[macro_export]
macro_rules! bail {
    ($msg:expr) => {
        return Err($crate::error::Error::msg($msg))
    };
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn test_unsupported_accept_message() {
        let error = Error::UnsupportedAccept("text/xml".to_string());
        assert_eq!(
            error.to_string(),
            "Requested unsupported ContentType in Accept: text/xml"
        );
    }

    #[test]
    fn test_wrapped_error_keeps_source() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let error = Error::from(io_error);
        assert!(matches!(error, Error::Wrapped(_)));
        assert_eq!(error.to_string(), "gone");
    }
}
