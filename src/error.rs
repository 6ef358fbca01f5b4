//! Error types for gemchat.
//!
//! Failures fall into exactly two groups.  A configuration error means the
//! session cannot talk to the model at all (no credential); it is detected
//! before any network activity.  An upstream error covers everything that can
//! go wrong once a request is on the wire: transport failures, HTTP error
//! statuses, error events in the stream, and payloads that do not decode.

use std::error;
use std::fmt;
use std::sync::Arc;

/// The main error type for gemchat.
#[derive(Clone, Debug)]
pub enum Error {
    /// The session is misconfigured; typically the credential is missing or empty.
    Configuration {
        /// Human-readable error message.
        message: String,
    },

    /// The remote call failed or its stream terminated abnormally.
    Upstream {
        /// Human-readable error message.
        message: String,
        /// HTTP status code, when the failure came with one.
        status_code: Option<u16>,
        /// Underlying cause.
        source: Option<Arc<dyn error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Creates a new upstream error with no further detail.
    pub fn upstream(message: impl Into<String>) -> Self {
        Error::Upstream {
            message: message.into(),
            status_code: None,
            source: None,
        }
    }

    /// Creates an upstream error for an error status reported by the API.
    pub fn api(status_code: u16, status: Option<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = match status {
            Some(status) => format!("{status}: {message}"),
            None => message,
        };
        Error::Upstream {
            message,
            status_code: Some(status_code),
            source: None,
        }
    }

    /// Creates an upstream error for a failure inside the HTTP client.
    pub fn http_client(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self::with_source(message, source)
    }

    /// Creates an upstream error for a connection failure.
    pub fn connection(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self::with_source(message, source)
    }

    /// Creates an upstream error for a request that exceeded the transport timeout.
    pub fn timeout(message: impl Into<String>, duration: Option<f64>) -> Self {
        let message = message.into();
        match duration {
            Some(duration) => Self::upstream(format!("{message} ({duration} seconds)")),
            None => Self::upstream(message),
        }
    }

    /// Creates an upstream error for a stream that broke mid-flight.
    pub fn streaming(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self::with_source(message, source)
    }

    /// Creates an upstream error for a payload that failed to (de)serialize.
    pub fn serialization(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self::with_source(message, source)
    }

    /// Creates an upstream error for bytes that are not valid text.
    pub fn encoding(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Self::with_source(message, source)
    }

    fn with_source(
        message: impl Into<String>,
        source: Option<Box<dyn error::Error + Send + Sync>>,
    ) -> Self {
        Error::Upstream {
            message: message.into(),
            status_code: None,
            source: source.map(Arc::from),
        }
    }

    /// Returns true if this error is a configuration error.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }

    /// Returns true if this error came from the remote call.
    pub fn is_upstream(&self) -> bool {
        matches!(self, Error::Upstream { .. })
    }

    /// Returns the human-readable message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Error::Configuration { message } => message,
            Error::Upstream { message, .. } => message,
        }
    }

    /// Returns the HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Upstream { status_code, .. } => *status_code,
            Error::Configuration { .. } => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Configuration { message } => {
                write!(f, "Configuration error: {message}")
            }
            Error::Upstream {
                message,
                status_code,
                ..
            } => {
                if let Some(status_code) = status_code {
                    write!(f, "Upstream error (HTTP {status_code}): {message}")
                } else {
                    write!(f, "Upstream error: {message}")
                }
            }
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Upstream { source, .. } => source
                .as_ref()
                .map(|e| e.as_ref() as &(dyn error::Error + 'static)),
            Error::Configuration { .. } => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::serialization(format!("JSON error: {err}"), Some(Box::new(err)))
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::http_client(format!("URL parse error: {err}"), Some(Box::new(err)))
    }
}

/// A specialized Result type for gemchat operations.
pub type Result<T> = std::result::Result<T, Error>;
