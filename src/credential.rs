//! The API credential.

use std::env;
use std::fmt;

use crate::{Error, Result};

/// Environment variable the credential is read from.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// A non-empty API key.
///
/// The key never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap an API key, rejecting the empty string.
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(missing_credential());
        }
        Ok(Self(key))
    }

    /// Read the key from [`API_KEY_ENV`].
    ///
    /// Returns `None` if the variable is unset, empty, or not unicode.
    pub fn from_env() -> Option<Self> {
        env::var(API_KEY_ENV).ok().and_then(|key| Self::new(key).ok())
    }

    /// Read the key from [`API_KEY_ENV`], failing with a configuration error.
    pub fn load() -> Result<Self> {
        Self::from_env().ok_or_else(missing_credential)
    }

    /// Validate an optional key, as handed to the generator.
    pub fn require(key: Option<&str>) -> Result<Self> {
        match key {
            Some(key) => Self::new(key),
            None => Err(missing_credential()),
        }
    }

    /// The raw key.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// The configuration error reported when no usable key is available.
pub fn missing_credential() -> Error {
    Error::configuration(format!("{API_KEY_ENV} not found in environment variables."))
}
