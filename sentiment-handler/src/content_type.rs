use std::fmt;

use crate::{Error, Result};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// The media types the handler can read requests from and write responses to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    #[default]
    Json,
}

impl ContentType {
    /// Parses an HTTP-style media type. Parameters (e.g. `; charset=utf-8`) are ignored and the
    /// comparison is case-insensitive.
    ///
    /// # Arguments
    ///
    /// * `value` - The raw `Content-Type` or `Accept` value.
    ///
    /// # Returns
    ///
    /// The matching `ContentType`, or `None` if the media type is not supported.
    pub fn parse(value: &str) -> Option<Self> {
        let essence = value.split(';').next().unwrap_or_default().trim();
        if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
            Some(ContentType::Json)
        } else {
            None
        }
    }

    /// Parses the declared type of a request body.
    pub fn from_content_type(value: &str) -> Result<Self> {
        Self::parse(value).ok_or_else(|| Error::UnsupportedContentType(value.to_string()))
    }

    /// Parses the requested type of a response body.
    pub fn from_accept(value: &str) -> Result<Self> {
        Self::parse(value).ok_or_else(|| Error::UnsupportedAccept(value.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Json => JSON_CONTENT_TYPE,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
