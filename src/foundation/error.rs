/// Convenience result type used across the crate.
pub type MuseumResult<T> = Result<T, MuseumError>;

/// Top-level error taxonomy used by engine and client APIs.
#[derive(thiserror::Error, Debug)]
pub enum MuseumError {
    /// Invalid user-provided data (unknown catalog ids, empty titles, bad room files).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid static configuration: slot tables, geometry, unknown slot ids.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The Museum Service answered with a non-success status.
    #[error("http error {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Server-provided `error` message, or a generated fallback.
        message: String,
    },

    /// The request could not be sent or its body could not be read.
    #[error("transport error: {0}")]
    Transport(String),

    /// A response body did not match its strict schema.
    #[error("schema error: {0}")]
    Schema(String),

    /// An image source could not be fetched or decoded.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Errors when serializing or deserializing local documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MuseumError {
    /// Build a [`MuseumError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`MuseumError::Configuration`] value.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Build a [`MuseumError::Http`] value.
    pub fn http(status: u16, msg: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: msg.into(),
        }
    }

    /// Build a [`MuseumError::Transport`] value.
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Build a [`MuseumError::Schema`] value.
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }

    /// Build a [`MuseumError::ImageLoad`] value.
    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    /// Build a [`MuseumError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Whether this failure came from the Museum Service boundary and should be shown
    /// to the user as a message rather than treated as a bug.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Transport(_) | Self::Schema(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
