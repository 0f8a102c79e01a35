use serde::de::DeserializeOwned;

use crate::{
    foundation::error::{MuseumError, MuseumResult},
    service::types::ErrorBody,
};

/// Validate a response body against `T`, failing closed.
///
/// `what` names the response in the error, e.g. `"museums"` gives
/// `invalid museums response: ...`.
pub fn parse_json<T: DeserializeOwned>(body: &[u8], what: &str) -> MuseumResult<T> {
    serde_json::from_slice(body)
        .map_err(|e| MuseumError::schema(format!("invalid {what} response: {e}")))
}

/// Message from a `{ "error": "..." }` body, if the body has that shape.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
#[path = "../../tests/unit/service/schema.rs"]
mod tests;
