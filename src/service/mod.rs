//! Museum Service boundary: wire types, strict response validation, HTTP client.

pub(crate) mod client;
pub(crate) mod schema;
pub(crate) mod types;
