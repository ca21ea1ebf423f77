use axum::http::StatusCode;

use shopkeeper_core::{DocId, UserId};

use crate::app::errors;

/// Parse a path segment as a document id, or produce the 400 response.
pub fn parse_doc_id(raw: &str) -> Result<DocId, axum::response::Response> {
    raw.parse::<DocId>()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid id"))
}

/// Parse a user id from request input, or produce the 400 response.
pub fn parse_user_id(raw: &str) -> Result<UserId, axum::response::Response> {
    raw.parse::<UserId>()
        .map_err(|_| errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid user id"))
}
