use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use shopkeeper_ai::AiError;
use shopkeeper_auth::AuthzError;
use shopkeeper_core::DomainError;
use shopkeeper_store::StoreError;

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Domain(e) => domain_error_to_response(e),
        StoreError::TenantIsolation(msg) => {
            json_error(StatusCode::FORBIDDEN, "tenant_isolation", msg)
        }
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::AlreadyExists => {
            json_error(StatusCode::CONFLICT, "conflict", "document already exists")
        }
        StoreError::Codec(msg) => {
            tracing::error!(error = %msg, "stored document failed to decode");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "codec_error", msg)
        }
        StoreError::Poisoned => {
            tracing::error!("store lock poisoned");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "internal store failure",
            )
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Unauthorized => {
            json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized")
        }
    }
}

pub fn authz_error_to_response(err: AuthzError) -> axum::response::Response {
    json_error(StatusCode::FORBIDDEN, "forbidden", err.to_string())
}

pub fn ai_error_to_response(err: AiError) -> axum::response::Response {
    match err {
        AiError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        AiError::Transport(msg) => {
            tracing::error!(error = %msg, "model call failed");
            json_error(StatusCode::BAD_GATEWAY, "model_unreachable", "model call failed")
        }
        AiError::BadStatus(status) => {
            tracing::error!(status, "model endpoint returned error");
            json_error(StatusCode::BAD_GATEWAY, "model_error", "model call failed")
        }
        AiError::MalformedResponse(msg) => {
            tracing::error!(error = %msg, "model response failed to parse");
            json_error(
                StatusCode::BAD_GATEWAY,
                "model_error",
                "model returned an unusable response",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
