use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::context::{PrincipalContext, TenantContext};

/// GET /health (public, no auth).
pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// GET /whoami
pub async fn whoami(
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "tenant_id": tenant.tenant_id().to_string(),
            "principal_id": principal.principal_id().to_string(),
            "role": principal.role(),
        })),
    )
        .into_response()
}
