use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shopkeeper_auth::User;
use shopkeeper_core::UserId;

use crate::app::routes::common::{parse_doc_id, parse_user_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_user).get(list_users))
        .route("/:id", get(get_user))
        .route("/:id/role", post(assign_role))
        .route("/:id/suspend", post(suspend_user))
}

pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "users.write") {
        return errors::authz_error_to_response(e);
    }

    let user_id = match body.user_id {
        Some(raw) => match parse_user_id(&raw) {
            Ok(id) => id,
            Err(resp) => return resp,
        },
        None => UserId::new(),
    };

    let user = User::new(
        tenant.tenant_id(),
        user_id,
        body.email,
        body.display_name,
        body.role,
    );

    match services.users(tenant.tenant_id()).add(user) {
        Ok(created) => (StatusCode::CREATED, Json(dto::user_to_json(&created))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "users.read") {
        return errors::authz_error_to_response(e);
    }

    match services.users(tenant.tenant_id()).list() {
        Ok(users) => {
            let items = users.iter().map(dto::user_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "users.read") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.users(tenant.tenant_id()).get(id) {
        Ok(user) => (StatusCode::OK, Json(dto::user_to_json(&user))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /users/:id/role
///
/// Role assignment is gated twice: only owners may change roles, and nobody
/// may change their own.
pub async fn assign_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AssignRoleRequest>,
) -> axum::response::Response {
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = services.users(tenant.tenant_id());
    let user = match collection.get(id) {
        Ok(user) => user,
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Err(e) = crate::authz::require_role_change(&tenant, &principal, user.user_id) {
        return errors::authz_error_to_response(e);
    }

    let updated = match user.with_role(body.role) {
        Ok(updated) => updated,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match collection.update(updated) {
        Ok(updated) => (StatusCode::OK, Json(dto::user_to_json(&updated))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn suspend_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "users.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = services.users(tenant.tenant_id());
    let user = match collection.get(id) {
        Ok(user) => user,
        Err(e) => return errors::store_error_to_response(e),
    };

    match collection.update(user.suspend()) {
        Ok(updated) => (StatusCode::OK, Json(dto::user_to_json(&updated))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
