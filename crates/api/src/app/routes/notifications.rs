use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shopkeeper_core::UserId;
use shopkeeper_messaging::{plan_mark_all_notifications_read, Notification};

use crate::app::routes::common::parse_user_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_notification).get(list_notifications))
        .route("/read-all", post(mark_all_read))
}

fn caller_user_id(principal: &PrincipalContext) -> UserId {
    UserId::from_uuid(*principal.principal_id().as_uuid())
}

pub async fn create_notification(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateNotificationRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "notifications.write") {
        return errors::authz_error_to_response(e);
    }
    let user_id = match parse_user_id(&body.user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let notification = Notification::new(tenant.tenant_id(), user_id, body.kind, body.body);

    match services.notifications(tenant.tenant_id()).add(notification) {
        Ok(created) => {
            (StatusCode::CREATED, Json(dto::notification_to_json(&created))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// GET /notifications
///
/// The caller's own inbox, unread first is left to the client; the list is in
/// id (creation) order.
pub async fn list_notifications(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "notifications.read") {
        return errors::authz_error_to_response(e);
    }
    let caller = caller_user_id(&principal);

    match services.notifications(tenant.tenant_id()).list() {
        Ok(notifications) => {
            let items = notifications
                .iter()
                .filter(|n| n.user_id == caller)
                .map(dto::notification_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /notifications/read-all
///
/// Marks every unread notification of the caller read, in one batch. Only
/// touches the caller's own inbox, so it rides on the read permission.
pub async fn mark_all_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "notifications.read") {
        return errors::authz_error_to_response(e);
    }
    let caller = caller_user_id(&principal);

    let notifications = match services.notifications(tenant.tenant_id()).list() {
        Ok(notifications) => notifications,
        Err(e) => return errors::store_error_to_response(e),
    };
    let mine = notifications
        .into_iter()
        .filter(|n| n.user_id == caller)
        .collect::<Vec<_>>();

    let batch = match plan_mark_all_notifications_read(tenant.tenant_id(), &mine) {
        Ok(batch) => batch,
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = services.store().apply(batch) {
        return errors::store_error_to_response(e);
    }

    (StatusCode::OK, Json(serde_json::json!({ "status": "read" }))).into_response()
}
