use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shopkeeper_expenses::Expense;

use crate::app::routes::common::parse_doc_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_expense).get(list_expenses))
        .route("/:id", get(get_expense).delete(delete_expense))
}

pub async fn create_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateExpenseRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "expenses.write") {
        return errors::authz_error_to_response(e);
    }

    let mut expense = Expense::new(tenant.tenant_id(), body.category, body.amount, body.incurred_at);
    expense.note = body.note;

    match services.expenses(tenant.tenant_id()).add(expense) {
        Ok(created) => (StatusCode::CREATED, Json(dto::expense_to_json(&created))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "expenses.read") {
        return errors::authz_error_to_response(e);
    }

    match services.expenses(tenant.tenant_id()).list() {
        Ok(expenses) => {
            let items = expenses.iter().map(dto::expense_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "expenses.read") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.expenses(tenant.tenant_id()).get(id) {
        Ok(expense) => (StatusCode::OK, Json(dto::expense_to_json(&expense))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "expenses.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.expenses(tenant.tenant_id()).delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
