use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shopkeeper_expenses::{ReturnItem, ReturnResolution};
use shopkeeper_inventory::{MovementKind, StockMovement};
use shopkeeper_store::WriteBatch;

use crate::app::routes::common::parse_doc_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_return).get(list_returns))
        .route("/:id", get(get_return))
        .route("/:id/resolve", post(resolve_return))
}

pub async fn create_return(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateReturnRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "returns.write") {
        return errors::authz_error_to_response(e);
    }
    let invoice_id = match parse_doc_id(&body.invoice_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let item_id = match parse_doc_id(&body.item_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // The return must point at a real invoice holding the returned item.
    let invoice = match services.invoices(tenant.tenant_id()).get(invoice_id) {
        Ok(invoice) => invoice,
        Err(e) => return errors::store_error_to_response(e),
    };
    if !invoice.lines.iter().any(|l| l.item_id == item_id) {
        return errors::json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invariant_violation",
            "item does not appear on the invoice",
        );
    }

    let mut ret = ReturnItem::new(
        tenant.tenant_id(),
        invoice_id,
        item_id,
        body.quantity,
        body.refund_amount,
    );
    ret.reason = body.reason;

    match services.returns(tenant.tenant_id()).add(ret) {
        Ok(created) => (StatusCode::CREATED, Json(dto::return_to_json(&created))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_returns(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "returns.read") {
        return errors::authz_error_to_response(e);
    }

    match services.returns(tenant.tenant_id()).list() {
        Ok(returns) => {
            let items = returns.iter().map(dto::return_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_return(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "returns.read") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.returns(tenant.tenant_id()).get(id) {
        Ok(ret) => (StatusCode::OK, Json(dto::return_to_json(&ret))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /returns/:id/resolve
///
/// Settles a pending return. A restock resolution also records the inbound
/// stock movement and the adjusted item quantity in the same batch.
pub async fn resolve_return(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::ResolveReturnRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "returns.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let ret = match services.returns(tenant.tenant_id()).get(id) {
        Ok(ret) => ret,
        Err(e) => return errors::store_error_to_response(e),
    };
    if ret.resolution != ReturnResolution::Pending {
        return errors::json_error(
            StatusCode::CONFLICT,
            "conflict",
            "return is already resolved",
        );
    }
    if body.resolution == ReturnResolution::Pending {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "cannot resolve a return back to pending",
        );
    }

    let mut resolved = ret.clone();
    resolved.resolution = body.resolution;

    let mut batch = WriteBatch::new(tenant.tenant_id());

    if resolved.restocks() {
        let item = match services.items(tenant.tenant_id()).get(resolved.item_id) {
            Ok(item) => item,
            Err(e) => return errors::store_error_to_response(e),
        };
        let movement = StockMovement::new(
            tenant.tenant_id(),
            item.id,
            MovementKind::Inbound,
            resolved.quantity as i64,
        );
        let restocked = match item.apply_delta(movement.delta()) {
            Ok(restocked) => restocked,
            Err(e) => return errors::domain_error_to_response(e),
        };
        let planned = batch
            .put(movement)
            .and_then(|b| b.put(restocked));
        if let Err(e) = planned {
            return errors::store_error_to_response(e);
        }
    }

    if let Err(e) = batch.put(resolved.clone()) {
        return errors::store_error_to_response(e);
    }
    if let Err(e) = services.store().apply(batch) {
        return errors::store_error_to_response(e);
    }

    (StatusCode::OK, Json(dto::return_to_json(&resolved))).into_response()
}
