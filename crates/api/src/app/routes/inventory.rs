use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shopkeeper_core::{Document, Timestamp};
use shopkeeper_inventory::{InventoryItem, StockMovement};
use shopkeeper_store::WriteBatch;

use crate::app::routes::common::parse_doc_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/items", post(create_item).get(list_items))
        .route("/items/:id", get(get_item).patch(update_item))
        .route(
            "/items/:id/movements",
            post(move_stock).get(list_movements),
        )
}

pub async fn create_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateItemRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "inventory.write") {
        return errors::authz_error_to_response(e);
    }

    let mut item = InventoryItem::new(
        tenant.tenant_id(),
        body.sku,
        body.name,
        body.unit_cost,
        body.unit_price,
    );
    item.reorder_level = body.reorder_level;

    match services.items(tenant.tenant_id()).add(item) {
        Ok(created) => (StatusCode::CREATED, Json(dto::item_to_json(&created))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_items(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "inventory.read") {
        return errors::authz_error_to_response(e);
    }

    match services.items(tenant.tenant_id()).list() {
        Ok(items) => {
            let items = items.iter().map(dto::item_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "inventory.read") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.items(tenant.tenant_id()).get(id) {
        Ok(item) => (StatusCode::OK, Json(dto::item_to_json(&item))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_item(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateItemRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "inventory.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = services.items(tenant.tenant_id());
    let mut item = match collection.get(id) {
        Ok(item) => item,
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Some(name) = body.name {
        item.name = name;
    }
    if let Some(unit_cost) = body.unit_cost {
        item.unit_cost = unit_cost;
    }
    if let Some(unit_price) = body.unit_price {
        item.unit_price = unit_price;
    }
    if let Some(reorder_level) = body.reorder_level {
        item.reorder_level = reorder_level;
    }

    match collection.update(item) {
        Ok(updated) => (StatusCode::OK, Json(dto::item_to_json(&updated))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /inventory/items/:id/movements
///
/// Records a stock movement and applies its delta to the item in one batch,
/// so watchers never see the movement without the adjusted quantity.
pub async fn move_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::MoveStockRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "inventory.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let item = match services.items(tenant.tenant_id()).get(id) {
        Ok(item) => item,
        Err(e) => return errors::store_error_to_response(e),
    };

    let mut movement = StockMovement::new(tenant.tenant_id(), item.id, body.kind, body.quantity);
    movement.reason = body.reason;
    // Stamp before batching so the response mirrors the stored document.
    movement.stamp_created_at(Timestamp::now());

    let updated = match item.apply_delta(movement.delta()) {
        Ok(updated) => updated,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut batch = WriteBatch::new(tenant.tenant_id());
    let planned = batch
        .put(movement.clone())
        .and_then(|b| b.put(updated.clone()));
    if let Err(e) = planned {
        return errors::store_error_to_response(e);
    }
    if let Err(e) = services.store().apply(batch) {
        return errors::store_error_to_response(e);
    }

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "movement": dto::movement_to_json(&movement),
            "item": dto::item_to_json(&updated),
        })),
    )
        .into_response()
}

pub async fn list_movements(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "inventory.read") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.movements(tenant.tenant_id()).list() {
        Ok(movements) => {
            let items = movements
                .iter()
                .filter(|m| m.item_id == id)
                .map(dto::movement_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
