use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    routing::{get, post},
    Json, Router,
};

use shopkeeper_parties::PartyKind;

use crate::app::dto;
use crate::app::routes::customers::{
    create_party, get_party, list_parties, suspend_party, update_party,
};
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_supplier).get(list_suppliers))
        .route("/:id", get(get_supplier).patch(update_supplier))
        .route("/:id/suspend", post(suspend_supplier))
}

pub async fn create_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreatePartyRequest>,
) -> axum::response::Response {
    create_party(
        services,
        tenant,
        principal,
        PartyKind::Supplier,
        "suppliers.write",
        body,
    )
    .await
}

pub async fn list_suppliers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    list_parties(services, tenant, principal, PartyKind::Supplier, "suppliers.read").await
}

pub async fn get_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    get_party(services, tenant, principal, id, PartyKind::Supplier, "suppliers.read").await
}

pub async fn update_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdatePartyRequest>,
) -> axum::response::Response {
    update_party(
        services,
        tenant,
        principal,
        id,
        body,
        PartyKind::Supplier,
        "suppliers.write",
    )
    .await
}

pub async fn suspend_supplier(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    suspend_party(
        services,
        tenant,
        principal,
        id,
        PartyKind::Supplier,
        "suppliers.write",
    )
    .await
}
