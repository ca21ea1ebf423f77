use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shopkeeper_parties::{Party, PartyKind, PartyStatus};

use crate::app::routes::common::parse_doc_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_customer).get(list_customers))
        .route("/:id", get(get_customer).patch(update_customer))
        .route("/:id/suspend", post(suspend_customer))
}

pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreatePartyRequest>,
) -> axum::response::Response {
    create_party(
        services,
        tenant,
        principal,
        PartyKind::Customer,
        "customers.write",
        body,
    )
    .await
}

pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    list_parties(services, tenant, principal, PartyKind::Customer, "customers.read").await
}

pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    get_party(services, tenant, principal, id, PartyKind::Customer, "customers.read").await
}

pub async fn update_customer(
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
        PartyKind::Customer,
        "customers.write",
    )
    .await
}

pub async fn suspend_customer(
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
        PartyKind::Customer,
        "customers.write",
    )
    .await
}

// Kind-generic handlers shared with the suppliers routes. The /customers and
// /suppliers surfaces are views over one parties collection; the kind guard
// keeps each surface from touching the other's records.

pub(super) async fn create_party(
    services: Arc<AppServices>,
    tenant: TenantContext,
    principal: PrincipalContext,
    kind: PartyKind,
    perm: &'static str,
    body: dto::CreatePartyRequest,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, perm) {
        return errors::authz_error_to_response(e);
    }

    let mut party = Party::new(tenant.tenant_id(), kind, body.name);
    if let Some(contact) = body.contact {
        party = party.with_contact(contact);
    }

    match services.parties(tenant.tenant_id()).add(party) {
        Ok(created) => (StatusCode::CREATED, Json(dto::party_to_json(&created))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub(super) async fn list_parties(
    services: Arc<AppServices>,
    tenant: TenantContext,
    principal: PrincipalContext,
    kind: PartyKind,
    perm: &'static str,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, perm) {
        return errors::authz_error_to_response(e);
    }

    let parties = match services.parties(tenant.tenant_id()).list() {
        Ok(parties) => parties,
        Err(e) => return errors::store_error_to_response(e),
    };
    let items = parties
        .iter()
        .filter(|p| p.kind == kind)
        .map(dto::party_to_json)
        .collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub(super) async fn get_party(
    services: Arc<AppServices>,
    tenant: TenantContext,
    principal: PrincipalContext,
    id: String,
    kind: PartyKind,
    perm: &'static str,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, perm) {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.parties(tenant.tenant_id()).get(id) {
        Ok(party) if party.kind == kind => {
            (StatusCode::OK, Json(dto::party_to_json(&party))).into_response()
        }
        Ok(_) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "party not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub(super) async fn update_party(
    services: Arc<AppServices>,
    tenant: TenantContext,
    principal: PrincipalContext,
    id: String,
    body: dto::UpdatePartyRequest,
    kind: PartyKind,
    perm: &'static str,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, perm) {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = services.parties(tenant.tenant_id());
    let mut party = match collection.get(id) {
        Ok(party) if party.kind == kind => party,
        Ok(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "party not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    if let Some(name) = body.name {
        party.name = name;
    }
    if let Some(contact) = body.contact {
        party.contact = contact;
    }

    match collection.update(party) {
        Ok(updated) => (StatusCode::OK, Json(dto::party_to_json(&updated))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub(super) async fn suspend_party(
    services: Arc<AppServices>,
    tenant: TenantContext,
    principal: PrincipalContext,
    id: String,
    kind: PartyKind,
    perm: &'static str,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, perm) {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = services.parties(tenant.tenant_id());
    let mut party = match collection.get(id) {
        Ok(party) if party.kind == kind => party,
        Ok(_) => return errors::json_error(StatusCode::NOT_FOUND, "not_found", "party not found"),
        Err(e) => return errors::store_error_to_response(e),
    };

    party.status = PartyStatus::Suspended;
    match collection.update(party) {
        Ok(updated) => (StatusCode::OK, Json(dto::party_to_json(&updated))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
