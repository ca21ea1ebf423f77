use std::sync::Arc;

use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, routing::get, Json, Router,
};

use shopkeeper_auth::Organization;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new().route("/", get(get_organization).put(upsert_organization))
}

/// GET /organization
pub async fn get_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "organization.read") {
        return errors::authz_error_to_response(e);
    }

    match services.organizations(tenant.tenant_id()).list() {
        Ok(orgs) => match orgs.into_iter().next() {
            Some(org) => {
                (StatusCode::OK, Json(dto::organization_to_json(&org))).into_response()
            }
            None => errors::json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                "organization is not registered",
            ),
        },
        Err(e) => errors::store_error_to_response(e),
    }
}

/// PUT /organization
///
/// Registers the tenant's organization record, or renames it.
pub async fn upsert_organization(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::UpsertOrganizationRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "organization.write") {
        return errors::authz_error_to_response(e);
    }

    let collection = services.organizations(tenant.tenant_id());
    let existing = match collection.list() {
        Ok(orgs) => orgs.into_iter().next(),
        Err(e) => return errors::store_error_to_response(e),
    };

    let result = match existing {
        Some(mut org) => {
            org.name = body.name;
            collection.update(org)
        }
        None => collection.add(Organization::new(tenant.tenant_id(), body.name)),
    };

    match result {
        Ok(org) => (StatusCode::OK, Json(dto::organization_to_json(&org))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
