use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use shopkeeper_invoicing::{Invoice, LineItem, Payment};

use crate::app::routes::common::parse_doc_id;
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_invoice).get(list_invoices))
        .route("/:id", get(get_invoice))
        .route("/:id/payments", post(register_payment))
        .route("/:id/void", post(void_invoice))
}

pub async fn create_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateInvoiceRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "invoices.write") {
        return errors::authz_error_to_response(e);
    }
    let customer_id = match parse_doc_id(&body.customer_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    // Invoices are only issued against active customers.
    let customer = match services.parties(tenant.tenant_id()).get(customer_id) {
        Ok(party) if party.kind == shopkeeper_parties::PartyKind::Customer => party,
        Ok(_) => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "customer not found")
        }
        Err(e) => return errors::store_error_to_response(e),
    };
    if !customer.can_transact() {
        return errors::json_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "invariant_violation",
            "customer is suspended",
        );
    }

    let mut lines = Vec::with_capacity(body.lines.len());
    for line in body.lines {
        let item_id = match parse_doc_id(&line.item_id) {
            Ok(id) => id,
            Err(resp) => return resp,
        };
        lines.push(LineItem {
            item_id,
            description: line.description,
            quantity: line.quantity,
            unit_price: line.unit_price,
        });
    }

    let mut invoice = Invoice::new(tenant.tenant_id(), customer_id, lines);
    invoice.discount = body.discount;
    invoice.due_date = body.due_date;

    match services.invoices(tenant.tenant_id()).add(invoice) {
        Ok(created) => match dto::invoice_to_json(&created) {
            Ok(json) => (StatusCode::CREATED, Json(json)).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_invoices(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "invoices.read") {
        return errors::authz_error_to_response(e);
    }

    let invoices = match services.invoices(tenant.tenant_id()).list() {
        Ok(invoices) => invoices,
        Err(e) => return errors::store_error_to_response(e),
    };

    let mut items = Vec::with_capacity(invoices.len());
    for invoice in &invoices {
        match dto::invoice_to_json(invoice) {
            Ok(json) => items.push(json),
            Err(e) => return errors::domain_error_to_response(e),
        }
    }
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn get_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "invoices.read") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.invoices(tenant.tenant_id()).get(id) {
        Ok(invoice) => match dto::invoice_to_json(&invoice) {
            Ok(json) => (StatusCode::OK, Json(json)).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn register_payment(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::RegisterPaymentRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "invoices.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = services.invoices(tenant.tenant_id());
    let invoice = match collection.get(id) {
        Ok(invoice) => invoice,
        Err(e) => return errors::store_error_to_response(e),
    };

    let paid = match invoice.record_payment(Payment {
        amount: body.amount,
        received_at: Utc::now(),
        reference: body.reference,
    }) {
        Ok(paid) => paid,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match collection.update(paid) {
        Ok(updated) => match dto::invoice_to_json(&updated) {
            Ok(json) => (StatusCode::OK, Json(json)).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn void_invoice(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::VoidInvoiceRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "invoices.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let collection = services.invoices(tenant.tenant_id());
    let invoice = match collection.get(id) {
        Ok(invoice) => invoice,
        Err(e) => return errors::store_error_to_response(e),
    };

    let voided = match invoice.void(body.reason) {
        Ok(voided) => voided,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match collection.update(voided) {
        Ok(updated) => match dto::invoice_to_json(&updated) {
            Ok(json) => (StatusCode::OK, Json(json)).into_response(),
            Err(e) => errors::domain_error_to_response(e),
        },
        Err(e) => errors::store_error_to_response(e),
    }
}
