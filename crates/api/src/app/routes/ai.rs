use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use shopkeeper_ai::{
    run_flow, AnswerBusinessQuestion, BusinessQuestion, ForecastSales, ModelClient,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route("/ask", post(ask))
        .route("/forecast", post(forecast))
}

fn require_model(services: &AppServices) -> Result<Arc<dyn ModelClient>, axum::response::Response> {
    services.model().cloned().ok_or_else(|| {
        errors::json_error(
            StatusCode::SERVICE_UNAVAILABLE,
            "model_unconfigured",
            "no model endpoint is configured",
        )
    })
}

/// POST /ai/ask
///
/// Answers a free-form question against the tenant's current numbers. The
/// model only ever sees the aggregate snapshot, not the documents.
pub async fn ask(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::AskRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "ai.ask") {
        return errors::authz_error_to_response(e);
    }
    let model = match require_model(&services) {
        Ok(model) => model,
        Err(resp) => return resp,
    };

    let snapshot = match services.business_snapshot(tenant.tenant_id()) {
        Ok(snapshot) => snapshot,
        Err(e) => return errors::store_error_to_response(e),
    };
    let input = BusinessQuestion {
        question: body.question,
        snapshot,
    };

    match run_flow::<AnswerBusinessQuestion>(model.as_ref(), &input).await {
        Ok(answer) => (StatusCode::OK, Json(answer)).into_response(),
        Err(e) => errors::ai_error_to_response(e),
    }
}

/// POST /ai/forecast
///
/// Projects monthly revenue from recorded invoice payments.
pub async fn forecast(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::ForecastRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "ai.forecast") {
        return errors::authz_error_to_response(e);
    }
    let model = match require_model(&services) {
        Ok(model) => model,
        Err(resp) => return resp,
    };

    let history = match services.sales_history(tenant.tenant_id(), body.horizon) {
        Ok(history) => history,
        Err(e) => return errors::store_error_to_response(e),
    };

    match run_flow::<ForecastSales>(model.as_ref(), &history).await {
        Ok(forecast) => (StatusCode::OK, Json(forecast)).into_response(),
        Err(e) => errors::ai_error_to_response(e),
    }
}
