//! Live-query streaming endpoint.
//!
//! Streams the full result set of one tenant collection over SSE: an initial
//! snapshot on connect, then a fresh snapshot after every mutation of that
//! collection.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse,
    },
    routing::get,
    Router,
};
use tokio::sync::mpsc::unbounded_channel;
use tokio_stream::wrappers::UnboundedReceiverStream;

use shopkeeper_core::TenantId;
use shopkeeper_store::{LiveQuery, StoreResult, Subscription};

use crate::app::errors;
use crate::app::services::AppServices;
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new().route("/:collection", get(watch_collection))
}

/// The read permission guarding each watchable collection.
fn permission_for(collection: &str) -> Option<&'static str> {
    match collection {
        "parties" => Some("customers.read"),
        "inventory_items" | "stock_movements" => Some("inventory.read"),
        "invoices" => Some("invoices.read"),
        "expenses" => Some("expenses.read"),
        "returns" => Some("returns.read"),
        "users" => Some("users.read"),
        "conversations" | "messages" => Some("chat.read"),
        "notifications" => Some("notifications.read"),
        _ => None,
    }
}

fn subscribe(
    services: &AppServices,
    tenant_id: TenantId,
    collection: &str,
) -> Option<StoreResult<Subscription>> {
    let sub = match collection {
        "parties" => services.parties(tenant_id).watch().map(LiveQuery::into_inner),
        "inventory_items" => services.items(tenant_id).watch().map(LiveQuery::into_inner),
        "stock_movements" => services
            .movements(tenant_id)
            .watch()
            .map(LiveQuery::into_inner),
        "invoices" => services.invoices(tenant_id).watch().map(LiveQuery::into_inner),
        "expenses" => services.expenses(tenant_id).watch().map(LiveQuery::into_inner),
        "returns" => services.returns(tenant_id).watch().map(LiveQuery::into_inner),
        "users" => services.users(tenant_id).watch().map(LiveQuery::into_inner),
        "conversations" => services
            .conversations(tenant_id)
            .watch()
            .map(LiveQuery::into_inner),
        "messages" => services.messages(tenant_id).watch().map(LiveQuery::into_inner),
        "notifications" => services
            .notifications(tenant_id)
            .watch()
            .map(LiveQuery::into_inner),
        _ => return None,
    };
    Some(sub)
}

/// GET /watch/:collection
///
/// Each SSE `snapshot` event carries the complete current result set of the
/// collection as a JSON array of stored documents.
pub async fn watch_collection(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(collection): Path<String>,
) -> axum::response::Response {
    let perm = match permission_for(&collection) {
        Some(perm) => perm,
        None => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "unknown collection")
        }
    };
    if let Err(e) = crate::authz::require(&tenant, &principal, perm) {
        return errors::authz_error_to_response(e);
    }

    let subscription = match subscribe(&services, tenant.tenant_id(), &collection) {
        Some(Ok(sub)) => sub,
        Some(Err(e)) => return errors::store_error_to_response(e),
        None => {
            return errors::json_error(StatusCode::NOT_FOUND, "not_found", "unknown collection")
        }
    };

    let (tx, rx) = unbounded_channel::<Result<SseEvent, std::convert::Infallible>>();

    // The store side is a blocking mpsc receiver; pump it on the blocking
    // pool and forward snapshots into the async channel.
    tokio::task::spawn_blocking(move || {
        let mut last_heartbeat = std::time::Instant::now();
        loop {
            match subscription.recv_timeout(Duration::from_millis(1000)) {
                Ok(snapshot) => {
                    let data = match serde_json::to_string(&snapshot) {
                        Ok(data) => data,
                        Err(_) => continue,
                    };
                    if tx.send(Ok(SseEvent::default().event("snapshot").data(data))).is_err() {
                        break;
                    }
                    last_heartbeat = std::time::Instant::now();
                }
                Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                    if last_heartbeat.elapsed() > Duration::from_secs(15) {
                        if tx
                            .send(Ok(SseEvent::default().event("heartbeat").data("{}")))
                            .is_err()
                        {
                            break;
                        }
                        last_heartbeat = std::time::Instant::now();
                    }
                }
                Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    let stream = UnboundedReceiverStream::new(rx);
    Sse::new(stream)
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
        .into_response()
}
