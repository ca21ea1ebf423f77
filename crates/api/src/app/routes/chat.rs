use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use shopkeeper_core::{Document, Timestamp, UserId};
use shopkeeper_messaging::{plan_mark_conversation_read, Conversation, Message};
use shopkeeper_store::WriteBatch;

use crate::app::routes::common::{parse_doc_id, parse_user_id};
use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::{PrincipalContext, TenantContext};

pub fn router() -> Router {
    Router::new()
        .route(
            "/conversations",
            post(create_conversation).get(list_conversations),
        )
        .route(
            "/conversations/:id/messages",
            post(post_message).get(list_messages),
        )
        .route("/conversations/:id/read", post(mark_conversation_read))
}

fn caller_user_id(principal: &PrincipalContext) -> UserId {
    UserId::from_uuid(*principal.principal_id().as_uuid())
}

pub async fn create_conversation(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateConversationRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "chat.write") {
        return errors::authz_error_to_response(e);
    }

    let caller = caller_user_id(&principal);
    let mut participants = Vec::with_capacity(body.participants.len() + 1);
    for raw in &body.participants {
        match parse_user_id(raw) {
            Ok(id) => participants.push(id),
            Err(resp) => return resp,
        }
    }
    // The caller is always a participant.
    if !participants.contains(&caller) {
        participants.push(caller);
    }

    let conversation = Conversation::new(tenant.tenant_id(), participants);

    match services.conversations(tenant.tenant_id()).add(conversation) {
        Ok(created) => {
            (StatusCode::CREATED, Json(dto::conversation_to_json(&created))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_conversations(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "chat.read") {
        return errors::authz_error_to_response(e);
    }
    let caller = caller_user_id(&principal);

    match services.conversations(tenant.tenant_id()).list() {
        Ok(conversations) => {
            let items = conversations
                .iter()
                .filter(|c| c.is_participant(caller))
                .map(dto::conversation_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /chat/conversations/:id/messages
///
/// Appends the message and bumps every other participant's unread counter in
/// one batch.
pub async fn post_message(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::PostMessageRequest>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "chat.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let caller = caller_user_id(&principal);

    let conversation = match services.conversations(tenant.tenant_id()).get(id) {
        Ok(conversation) => conversation,
        Err(e) => return errors::store_error_to_response(e),
    };
    if !conversation.is_participant(caller) {
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "not a participant of this conversation",
        );
    }

    let mut message = Message::new(tenant.tenant_id(), conversation.id, caller, body.body);
    // Stamp before batching so the response mirrors the stored document.
    message.stamp_created_at(Timestamp::now());
    let posted = match conversation.record_post(caller, Timestamp::now()) {
        Ok(posted) => posted,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let mut batch = WriteBatch::new(tenant.tenant_id());
    let planned = batch.put(message.clone()).and_then(|b| b.put(posted));
    if let Err(e) = planned {
        return errors::store_error_to_response(e);
    }
    if let Err(e) = services.store().apply(batch) {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::message_to_json(&message))).into_response()
}

pub async fn list_messages(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "chat.read") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let caller = caller_user_id(&principal);

    let conversation = match services.conversations(tenant.tenant_id()).get(id) {
        Ok(conversation) => conversation,
        Err(e) => return errors::store_error_to_response(e),
    };
    if !conversation.is_participant(caller) {
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "not a participant of this conversation",
        );
    }

    match services.messages(tenant.tenant_id()).list() {
        Ok(messages) => {
            let items = messages
                .iter()
                .filter(|m| m.conversation_id == conversation.id)
                .map(dto::message_to_json)
                .collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /chat/conversations/:id/read
///
/// Marks the whole conversation read for the caller: unread counter reset
/// plus a receipt on every unseen message, applied atomically.
pub async fn mark_conversation_read(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(tenant): Extension<TenantContext>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(e) = crate::authz::require(&tenant, &principal, "chat.write") {
        return errors::authz_error_to_response(e);
    }
    let id = match parse_doc_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let caller = caller_user_id(&principal);

    let conversation = match services.conversations(tenant.tenant_id()).get(id) {
        Ok(conversation) => conversation,
        Err(e) => return errors::store_error_to_response(e),
    };
    if !conversation.is_participant(caller) {
        return errors::json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            "not a participant of this conversation",
        );
    }

    let messages = match services.messages(tenant.tenant_id()).list() {
        Ok(messages) => messages,
        Err(e) => return errors::store_error_to_response(e),
    };

    let batch = match plan_mark_conversation_read(&conversation, &messages, caller) {
        Ok(batch) => batch,
        Err(e) => return errors::store_error_to_response(e),
    };
    if let Err(e) = services.store().apply(batch) {
        return errors::store_error_to_response(e);
    }

    (StatusCode::OK, Json(serde_json::json!({ "status": "read" }))).into_response()
}
