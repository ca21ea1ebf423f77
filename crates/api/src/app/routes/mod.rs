use axum::{routing::get, Router};

pub mod ai;
pub mod chat;
pub mod common;
pub mod customers;
pub mod expenses;
pub mod inventory;
pub mod invoices;
pub mod notifications;
pub mod organization;
pub mod returns;
pub mod suppliers;
pub mod system;
pub mod users;
pub mod watch;

/// Router for all authenticated (tenant-scoped) endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/organization", organization::router())
        .nest("/customers", customers::router())
        .nest("/suppliers", suppliers::router())
        .nest("/inventory", inventory::router())
        .nest("/invoices", invoices::router())
        .nest("/expenses", expenses::router())
        .nest("/returns", returns::router())
        .nest("/users", users::router())
        .nest("/chat", chat::router())
        .nest("/notifications", notifications::router())
        .nest("/ai", ai::router())
        .nest("/watch", watch::router())
}
