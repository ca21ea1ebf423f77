use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use shopkeeper_auth::{Organization, Role, User};
use shopkeeper_expenses::{Expense, ExpenseCategory, ReturnItem, ReturnResolution};
use shopkeeper_inventory::{InventoryItem, MovementKind, StockMovement};
use shopkeeper_invoicing::Invoice;
use shopkeeper_messaging::{Conversation, Message, Notification};
use shopkeeper_parties::{ContactInfo, Party};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct CreatePartyRequest {
    pub name: String,
    pub contact: Option<ContactInfo>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePartyRequest {
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
}

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub sku: String,
    pub name: String,
    pub unit_cost: u64,
    pub unit_price: u64,
    #[serde(default)]
    pub reorder_level: u64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub name: Option<String>,
    pub unit_cost: Option<u64>,
    pub unit_price: Option<u64>,
    pub reorder_level: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct MoveStockRequest {
    pub kind: MovementKind,
    pub quantity: i64,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InvoiceLineRequest {
    pub item_id: String,
    pub description: String,
    pub quantity: u64,
    pub unit_price: u64,
}

#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    pub customer_id: String,
    pub lines: Vec<InvoiceLineRequest>,
    #[serde(default)]
    pub discount: u64,
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterPaymentRequest {
    pub amount: u64,
    pub reference: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct VoidInvoiceRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub category: ExpenseCategory,
    pub amount: u64,
    pub incurred_at: DateTime<Utc>,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateReturnRequest {
    pub invoice_id: String,
    pub item_id: String,
    pub quantity: u64,
    pub refund_amount: u64,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveReturnRequest {
    pub resolution: ReturnResolution,
}

#[derive(Debug, Deserialize)]
pub struct UpsertOrganizationRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: Option<String>,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub participants: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateNotificationRequest {
    pub user_id: String,
    pub kind: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    #[serde(default = "default_horizon")]
    pub horizon: u32,
}

fn default_horizon() -> u32 {
    3
}

// -------------------------
// Response mapping
// -------------------------

fn created_at_json(at: Option<shopkeeper_core::Timestamp>) -> JsonValue {
    at.map(|t| json!(t.to_iso())).unwrap_or(JsonValue::Null)
}

pub fn party_to_json(p: &Party) -> JsonValue {
    json!({
        "id": p.id.to_string(),
        "kind": p.kind,
        "name": p.name,
        "contact": p.contact,
        "status": p.status,
        "created_at": created_at_json(p.created_at),
    })
}

pub fn item_to_json(i: &InventoryItem) -> JsonValue {
    json!({
        "id": i.id.to_string(),
        "sku": i.sku,
        "name": i.name,
        "quantity_on_hand": i.quantity_on_hand,
        "reorder_level": i.reorder_level,
        "low_stock": i.is_low_stock(),
        "unit_cost": i.unit_cost,
        "unit_price": i.unit_price,
        "created_at": created_at_json(i.created_at),
    })
}

pub fn movement_to_json(m: &StockMovement) -> JsonValue {
    json!({
        "id": m.id.to_string(),
        "item_id": m.item_id.to_string(),
        "kind": m.kind,
        "quantity": m.quantity,
        "reason": m.reason,
        "created_at": created_at_json(m.created_at),
    })
}

/// Invoice JSON carries the derived totals; they are computed here, never read
/// from storage.
pub fn invoice_to_json(inv: &Invoice) -> Result<JsonValue, shopkeeper_core::DomainError> {
    Ok(json!({
        "id": inv.id.to_string(),
        "customer_id": inv.customer_id.to_string(),
        "lines": inv.lines,
        "discount": inv.discount,
        "payments": inv.payments,
        "due_date": inv.due_date,
        "subtotal": inv.subtotal()?,
        "total": inv.total()?,
        "total_paid": inv.total_paid()?,
        "outstanding": inv.outstanding()?,
        "status": inv.status()?,
        "created_at": created_at_json(inv.created_at),
    }))
}

pub fn expense_to_json(e: &Expense) -> JsonValue {
    json!({
        "id": e.id.to_string(),
        "category": e.category,
        "amount": e.amount,
        "incurred_at": e.incurred_at,
        "note": e.note,
        "created_at": created_at_json(e.created_at),
    })
}

pub fn return_to_json(r: &ReturnItem) -> JsonValue {
    json!({
        "id": r.id.to_string(),
        "invoice_id": r.invoice_id.to_string(),
        "item_id": r.item_id.to_string(),
        "quantity": r.quantity,
        "refund_amount": r.refund_amount,
        "resolution": r.resolution,
        "reason": r.reason,
        "created_at": created_at_json(r.created_at),
    })
}

pub fn organization_to_json(o: &Organization) -> JsonValue {
    json!({
        "id": o.id.to_string(),
        "name": o.name,
        "created_at": created_at_json(o.created_at),
    })
}

pub fn user_to_json(u: &User) -> JsonValue {
    json!({
        "id": u.id.to_string(),
        "user_id": u.user_id.to_string(),
        "email": u.email,
        "display_name": u.display_name,
        "role": u.role,
        "status": u.status,
        "created_at": created_at_json(u.created_at),
    })
}

pub fn conversation_to_json(c: &Conversation) -> JsonValue {
    json!({
        "id": c.id.to_string(),
        "participants": c.participants,
        "unread": c.unread,
        "last_message_at": c.last_message_at.map(|t| t.to_iso()),
        "created_at": created_at_json(c.created_at),
    })
}

pub fn message_to_json(m: &Message) -> JsonValue {
    json!({
        "id": m.id.to_string(),
        "conversation_id": m.conversation_id.to_string(),
        "sender_id": m.sender_id.to_string(),
        "body": m.body,
        "read_by": m.read_by,
        "created_at": created_at_json(m.created_at),
    })
}

pub fn notification_to_json(n: &Notification) -> JsonValue {
    json!({
        "id": n.id.to_string(),
        "user_id": n.user_id.to_string(),
        "kind": n.kind,
        "body": n.body,
        "read": n.read,
        "created_at": created_at_json(n.created_at),
    })
}
