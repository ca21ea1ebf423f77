//! Service wiring: one shared store, typed collection handles per request.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Datelike, Utc};

use shopkeeper_ai::{BusinessSnapshot, ModelClient, MonthlySales, SalesHistory};
use shopkeeper_auth::{Organization, User};
use shopkeeper_core::TenantId;
use shopkeeper_expenses::{Expense, ReturnItem};
use shopkeeper_inventory::{InventoryItem, StockMovement};
use shopkeeper_invoicing::Invoice;
use shopkeeper_messaging::{Conversation, Message, Notification};
use shopkeeper_parties::{Party, PartyKind};
use shopkeeper_store::{Collection, InMemoryStore, StoreResult};

#[derive(Clone)]
pub struct AppServices {
    store: Arc<InMemoryStore>,
    model: Option<Arc<dyn ModelClient>>,
}

impl AppServices {
    pub fn new(store: Arc<InMemoryStore>, model: Option<Arc<dyn ModelClient>>) -> Self {
        Self { store, model }
    }

    pub fn store(&self) -> Arc<InMemoryStore> {
        Arc::clone(&self.store)
    }

    pub fn model(&self) -> Option<&Arc<dyn ModelClient>> {
        self.model.as_ref()
    }

    fn scoped<T: shopkeeper_core::Document>(&self, tenant_id: TenantId) -> Collection<T> {
        Collection::new(Arc::clone(&self.store), tenant_id)
    }

    pub fn organizations(&self, tenant_id: TenantId) -> Collection<Organization> {
        self.scoped(tenant_id)
    }

    pub fn users(&self, tenant_id: TenantId) -> Collection<User> {
        self.scoped(tenant_id)
    }

    pub fn parties(&self, tenant_id: TenantId) -> Collection<Party> {
        self.scoped(tenant_id)
    }

    pub fn items(&self, tenant_id: TenantId) -> Collection<InventoryItem> {
        self.scoped(tenant_id)
    }

    pub fn movements(&self, tenant_id: TenantId) -> Collection<StockMovement> {
        self.scoped(tenant_id)
    }

    pub fn invoices(&self, tenant_id: TenantId) -> Collection<Invoice> {
        self.scoped(tenant_id)
    }

    pub fn expenses(&self, tenant_id: TenantId) -> Collection<Expense> {
        self.scoped(tenant_id)
    }

    pub fn returns(&self, tenant_id: TenantId) -> Collection<ReturnItem> {
        self.scoped(tenant_id)
    }

    pub fn conversations(&self, tenant_id: TenantId) -> Collection<Conversation> {
        self.scoped(tenant_id)
    }

    pub fn messages(&self, tenant_id: TenantId) -> Collection<Message> {
        self.scoped(tenant_id)
    }

    pub fn notifications(&self, tenant_id: TenantId) -> Collection<Notification> {
        self.scoped(tenant_id)
    }

    /// Numeric snapshot for the Q&A flow; the model never sees documents.
    pub fn business_snapshot(&self, tenant_id: TenantId) -> StoreResult<BusinessSnapshot> {
        let parties = self.parties(tenant_id).list()?;
        let items = self.items(tenant_id).list()?;
        let invoices = self.invoices(tenant_id).list()?;
        let expenses = self.expenses(tenant_id).list()?;

        let mut open_invoices = 0u64;
        let mut outstanding_total = 0u64;
        for invoice in &invoices {
            let outstanding = invoice.outstanding()?;
            if !invoice.voided && outstanding > 0 {
                open_invoices += 1;
                outstanding_total = outstanding_total.saturating_add(outstanding);
            }
        }

        let now = Utc::now();
        let expenses_this_month = expenses
            .iter()
            .filter(|e| e.incurred_at.year() == now.year() && e.incurred_at.month() == now.month())
            .map(|e| e.amount)
            .sum();

        Ok(BusinessSnapshot {
            customers: parties
                .iter()
                .filter(|p| p.kind == PartyKind::Customer)
                .count() as u64,
            suppliers: parties
                .iter()
                .filter(|p| p.kind == PartyKind::Supplier)
                .count() as u64,
            inventory_items: items.len() as u64,
            low_stock_items: items.iter().filter(|i| i.is_low_stock()).count() as u64,
            open_invoices,
            outstanding_total,
            expenses_this_month,
        })
    }

    /// Monthly revenue history for the forecast flow, from recorded payments.
    pub fn sales_history(&self, tenant_id: TenantId, horizon: u32) -> StoreResult<SalesHistory> {
        let invoices = self.invoices(tenant_id).list()?;

        let mut by_month: BTreeMap<String, u64> = BTreeMap::new();
        for invoice in &invoices {
            for payment in &invoice.payments {
                let month = payment.received_at.format("%Y-%m").to_string();
                let total = by_month.entry(month).or_insert(0);
                *total = total.saturating_add(payment.amount);
            }
        }

        Ok(SalesHistory {
            months: by_month
                .into_iter()
                .map(|(month, revenue)| MonthlySales { month, revenue })
                .collect(),
            horizon,
        })
    }
}
