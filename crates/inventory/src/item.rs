use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp};

/// A stocked item.
///
/// Prices are in the smallest currency unit (e.g. cents).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub sku: String,
    pub name: String,
    /// Quantity currently on hand. Never negative; movements enforce this.
    pub quantity_on_hand: u64,
    /// On-hand level at or below which the item counts as low stock.
    #[serde(default)]
    pub reorder_level: u64,
    pub unit_cost: u64,
    pub unit_price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl InventoryItem {
    pub fn new(
        tenant_id: TenantId,
        sku: impl Into<String>,
        name: impl Into<String>,
        unit_cost: u64,
        unit_price: u64,
    ) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            sku: sku.into(),
            name: name.into(),
            quantity_on_hand: 0,
            reorder_level: 0,
            unit_cost,
            unit_price,
            created_at: None,
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity_on_hand <= self.reorder_level
    }

    /// Apply a movement delta to the on-hand quantity.
    ///
    /// Invariant: stock never goes negative.
    pub fn apply_delta(&self, delta: i64) -> DomainResult<Self> {
        let next = if delta >= 0 {
            self.quantity_on_hand
                .checked_add(delta as u64)
                .ok_or_else(|| DomainError::invariant("stock quantity overflow"))?
        } else {
            let out = delta.unsigned_abs();
            if out > self.quantity_on_hand {
                return Err(DomainError::invariant(
                    "stock movement would drive quantity below zero",
                ));
            }
            self.quantity_on_hand - out
        };

        let mut item = self.clone();
        item.quantity_on_hand = next;
        Ok(item)
    }
}

impl Document for InventoryItem {
    const COLLECTION: &'static str = "inventory_items";

    fn doc_id(&self) -> DocId {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    fn stamp_created_at(&mut self, at: Timestamp) {
        self.created_at = Some(at);
    }

    fn validate(&self) -> DomainResult<()> {
        if self.sku.trim().is_empty() {
            return Err(DomainError::validation("sku must not be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("item name must not be empty"));
        }
        if self.unit_price == 0 {
            return Err(DomainError::validation("unit_price must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item() -> InventoryItem {
        InventoryItem::new(TenantId::new(), "SKU-1", "Coffee beans 1kg", 700, 1200)
    }

    #[test]
    fn valid_item_passes_validation() {
        assert!(item().validate().is_ok());
    }

    #[test]
    fn zero_price_rejected() {
        let mut it = item();
        it.unit_price = 0;
        assert_eq!(
            it.validate(),
            Err(DomainError::validation("unit_price must be positive"))
        );
    }

    #[test]
    fn inbound_delta_increases_stock() {
        let it = item().apply_delta(25).unwrap();
        assert_eq!(it.quantity_on_hand, 25);
    }

    #[test]
    fn outbound_delta_cannot_go_negative() {
        let it = item().apply_delta(10).unwrap();
        let err = it.apply_delta(-11).unwrap_err();
        assert_eq!(
            err,
            DomainError::invariant("stock movement would drive quantity below zero")
        );
        // Original untouched.
        assert_eq!(it.quantity_on_hand, 10);
    }

    #[test]
    fn low_stock_at_reorder_level() {
        let mut it = item().apply_delta(5).unwrap();
        it.reorder_level = 5;
        assert!(it.is_low_stock());
        let it = it.apply_delta(1).unwrap();
        assert!(!it.is_low_stock());
    }
}
