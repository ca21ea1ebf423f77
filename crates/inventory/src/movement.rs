use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Goods received (purchase, return to stock).
    Inbound,
    /// Goods leaving (sale, write-off).
    Outbound,
    /// Manual correction after a count.
    Adjustment,
}

/// An audit record of one stock change.
///
/// The movement stores the signed delta it applied; the item's
/// `quantity_on_hand` is the source of truth for current stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub item_id: DocId,
    pub kind: MovementKind,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl StockMovement {
    pub fn new(tenant_id: TenantId, item_id: DocId, kind: MovementKind, quantity: i64) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            item_id,
            kind,
            quantity,
            reason: None,
            created_at: None,
        }
    }

    /// Signed stock delta this movement applies.
    pub fn delta(&self) -> i64 {
        match self.kind {
            MovementKind::Inbound => self.quantity,
            MovementKind::Outbound => -self.quantity,
            MovementKind::Adjustment => self.quantity,
        }
    }
}

impl Document for StockMovement {
    const COLLECTION: &'static str = "stock_movements";

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
        match self.kind {
            MovementKind::Inbound | MovementKind::Outbound => {
                if self.quantity <= 0 {
                    return Err(DomainError::validation(
                        "movement quantity must be positive",
                    ));
                }
            }
            MovementKind::Adjustment => {
                if self.quantity == 0 {
                    return Err(DomainError::validation(
                        "adjustment quantity must be non-zero",
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outbound_delta_is_negative() {
        let m = StockMovement::new(TenantId::new(), DocId::new(), MovementKind::Outbound, 4);
        assert_eq!(m.delta(), -4);
    }

    #[test]
    fn adjustment_keeps_sign() {
        let m = StockMovement::new(TenantId::new(), DocId::new(), MovementKind::Adjustment, -3);
        assert!(m.validate().is_ok());
        assert_eq!(m.delta(), -3);
    }

    #[test]
    fn zero_quantity_rejected() {
        let m = StockMovement::new(TenantId::new(), DocId::new(), MovementKind::Inbound, 0);
        assert!(m.validate().is_err());
        let m = StockMovement::new(TenantId::new(), DocId::new(), MovementKind::Adjustment, 0);
        assert!(m.validate().is_err());
    }

    #[test]
    fn negative_inbound_rejected() {
        let m = StockMovement::new(TenantId::new(), DocId::new(), MovementKind::Inbound, -5);
        assert_eq!(
            m.validate(),
            Err(DomainError::validation("movement quantity must be positive"))
        );
    }
}
