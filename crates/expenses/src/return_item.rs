use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp};

/// How a return was settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReturnResolution {
    #[default]
    Pending,
    Refunded,
    Restocked,
    Rejected,
}

/// A returned line from a previous invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnItem {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub invoice_id: DocId,
    pub item_id: DocId,
    pub quantity: u64,
    /// Amount refunded to the customer, smallest currency unit.
    pub refund_amount: u64,
    #[serde(default)]
    pub resolution: ReturnResolution,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl ReturnItem {
    pub fn new(
        tenant_id: TenantId,
        invoice_id: DocId,
        item_id: DocId,
        quantity: u64,
        refund_amount: u64,
    ) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            invoice_id,
            item_id,
            quantity,
            refund_amount,
            resolution: ReturnResolution::Pending,
            reason: None,
            created_at: None,
        }
    }

    /// Restocked returns feed an inbound stock movement.
    pub fn restocks(&self) -> bool {
        self.resolution == ReturnResolution::Restocked
    }
}

impl Document for ReturnItem {
    const COLLECTION: &'static str = "returns";

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
        if self.quantity == 0 {
            return Err(DomainError::validation("return quantity must be positive"));
        }
        if self.resolution == ReturnResolution::Refunded && self.refund_amount == 0 {
            return Err(DomainError::validation(
                "refunded return must carry a refund amount",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ret() -> ReturnItem {
        ReturnItem::new(TenantId::new(), DocId::new(), DocId::new(), 1, 500)
    }

    #[test]
    fn valid_return_passes_validation() {
        assert!(ret().validate().is_ok());
    }

    #[test]
    fn zero_quantity_rejected() {
        let mut r = ret();
        r.quantity = 0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn refunded_without_amount_rejected() {
        let mut r = ret();
        r.resolution = ReturnResolution::Refunded;
        r.refund_amount = 0;
        assert_eq!(
            r.validate(),
            Err(DomainError::validation(
                "refunded return must carry a refund amount"
            ))
        );
    }

    #[test]
    fn restocked_return_restocks() {
        let mut r = ret();
        assert!(!r.restocks());
        r.resolution = ReturnResolution::Restocked;
        assert!(r.restocks());
    }
}
