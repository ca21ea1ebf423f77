use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp};

/// Expense bucket, deliberately coarse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Rent,
    Salaries,
    Utilities,
    Supplies,
    Marketing,
    Other,
}

/// A business expense. Amount in smallest currency unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub category: ExpenseCategory,
    pub amount: u64,
    pub incurred_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Expense {
    pub fn new(
        tenant_id: TenantId,
        category: ExpenseCategory,
        amount: u64,
        incurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            category,
            amount,
            incurred_at,
            note: None,
            created_at: None,
        }
    }
}

impl Document for Expense {
    const COLLECTION: &'static str = "expenses";

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
        if self.amount == 0 {
            return Err(DomainError::validation("expense amount must be positive"));
        }
        if let Some(note) = &self.note {
            if note.len() > 2000 {
                return Err(DomainError::validation("expense note too long"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_expense_passes_validation() {
        let e = Expense::new(TenantId::new(), ExpenseCategory::Rent, 85000, Utc::now());
        assert!(e.validate().is_ok());
    }

    #[test]
    fn zero_amount_rejected() {
        let e = Expense::new(TenantId::new(), ExpenseCategory::Other, 0, Utc::now());
        assert_eq!(
            e.validate(),
            Err(DomainError::validation("expense amount must be positive"))
        );
    }

    #[test]
    fn category_serializes_snake_case() {
        let e = Expense::new(TenantId::new(), ExpenseCategory::Salaries, 100, Utc::now());
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["category"], "salaries");
    }
}
