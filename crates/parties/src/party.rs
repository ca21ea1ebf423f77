use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp};

/// Party kind: customer or supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
    Customer,
    Supplier,
}

/// Party status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PartyStatus {
    #[default]
    Active,
    Suspended,
}

/// Contact information for a party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// A customer or supplier record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub kind: PartyKind,
    pub name: String,
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub status: PartyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Party {
    pub fn new(tenant_id: TenantId, kind: PartyKind, name: impl Into<String>) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            kind,
            name: name.into(),
            contact: ContactInfo::default(),
            status: PartyStatus::Active,
            created_at: None,
        }
    }

    pub fn with_contact(mut self, contact: ContactInfo) -> Self {
        self.contact = contact;
        self
    }

    /// Suspended parties cannot transact.
    pub fn can_transact(&self) -> bool {
        self.status == PartyStatus::Active
    }
}

impl Document for Party {
    const COLLECTION: &'static str = "parties";

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
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("party name must not be empty"));
        }
        if let Some(email) = &self.contact.email {
            // Shallow shape check; deliverability is not a domain concern.
            if !email.contains('@') || email.trim().len() < 3 {
                return Err(DomainError::validation("contact email is malformed"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_customer_passes_validation() {
        let party = Party::new(TenantId::new(), PartyKind::Customer, "Acme Fruit Co");
        assert!(party.validate().is_ok());
        assert!(party.can_transact());
    }

    #[test]
    fn empty_name_rejected() {
        let party = Party::new(TenantId::new(), PartyKind::Supplier, "  ");
        assert_eq!(
            party.validate(),
            Err(DomainError::validation("party name must not be empty"))
        );
    }

    #[test]
    fn malformed_email_rejected() {
        let party = Party::new(TenantId::new(), PartyKind::Customer, "Acme").with_contact(
            ContactInfo {
                email: Some("not-an-email".to_string()),
                ..ContactInfo::default()
            },
        );
        assert_eq!(
            party.validate(),
            Err(DomainError::validation("contact email is malformed"))
        );
    }

    #[test]
    fn suspended_party_cannot_transact() {
        let mut party = Party::new(TenantId::new(), PartyKind::Customer, "Acme");
        party.status = PartyStatus::Suspended;
        assert!(!party.can_transact());
    }

    #[test]
    fn kind_serializes_lowercase() {
        let party = Party::new(TenantId::new(), PartyKind::Supplier, "Acme");
        let json = serde_json::to_value(&party).unwrap();
        assert_eq!(json["kind"], "supplier");
        assert_eq!(json["status"], "active");
    }
}
