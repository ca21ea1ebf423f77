use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopkeeper_core::{DocId, Document, DomainError, DomainResult, TenantId, Timestamp};

/// Derived invoice status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Open,
    Partial,
    Paid,
    Void,
}

/// One invoiced line. Amounts in smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub item_id: DocId,
    pub description: String,
    pub quantity: u64,
    pub unit_price: u64,
}

impl LineItem {
    fn amount(&self) -> DomainResult<u64> {
        self.quantity
            .checked_mul(self.unit_price)
            .ok_or_else(|| DomainError::invariant("line amount overflow"))
    }
}

/// A payment recorded against the invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: u64,
    pub received_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// An invoice document.
///
/// Stored fields are the inputs only: lines, discount, payments, void flag.
/// Everything a reader thinks of as a "total" is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: DocId,
    pub tenant_id: TenantId,
    pub customer_id: DocId,
    pub lines: Vec<LineItem>,
    /// Flat discount off the subtotal, smallest currency unit.
    #[serde(default)]
    pub discount: u64,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub voided: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Invoice {
    pub fn new(tenant_id: TenantId, customer_id: DocId, lines: Vec<LineItem>) -> Self {
        Self {
            id: DocId::new(),
            tenant_id,
            customer_id,
            lines,
            discount: 0,
            payments: Vec::new(),
            voided: false,
            due_date: None,
            created_at: None,
        }
    }

    /// Sum of line amounts, before discount.
    pub fn subtotal(&self) -> DomainResult<u64> {
        let mut total: u64 = 0;
        for line in &self.lines {
            total = total
                .checked_add(line.amount()?)
                .ok_or_else(|| DomainError::invariant("invoice subtotal overflow"))?;
        }
        Ok(total)
    }

    /// Subtotal minus discount.
    pub fn total(&self) -> DomainResult<u64> {
        let subtotal = self.subtotal()?;
        subtotal
            .checked_sub(self.discount)
            .ok_or_else(|| DomainError::invariant("discount exceeds subtotal"))
    }

    pub fn total_paid(&self) -> DomainResult<u64> {
        let mut paid: u64 = 0;
        for p in &self.payments {
            paid = paid
                .checked_add(p.amount)
                .ok_or_else(|| DomainError::invariant("payment total overflow"))?;
        }
        Ok(paid)
    }

    pub fn outstanding(&self) -> DomainResult<u64> {
        Ok(self.total()?.saturating_sub(self.total_paid()?))
    }

    pub fn status(&self) -> DomainResult<InvoiceStatus> {
        if self.voided {
            return Ok(InvoiceStatus::Void);
        }
        let paid = self.total_paid()?;
        Ok(if paid == 0 {
            InvoiceStatus::Open
        } else if paid < self.total()? {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Paid
        })
    }

    /// Invariant: cannot pay a void or settled invoice, cannot overpay.
    pub fn record_payment(&self, payment: Payment) -> DomainResult<Self> {
        if self.voided {
            return Err(DomainError::invariant("cannot pay a void invoice"));
        }
        if payment.amount == 0 {
            return Err(DomainError::validation("payment amount must be positive"));
        }
        let outstanding = self.outstanding()?;
        if payment.amount > outstanding {
            return Err(DomainError::invariant("cannot overpay invoice"));
        }

        let mut invoice = self.clone();
        invoice.payments.push(payment);
        Ok(invoice)
    }

    /// Invariant: an invoice with recorded payments cannot be voided; refunds
    /// go through returns instead.
    pub fn void(&self, _reason: Option<String>) -> DomainResult<Self> {
        if self.voided {
            return Err(DomainError::conflict("invoice is already void"));
        }
        if !self.payments.is_empty() {
            return Err(DomainError::invariant(
                "cannot void an invoice with recorded payments",
            ));
        }
        let mut invoice = self.clone();
        invoice.voided = true;
        Ok(invoice)
    }
}

impl Document for Invoice {
    const COLLECTION: &'static str = "invoices";

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
        if self.lines.is_empty() {
            return Err(DomainError::validation("invoice must have at least one line"));
        }
        for line in &self.lines {
            if line.quantity == 0 {
                return Err(DomainError::validation("line quantity must be positive"));
            }
            if line.unit_price == 0 {
                return Err(DomainError::validation("line unit_price must be positive"));
            }
        }
        // Derivations double as validation: they fail on discount > subtotal,
        // overflow, and payments exceeding the total.
        let total = self.total()?;
        if self.total_paid()? > total {
            return Err(DomainError::invariant("payments exceed invoice total"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: u64, unit_price: u64) -> LineItem {
        LineItem {
            item_id: DocId::new(),
            description: "widget".to_string(),
            quantity,
            unit_price,
        }
    }

    fn payment(amount: u64) -> Payment {
        Payment {
            amount,
            received_at: Utc::now(),
            reference: None,
        }
    }

    fn invoice(lines: Vec<LineItem>) -> Invoice {
        Invoice::new(TenantId::new(), DocId::new(), lines)
    }

    #[test]
    fn totals_are_derived_from_lines_and_discount() {
        let mut inv = invoice(vec![line(2, 100), line(1, 50)]);
        inv.discount = 30;

        assert_eq!(inv.subtotal().unwrap(), 250);
        assert_eq!(inv.total().unwrap(), 220);
        assert_eq!(inv.outstanding().unwrap(), 220);
        assert_eq!(inv.status().unwrap(), InvoiceStatus::Open);
    }

    #[test]
    fn partial_payment_moves_status_to_partial() {
        let inv = invoice(vec![line(2, 100)]);
        let inv = inv.record_payment(payment(50)).unwrap();

        assert_eq!(inv.total_paid().unwrap(), 50);
        assert_eq!(inv.outstanding().unwrap(), 150);
        assert_eq!(inv.status().unwrap(), InvoiceStatus::Partial);
    }

    #[test]
    fn paying_to_total_marks_invoice_paid() {
        let inv = invoice(vec![line(2, 100)]);
        let inv = inv.record_payment(payment(50)).unwrap();
        let inv = inv.record_payment(payment(150)).unwrap();

        assert_eq!(inv.status().unwrap(), InvoiceStatus::Paid);
        assert_eq!(inv.outstanding().unwrap(), 0);
    }

    #[test]
    fn cannot_overpay_invoice() {
        let inv = invoice(vec![line(2, 100)]);
        let err = inv.record_payment(payment(201)).unwrap_err();
        assert_eq!(err, DomainError::invariant("cannot overpay invoice"));
    }

    #[test]
    fn cannot_pay_void_invoice() {
        let inv = invoice(vec![line(1, 100)]).void(None).unwrap();
        assert_eq!(inv.status().unwrap(), InvoiceStatus::Void);
        let err = inv.record_payment(payment(10)).unwrap_err();
        assert_eq!(err, DomainError::invariant("cannot pay a void invoice"));
    }

    #[test]
    fn cannot_void_invoice_with_payments() {
        let inv = invoice(vec![line(1, 100)]);
        let inv = inv.record_payment(payment(40)).unwrap();
        let err = inv.void(None).unwrap_err();
        assert_eq!(
            err,
            DomainError::invariant("cannot void an invoice with recorded payments")
        );
    }

    #[test]
    fn discount_larger_than_subtotal_rejected() {
        let mut inv = invoice(vec![line(1, 100)]);
        inv.discount = 101;
        assert_eq!(
            inv.validate(),
            Err(DomainError::invariant("discount exceeds subtotal"))
        );
    }

    #[test]
    fn empty_invoice_rejected() {
        let inv = invoice(vec![]);
        assert_eq!(
            inv.validate(),
            Err(DomainError::validation("invoice must have at least one line"))
        );
    }

    #[test]
    fn stored_form_has_no_total_fields() {
        let inv = invoice(vec![line(1, 100)]);
        let json = serde_json::to_value(&inv).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("total"));
        assert!(!obj.contains_key("subtotal"));
        assert!(!obj.contains_key("outstanding"));
        assert!(!obj.contains_key("status"));
    }
}
