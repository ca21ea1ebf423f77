//! `shopkeeper-invoicing` — invoices with line items and payments.
//!
//! Totals are **derived**: subtotal, total, amount paid, outstanding and
//! status are computed from line items, discount and payments on demand and
//! never stored.

pub mod invoice;

pub use invoice::{Invoice, InvoiceStatus, LineItem, Payment};
