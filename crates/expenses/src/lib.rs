//! `shopkeeper-expenses` — expenses and returned goods.

pub mod expense;
pub mod return_item;

pub use expense::{Expense, ExpenseCategory};
pub use return_item::{ReturnItem, ReturnResolution};
