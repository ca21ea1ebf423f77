//! `shopkeeper-inventory` — stock items and movements.

pub mod item;
pub mod movement;

pub use item::InventoryItem;
pub use movement::{MovementKind, StockMovement};
