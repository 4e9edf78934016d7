//! Shared types for the Boteco dashboard
//!
//! Entity kinds and the record types exchanged between the data-access
//! client, the fixtures and the mock backend.

pub mod entity;
pub mod models;

// Re-exports
pub use entity::{Entity, EntityKind, UnknownEntityKind};
pub use models::{Dish, Order, StaffMember, StockItem, Table};
pub use serde::{Deserialize, Serialize};
