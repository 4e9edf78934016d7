//! Data models
//!
//! Read-only records served by the fixtures and the remote API.
//! Field names on the wire are the backend's snake_case keys; the Rust
//! names are mapped with `#[serde(rename)]`. All IDs are `i64`.

pub mod dish;
pub mod order;
pub mod staff_member;
pub mod stock_item;
pub mod table;

// Re-exports
pub use dish::*;
pub use order::*;
pub use staff_member::*;
pub use stock_item::*;
pub use table::*;
