//! Order Model

use crate::entity::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Order in progress (pedido)
///
/// `table_id` and `staff_id` are not checked against the table or staff
/// collections; only their sign is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Order {
    #[serde(rename = "pedido_id")]
    #[validate(range(min = 1))]
    pub id: i64,
    #[serde(rename = "mesa_id")]
    #[validate(range(min = 1))]
    pub table_id: i64,
    #[serde(rename = "funcionario_id")]
    #[validate(range(min = 1))]
    pub staff_id: i64,
    /// ISO 8601 timestamp, kept as sent by the backend
    #[serde(rename = "data_pedido")]
    pub placed_at: String,
    pub status: String,
}

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Orders;
}
