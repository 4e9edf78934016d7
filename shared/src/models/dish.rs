//! Dish Model

use crate::entity::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dish with its sales count (prato)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Dish {
    #[serde(rename = "prato_id")]
    #[validate(range(min = 1))]
    pub id: i64,
    #[serde(rename = "nome_prato")]
    pub name: String,
    #[serde(rename = "total_vendas")]
    pub total_sales: i64,
}

impl Entity for Dish {
    const KIND: EntityKind = EntityKind::Dishes;
}
