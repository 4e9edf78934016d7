//! Stock Item Model

use crate::entity::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Ingredient stock level (ingrediente)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StockItem {
    #[serde(rename = "produto_id")]
    #[validate(range(min = 1))]
    pub id: i64,
    #[serde(rename = "nome_produto")]
    pub product_name: String,
    #[serde(rename = "stock_atual")]
    pub current_stock: f64,
    #[serde(rename = "stock_minimo")]
    pub minimum_stock: f64,
}

impl StockItem {
    /// Current stock has dropped under the configured minimum
    pub fn is_below_minimum(&self) -> bool {
        self.current_stock < self.minimum_stock
    }
}

impl Entity for StockItem {
    const KIND: EntityKind = EntityKind::Stock;
}
