//! Dining Table Model

use crate::entity::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Dining table (mesa)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Table {
    #[serde(rename = "mesa_id")]
    #[validate(range(min = 1))]
    pub id: i64,
    #[serde(rename = "numero")]
    pub number: i64,
    #[serde(rename = "capacidade")]
    pub capacity: i64,
}

impl Entity for Table {
    const KIND: EntityKind = EntityKind::Tables;
}
