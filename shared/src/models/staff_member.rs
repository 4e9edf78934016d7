//! Staff Member Model

use crate::entity::{Entity, EntityKind};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Worked hours per employee (funcionario)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct StaffMember {
    #[serde(rename = "funcionario_id")]
    #[validate(range(min = 1))]
    pub id: i64,
    #[serde(rename = "nome_funcionario")]
    pub name: String,
    #[serde(rename = "total_horas_normais")]
    pub normal_hours: f64,
    #[serde(rename = "total_horas_extra")]
    pub overtime_hours: f64,
}

impl StaffMember {
    pub fn total_hours(&self) -> f64 {
        self.normal_hours + self.overtime_hours
    }
}

impl Entity for StaffMember {
    const KIND: EntityKind = EntityKind::Staff;
}
