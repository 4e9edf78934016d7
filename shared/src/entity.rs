//! Entity kinds
//!
//! Every collection the dashboard reads is identified by an [`EntityKind`].
//! The kind fixes both places a collection can come from: the fixture file
//! used in mock mode and the endpoint path used in remote mode.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use validator::Validate;

/// The five read-only collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Tables,
    Orders,
    Dishes,
    Stock,
    Staff,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Tables,
        EntityKind::Orders,
        EntityKind::Dishes,
        EntityKind::Stock,
        EntityKind::Staff,
    ];

    /// Fixture file name read in mock mode
    pub fn fixture_file(&self) -> &'static str {
        match self {
            Self::Tables => "mesas.json",
            Self::Orders => "pedidos.json",
            Self::Dishes => "pratos.json",
            Self::Stock => "estoque.json",
            Self::Staff => "funcionarios.json",
        }
    }

    /// Endpoint path requested in remote mode (always starts with `/`)
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Tables => "/mesas/disponiveis",
            Self::Orders => "/pedidos/em/andamento",
            Self::Dishes => "/pratos/populares",
            Self::Stock => "/estoque/ingredientes",
            Self::Staff => "/horas/funcionario",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tables => "tables",
            Self::Orders => "orders",
            Self::Dishes => "dishes",
            Self::Stock => "stock",
            Self::Staff => "staff",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown entity kind: {0}")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

/// A record type that belongs to one [`EntityKind`].
///
/// Records are immutable snapshots: serde maps the wire field names and
/// `validator` enforces the id invariants once the payload has been decoded.
pub trait Entity: Serialize + DeserializeOwned + Validate + Send + Sync + 'static {
    const KIND: EntityKind;
}
