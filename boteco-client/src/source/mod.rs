// boteco-client/src/source/mod.rs
// Data sources - where entity collections are read from

mod fixture;
mod remote;

pub use fixture::FixtureSource;

use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value;
use shared::{Entity, EntityKind};
use std::fmt;
use validator::Validate;

/// Which source the data-access layer currently reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Static fixture files
    Mock,
    /// Remote API
    Remote,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// A place entity collections can be loaded from.
///
/// Implementations return the collection as untyped JSON values, in the order
/// the source holds them. Typing and validation happen in [`decode_records`].
#[async_trait]
pub trait DataSource: Send + Sync {
    fn mode(&self) -> Mode;

    async fn load(&self, kind: EntityKind) -> ClientResult<Vec<Value>>;
}

/// Decode raw values into records of `E`, rejecting the first record that
/// does not deserialize or fails validation.
pub fn decode_records<E: Entity>(values: Vec<Value>) -> ClientResult<Vec<E>> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let record: E = serde_json::from_value(value).map_err(|e| ClientError::Schema {
                entity: E::KIND,
                index: Some(index),
                message: e.to_string(),
            })?;
            record.validate().map_err(|e| ClientError::Schema {
                entity: E::KIND,
                index: Some(index),
                message: e.to_string(),
            })?;
            Ok(record)
        })
        .collect()
}
