//! Boteco Client - data access for the restaurant dashboard
//!
//! Reads the five dashboard collections either from local fixture files
//! (mock mode) or from a remote REST API, and keeps named snapshots in a
//! local redb store.

pub mod config;
pub mod error;
pub mod http;
pub mod service;
pub mod snapshot;
pub mod source;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::RemoteClient;
pub use service::DataService;
pub use snapshot::{SnapshotStore, StorageError, StorageErrorKind};
pub use source::{DataSource, FixtureSource, Mode};

// Re-export shared types for convenience
pub use shared::{Dish, Entity, EntityKind, Order, StaffMember, StockItem, Table};
