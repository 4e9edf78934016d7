//! Source router
//!
//! [`DataService`] exposes one fetch per entity and hides whether the data
//! comes from fixtures or from the remote API. It starts in mock mode; the
//! only way to leave it is [`DataService::connect`] (or its verified
//! variant), which retargets every later fetch at once.

use crate::http::build_http_client;
use crate::snapshot::SnapshotStore;
use crate::source::{DataSource, FixtureSource, Mode, decode_records};
use crate::{ClientConfig, ClientResult, RemoteClient};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{Dish, Entity, EntityKind, Order, StaffMember, StockItem, Table};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;

/// Active route: the source every fetch goes to
struct Route {
    source: Arc<dyn DataSource>,
    base_url: Option<String>,
}

/// Data-access entry point for the dashboard
pub struct DataService {
    http: reqwest::Client,
    token: Option<String>,
    default_base_url: Option<String>,
    route: RwLock<Route>,
    snapshot_path: PathBuf,
    snapshot_quota: usize,
    /// Opened on first snapshot call; fetches never touch it
    snapshots: Mutex<Option<SnapshotStore>>,
}

impl DataService {
    /// Build a service in mock mode. The snapshot store at the configured
    /// path is opened on the first snapshot call, not here.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::build(config, None)
    }

    /// Build a service in mock mode around an already opened snapshot store
    pub fn with_snapshot_store(
        config: &ClientConfig,
        snapshots: SnapshotStore,
    ) -> ClientResult<Self> {
        Self::build(config, Some(snapshots))
    }

    fn build(config: &ClientConfig, snapshots: Option<SnapshotStore>) -> ClientResult<Self> {
        let source: Arc<dyn DataSource> = Arc::new(FixtureSource::new(&config.fixture_dir));
        let route = Route {
            source,
            base_url: None,
        };
        Ok(Self {
            http: build_http_client(config.timeout)?,
            token: config.token.clone(),
            default_base_url: config.base_url.clone(),
            route: RwLock::new(route),
            snapshot_path: config.snapshot_path.clone(),
            snapshot_quota: config.snapshot_quota,
            snapshots: Mutex::new(snapshots),
        })
    }

    /// Current mode
    pub async fn mode(&self) -> Mode {
        self.route.read().await.source.mode()
    }

    /// Base URL in use when connected; `None` in mock mode
    pub async fn base_url(&self) -> Option<String> {
        self.route.read().await.base_url.clone()
    }

    /// Base URL suggested by configuration for the connect flow
    pub fn default_base_url(&self) -> Option<&str> {
        self.default_base_url.as_deref()
    }

    /// Snapshot store, opened at the configured path on first use.
    ///
    /// A failed open is not cached; the next call tries again.
    pub fn snapshots(&self) -> ClientResult<SnapshotStore> {
        let mut slot = self.snapshots.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = slot.as_ref() {
            return Ok(store.clone());
        }

        let store = SnapshotStore::open(&self.snapshot_path, self.snapshot_quota).inspect_err(|e| {
            tracing::warn!(path = %self.snapshot_path.display(), error = %e, "Cannot open snapshot store");
        })?;
        *slot = Some(store.clone());
        Ok(store)
    }

    fn remote_for(&self, base_url: &str) -> RemoteClient {
        let mut remote = RemoteClient::with_client(self.http.clone(), self.token.clone());
        remote.set_base_url(base_url);
        remote
    }

    async fn install(&self, remote: RemoteClient) {
        let base_url = remote.base_url().to_string();
        *self.route.write().await = Route {
            source: Arc::new(remote),
            base_url: Some(base_url.clone()),
        };
        tracing::info!(%base_url, "Switched to remote mode");
    }

    /// Switch to remote mode against `base_url`.
    ///
    /// No request is made. Calling it again replaces the base URL; there is
    /// no way back to mock mode.
    pub async fn connect(&self, base_url: &str) {
        let remote = self.remote_for(base_url);
        self.install(remote).await;
    }

    /// Like [`connect`](Self::connect), but first checks that the backend
    /// answers on its health endpoint. On failure the mode is left untouched.
    pub async fn connect_verified(&self, base_url: &str) -> ClientResult<()> {
        let remote = self.remote_for(base_url);
        if let Err(e) = remote.probe().await {
            tracing::warn!(base_url = remote.base_url(), error = %e, "Backend unreachable");
            return Err(e);
        }
        self.install(remote).await;
        Ok(())
    }

    /// Fetch a collection as untyped JSON, in source order
    pub async fn fetch_raw(&self, kind: EntityKind) -> ClientResult<Vec<Value>> {
        // Clone the handle so the lock is not held across I/O
        let source = self.route.read().await.source.clone();
        tracing::debug!(entity = %kind, mode = %source.mode(), "Fetching collection");
        source.load(kind).await.inspect_err(|e| {
            tracing::warn!(entity = %kind, error = %e, "Fetch failed");
        })
    }

    /// Fetch and validate the collection of `E`
    pub async fn fetch<E: Entity>(&self) -> ClientResult<Vec<E>> {
        let values = self.fetch_raw(E::KIND).await?;
        decode_records(values)
    }

    pub async fn fetch_tables(&self) -> ClientResult<Vec<Table>> {
        self.fetch().await
    }

    pub async fn fetch_orders(&self) -> ClientResult<Vec<Order>> {
        self.fetch().await
    }

    pub async fn fetch_dishes(&self) -> ClientResult<Vec<Dish>> {
        self.fetch().await
    }

    pub async fn fetch_stock(&self) -> ClientResult<Vec<StockItem>> {
        self.fetch().await
    }

    pub async fn fetch_staff(&self) -> ClientResult<Vec<StaffMember>> {
        self.fetch().await
    }

    /// Persist a named collection; independent of the current mode
    pub fn persist_snapshot<T: Serialize>(&self, key: &str, records: &[T]) -> ClientResult<()> {
        Ok(self.snapshots()?.persist(key, records)?)
    }

    /// Load a named collection; `None` when it was never persisted
    pub fn load_snapshot<T: DeserializeOwned>(&self, key: &str) -> ClientResult<Option<Vec<T>>> {
        Ok(self.snapshots()?.load(key)?)
    }
}
