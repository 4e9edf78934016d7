// boteco-client/tests/data_service.rs
// End-to-end tests: fixtures on disk and a live mock backend

use boteco_client::{
    ClientConfig, ClientError, DataService, Dish, EntityKind, Mode, SnapshotStore,
    StorageErrorKind,
};
use boteco_mock::{MockState, RecordedRequest, StatusCode};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

const SHIPPED_FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

fn service_with(config: ClientConfig) -> DataService {
    let store = SnapshotStore::open_in_memory(config.snapshot_quota).unwrap();
    DataService::with_snapshot_store(&config, store).unwrap()
}

fn mock_service(fixture_dir: &Path) -> DataService {
    service_with(ClientConfig::new().with_fixture_dir(fixture_dir))
}

fn read_fixture(dir: &Path, kind: EntityKind) -> Vec<Value> {
    let bytes = std::fs::read(dir.join(kind.fixture_file())).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Fixture dir where the mock server serves data that differs from the
/// client's own fixtures, so the source of every record is observable
fn remote_fixture_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let files = [
        (EntityKind::Tables, json!([{"mesa_id": 50, "numero": 9, "capacidade": 8}])),
        (
            EntityKind::Orders,
            json!([{"pedido_id": 500, "mesa_id": 50, "funcionario_id": 5,
                    "data_pedido": "2024-06-01T12:00:00", "status": "pending"}]),
        ),
        (EntityKind::Dishes, json!([{"prato_id": 50, "nome_prato": "Moqueca", "total_vendas": 7}])),
        (
            EntityKind::Stock,
            json!([{"produto_id": 50, "nome_produto": "Dendê (l)", "stock_atual": 0.5, "stock_minimo": 1}]),
        ),
        (
            EntityKind::Staff,
            json!([{"funcionario_id": 5, "nome_funcionario": "Davi", "total_horas_normais": 40, "total_horas_extra": 2}]),
        ),
    ];
    for (kind, value) in files {
        std::fs::write(dir.path().join(kind.fixture_file()), value.to_string()).unwrap();
    }
    dir
}

/// Running mock backend; keeps its fixture dir alive
struct Backend {
    state: Arc<MockState>,
    url: String,
    _dir: TempDir,
}

async fn start_backend(token: Option<&str>) -> Backend {
    let dir = remote_fixture_dir();
    let mut state = MockState::new(dir.path());
    if let Some(token) = token {
        state = state.with_token(token);
    }
    let state = Arc::new(state);
    let addr = boteco_mock::spawn(state.clone()).await.unwrap();
    Backend {
        state,
        url: format!("http://{addr}"),
        _dir: dir,
    }
}

// ========== Mock mode ==========

#[tokio::test]
async fn test_mock_mode_returns_fixture_contents_in_order() {
    let dir = Path::new(SHIPPED_FIXTURES);
    let service = mock_service(dir);

    for kind in EntityKind::ALL {
        let raw = service.fetch_raw(kind).await.unwrap();
        assert_eq!(raw, read_fixture(dir, kind), "{kind} differs from its fixture");
    }

    let tables = service.fetch_tables().await.unwrap();
    let expected: Vec<i64> = read_fixture(dir, EntityKind::Tables)
        .iter()
        .map(|v| v["mesa_id"].as_i64().unwrap())
        .collect();
    assert_eq!(tables.iter().map(|t| t.id).collect::<Vec<_>>(), expected);

    assert!(!service.fetch_orders().await.unwrap().is_empty());
    assert!(!service.fetch_dishes().await.unwrap().is_empty());
    assert!(!service.fetch_stock().await.unwrap().is_empty());
    assert!(!service.fetch_staff().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_single_table_fixture() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("mesas.json"),
        r#"[{"mesa_id":1,"numero":3,"capacidade":4}]"#,
    )
    .unwrap();

    let tables = mock_service(dir.path()).fetch_tables().await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].number, 3);
    assert_eq!(tables[0].capacity, 4);
}

#[tokio::test]
async fn test_missing_fixture_propagates() {
    let dir = TempDir::new().unwrap();
    let err = mock_service(dir.path()).fetch_dishes().await.unwrap_err();
    assert!(matches!(err, ClientError::FixtureLoad { .. }));
}

#[tokio::test]
async fn test_malformed_fixture_record_is_schema_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("estoque.json"),
        r#"[{"produto_id":1,"nome_produto":"Sal","stock_atual":1,"stock_minimo":1},{"produto_id":2}]"#,
    )
    .unwrap();

    let service = mock_service(dir.path());
    let err = service.fetch_stock().await.unwrap_err();
    match err {
        ClientError::Schema { entity, index, .. } => {
            assert_eq!(entity, EntityKind::Stock);
            assert_eq!(index, Some(1));
        }
        other => panic!("unexpected error: {other}"),
    }

    // The untyped path hands the payload over as-is
    assert_eq!(service.fetch_raw(EntityKind::Stock).await.unwrap().len(), 2);
}

// ========== Remote mode ==========

#[tokio::test]
async fn test_connect_routes_every_fetch_to_remote() {
    let Backend { state, url, _dir } = start_backend(None).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&url).await;
    assert_eq!(service.mode().await, Mode::Remote);

    assert_eq!(service.fetch_tables().await.unwrap()[0].id, 50);
    assert_eq!(service.fetch_orders().await.unwrap()[0].id, 500);
    assert_eq!(service.fetch_dishes().await.unwrap()[0].name, "Moqueca");
    assert!(service.fetch_stock().await.unwrap()[0].is_below_minimum());
    assert_eq!(service.fetch_staff().await.unwrap()[0].name, "Davi");

    let paths: Vec<String> = state.requests().await.into_iter().map(|r| r.path).collect();
    assert_eq!(
        paths,
        EntityKind::ALL
            .iter()
            .map(|k| k.endpoint().to_string())
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_connect_twice_keeps_latest_url() {
    let first = start_backend(None).await;
    let second = start_backend(None).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&first.url).await;
    service.connect(&second.url).await;

    assert_eq!(service.mode().await, Mode::Remote);
    assert_eq!(service.base_url().await.as_deref(), Some(second.url.as_str()));

    service.fetch_dishes().await.unwrap();
    assert!(first.state.requests().await.is_empty());
    assert_eq!(second.state.requests().await.len(), 1);
}

#[tokio::test]
async fn test_server_error_is_transport_error_with_status() {
    let Backend { state, url, _dir } = start_backend(None).await;
    state
        .fail_with(EntityKind::Dishes, StatusCode::INTERNAL_SERVER_ERROR)
        .await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&url).await;

    let err = service.fetch_dishes().await.unwrap_err();
    match &err {
        ClientError::Transport {
            endpoint, status, ..
        } => {
            assert_eq!(endpoint, "/pratos/populares");
            assert_eq!(*status, Some(500));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_retryable());

    // Other endpoints are unaffected
    assert!(service.fetch_tables().await.is_ok());
}

#[tokio::test]
async fn test_client_error_is_not_retryable() {
    let Backend { state, url, _dir } = start_backend(None).await;
    state.fail_with(EntityKind::Staff, StatusCode::NOT_FOUND).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&url).await;

    let err = service.fetch_staff().await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_bearer_token_on_every_request() {
    let Backend { state, url, _dir } = start_backend(Some("abc")).await;

    let service = service_with(
        ClientConfig::new()
            .with_fixture_dir(SHIPPED_FIXTURES)
            .with_token("abc"),
    );
    service.connect(&url).await;

    service.fetch_tables().await.unwrap();
    service.fetch_stock().await.unwrap();

    let requests = state.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(
        requests
            .iter()
            .all(|r| r.authorization.as_deref() == Some("Bearer abc"))
    );
}

#[tokio::test]
async fn test_no_token_means_no_header() {
    let Backend { state, url, _dir } = start_backend(Some("abc")).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&url).await;

    let err = service.fetch_tables().await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(
        state.requests().await,
        vec![RecordedRequest {
            path: "/mesas/disponiveis".to_string(),
            authorization: None,
        }]
    );
}

#[tokio::test]
async fn test_trailing_slash_is_stripped() {
    let Backend { state, url, _dir } = start_backend(None).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&format!("{url}/")).await;
    assert_eq!(service.base_url().await.as_deref(), Some(url.as_str()));

    service.fetch_orders().await.unwrap();
    assert_eq!(state.requests().await[0].path, "/pedidos/em/andamento");
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error_without_status() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&format!("http://{addr}")).await;

    let err = service.fetch_tables().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { status: None, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_body_cut_after_success_status_is_retryable_transport_error() {
    let Backend { state, url, _dir } = start_backend(None).await;
    state.truncate_body(EntityKind::Tables).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&url).await;

    let err = service.fetch_tables().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport { status: None, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_remote_payload_with_bad_id_is_schema_error() {
    let Backend { state, url, _dir } = start_backend(None).await;
    state
        .serve_payload(
            EntityKind::Orders,
            json!([{"pedido_id": 1, "mesa_id": 0, "funcionario_id": 1,
                    "data_pedido": "2024-06-01T12:00:00", "status": "open"}]),
        )
        .await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&url).await;

    let err = service.fetch_orders().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Schema {
            entity: EntityKind::Orders,
            index: Some(0),
            ..
        }
    ));
}

#[tokio::test]
async fn test_remote_payload_that_is_not_an_array_is_invalid_response() {
    let Backend { state, url, _dir } = start_backend(None).await;
    state
        .serve_payload(EntityKind::Dishes, json!({"detail": "unexpected"}))
        .await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect(&url).await;

    let err = service.fetch_dishes().await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_concurrent_fetches_resolve_independently() {
    let Backend { state, url, _dir } = start_backend(None).await;
    state
        .fail_with(EntityKind::Stock, StatusCode::SERVICE_UNAVAILABLE)
        .await;

    let service = Arc::new(mock_service(Path::new(SHIPPED_FIXTURES)));
    service.connect(&url).await;

    let (tables, dishes, stock, staff) = futures::join!(
        service.fetch_tables(),
        service.fetch_dishes(),
        service.fetch_stock(),
        service.fetch_staff(),
    );
    assert!(tables.is_ok());
    assert!(dishes.is_ok());
    assert_eq!(stock.unwrap_err().status(), Some(503));
    assert!(staff.is_ok());
}

// ========== Verified connect ==========

#[tokio::test]
async fn test_connect_verified_switches_when_healthy() {
    let Backend { state, url, _dir } = start_backend(None).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    service.connect_verified(&url).await.unwrap();

    assert_eq!(service.mode().await, Mode::Remote);
    assert_eq!(state.requests().await[0].path, "/health");
}

#[tokio::test]
async fn test_connect_verified_failure_keeps_mock_mode() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    let err = service
        .connect_verified(&format!("http://{addr}"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Connectivity { .. }));
    assert_eq!(service.mode().await, Mode::Mock);
    assert!(service.fetch_tables().await.is_ok());
}

#[tokio::test]
async fn test_connect_verified_unhealthy_backend_keeps_mock_mode() {
    let Backend { state, url, _dir } = start_backend(None).await;
    state.fail_health(StatusCode::SERVICE_UNAVAILABLE).await;

    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    let err = service.connect_verified(&url).await.unwrap_err();

    assert!(matches!(err, ClientError::Connectivity { .. }));
    assert!(err.to_string().contains("503"));
    assert_eq!(service.mode().await, Mode::Mock);
    assert!(service.base_url().await.is_none());

    // Nothing but the health check reached the backend
    service.fetch_tables().await.unwrap();
    let paths: Vec<String> = state.requests().await.into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/health"]);
}

// ========== Snapshots ==========

#[tokio::test]
async fn test_snapshot_round_trip_of_fetched_records() {
    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    let dishes = service.fetch_dishes().await.unwrap();

    service.persist_snapshot("pratos", &dishes).unwrap();
    let restored: Vec<Dish> = service.load_snapshot("pratos").unwrap().unwrap();
    assert_eq!(dishes, restored);
}

#[tokio::test]
async fn test_snapshot_absent_without_persist() {
    let service = mock_service(Path::new(SHIPPED_FIXTURES));
    let loaded: Option<Vec<Value>> = service.load_snapshot("mesas").unwrap();
    assert!(loaded.is_none());
}

#[tokio::test]
async fn test_snapshot_is_independent_of_mode() {
    let Backend { state, url, _dir } = start_backend(None).await;
    let service = mock_service(Path::new(SHIPPED_FIXTURES));

    let data = vec![json!({"any": ["json", 1, null]})];
    service.persist_snapshot("custom", &data).unwrap();
    service.connect(&url).await;

    let loaded: Vec<Value> = service.load_snapshot("custom").unwrap().unwrap();
    assert_eq!(loaded, data);
    assert!(state.requests().await.is_empty());
}

#[tokio::test]
async fn test_fetch_never_falls_back_to_snapshot() {
    let dir = TempDir::new().unwrap();
    let service = mock_service(dir.path());
    service
        .persist_snapshot("tables", &[json!({"mesa_id": 1, "numero": 1, "capacidade": 1})])
        .unwrap();

    assert!(matches!(
        service.fetch_tables().await,
        Err(ClientError::FixtureLoad { .. })
    ));
}

#[tokio::test]
async fn test_snapshot_over_quota_is_storage_full() {
    let service = service_with(
        ClientConfig::new()
            .with_fixture_dir(SHIPPED_FIXTURES)
            .with_snapshot_quota(32),
    );
    let staff = service.fetch_staff().await.unwrap();

    let err = service.persist_snapshot("funcionarios", &staff).unwrap_err();
    match err {
        ClientError::Storage(e) => assert_eq!(e.kind(), StorageErrorKind::Full),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_file_backed_service_persists_across_instances() {
    let dir = TempDir::new().unwrap();
    let config = ClientConfig::new()
        .with_fixture_dir(SHIPPED_FIXTURES)
        .with_snapshot_path(dir.path().join("snapshots.redb"));

    {
        let service = DataService::new(&config).unwrap();
        let tables = service.fetch_tables().await.unwrap();
        service.persist_snapshot("mesas", &tables).unwrap();
    }

    let service = DataService::new(&config).unwrap();
    let restored: Vec<boteco_client::Table> = service.load_snapshot("mesas").unwrap().unwrap();
    assert_eq!(restored, service.fetch_tables().await.unwrap());
}

#[tokio::test]
async fn test_fetch_works_while_snapshot_store_is_held_elsewhere() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("snapshots.redb");
    let _held = SnapshotStore::open(&path, 1024).unwrap();

    let config = ClientConfig::new()
        .with_fixture_dir(SHIPPED_FIXTURES)
        .with_snapshot_path(&path);
    let service = DataService::new(&config).unwrap();
    assert!(!service.fetch_tables().await.unwrap().is_empty());

    let err = service
        .persist_snapshot("mesas", &[json!({"mesa_id": 1})])
        .unwrap_err();
    match err {
        ClientError::Storage(e) => assert_eq!(e.kind(), StorageErrorKind::Unavailable),
        other => panic!("unexpected error: {other}"),
    }
}
