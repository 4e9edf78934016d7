// boteco-client/src/source/fixture.rs
// Fixture source - mock mode

use super::{DataSource, Mode};
use crate::{ClientError, ClientResult};
use async_trait::async_trait;
use serde_json::Value;
use shared::EntityKind;
use std::path::PathBuf;

/// Reads each collection from `<dir>/<fixture file>`
#[derive(Debug, Clone)]
pub struct FixtureSource {
    dir: PathBuf,
}

impl FixtureSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(kind.fixture_file())
    }
}

#[async_trait]
impl DataSource for FixtureSource {
    fn mode(&self) -> Mode {
        Mode::Mock
    }

    async fn load(&self, kind: EntityKind) -> ClientResult<Vec<Value>> {
        let path = self.path_for(kind);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| ClientError::FixtureLoad {
                path: path.clone(),
                message: e.to_string(),
            })?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::FixtureLoad {
            path,
            message: e.to_string(),
        })
    }
}
