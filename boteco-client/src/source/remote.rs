// boteco-client/src/source/remote.rs
// Remote source - API mode

use super::{DataSource, Mode};
use crate::{ClientResult, RemoteClient};
use async_trait::async_trait;
use serde_json::Value;
use shared::EntityKind;

#[async_trait]
impl DataSource for RemoteClient {
    fn mode(&self) -> Mode {
        Mode::Remote
    }

    async fn load(&self, kind: EntityKind) -> ClientResult<Vec<Value>> {
        self.get(kind.endpoint()).await
    }
}
