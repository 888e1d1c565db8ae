use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use application::ports::out_::{QueueStore, StoreError};
use domain::Entry;

/// Keeps the queue in a JSON file so it outlives the process.
///
/// A missing file reads as an empty queue. Each write goes to its own sibling temp file that is
/// then renamed over the original, so a reader never sees a half-written queue.
pub struct JsonFileQueueStore<P> {
    path: PathBuf,
    _player: PhantomData<fn() -> P>,
}

impl<P> JsonFileQueueStore<P> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _player: PhantomData,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl<P> QueueStore<P> for JsonFileQueueStore<P>
where
    P: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn read(&self) -> Result<Vec<Entry<P>>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes).map_err(|err| StoreError::Corrupt(err.to_string()))
    }

    async fn write(
        &self,
        queue: Vec<Entry<P>>,
    ) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&queue).map_err(|err| StoreError::Encode(err.to_string()))?;
        let temp = self.temp_path();
        tokio::fs::write(&temp, &bytes).await?;
        if let Err(err) = tokio::fs::rename(&temp, &self.path).await {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(err.into());
        }
        debug!(path = %self.path.display(), entries = queue.len(), "Queue written");
        Ok(())
    }
}
