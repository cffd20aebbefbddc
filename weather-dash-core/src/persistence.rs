//! Key-value persistence for dashboard preferences.
//!
//! Values are opaque strings (the store writes JSON). Writes from the store
//! go through [`PersistenceWriter`], a background task that applies them in
//! the order they were queued and logs failures instead of returning them.

use async_trait::async_trait;
use directories::ProjectDirs;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::{collections::HashMap, fmt::Debug, io, path::PathBuf, sync::Arc};
use tokio::sync::{mpsc, oneshot};

use crate::error::PersistenceError;

pub const FAVORITES_KEY: &str = "weatherFavorites";
pub const RECENT_SEARCHES_KEY: &str = "recentSearches";

#[async_trait]
pub trait KeyValuePersistence: Send + Sync + Debug {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Process-local storage; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated storage, mostly for tests.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries: Mutex::new(entries) }
    }
}

#[async_trait]
impl KeyValuePersistence for MemoryPersistence {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileSystemPersistence {
    dir: PathBuf,
}

impl FileSystemPersistence {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Storage under the platform data directory.
    pub fn in_default_location() -> anyhow::Result<Self> {
        Ok(Self::new(Self::default_dir()?))
    }

    pub fn default_dir() -> anyhow::Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dash", "weather-dash")
            .ok_or_else(|| anyhow::anyhow!("Could not determine platform data directory"))?;

        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{key}'"),
            )
            .into());
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValuePersistence for FileSystemPersistence {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;

        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(&path, value).await?;
        Ok(())
    }
}

/// Read and decode a stored list. Missing, unreadable or malformed values
/// all come back as an empty list.
pub async fn load_list<T: DeserializeOwned>(
    persistence: &dyn KeyValuePersistence,
    key: &str,
) -> Vec<T> {
    let raw = match persistence.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "nothing stored yet");
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "failed to read stored value, starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value is not parseable, starting empty");
            Vec::new()
        }
    }
}

#[derive(Debug)]
enum WriteCommand {
    Write { key: &'static str, value: String },
    Flush(oneshot::Sender<()>),
}

/// Background task applying queued writes in order.
#[derive(Debug)]
pub struct PersistenceWriter {
    persistence: Arc<dyn KeyValuePersistence>,
    rx: mpsc::UnboundedReceiver<WriteCommand>,
}

/// Queue side of a [`PersistenceWriter`].
#[derive(Debug, Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl PersistenceWriter {
    pub fn new(persistence: Arc<dyn KeyValuePersistence>) -> (Self, PersistenceHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { persistence, rx }, PersistenceHandle { tx })
    }

    /// Create a writer and run it on the current tokio runtime.
    pub fn spawn(persistence: Arc<dyn KeyValuePersistence>) -> PersistenceHandle {
        let (writer, handle) = Self::new(persistence);
        tokio::spawn(writer.run());
        handle
    }

    /// Runs until every handle has been dropped.
    pub async fn run(mut self) {
        tracing::debug!("persistence writer started");

        while let Some(command) = self.rx.recv().await {
            match command {
                WriteCommand::Write { key, value } => {
                    if let Err(e) = self.persistence.set(key, &value).await {
                        tracing::warn!(key, error = %e, "failed to persist value");
                    }
                }
                WriteCommand::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }

        tracing::debug!("persistence writer stopped");
    }
}

impl PersistenceHandle {
    /// Queue a write without waiting for it.
    pub fn write(&self, key: &'static str, value: String) -> Result<(), PersistenceError> {
        self.tx
            .send(WriteCommand::Write { key, value })
            .map_err(|_| PersistenceError::WriterClosed)
    }

    /// Wait until every write queued before this call has been attempted.
    pub async fn flush(&self) -> Result<(), PersistenceError> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx.send(WriteCommand::Flush(done_tx)).map_err(|_| PersistenceError::WriterClosed)?;
        done_rx.await.map_err(|_| PersistenceError::WriterClosed)
    }
}
