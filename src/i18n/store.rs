// SPDX-License-Identifier: MPL-2.0
//! Durable storage for the active language selection.
//!
//! The resolver only ever hands a store the short locale code and reads the
//! raw string back at startup; validating that string is the resolver's job.
//! Stores report failures, the resolver decides to swallow them.

use crate::config::{self, STORAGE_KEY};
use crate::error::{Error, Result};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Persists the active locale code across restarts.
pub trait SelectionStore {
    /// Returns the previously persisted code, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Persists `code`, replacing any previous value.
    fn save(&self, code: &str) -> Result<()>;
}

impl<S: SelectionStore + ?Sized> SelectionStore for Box<S> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, code: &str) -> Result<()> {
        (**self).save(code)
    }
}

impl<S: SelectionStore + ?Sized> SelectionStore for Arc<S> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, code: &str) -> Result<()> {
        (**self).save(code)
    }
}

// =============================================================================
// Settings file
// =============================================================================

/// Stores the selection as `[general] language` in `settings.toml`.
///
/// Other settings already present in the file are preserved on save.
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    base_dir: Option<PathBuf>,
}

impl SettingsStore {
    /// Uses the standard config directory resolution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `base_dir` instead of the standard config directory.
    pub fn with_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn path(&self) -> Result<PathBuf> {
        config::config_path_with_override(self.base_dir.clone())
            .ok_or_else(|| Error::Store("no config directory available".to_string()))
    }
}

impl SelectionStore for SettingsStore {
    fn load(&self) -> Result<Option<String>> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(config::load_from_path(&path)?.general.language)
    }

    fn save(&self, code: &str) -> Result<()> {
        let path = self.path()?;
        let mut cfg = if path.exists() {
            config::load_from_path(&path).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = %err, "replacing unreadable settings");
                config::Config::default()
            })
        } else {
            config::Config::default()
        };
        cfg.general.language = Some(code.to_string());
        config::save_to_path(&cfg, &path)?;
        tracing::debug!(key = STORAGE_KEY, code, path = %path.display(), "persisted language");
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

#[derive(Debug, Default)]
struct MemoryCell {
    value: Option<String>,
    unavailable: bool,
    writes: usize,
}

/// Process-local store; clones share the same cell.
///
/// Survives "restarts" that reuse a clone, which is what tests need.
/// [`MemoryStore::set_unavailable`] makes every access fail, simulating
/// blocked or full storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    cell: Arc<Mutex<MemoryCell>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `code`.
    pub fn with_value(code: impl Into<String>) -> Self {
        let store = Self::default();
        store.lock().value = Some(code.into());
        store
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// The raw stored value, bypassing availability.
    pub fn value(&self) -> Option<String> {
        self.lock().value.clone()
    }

    /// Number of successful saves.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryCell> {
        // A panicking writer cannot leave the cell half-updated
        self.cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SelectionStore for MemoryStore {
    fn load(&self) -> Result<Option<String>> {
        let cell = self.lock();
        if cell.unavailable {
            return Err(Error::Store("storage unavailable".to_string()));
        }
        Ok(cell.value.clone())
    }

    fn save(&self, code: &str) -> Result<()> {
        let mut cell = self.lock();
        if cell.unavailable {
            return Err(Error::Store("storage unavailable".to_string()));
        }
        cell.value = Some(code.to_string());
        cell.writes += 1;
        Ok(())
    }
}

// =============================================================================
// Background writer
// =============================================================================

enum Command {
    Save(String),
    Flush(oneshot::Sender<()>),
}

/// Moves writes of an inner store onto a small tokio runtime.
///
/// `save` enqueues and returns `Ok(())` immediately; the writer task hands
/// each write to `spawn_blocking` and logs failures of the inner store.
/// Reads go straight to the inner store. Dropping the store drains the queue
/// and waits for the writer, so it must not be dropped from async code.
pub struct BackgroundStore<S> {
    inner: Arc<S>,
    sender: Option<mpsc::UnboundedSender<Command>>,
    writer: Option<JoinHandle<()>>,
    runtime: Runtime,
}

impl<S> BackgroundStore<S>
where
    S: SelectionStore + Send + Sync + 'static,
{
    pub fn new(inner: S) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(1)
            .thread_name("language-store")
            .build()?;

        let inner = Arc::new(inner);
        let (sender, receiver) = mpsc::unbounded_channel::<Command>();
        let writer = runtime.spawn(run_writer(Arc::clone(&inner), receiver));

        Ok(Self {
            inner,
            sender: Some(sender),
            writer: Some(writer),
            runtime,
        })
    }

    /// Blocks until every write queued so far has been attempted.
    pub fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (done, wait) = oneshot::channel();
        if sender.send(Command::Flush(done)).is_ok() {
            let _ = wait.blocking_recv();
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

async fn run_writer<S>(store: Arc<S>, mut receiver: mpsc::UnboundedReceiver<Command>)
where
    S: SelectionStore + Send + Sync + 'static,
{
    while let Some(command) = receiver.recv().await {
        match command {
            Command::Save(code) => {
                let store = Arc::clone(&store);
                let saved = tokio::task::spawn_blocking(move || {
                    let result = store.save(&code);
                    (code, result)
                })
                .await;
                match saved {
                    Ok((_, Ok(()))) => {}
                    Ok((code, Err(err))) => {
                        tracing::warn!(code = %code, error = %err, "failed to persist language");
                    }
                    Err(err) => tracing::warn!(error = %err, "language writer task failed"),
                }
            }
            Command::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}

impl<S> SelectionStore for BackgroundStore<S>
where
    S: SelectionStore + Send + Sync + 'static,
{
    fn load(&self) -> Result<Option<String>> {
        self.inner.load()
    }

    fn save(&self, code: &str) -> Result<()> {
        match &self.sender {
            Some(sender) => sender
                .send(Command::Save(code.to_string()))
                .map_err(|_| Error::Store("language writer stopped".to_string())),
            None => Err(Error::Store("language writer stopped".to_string())),
        }
    }
}

impl<S> Drop for BackgroundStore<S> {
    fn drop(&mut self) {
        // Closing the channel ends the writer loop once the queue is drained
        self.sender.take();
        if let Some(writer) = self.writer.take() {
            let _ = self.runtime.block_on(writer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("kn").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("kn"));
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn memory_store_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();
        store.save("hi").unwrap();
        assert_eq!(other.load().unwrap().as_deref(), Some("hi"));
    }

    #[test]
    fn unavailable_memory_store_fails_both_ways() {
        let store = MemoryStore::with_value("tu");
        store.set_unavailable(true);

        assert!(matches!(store.load(), Err(Error::Store(_))));
        assert!(matches!(store.save("hi"), Err(Error::Store(_))));
        assert_eq!(store.value().as_deref(), Some("tu"));
    }

    #[test]
    fn settings_store_returns_none_without_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let store = SettingsStore::with_dir(temp_dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn settings_store_round_trip() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let store = SettingsStore::with_dir(temp_dir.path());

        store.save("hi").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("hi"));

        let content = std::fs::read_to_string(temp_dir.path().join("settings.toml")).unwrap();
        assert!(content.contains("[general]"));
        assert!(content.contains("language = \"hi\""));
    }

    #[test]
    fn settings_store_preserves_other_settings() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        std::fs::write(
            temp_dir.path().join("settings.toml"),
            "[general]\nlanguage = \"en\"\nfollow_system_locale = true\n",
        )
        .unwrap();

        let store = SettingsStore::with_dir(temp_dir.path());
        store.save("kn").unwrap();

        let (cfg, warning) = config::load_with_override(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none());
        assert_eq!(cfg.general.language.as_deref(), Some("kn"));
        assert_eq!(cfg.general.follow_system_locale, Some(true));
    }

    #[test]
    fn settings_store_overwrites_corrupted_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "not = valid = toml").unwrap();

        let store = SettingsStore::with_dir(temp_dir.path());
        assert!(store.load().is_err());
        store.save("tu").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tu"));
    }

    #[test]
    fn settings_store_reads_legacy_flat_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        std::fs::write(temp_dir.path().join("settings.toml"), "language = \"tu\"\n").unwrap();

        let store = SettingsStore::with_dir(temp_dir.path());
        assert_eq!(store.load().unwrap().as_deref(), Some("tu"));
    }

    #[test]
    fn background_store_persists_after_flush() {
        let memory = MemoryStore::new();
        let store = BackgroundStore::new(memory.clone()).expect("spawn writer");

        store.save("hi").unwrap();
        store.save("kn").unwrap();
        store.flush();

        assert_eq!(memory.value().as_deref(), Some("kn"));
        assert_eq!(memory.writes(), 2);
    }

    #[test]
    fn background_store_drains_queue_on_drop() {
        let memory = MemoryStore::new();
        {
            let store = BackgroundStore::new(memory.clone()).expect("spawn writer");
            store.save("tu").unwrap();
        }
        assert_eq!(memory.value().as_deref(), Some("tu"));
    }

    #[test]
    fn background_store_swallows_inner_failures() {
        let memory = MemoryStore::new();
        memory.set_unavailable(true);
        let store = BackgroundStore::new(memory.clone()).expect("spawn writer");

        assert!(store.save("hi").is_ok());
        store.flush();
        assert_eq!(memory.value(), None);
    }

    #[test]
    fn background_store_keeps_write_order() {
        let memory = MemoryStore::new();
        {
            let store = BackgroundStore::new(memory.clone()).expect("spawn writer");
            for code in ["hi", "kn", "tu", "en", "kn"] {
                store.save(code).unwrap();
            }
        }
        assert_eq!(memory.value().as_deref(), Some("kn"));
        assert_eq!(memory.writes(), 5);
    }

    #[test]
    fn background_store_reads_through() {
        let store = BackgroundStore::new(MemoryStore::with_value("kn")).expect("spawn writer");
        assert_eq!(store.load().unwrap().as_deref(), Some("kn"));
        assert_eq!(store.inner().writes(), 0);
    }
}
