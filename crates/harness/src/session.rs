use gazetteer_core::RecordType;
use gazetteer_engine::{Engine, EngineError, Lookups, Restored, Settings};
use gazetteer_storage::{KeyValueStore, MemoryStore, SqliteStore, StorageError};
use tempfile::TempDir;

use crate::validators::ScriptedValidators;

/// An engine over a test store with scripted validators.
pub struct TestSession<S> {
    pub engine: Engine<S>,
    pub validators: ScriptedValidators,
    pub lookups: Lookups,
}

impl TestSession<MemoryStore> {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self::over(MemoryStore::new(), settings).0
    }
}

impl Default for TestSession<MemoryStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: KeyValueStore> TestSession<S> {
    /// Open a session over an existing store, reloading what it holds.
    pub fn over(store: S, settings: Settings) -> (Self, Restored) {
        let validators = ScriptedValidators::new();
        let (engine, restored) = Engine::open(store, settings, validators.registry());
        let session = Self {
            engine,
            validators,
            lookups: Lookups::new(),
        };
        (session, restored)
    }

    pub fn validate(&mut self, record_type: RecordType) -> Result<bool, EngineError> {
        self.engine.validate(record_type, &self.lookups)
    }

    /// Tear the session down and hand back its store, as a page reload would.
    pub fn restart(self) -> (Self, Restored) {
        let settings = self.engine.settings().clone();
        Self::over(self.engine.into_inner(), settings)
    }
}

/// A SQLite store in a temporary directory that outlives reopening.
pub struct TempSqlite {
    dir: TempDir,
}

impl TempSqlite {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self { dir: tempfile::tempdir()? })
    }

    pub fn open(&self) -> Result<SqliteStore, StorageError> {
        let path = self.dir.path().join("sandbox.db");
        SqliteStore::open(&path.to_string_lossy())
    }
}
