//! Settings file ownership.
//!
//! The store publishes immutable [`Settings`] snapshots. Readers clone an
//! `Arc` and never see a half-applied change; writers go through
//! [`SettingsStore::update`], which validates, persists atomically and only
//! then publishes. Nothing on the request path touches the disk.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};
use relay_core::{Settings, SettingsError};
use tracing::{debug, error, info, warn};

pub struct SettingsStore {
    path: PathBuf,
    current: RwLock<Arc<Settings>>,
    /// Modification time of the file the current snapshot came from.
    modified: Mutex<Option<SystemTime>>,
    /// Serializes writers so concurrent admin calls cannot lose updates.
    write_lock: Mutex<()>,
}

impl SettingsStore {
    /// Loads the settings file, falling back to defaults when it is missing
    /// or malformed.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let modified = modified_time(&path);

        let settings = match read_settings(&path) {
            Ok(settings) => {
                info!(path = %path.display(), "Settings loaded");
                settings
            },
            Err(e) if e.is_missing_file() => {
                warn!(path = %path.display(), "Settings file not found, using defaults");
                Settings::default()
            },
            Err(e) => {
                error!(path = %path.display(), error = %e, "Settings unreadable, using defaults");
                Settings::default()
            },
        };

        Self::with_settings(path, settings, modified)
    }

    /// Store around an in-memory document, e.g. for tests.
    pub fn in_memory(path: impl Into<PathBuf>, settings: Settings) -> Self {
        Self::with_settings(path.into(), settings, None)
    }

    fn with_settings(path: PathBuf, settings: Settings, modified: Option<SystemTime>) -> Self {
        Self {
            path,
            current: RwLock::new(Arc::new(settings)),
            modified: Mutex::new(modified),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Settings> {
        Arc::clone(&self.current.read())
    }

    /// Applies `mutate` to a copy of the current settings, validates the
    /// result, writes it to disk and publishes it.
    ///
    /// Nothing is published or written when `mutate` or validation fails.
    pub fn update<F, E>(&self, mutate: F) -> Result<Arc<Settings>, E>
    where
        F: FnOnce(&mut Settings) -> Result<(), E>,
        E: From<SettingsError>,
    {
        let _guard = self.write_lock.lock();

        let mut next = Settings::clone(&self.snapshot());
        mutate(&mut next)?;
        next.validate()?;

        write_atomically(&self.path, &next)?;

        let next = Arc::new(next);
        *self.current.write() = Arc::clone(&next);
        *self.modified.lock() = modified_time(&self.path);

        debug!(path = %self.path.display(), "Settings persisted");
        Ok(next)
    }

    /// Re-reads the file when its modification time changed.
    ///
    /// Returns `Ok(true)` when a new snapshot was published. A file that
    /// fails to parse keeps the previous snapshot in place.
    pub fn reload(&self) -> Result<bool, SettingsError> {
        let Some(modified) = modified_time(&self.path) else {
            return Ok(false);
        };

        let _guard = self.write_lock.lock();
        {
            let mut last = self.modified.lock();
            if *last == Some(modified) {
                return Ok(false);
            }
            // Record the attempt so a broken file is reported once, not every tick.
            *last = Some(modified);
        }

        let settings = read_settings(&self.path)?;
        *self.current.write() = Arc::new(settings);
        info!(path = %self.path.display(), "Settings reloaded");
        Ok(true)
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;
    Settings::from_json(&raw)
}

/// Writes to a sibling temp file and renames it over the target.
fn write_atomically(path: &Path, settings: &Settings) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let json = settings.to_json_pretty()?;
    fs::write(&tmp, json).map_err(|e| SettingsError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| SettingsError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(json: &str) -> (TempDir, SettingsStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, json).unwrap();
        let store = SettingsStore::load(&path);
        (dir, store)
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(dir.path().join("absent.json"));

        assert_eq!(*store.snapshot(), Settings::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults() {
        let (_dir, store) = store_with("{ not json");
        assert!(!store.snapshot().maintenance.enabled);
    }

    #[test]
    fn update_persists_and_publishes() {
        let (_dir, store) = store_with(r#"{"name": "Mine", "customField": [1, 2]}"#);

        store
            .update(|s| {
                s.maintenance.enabled = true;
                Ok::<_, SettingsError>(())
            })
            .unwrap();

        assert!(store.snapshot().maintenance.enabled);

        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(on_disk["maintenance"]["enabled"], true);
        assert_eq!(on_disk["name"], "Mine");
        assert_eq!(on_disk["customField"], serde_json::json!([1, 2]));
    }

    #[test]
    fn invalid_update_is_not_published() {
        let (_dir, store) = store_with("{}");
        let before = store.snapshot();

        let result = store.update(|s| {
            s.rate_limit.max_requests = 0;
            Ok::<_, SettingsError>(())
        });

        assert!(result.is_err());
        assert_eq!(*store.snapshot(), *before);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}");
    }

    #[test]
    fn snapshots_are_immutable() {
        let (_dir, store) = store_with("{}");
        let old = store.snapshot();

        store
            .update(|s| {
                s.name = "Renamed".into();
                Ok::<_, SettingsError>(())
            })
            .unwrap();

        assert_eq!(old.name, "Relay API");
        assert_eq!(store.snapshot().name, "Renamed");
    }

    #[test]
    fn reload_keeps_last_good_snapshot() {
        let (_dir, store) = store_with(r#"{"name": "Good"}"#);
        *store.modified.lock() = None;

        fs::write(store.path(), "{ broken").unwrap();
        assert!(store.reload().is_err());
        assert_eq!(store.snapshot().name, "Good");

        // Same mtime again: nothing to do.
        assert!(!store.reload().unwrap());
    }

    #[test]
    fn reload_picks_up_hand_edits() {
        let (_dir, store) = store_with(r#"{"name": "Before"}"#);
        *store.modified.lock() = None;

        fs::write(store.path(), r#"{"name": "After"}"#).unwrap();

        assert!(store.reload().unwrap());
        assert_eq!(store.snapshot().name, "After");
    }
}
