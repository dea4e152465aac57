use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::Result;
use chrono::Utc;
use fs4::fs_std::FileExt;
use serde_json::Value;
use tracing::{debug, warn};

/// Flat string to string storage, the only thing persisted by the application.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrites the value stored under `key`. Must be durable by the time it returns.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

pub const STORE_FILE_NAME: &str = "store.json";
const LOCK_FILE_NAME: &str = "store.lock";

type Entries = BTreeMap<String, Value>;

/// The main realization of [KeyValueStore]. All entries live in one json object inside
/// [STORE_FILE_NAME]. The file is read on every access, since the cli and the reminder service
/// share it.
///
/// Values are written as json strings. Other json values (a hand-edited `"notificationHour": 21`)
/// are read back in their json text form.
pub struct FileKeyValueStore {
    dir: PathBuf,
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: &Path) -> Result<Self, std::io::Error> {
        fs::create_dir_all(dir)?;

        Ok(Self {
            dir: dir.to_owned(),
            path: dir.join(STORE_FILE_NAME),
            lock_path: dir.join(LOCK_FILE_NAME),
        })
    }

    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_lock(&self) -> Result<File, std::io::Error> {
        File::options()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
    }

    fn read_content(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(v) if v.trim().is_empty() => Ok(None),
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn read_entries(&self) -> Result<Entries> {
        let Some(content) = self.read_content()? else {
            return Ok(Entries::new());
        };

        match serde_json::from_str(&content) {
            Ok(v) => Ok(v),
            Err(e) => {
                warn!("Store {:?} is not a valid json object, ignoring it: {e}", self.path);
                Ok(Entries::new())
            }
        }
    }

    /// Like [Self::read_entries], but an unparsable file is moved aside first so the write that
    /// follows never destroys data the user could still recover by hand.
    fn read_entries_for_update(&self) -> Result<Entries> {
        let Some(content) = self.read_content()? else {
            return Ok(Entries::new());
        };

        match serde_json::from_str(&content) {
            Ok(v) => Ok(v),
            Err(e) => {
                let backup = self.dir.join(format!(
                    "{STORE_FILE_NAME}.{}.corrupt",
                    Utc::now().format("%Y%m%dT%H%M%S%3f")
                ));
                fs::rename(&self.path, &backup)?;
                warn!(
                    "Store {:?} is not a valid json object ({e}), moved it to {backup:?}",
                    self.path
                );
                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<()> {
        let temporary = self.path.with_extension("json.tmp");
        fs::write(&temporary, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&temporary, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let lock = self.open_lock()?;
        FileExt::lock_shared(&lock)?;
        let result = self.read_entries();
        FileExt::unlock(&lock)?;

        let value = result?.remove(key).map(|v| match v {
            Value::String(v) => v,
            other => other.to_string(),
        });
        debug!("Read {key} from {:?}, present: {}", self.path, value.is_some());
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // Semi-safe acquire-release for a file
        let lock = self.open_lock()?;
        FileExt::lock_exclusive(&lock)?;
        let result = self.read_entries_for_update().and_then(|mut entries| {
            entries.insert(key.to_owned(), Value::String(value.to_owned()));
            self.write_entries(&entries)
        });
        FileExt::unlock(&lock)?;

        debug!("Wrote {key} into {:?}", self.path);
        result
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryKeyValueStore {
    entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
