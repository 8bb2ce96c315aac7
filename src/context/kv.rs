use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{HeraldError, Result};

/// Durable string key/value storage backing profiles and counters.
pub trait KvStore: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<()>;
}

/// Process-memory store. Used for tests and when no storage dir is configured.
#[derive(Debug, Default)]
pub struct MemoryKv {
    entries: HashMap<String, String>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// One file per key under `dir`, named `<key>.json`.
#[derive(Debug)]
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(HeraldError::storage(format!("invalid key: {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KvStore for FileKv {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key).ok()?;
        fs::read_to_string(path).ok()
    }

    fn set(&mut self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        fs::write(path, value)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_kv_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut kv = FileKv::open(dir.path()).unwrap();
            kv.set("current_user", r#"{"email":"a@b.c"}"#.to_string()).unwrap();
        }
        let kv = FileKv::open(dir.path()).unwrap();
        assert_eq!(kv.get("current_user").as_deref(), Some(r#"{"email":"a@b.c"}"#));
        assert_eq!(kv.get("missing"), None);
    }

    #[test]
    fn file_kv_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut kv = FileKv::open(dir.path()).unwrap();
        assert!(kv.set("../escape", "x".to_string()).is_err());
        assert_eq!(kv.get("../escape"), None);
    }
}
