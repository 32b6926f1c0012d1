use std::fs::{self, create_dir_all};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use eyre::{Context, Result};

use super::{StateStorage, storage_error::StorageError};

/// Stores each key as `<key>.json` inside a directory.
#[derive(Clone, Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn try_new() -> Result<Box<dyn StateStorage + Send + Sync>, StorageError> {
        let proj_dirs =
            directories::ProjectDirs::from("", "", "cadence").ok_or(StorageError::NoHomeDir)?;
        FileStorage::new_from_path(proj_dirs.data_dir())
    }

    pub fn new_from_path<P: AsRef<Path>>(
        dir: P,
    ) -> Result<Box<dyn StateStorage + Send + Sync>, StorageError> {
        let dir_ref = dir.as_ref();
        let dir_string = dir_ref.to_string_lossy().to_string();
        if dir_ref.to_str().is_none() {
            return Err(StorageError::InvalidUnicode(dir_string));
        }

        if dir_ref.exists() && !dir_ref.is_dir() {
            return Err(StorageError::NotADirectory(dir_string));
        }

        if let Err(e) = create_dir_all(dir_ref) {
            return Err(StorageError::DirCreationFailed(dir_string, e));
        }

        Ok(Box::new(Self {
            dir: dir_ref.to_path_buf(),
        }))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        // Keys come from settings, but keep them from escaping the storage dir
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }
}

impl StateStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).wrap_err(format!("Error reading state file {path:?}")),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key);
        fs::write(&path, value).wrap_err(format!("Error writing state file {path:?}"))
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).wrap_err(format!("Error removing state file {path:?}")),
        }
    }
}
