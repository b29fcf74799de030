use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::DataError;
use crate::region::Region;

/// Local directory holding the downloaded archives and, side by side, the
/// per-region cache snapshots.
#[derive(Debug, Clone)]
pub struct DataStore {
    root: Utf8PathBuf,
}

const ARCHIVE_EXTENSION: &str = "zip";
const SNAPSHOT_TEMPLATE: &str = "data_{}.json.gz";

impl DataStore {
    /// Store rooted at `data/` under the current working directory.
    pub fn new() -> Result<Self, DataError> {
        let cwd = std::env::current_dir().map_err(|err| DataError::Filesystem(err.to_string()))?;
        let root = Utf8PathBuf::from_path_buf(cwd.join("data"))
            .map_err(|_| DataError::Filesystem("invalid store path".to_string()))?;
        Ok(Self { root })
    }

    pub fn with_root(root: Utf8PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn ensure_root(&self) -> Result<(), DataError> {
        fs::create_dir_all(self.root.as_std_path())
            .map_err(|err| DataError::Filesystem(err.to_string()))
    }

    pub fn archive_path(&self, file_name: &str) -> Utf8PathBuf {
        self.root.join(file_name)
    }

    pub fn snapshot_path(&self, region: Region) -> Utf8PathBuf {
        self.root
            .join(SNAPSHOT_TEMPLATE.replace("{}", region.abbrev()))
    }

    /// Every stored archive, sorted by file name. The sort pins the scan
    /// order, which in turn pins which duplicate record wins.
    pub fn archive_files(&self) -> Result<Vec<Utf8PathBuf>, DataError> {
        if !self.root.as_std_path().exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(self.root.as_std_path())
            .map_err(|err| DataError::Filesystem(err.to_string()))?;
        let mut archives = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| DataError::Filesystem(err.to_string()))?;
            let path = Utf8PathBuf::from_path_buf(entry.path())
                .map_err(|_| DataError::Filesystem("non-UTF-8 path in store".to_string()))?;
            if path.extension() == Some(ARCHIVE_EXTENSION) && path.is_file() {
                archives.push(path);
            }
        }
        archives.sort();
        Ok(archives)
    }

    pub fn write_bytes_atomic(path: &Utf8Path, content: &[u8]) -> Result<(), DataError> {
        let parent = path
            .parent()
            .ok_or_else(|| DataError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| DataError::Filesystem(err.to_string()))?;
        let temp = tempfile::Builder::new()
            .prefix(".snapshot")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| DataError::Filesystem(err.to_string()))?;
        fs::write(temp.path(), content).map_err(|err| DataError::Filesystem(err.to_string()))?;
        temp.persist(path.as_std_path())
            .map_err(|err| DataError::Filesystem(err.to_string()))?;
        Ok(())
    }
}
