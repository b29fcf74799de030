use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs::File;
use std::io::BufReader;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tracing::{debug, warn};

use crate::dataset::Dataset;
use crate::error::DataError;
use crate::region::Region;
use crate::store::DataStore;

/// Two-tier per-region cache: a process-lifetime in-memory map over
/// gzip-compressed snapshots on disk.
///
/// Lookup order is memory, then snapshot, then the supplied parse; freshly
/// parsed data is written through to disk before it is returned. Snapshots
/// carry no version or timestamp, so a stale snapshot is refreshed only by
/// deleting the file out of band; recompute cost is a full archive scan and
/// the source archives change rarely. The in-memory tier is a
/// non-authoritative mirror of the snapshot tier, valid only for this
/// process.
pub struct RegionCache {
    store: DataStore,
    memory: HashMap<Region, Dataset>,
}

impl RegionCache {
    pub fn new(store: DataStore) -> Self {
        Self {
            store,
            memory: HashMap::new(),
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// True when the region is already memory-resident (no disk or archive
    /// access needed).
    pub fn is_loaded(&self, region: Region) -> bool {
        self.memory.contains_key(&region)
    }

    /// Memoized dataset lookup. `parse` runs only when neither tier holds
    /// the region; its result is stored in memory and written through to the
    /// snapshot file before this call returns.
    pub fn get_or_parse<F>(&mut self, region: Region, parse: F) -> Result<&Dataset, DataError>
    where
        F: FnOnce() -> Result<Dataset, DataError>,
    {
        match self.memory.entry(region) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(slot) => {
                let loaded = match load_snapshot(&self.store, region) {
                    Ok(found) => found,
                    Err(err) => {
                        // Unreadable snapshot: fall back to a fresh parse and
                        // rewrite the file.
                        warn!("{region} snapshot unreadable ({err}), re-parsing");
                        None
                    }
                };
                let dataset = match loaded {
                    Some(dataset) => {
                        debug!("{region} loaded from snapshot");
                        dataset
                    }
                    None => {
                        let dataset = parse()?;
                        write_snapshot(&self.store, region, &dataset)?;
                        debug!("{region} parsed, {} rows", dataset.len());
                        dataset
                    }
                };
                Ok(slot.insert(dataset))
            }
        }
    }
}

fn load_snapshot(store: &DataStore, region: Region) -> Result<Option<Dataset>, DataError> {
    let path = store.snapshot_path(region);
    if !path.as_std_path().exists() {
        return Ok(None);
    }
    let file = File::open(path.as_std_path())
        .map_err(|err| DataError::Snapshot(format!("open {path}: {err}")))?;
    let decoder = GzDecoder::new(BufReader::new(file));
    let dataset: Dataset = serde_json::from_reader(decoder)
        .map_err(|err| DataError::Snapshot(format!("decode {path}: {err}")))?;
    dataset.validate()?;
    Ok(Some(dataset))
}

fn write_snapshot(store: &DataStore, region: Region, dataset: &Dataset) -> Result<(), DataError> {
    let path = store.snapshot_path(region);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    serde_json::to_writer(&mut encoder, dataset)
        .map_err(|err| DataError::Snapshot(format!("encode {path}: {err}")))?;
    let bytes = encoder
        .finish()
        .map_err(|err| DataError::Snapshot(format!("encode {path}: {err}")))?;
    DataStore::write_bytes_atomic(&path, &bytes)
}
