use camino::Utf8PathBuf;

use crate::cache::RegionCache;
use crate::config::ResolvedConfig;
use crate::dataset::Dataset;
use crate::error::DataError;
use crate::fetch::{self, HttpIndexClient, IndexClient};
use crate::parse;
use crate::region::Region;
use crate::store::DataStore;

/// One pipeline run: an index client, the archive store, and the region
/// cache, wired together. Owns all mutable pipeline state; create one per
/// run and pass it down to callers instead of sharing it globally.
pub struct DataManager<I: IndexClient> {
    index: I,
    store: DataStore,
    cache: RegionCache,
}

impl DataManager<HttpIndexClient> {
    /// Manager over the HTTP index described by a resolved config.
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, DataError> {
        let index = HttpIndexClient::with_base_url(config.index_url.clone())?;
        Ok(Self::new(index, DataStore::with_root(config.data_dir.clone())))
    }
}

impl<I: IndexClient> DataManager<I> {
    pub fn new(index: I, store: DataStore) -> Self {
        let cache = RegionCache::new(store.clone());
        Self {
            index,
            store,
            cache,
        }
    }

    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Bulk archive refresh: downloads every archive listed on the index
    /// page into the store. Not consulted per query; failures propagate.
    pub fn fetch_all(&self) -> Result<Vec<Utf8PathBuf>, DataError> {
        fetch::fetch_all(&self.index, &self.store)
    }

    /// Typed dataset for one region, through the cache. A cache miss parses
    /// the stored archives; an empty store triggers one bulk fetch first.
    pub fn region_data(&mut self, region: Region) -> Result<&Dataset, DataError> {
        let Self {
            index,
            store,
            cache,
        } = self;
        cache.get_or_parse(region, || {
            if store.archive_files()?.is_empty() {
                fetch::fetch_all(&*index, store)?;
            }
            parse::parse_region(store, region)
        })
    }

    /// Merged dataset across the requested regions, concatenated column-wise
    /// in request order. Duplicates in the request are kept as-is. `None`
    /// selects all known regions; an explicitly empty request is an error
    /// rather than a silently empty result.
    pub fn dataset(&mut self, regions: Option<&[Region]>) -> Result<Dataset, DataError> {
        let requested: Vec<Region> = match regions {
            Some([]) => return Err(DataError::EmptyRegionSet),
            Some(list) => list.to_vec(),
            None => Region::ALL.to_vec(),
        };

        let mut unified = Dataset::empty();
        for region in requested {
            let data = self.region_data(region)?;
            unified.extend_from(data)?;
        }
        Ok(unified)
    }
}
