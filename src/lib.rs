//! Typed, cached access to periodically published Czech road-accident
//! record archives.
//!
//! The pipeline downloads the published ZIP archives, extracts one CSV
//! member per region, coerces every field against the fixed 65-column
//! schema, deduplicates records by identifier, and caches the resulting
//! column sets both in memory and as gzip snapshots on disk. Downstream
//! analysis code consumes the merged dataset by column name.
//!
//! ```no_run
//! use nehoda_data_manager::{DataManager, DataStore, HttpIndexClient, Region};
//!
//! fn main() -> Result<(), nehoda_data_manager::DataError> {
//!     let store = DataStore::new()?;
//!     let mut manager = DataManager::new(HttpIndexClient::new()?, store);
//!     let data = manager.dataset(Some(&[Region::Jhc, Region::Plk, Region::Pak]))?;
//!     println!("accidents: {}", data.len());
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod error;
pub mod fetch;
pub mod parse;
pub mod region;
pub mod schema;
pub mod store;

pub use app::DataManager;
pub use cache::RegionCache;
pub use config::{Config, ConfigLoader, ResolvedConfig};
pub use dataset::{ColumnData, Dataset};
pub use error::DataError;
pub use fetch::{HttpIndexClient, IndexClient};
pub use region::Region;
pub use schema::ColumnType;
pub use store::DataStore;
