//! Infrastructure layer: config files, session cache, and HTTP asset fetching.

pub mod asset_fetcher;
pub mod config_service;
pub mod paths;
pub mod specimen_cache;

pub use asset_fetcher::HttpAssetFetcher;
pub use config_service::ConfigService;
pub use paths::{MatrixPaths, PathError};
pub use specimen_cache::{MemorySpecimenCache, SessionDirSpecimenCache};
