//! # deploy-blob: two-phase static asset publishing
//!
//! `deploy-blob` publishes a directory of static build artifacts to object
//! storage keyed by build number, then promotes the entry files of a chosen
//! build into an environment by server-side copy.
//!
//! ## Remote layout
//!
//! ```text
//! <bucket>/build/<buildNumber>/<fileName>              every uploaded file
//! <bucket>/envs/<environment>/index.html               promoted entry document
//! <bucket>/envs/<environment>/config-<buildNumber>.js  promoted runtime config
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use deploy_blob::prelude::*;
//!
//! # #[tokio::main]
//! # async fn main() -> DeployResult<()> {
//! # let dir = std::env::temp_dir().join("deploy-blob-doc-dist");
//! # std::fs::create_dir_all(&dir)?;
//! # std::fs::write(dir.join("index.html"), "<html></html>")?;
//! # std::fs::write(dir.join("config.js"), "window.config = {}")?;
//! let store = MemoryObjectStore::new();
//!
//! // 1. Upload everything under build/118/
//! let files = list_directory(&dir).await?;
//! let publisher = BuildPublisher::new(store.clone());
//! publisher.publish(&BuildTarget::new("assets", 118u64), files).await?;
//!
//! // 2. Point staging at build 118
//! let promoter = EnvironmentPromoter::new(store);
//! let target = EnvironmentTarget::new("assets", 118u64, Environment::parse("staging")?);
//! promoter.promote(&target).await?;
//! # Ok(())
//! # }
//! ```
//!
//! Swap [`MemoryObjectStore`] for [`S3ObjectStore`] to talk to S3 or any
//! S3-compatible service.

mod classify;
mod config;
mod error;
mod listing;
mod memory_store;
mod promoter;
mod publisher;
mod receipt;
mod s3_store;
pub mod store;
mod types;

pub use classify::{
    cache_policy_for, classify, content_type_for, CachePolicy, Classification,
    DEFAULT_CONTENT_TYPE, ENTRY_FILES,
};
pub use config::{S3Config, DEFAULT_REGION, ENDPOINT_URL_ENV, FORCE_PATH_STYLE_ENV, REGION_ENV};
pub use error::{DeployError, DeployResult, FileFailure};
pub use listing::list_directory;
pub use memory_store::{MemoryObjectStore, StoredObject};
pub use promoter::{DestinationName, EnvironmentPromoter, PromotableFile, PROMOTABLE_FILES};
pub use publisher::BuildPublisher;
pub use receipt::{PromotionOutcome, UploadOutcome};
pub use s3_store::S3ObjectStore;
pub use store::{CopyResult, ObjectStore, PutResult};
pub use types::{
    BuildNumber, BuildTarget, CopyObject, Environment, EnvironmentTarget, FileSpec,
    MetadataDirective, PutObject, Visibility, BUILD_PREFIX, ENV_PREFIX,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        list_directory, BuildNumber, BuildPublisher, BuildTarget, DeployError, DeployResult,
        Environment, EnvironmentPromoter, EnvironmentTarget, FileSpec, MemoryObjectStore,
        ObjectStore, S3Config, S3ObjectStore,
    };
}
