use async_trait::async_trait;
use serde::Serialize;

use crate::{CopyObject, DeployResult, PutObject};

/// Remote object storage used by the publisher and the promoter.
///
/// Each call succeeds or fails on its own; implementations report failures
/// as [`crate::DeployError::RemoteWrite`] and [`crate::DeployError::RemoteCopy`]
/// and do not retry.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write an object, silently replacing any object already at the key
    async fn put(&self, request: PutObject) -> DeployResult<PutResult>;

    /// Server-side copy of an object inside the request's bucket
    async fn copy(&self, request: CopyObject) -> DeployResult<CopyResult>;
}

/// Result of a successful put
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutResult {
    /// Where the object can be fetched from
    pub location: String,
    pub etag: Option<String>,
}

/// Result of a successful copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyResult {
    pub etag: Option<String>,
    /// Seconds since the Unix epoch
    pub last_modified: Option<i64>,
}
