use serde::Serialize;

use crate::{CachePolicy, CopyResult, PutResult};

/// Record of one file written under a build path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub file_name: String,
    pub key: String,
    pub location: String,
    pub etag: Option<String>,
    pub content_type: String,
    pub cache_policy: CachePolicy,
    pub size_bytes: u64,
}

impl UploadOutcome {
    pub(crate) fn from_put(
        file_name: String,
        key: String,
        content_type: String,
        cache_policy: CachePolicy,
        size_bytes: u64,
        put: PutResult,
    ) -> Self {
        Self {
            file_name,
            key,
            location: put.location,
            etag: put.etag,
            content_type,
            cache_policy,
            size_bytes,
        }
    }
}

/// Record of one entry file copied into an environment path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromotionOutcome {
    pub file_name: String,
    pub source_key: String,
    pub dest_key: String,
    pub result: CopyResult,
}
