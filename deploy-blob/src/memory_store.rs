use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{
    CopyObject, CopyResult, DeployError, DeployResult, MetadataDirective, ObjectStore, PutObject,
    PutResult, Visibility,
};

/// Object held by [`MemoryObjectStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: String,
    pub visibility: Visibility,
    pub etag: String,
}

type Buckets = HashMap<String, BTreeMap<String, StoredObject>>;

/// In-process object store with S3 put/copy semantics
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    buckets: Arc<RwLock<Buckets>>,
    generation: Arc<AtomicU64>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored object
    pub async fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        let buckets = self.buckets.read().await;
        buckets.get(bucket).and_then(|objects| objects.get(key)).cloned()
    }

    /// All keys in a bucket, sorted
    pub async fn keys(&self, bucket: &str) -> Vec<String> {
        let buckets = self.buckets.read().await;
        buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn next_etag(&self) -> String {
        let generation = self.generation.fetch_add(1, Ordering::Relaxed) + 1;
        format!("\"{:016x}\"", generation)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, request: PutObject) -> DeployResult<PutResult> {
        let etag = self.next_etag();
        let object = StoredObject {
            body: request.body,
            content_type: request.content_type,
            cache_control: request.cache_control,
            visibility: request.visibility,
            etag: etag.clone(),
        };

        let mut buckets = self.buckets.write().await;
        buckets
            .entry(request.bucket.clone())
            .or_default()
            .insert(request.key.clone(), object);

        Ok(PutResult {
            location: format!("memory://{}/{}", request.bucket, request.key),
            etag: Some(etag),
        })
    }

    async fn copy(&self, request: CopyObject) -> DeployResult<CopyResult> {
        let etag = self.next_etag();
        let mut buckets = self.buckets.write().await;
        let objects = buckets.entry(request.bucket.clone()).or_default();

        let source = objects.get(&request.source_key).cloned().ok_or_else(|| {
            let missing = std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("NoSuchKey: {}", request.copy_source()),
            );
            DeployError::remote_copy(&request.source_key, &request.dest_key, missing)
        })?;

        let copied = match request.metadata_directive {
            MetadataDirective::Copy => StoredObject {
                visibility: request.visibility,
                etag: etag.clone(),
                ..source
            },
        };
        objects.insert(request.dest_key.clone(), copied);

        Ok(CopyResult {
            etag: Some(etag),
            last_modified: None,
        })
    }
}
