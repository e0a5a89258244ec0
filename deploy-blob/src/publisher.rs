use bytes::Bytes;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    classify, BuildTarget, DeployError, DeployResult, FileFailure, FileSpec, ObjectStore,
    PutObject, UploadOutcome, Visibility,
};

/// Uploads a set of local files under `build/<buildNumber>/`
pub struct BuildPublisher {
    store: Arc<dyn ObjectStore>,
}

impl BuildPublisher {
    /// Create a publisher that owns its store
    pub fn new<S: ObjectStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a publisher sharing a store with other components
    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload every file concurrently and wait for all of them to settle.
    ///
    /// One failing file never cancels the others. Outcomes come back in
    /// input order. If any file failed, the whole batch fails with
    /// [`DeployError::Publish`] listing every failure.
    pub async fn publish(
        &self,
        target: &BuildTarget,
        files: Vec<FileSpec>,
    ) -> DeployResult<Vec<UploadOutcome>> {
        let total = files.len();
        info!(
            "Uploading {} files to {}/{}",
            total,
            target.bucket,
            target.prefix()
        );

        let uploads = files.into_iter().map(|spec| self.upload_file(target, spec));
        let settled = join_all(uploads).await;

        let mut outcomes = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for result in settled {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(failure) => failures.push(failure),
            }
        }

        if !failures.is_empty() {
            error!(
                "Failed to upload build files: {} of {} failed",
                failures.len(),
                total
            );
            return Err(DeployError::Publish { total, failures });
        }

        Ok(outcomes)
    }

    async fn upload_file(
        &self,
        target: &BuildTarget,
        spec: FileSpec,
    ) -> Result<UploadOutcome, FileFailure> {
        let FileSpec {
            file_name,
            file_path,
        } = spec;

        let body = match tokio::fs::read(&file_path).await {
            Ok(body) => Bytes::from(body),
            Err(source) => {
                let err = DeployError::LocalRead {
                    file_name: file_name.clone(),
                    path: file_path,
                    source,
                };
                error!("failed to upload: {}: {}", file_name, err);
                return Err(FileFailure::new(file_name, err));
            }
        };

        let classification = classify(&file_name);
        let key = target.object_key(&file_name);
        let size_bytes = body.len() as u64;

        let request = PutObject {
            bucket: target.bucket.clone(),
            key: key.clone(),
            body,
            content_type: classification.content_type.clone(),
            cache_control: classification.cache_control(),
            visibility: Visibility::PublicRead,
        };

        match self.store.put(request).await {
            Ok(put) => {
                info!("uploaded: {} -> {}", file_name, put.location);
                Ok(UploadOutcome::from_put(
                    file_name,
                    key,
                    classification.content_type,
                    classification.cache_policy,
                    size_bytes,
                    put,
                ))
            }
            Err(err) => {
                error!("failed to upload: {}: {}", file_name, err);
                Err(FileFailure::new(file_name, err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CachePolicy, MemoryObjectStore};

    #[tokio::test]
    async fn uploads_with_classified_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        std::fs::write(dir.path().join("app.css"), "body{}").unwrap();

        let store = MemoryObjectStore::new();
        let publisher = BuildPublisher::new(store.clone());
        let target = BuildTarget::new("assets", 12u64);
        let files = vec![
            FileSpec::new("index.html", dir.path().join("index.html")),
            FileSpec::new("app.css", dir.path().join("app.css")),
        ];

        let outcomes = publisher.publish(&target, files).await.unwrap();

        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].key, "build/12/index.html");
        assert_eq!(outcomes[0].cache_policy, CachePolicy::Short);
        assert_eq!(outcomes[0].size_bytes, 13);
        assert_eq!(outcomes[1].key, "build/12/app.css");
        assert_eq!(outcomes[1].cache_policy, CachePolicy::Long);

        let css = store.object("assets", "build/12/app.css").await.unwrap();
        assert_eq!(css.content_type, "text/css");
        assert_eq!(css.cache_control, "max-age=86400");
        assert_eq!(css.visibility, Visibility::PublicRead);
    }

    #[tokio::test]
    async fn empty_file_set_succeeds() {
        let publisher = BuildPublisher::new(MemoryObjectStore::new());
        let outcomes = publisher
            .publish(&BuildTarget::new("assets", 1u64), Vec::new())
            .await
            .unwrap();
        assert!(outcomes.is_empty());
    }
}
