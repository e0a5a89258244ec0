use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream as AwsByteStream;
use aws_sdk_s3::types::{MetadataDirective as AwsMetadataDirective, ObjectCannedAcl};
use aws_sdk_s3::Client;
use tracing::debug;

use crate::error::BoxError;
use crate::{
    CopyObject, CopyResult, DeployError, DeployResult, MetadataDirective, ObjectStore, PutObject,
    PutResult, S3Config, Visibility,
};

/// SDK error flattened into a readable message, original kept as source
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
struct S3Failure {
    message: String,
    #[source]
    source: BoxError,
}

impl S3Failure {
    fn new<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: DisplayErrorContext(&error).to_string(),
            source: Box::new(error),
        }
    }
}

/// Object store backed by Amazon S3 or any S3-compatible service
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    config: S3Config,
}

impl S3ObjectStore {
    /// Build a client from the given config and the ambient AWS credentials
    pub async fn new(config: S3Config) -> Self {
        let client = Self::create_client(&config).await;
        Self { client, config }
    }

    /// Build from `DEPLOY_S3_*` environment variables
    pub async fn from_env() -> DeployResult<Self> {
        Ok(Self::new(S3Config::from_env()?).await)
    }

    /// Wrap an existing client
    pub fn with_client(client: Client, config: S3Config) -> Self {
        Self { client, config }
    }

    async fn create_client(config: &S3Config) -> Client {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint.clone());
        }

        let aws_config = loader.load().await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(config.path_style())
                .build(),
        )
    }

    pub fn config(&self) -> &S3Config {
        &self.config
    }

    fn canned_acl(visibility: Visibility) -> ObjectCannedAcl {
        match visibility {
            Visibility::PublicRead => ObjectCannedAcl::PublicRead,
        }
    }

    fn metadata_directive(directive: MetadataDirective) -> AwsMetadataDirective {
        match directive {
            MetadataDirective::Copy => AwsMetadataDirective::Copy,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, request: PutObject) -> DeployResult<PutResult> {
        debug!(
            "PutObject s3://{}/{} ({}, {}, {} bytes)",
            request.bucket,
            request.key,
            request.content_type,
            request.cache_control,
            request.body.len()
        );

        let result = self
            .client
            .put_object()
            .bucket(&request.bucket)
            .key(&request.key)
            .body(AwsByteStream::from(request.body))
            .content_type(request.content_type)
            .cache_control(request.cache_control)
            .acl(Self::canned_acl(request.visibility))
            .send()
            .await
            .map_err(|e| DeployError::remote_write(&request.key, S3Failure::new(e)))?;

        Ok(PutResult {
            location: self.config.object_url(&request.bucket, &request.key),
            etag: result.e_tag,
        })
    }

    async fn copy(&self, request: CopyObject) -> DeployResult<CopyResult> {
        debug!(
            "CopyObject s3://{} -> s3://{}/{} ({})",
            request.copy_source(),
            request.bucket,
            request.dest_key,
            request.metadata_directive.as_str()
        );

        let result = self
            .client
            .copy_object()
            .bucket(&request.bucket)
            .copy_source(request.copy_source())
            .key(&request.dest_key)
            .metadata_directive(Self::metadata_directive(request.metadata_directive))
            .acl(Self::canned_acl(request.visibility))
            .send()
            .await
            .map_err(|e| {
                DeployError::remote_copy(&request.source_key, &request.dest_key, S3Failure::new(e))
            })?;

        let copied = result.copy_object_result();
        Ok(CopyResult {
            etag: copied.and_then(|r| r.e_tag()).map(str::to_string),
            last_modified: copied.and_then(|r| r.last_modified()).map(|dt| dt.secs()),
        })
    }
}
