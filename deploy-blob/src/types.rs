use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

use crate::{DeployError, DeployResult};

/// Root of every uploaded build
pub const BUILD_PREFIX: &str = "build";

/// Root of every promoted environment
pub const ENV_PREFIX: &str = "envs";

/// One local file to publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    /// Bare name, used verbatim as the last segment of the remote key
    pub file_name: String,
    /// Absolute local path the bytes are read from
    pub file_path: PathBuf,
}

impl FileSpec {
    pub fn new<S: Into<String>, P: Into<PathBuf>>(file_name: S, file_path: P) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: file_path.into(),
        }
    }
}

/// Identifier of a single build, unique per release
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildNumber(String);

impl BuildNumber {
    /// Parse and validate a build identifier
    pub fn parse<S: Into<String>>(value: S) -> DeployResult<Self> {
        let value = value.into();
        validate_segment("build number", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u64> for BuildNumber {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl FromStr for BuildNumber {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for BuildNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name of a deployment environment, e.g. "staging" or "prod"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Environment(String);

impl Environment {
    pub fn parse<S: Into<String>>(value: S) -> DeployResult<Self> {
        let value = value.into();
        validate_segment("environment", &value)?;
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Environment {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value that becomes exactly one segment of an object key.
fn validate_segment(what: &str, value: &str) -> DeployResult<()> {
    if value.is_empty() {
        return Err(DeployError::invalid(format!("{} must not be empty", what)));
    }
    if value == "." || value == ".." || value.contains('/') || value.contains('\\') {
        return Err(DeployError::invalid(format!(
            "{} '{}' must be a single path segment",
            what, value
        )));
    }
    if value.chars().any(|c| c.is_control() || c.is_whitespace()) {
        return Err(DeployError::invalid(format!(
            "{} '{}' contains whitespace or control characters",
            what, value
        )));
    }
    Ok(())
}

/// Remote namespace `build/<buildNumber>/` inside a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub bucket: String,
    pub build_number: BuildNumber,
}

impl BuildTarget {
    pub fn new<S: Into<String>, B: Into<BuildNumber>>(bucket: S, build_number: B) -> Self {
        Self {
            bucket: bucket.into(),
            build_number: build_number.into(),
        }
    }

    /// `build/<buildNumber>`
    pub fn prefix(&self) -> String {
        build_prefix(&self.build_number)
    }

    /// Key of an uploaded file; the name is not escaped
    pub fn object_key(&self, file_name: &str) -> String {
        format!("{}/{}", self.prefix(), file_name)
    }
}

/// Promotion source `build/<buildNumber>/` and destination `envs/<environment>/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentTarget {
    pub bucket: String,
    pub build_number: BuildNumber,
    pub environment: Environment,
}

impl EnvironmentTarget {
    pub fn new<S, B>(bucket: S, build_number: B, environment: Environment) -> Self
    where
        S: Into<String>,
        B: Into<BuildNumber>,
    {
        Self {
            bucket: bucket.into(),
            build_number: build_number.into(),
            environment,
        }
    }

    pub fn source_key(&self, source_name: &str) -> String {
        format!("{}/{}", build_prefix(&self.build_number), source_name)
    }

    pub fn destination_key(&self, destination_name: &str) -> String {
        format!("{}/{}/{}", ENV_PREFIX, self.environment, destination_name)
    }
}

fn build_prefix(build_number: &BuildNumber) -> String {
    format!("{}/{}", BUILD_PREFIX, build_number)
}

/// Canned ACL applied to every written object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    #[serde(rename = "public-read")]
    PublicRead,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PublicRead => "public-read",
        }
    }
}

/// How a copy treats the source object's metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetadataDirective {
    /// Destination inherits content type and cache control from the source
    #[serde(rename = "COPY")]
    Copy,
}

impl MetadataDirective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Copy => "COPY",
        }
    }
}

/// A single object write
#[derive(Debug, Clone)]
pub struct PutObject {
    pub bucket: String,
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
    pub cache_control: String,
    pub visibility: Visibility,
}

/// A server-side copy inside one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyObject {
    pub bucket: String,
    pub source_key: String,
    pub dest_key: String,
    pub metadata_directive: MetadataDirective,
    pub visibility: Visibility,
}

impl CopyObject {
    /// `<bucket>/<sourceKey>`, the form S3 expects for the copy source
    pub fn copy_source(&self) -> String {
        format!("{}/{}", self.bucket, self.source_key)
    }
}
