use std::env;

use crate::{DeployError, DeployResult};

/// Region used when nothing else is configured
pub const DEFAULT_REGION: &str = "us-west-2";

pub const REGION_ENV: &str = "DEPLOY_S3_REGION";
pub const ENDPOINT_URL_ENV: &str = "DEPLOY_S3_ENDPOINT_URL";
pub const FORCE_PATH_STYLE_ENV: &str = "DEPLOY_S3_FORCE_PATH_STYLE";

/// Connection settings for the S3 client.
///
/// Credentials are deliberately absent; the AWS default provider chain
/// picks them up from the environment, a profile or an instance role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct S3Config {
    pub region: String,

    /// Custom endpoint for S3-compatible services (MinIO, RustFS, ...)
    pub endpoint_url: Option<String>,

    /// Explicit addressing choice; `None` means path style exactly when
    /// an endpoint is set
    pub force_path_style: Option<bool>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            force_path_style: None,
        }
    }
}

impl S3Config {
    /// Create a new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from `DEPLOY_S3_*` environment variables
    pub fn from_env() -> DeployResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key/value source; split out so tests need not touch the process environment
    pub fn from_lookup<F>(lookup: F) -> DeployResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(region) = non_empty(lookup(REGION_ENV)) {
            config.region = region;
        }
        if let Some(endpoint) = non_empty(lookup(ENDPOINT_URL_ENV)) {
            config = config.with_endpoint_url(endpoint);
        }
        if let Some(raw) = non_empty(lookup(FORCE_PATH_STYLE_ENV)) {
            config.force_path_style = Some(parse_bool(FORCE_PATH_STYLE_ENV, &raw)?);
        }

        Ok(config)
    }

    /// Set the region
    pub fn with_region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = region.into();
        self
    }

    /// Point at a custom endpoint; leaves an explicit path-style choice alone
    pub fn with_endpoint_url<S: Into<String>>(mut self, endpoint_url: S) -> Self {
        let endpoint_url = endpoint_url.into();
        self.endpoint_url = Some(endpoint_url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = Some(force_path_style);
        self
    }

    /// Whether `<endpoint>/<bucket>/<key>` addressing is in effect
    pub fn path_style(&self) -> bool {
        self.force_path_style.unwrap_or(self.endpoint_url.is_some())
    }

    /// Public URL of an object, mirroring the addressing style in use
    pub fn object_url(&self, bucket: &str, key: &str) -> String {
        match (&self.endpoint_url, self.path_style()) {
            (Some(endpoint), true) => format!("{}/{}/{}", endpoint, bucket, key),
            (Some(endpoint), false) => match endpoint.split_once("://") {
                Some((scheme, host)) => format!("{}://{}.{}/{}", scheme, bucket, host, key),
                None => format!("{}.{}/{}", bucket, endpoint, key),
            },
            (None, true) => format!("https://s3.{}.amazonaws.com/{}/{}", self.region, bucket, key),
            (None, false) => format!("https://{}.s3.{}.amazonaws.com/{}", bucket, self.region, key),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_bool(key: &str, raw: &str) -> DeployResult<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(DeployError::config(format!(
            "{} must be true or false, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_us_west_2() {
        let config = S3Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, S3Config::default());
        assert_eq!(config.region, "us-west-2");
        assert_eq!(
            config.object_url("assets", "build/7/index.html"),
            "https://assets.s3.us-west-2.amazonaws.com/build/7/index.html"
        );
    }

    #[test]
    fn endpoint_enables_path_style() {
        let config = S3Config::from_lookup(lookup(&[
            (REGION_ENV, "eu-central-1"),
            (ENDPOINT_URL_ENV, "http://localhost:9000/"),
        ]))
        .unwrap();

        assert_eq!(config.region, "eu-central-1");
        assert!(config.path_style());
        assert_eq!(
            config.object_url("assets", "build/7/a.js"),
            "http://localhost:9000/assets/build/7/a.js"
        );
    }

    #[test]
    fn path_style_can_be_turned_off_explicitly() {
        let config = S3Config::from_lookup(lookup(&[
            (ENDPOINT_URL_ENV, "https://minio.internal"),
            (FORCE_PATH_STYLE_ENV, "false"),
        ]))
        .unwrap();
        assert!(!config.path_style());
        assert_eq!(
            config.object_url("assets", "build/7/a.js"),
            "https://assets.minio.internal/build/7/a.js"
        );
    }

    #[test]
    fn later_endpoint_keeps_explicit_path_style() {
        let config = S3Config::new()
            .with_path_style(false)
            .with_endpoint_url("https://other.internal:9000");
        assert_eq!(config.force_path_style, Some(false));
        assert!(!config.path_style());
        assert_eq!(
            config.object_url("assets", "envs/qa/index.html"),
            "https://assets.other.internal:9000/envs/qa/index.html"
        );
    }

    #[test]
    fn invalid_bool_is_a_config_error() {
        let err = S3Config::from_lookup(lookup(&[(FORCE_PATH_STYLE_ENV, "sometimes")])).unwrap_err();
        assert!(matches!(err, DeployError::Config { .. }));
    }
}
