use clap::{Args, Parser, Subcommand};
use deploy_blob::{BuildNumber, DeployResult, Environment, S3Config};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "deploy-cli", version, about = "Publish static builds and promote them into environments")]
pub struct Cli {
    #[command(flatten)]
    pub s3: S3Args,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upload static assets to a build path
    Build(BuildArgs),
    /// Deploy built assets to an environment path
    Deploy(DeployArgs),
}

/// Overrides for the `DEPLOY_S3_*` environment
#[derive(Args, Debug, Clone)]
pub struct S3Args {
    /// AWS region of the bucket [default: us-west-2]
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Endpoint of an S3-compatible service
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,
}

impl S3Args {
    pub fn resolve(&self) -> DeployResult<S3Config> {
        Ok(self.apply(S3Config::from_env()?))
    }

    /// Layer the flags over an already loaded config
    pub fn apply(&self, mut config: S3Config) -> S3Config {
        if let Some(region) = &self.region {
            config = config.with_region(region.clone());
        }
        if let Some(endpoint) = &self.endpoint_url {
            config = config.with_endpoint_url(endpoint.clone());
        }
        config
    }
}

#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    /// Bucket name for assets to be stored
    #[arg(short = 'b', long = "bucket", value_name = "BUCKET_NAME")]
    pub bucket: String,

    /// Build number used in the bucket path
    #[arg(short = 'B', long = "build-number")]
    pub build_number: BuildNumber,

    /// Directory with static assets
    #[arg(short = 'd', long = "directory", default_value = "dist")]
    pub directory: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Bucket name the build was uploaded to
    #[arg(short = 'b', long = "bucket", value_name = "BUCKET_NAME")]
    pub bucket: String,

    /// Build number used to copy assets
    #[arg(short = 'B', long = "build-number")]
    pub build_number: BuildNumber,

    /// Environment path to deploy the build to
    #[arg(short = 'e', long = "environment", value_name = "ENV")]
    pub environment: Environment,
}

#[cfg(test)]
mod tests {
    use super::*;
    use deploy_blob::{ENDPOINT_URL_ENV, FORCE_PATH_STYLE_ENV};

    #[test]
    fn build_defaults_directory_to_dist() {
        let cli = Cli::try_parse_from(["deploy-cli", "build", "-b", "assets", "-B", "118"]).unwrap();
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.bucket, "assets");
                assert_eq!(args.build_number, BuildNumber::from(118u64));
                assert_eq!(args.directory, PathBuf::from("dist"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn deploy_takes_long_flags() {
        let cli = Cli::try_parse_from([
            "deploy-cli",
            "deploy",
            "--bucket",
            "assets",
            "--build-number",
            "7",
            "--environment",
            "staging",
            "--region",
            "eu-west-1",
        ])
        .unwrap();

        assert_eq!(cli.s3.region.as_deref(), Some("eu-west-1"));
        match cli.command {
            Command::Deploy(args) => {
                assert_eq!(args.build_number.as_str(), "7");
                assert_eq!(args.environment.as_str(), "staging");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn required_flags_are_enforced() {
        assert!(Cli::try_parse_from(["deploy-cli", "deploy", "-b", "assets", "-B", "7"]).is_err());
        assert!(Cli::try_parse_from(["deploy-cli", "build", "-B", "7"]).is_err());
    }

    #[test]
    fn unsafe_environment_is_rejected() {
        let parsed = Cli::try_parse_from([
            "deploy-cli", "deploy", "-b", "assets", "-B", "7", "-e", "../prod",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn endpoint_flag_keeps_env_path_style() {
        let env = S3Config::from_lookup(|key| match key {
            ENDPOINT_URL_ENV => Some("http://env:9000".to_string()),
            FORCE_PATH_STYLE_ENV => Some("false".to_string()),
            _ => None,
        })
        .unwrap();
        let cli = Cli::try_parse_from([
            "deploy-cli",
            "--endpoint-url",
            "http://flag:9000",
            "deploy",
            "-b",
            "assets",
            "-B",
            "7",
            "-e",
            "qa",
        ])
        .unwrap();

        let config = cli.s3.apply(env);
        assert_eq!(config.endpoint_url.as_deref(), Some("http://flag:9000"));
        assert!(!config.path_style());
    }

    #[test]
    fn endpoint_flag_defaults_to_path_style() {
        let cli = Cli::try_parse_from([
            "deploy-cli", "build", "-b", "assets", "-B", "7", "--endpoint-url", "http://flag:9000",
        ])
        .unwrap();
        assert!(cli.s3.apply(S3Config::default()).path_style());
    }
}
