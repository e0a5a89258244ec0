use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use deploy_blob::{
    list_directory, BuildPublisher, BuildTarget, EnvironmentPromoter, EnvironmentTarget,
    ObjectStore, S3ObjectStore,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{BuildArgs, Cli, Command, DeployArgs};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = cli.s3.resolve()?;
    info!("Using S3 region {}", config.region);
    let store: Arc<dyn ObjectStore> = Arc::new(S3ObjectStore::new(config).await);

    match cli.command {
        Command::Build(args) => build(store, args).await,
        Command::Deploy(args) => deploy(store, args).await,
    }
}

async fn build(store: Arc<dyn ObjectStore>, args: BuildArgs) -> Result<()> {
    let files = list_directory(&args.directory)
        .await
        .with_context(|| format!("cannot list {}", args.directory.display()))?;

    let target = BuildTarget::new(args.bucket, args.build_number);
    BuildPublisher::with_store(store)
        .publish(&target, files)
        .await?;

    info!("Successfully uploaded all build files");
    Ok(())
}

async fn deploy(store: Arc<dyn ObjectStore>, args: DeployArgs) -> Result<()> {
    let target = EnvironmentTarget::new(args.bucket, args.build_number, args.environment);
    EnvironmentPromoter::with_store(store)
        .promote(&target)
        .await?;
    Ok(())
}
