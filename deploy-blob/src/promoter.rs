use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    BuildNumber, CopyObject, DeployError, DeployResult, EnvironmentTarget, FileFailure,
    MetadataDirective, ObjectStore, PromotionOutcome, Visibility,
};

/// How a promoted file is named under `envs/<environment>/`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationName {
    /// Same name as in the build path
    Verbatim,
    /// `<stem>-<buildNumber>.<extension>`
    BuildQualified {
        stem: &'static str,
        extension: &'static str,
    },
}

/// A build output that gets copied into an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotableFile {
    pub source_name: &'static str,
    pub destination: DestinationName,
}

impl PromotableFile {
    pub fn destination_name(&self, build_number: &BuildNumber) -> String {
        match self.destination {
            DestinationName::Verbatim => self.source_name.to_string(),
            DestinationName::BuildQualified { stem, extension } => {
                format!("{}-{}.{}", stem, build_number, extension)
            }
        }
    }
}

/// The entry document and the runtime config. `config.js` keeps the build
/// number in its promoted name so several builds' configs can sit side by
/// side; only the one referenced by the promoted `index.html` is live.
pub static PROMOTABLE_FILES: [PromotableFile; 2] = [
    PromotableFile {
        source_name: "index.html",
        destination: DestinationName::Verbatim,
    },
    PromotableFile {
        source_name: "config.js",
        destination: DestinationName::BuildQualified {
            stem: "config",
            extension: "js",
        },
    },
];

/// Copies the entry files of a build into an environment path
pub struct EnvironmentPromoter {
    store: Arc<dyn ObjectStore>,
}

impl EnvironmentPromoter {
    pub fn new<S: ObjectStore + 'static>(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn with_store(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Copy every [`PROMOTABLE_FILES`] entry concurrently.
    ///
    /// A failed copy is logged and does not stop the other. Once all copies
    /// have settled, any failures are returned together as
    /// [`DeployError::Promotion`].
    pub async fn promote(&self, target: &EnvironmentTarget) -> DeployResult<Vec<PromotionOutcome>> {
        let total = PROMOTABLE_FILES.len();
        let copies = PROMOTABLE_FILES
            .iter()
            .map(|file| self.promote_file(target, file));
        let settled = join_all(copies).await;

        let mut outcomes = Vec::with_capacity(total);
        let mut failures = Vec::new();
        for result in settled {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(failure) => failures.push(failure),
            }
        }

        info!(
            "Promotion of build {} to {} settled: {} copied, {} failed",
            target.build_number,
            target.environment,
            outcomes.len(),
            failures.len()
        );

        if !failures.is_empty() {
            return Err(DeployError::Promotion { total, failures });
        }

        info!("Successfully deployed all files");
        Ok(outcomes)
    }

    async fn promote_file(
        &self,
        target: &EnvironmentTarget,
        file: &PromotableFile,
    ) -> Result<PromotionOutcome, FileFailure> {
        let request = CopyObject {
            bucket: target.bucket.clone(),
            source_key: target.source_key(file.source_name),
            dest_key: target.destination_key(&file.destination_name(&target.build_number)),
            metadata_directive: MetadataDirective::Copy,
            visibility: Visibility::PublicRead,
        };
        info!("Copying: {}", request.copy_source());

        let source_key = request.source_key.clone();
        let dest_key = request.dest_key.clone();

        match self.store.copy(request).await {
            Ok(result) => {
                let outcome = PromotionOutcome {
                    file_name: file.source_name.to_string(),
                    source_key,
                    dest_key,
                    result,
                };
                let rendered = serde_json::to_string(&outcome)
                    .unwrap_or_else(|_| outcome.dest_key.clone());
                info!("File deployed: {} {}", file.source_name, rendered);
                Ok(outcome)
            }
            Err(err) => {
                error!("failed to deploy: {}: {}", file.source_name, err);
                Err(FileFailure::new(file.source_name, err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remapping_table() {
        let build = BuildNumber::from(7u64);
        let names: Vec<(&str, String)> = PROMOTABLE_FILES
            .iter()
            .map(|f| (f.source_name, f.destination_name(&build)))
            .collect();

        assert_eq!(
            names,
            vec![
                ("index.html", "index.html".to_string()),
                ("config.js", "config-7.js".to_string()),
            ]
        );
    }

    #[test]
    fn opaque_build_numbers_are_embedded_verbatim() {
        let build = BuildNumber::parse("2024.10.3-rc1").unwrap();
        assert_eq!(PROMOTABLE_FILES[1].destination_name(&build), "config-2024.10.3-rc1.js");
    }
}
