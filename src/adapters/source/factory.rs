//! Requirement source factory

use crate::adapters::source::r#trait::RequirementSource;
use crate::adapters::source::snapshot::SnapshotSource;
use crate::config::SourceConfig;
use crate::domain::{ReqportError, Result};
use std::path::PathBuf;
use std::sync::Arc;

/// Create the requirement source selected by `source.kind`
///
/// # Errors
///
/// Returns a configuration error for an unknown kind, or the source's own
/// error if it cannot be opened.
pub async fn create_source(config: &SourceConfig) -> Result<Arc<dyn RequirementSource>> {
    match config.kind.as_str() {
        "snapshot" => {
            tracing::info!(path = %config.path, "Opening snapshot source");
            let source = SnapshotSource::load(
                &config.path,
                config.images_dir.as_ref().map(PathBuf::from),
                config.repository_id.clone(),
            )
            .await?;
            Ok(Arc::new(source) as Arc<dyn RequirementSource>)
        }
        other => Err(ReqportError::Configuration(format!(
            "Unsupported source kind: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_kind() {
        let config = SourceConfig {
            kind: "caliber".to_string(),
            path: "x.json".to_string(),
            images_dir: None,
            repository_id: None,
        };
        let result = create_source(&config).await;
        assert!(matches!(result, Err(ReqportError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_missing_snapshot() {
        let config = SourceConfig {
            kind: "snapshot".to_string(),
            path: "/nonexistent/reqport/snapshot.json".to_string(),
            images_dir: None,
            repository_id: None,
        };
        let result = create_source(&config).await;
        assert!(matches!(result, Err(ReqportError::Source(_))));
    }
}
