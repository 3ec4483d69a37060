use anyhow::{Context, Result};
use serde::Deserialize;

/// A platform build manifest. Only the revision identifier is read; all
/// other manifest fields are ignored.
///
/// The iOS and Android manifests for one build carry the same
/// `revisionId`, so either may be used as the release version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub revision_id: String,
}

impl Manifest {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest file: {path}"))?;
        let manifest = serde_json::from_str::<Self>(&text)
            .with_context(|| format!("failed to parse JSON manifest: {path}"))?;
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_revision_id_and_ignores_the_rest() {
        let manifest: Manifest = serde_json::from_str(
            r#"{
                "name": "mobile-app",
                "revisionId": "12.0.0-r.h4x0r",
                "sdkVersion": "42.0.0",
                "platforms": ["ios", "android"]
            }"#,
        )
        .expect("manifest fixture should parse");

        assert_eq!(manifest.revision_id, "12.0.0-r.h4x0r");
    }

    #[test]
    fn missing_revision_id_is_an_error() {
        let result = serde_json::from_str::<Manifest>(r#"{"name": "mobile-app"}"#);
        assert!(result.is_err());
    }
}
