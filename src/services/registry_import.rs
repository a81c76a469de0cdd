use std::fs;
use std::path::{Path, PathBuf};

use sea_orm::DatabaseConnection;

use crate::error::{AppError, AppResult};
use crate::models::RegistrySpec;
use crate::repositories::RegistryRepository;

/// Import registry connector specs from a directory tree of `.json`, `.yaml`
/// and `.yml` files and upsert them into the registry table. Returns the
/// number of specs imported. Specs without an id are skipped.
pub async fn import_from_dir(db: &DatabaseConnection, dir: &str) -> AppResult<usize> {
    let mut files = Vec::new();
    collect_spec_files(Path::new(dir), &mut files)?;

    let mut imported = 0;
    for path in files {
        let contents = fs::read_to_string(&path)
            .map_err(|e| AppError::Internal(format!("read {}: {}", path.display(), e)))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let spec = parse_spec(&ext, &contents)
            .map_err(|e| AppError::Validation(format!("{}: {}", path.display(), e)))?;
        if spec.id.trim().is_empty() {
            continue;
        }
        RegistryRepository::upsert(db, &spec).await?;
        imported += 1;
    }

    if imported > 0 {
        tracing::info!("imported {} registry connectors from {}", imported, dir);
    }
    Ok(imported)
}

fn collect_spec_files(dir: &Path, out: &mut Vec<PathBuf>) -> AppResult<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::Internal(format!("read dir {}: {}", dir.display(), e)))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| AppError::Internal(format!("read dir {}: {}", dir.display(), e)))?;
        let path = entry.path();
        if path.is_dir() {
            collect_spec_files(&path, out)?;
            continue;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if matches!(ext.to_ascii_lowercase().as_str(), "json" | "yaml" | "yml") => {
                out.push(path);
            }
            _ => {}
        }
    }
    Ok(())
}

fn parse_spec(ext: &str, contents: &str) -> Result<RegistrySpec, String> {
    match ext {
        "json" => serde_json::from_str(contents).map_err(|e| e.to_string()),
        _ => serde_yaml::from_str(contents).map_err(|e| e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yaml_spec() {
        let spec = parse_spec(
            "yaml",
            r#"
id: shopfront
kind: shopfront
display_name: Shopfront
category: commerce
tags: [commerce, orders]
capabilities:
  - canonical: orders.create
    mode: sync
requirements:
  secrets: [api_key]
  webhooks: []
audit_mode: none
"#,
        )
        .unwrap();
        assert_eq!(spec.id, "shopfront");
        assert_eq!(spec.capabilities[0].canonical, "orders.create");
        assert_eq!(spec.requirements.secrets, vec!["api_key"]);
    }

    #[test]
    fn parses_json_spec_with_capitalized_keys() {
        let spec = parse_spec(
            "json",
            r#"{"ID":"ledgerly","DisplayName":"Ledgerly","AuditMode":"full"}"#,
        )
        .unwrap();
        assert_eq!(spec.id, "ledgerly");
        assert_eq!(spec.audit_mode, "full");
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(parse_spec("json", "{not json").is_err());
        assert!(parse_spec("yaml", ": [").is_err());
    }
}
