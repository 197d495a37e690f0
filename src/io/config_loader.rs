//! Configuration snapshot loading
//!
//! The snapshot is a JSON document (see [`ConfigSnapshot`]); it is read once
//! and resolved into a [`Catalog`].

use crate::core::catalog::Catalog;
use crate::types::{ConfigError, ConfigSnapshot};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Resolve a snapshot from JSON text
///
/// # Errors
///
/// Returns `ConfigError::Parse` for malformed JSON, or the catalog's own
/// errors (duplicate aliases, unknown keywords, negative commission).
pub fn parse_config(json: &str) -> Result<Catalog, ConfigError> {
    let snapshot: ConfigSnapshot = serde_json::from_str(json)?;
    Catalog::from_snapshot(snapshot)
}

/// Read and resolve a snapshot file
///
/// # Errors
///
/// Returns `ConfigError::Read` if the file cannot be read, otherwise the
/// errors of [`parse_config`].
pub fn load_config(path: &Path) -> Result<Catalog, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = parse_config(&json)?;
    debug!(
        path = %path.display(),
        bet_types = catalog.rules().rules().len(),
        "config loaded"
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::fixtures::SNAPSHOT;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let catalog = load_config(file.path()).unwrap();
        assert!(catalog.rule("dd").is_some());
        assert!(catalog.station(1).is_some());
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("does/not/exist.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            parse_config("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_duplicate_alias() {
        let json = r#"{"bet_types": [
            {"id": 1, "name": "A", "aliases": ["dd"], "digit_rules": [2], "applicable_regions": ["south"], "payout_rate": 75},
            {"id": 2, "name": "B", "aliases": ["DD"], "digit_rules": [2], "applicable_regions": ["south"], "payout_rate": 75}
        ]}"#;
        assert!(matches!(
            parse_config(json),
            Err(ConfigError::DuplicateAlias { .. })
        ));
    }
}
