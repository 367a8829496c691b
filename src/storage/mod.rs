//! Dataset loading.
//!
//! The whole collection is read and parsed once; everything downstream
//! works on the resident [`Dataset`].

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Dataset;

/// Errors that can occur while loading the dataset.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Parse a `{ "tournaments": [...] }` document.
///
/// A missing or null `tournaments` collection is rejected.
pub fn parse_dataset(contents: &str) -> Result<Dataset, StorageError> {
    let dataset: Dataset = serde_json::from_str(contents)?;

    let unfinished = dataset
        .tournaments
        .iter()
        .filter(|t| !t.has_participants())
        .count();
    if unfinished > 0 {
        debug!("{} tournaments have no participants yet", unfinished);
    }

    Ok(dataset)
}

/// Read and parse the dataset file at `path`.
pub fn read_dataset(path: &Path) -> Result<Dataset, StorageError> {
    if !path.exists() {
        return Err(StorageError::PathNotFound(path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(path)?;
    let dataset = parse_dataset(&contents)?;

    if dataset.is_empty() {
        warn!("Dataset {} contains no tournaments", path.display());
    }
    info!(
        "Loaded {} tournaments from {}",
        dataset.tournaments.len(),
        path.display()
    );

    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const SAMPLE: &str = r#"{
        "tournaments": [
            {
                "year": "2014",
                "champion": "A",
                "total_participants": 16,
                "brackets": {
                    "west": {
                        "quarters": [
                            { "west_quarters_pos_1": "A", "west_quarters_pos_2": "B", "winner": "A", "score": "5-3", "round": "quarters" }
                        ]
                    },
                    "east": {},
                    "finals": []
                }
            },
            { "year": "2015", "champion": null, "total_participants": 0 }
        ]
    }"#;

    #[test]
    fn test_parse_dataset() {
        let dataset = parse_dataset(SAMPLE).unwrap();
        assert_eq!(dataset.tournaments.len(), 2);
        assert_eq!(dataset.tournaments[0].champion.as_deref(), Some("A"));
        assert_eq!(dataset.tournaments[0].brackets.west.quarters.len(), 1);
        assert_eq!(dataset.tournaments[1].champion, None);
    }

    #[test]
    fn test_parse_rejects_missing_collection() {
        assert!(matches!(parse_dataset("{}"), Err(StorageError::Json(_))));
        assert!(matches!(
            parse_dataset(r#"{ "tournaments": null }"#),
            Err(StorageError::Json(_))
        ));
    }

    #[test]
    fn test_parse_empty_collection() {
        let dataset = parse_dataset(r#"{ "tournaments": [] }"#).unwrap();
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_read_dataset_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let dataset = read_dataset(file.path()).unwrap();
        assert_eq!(dataset.years(), vec!["2014", "2015"]);
    }

    #[test]
    fn test_read_dataset_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            read_dataset(&path),
            Err(StorageError::PathNotFound(p)) if p == path
        ));
    }

    #[test]
    fn test_read_dataset_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(
            read_dataset(file.path()),
            Err(StorageError::Json(_))
        ));
    }
}
