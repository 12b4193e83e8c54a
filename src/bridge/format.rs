// In: src/bridge/format.rs

//! Output naming and the public result types of a collection request.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::recipes::AssetType;

/// `<repo_id>_<unix_ts>_<asset>.json`, lowercased.
pub fn output_file_name(repo_id: &str, asset: AssetType, unix_ts: i64) -> String {
    format!("{}_{}_{}.json", repo_id, unix_ts, asset).to_lowercase()
}

/// What a completed request produced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub asset: AssetType,
    pub docs_written: usize,
    pub chunks: usize,
    pub out_file: PathBuf,
}

/// The result of a request that did not fail.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "outcome", content = "summary", rename_all = "snake_case")]
pub enum CollectOutcome {
    Completed(Summary),
    /// No well matched. No output file exists.
    NoResults,
}

impl CollectOutcome {
    pub fn summary(&self) -> Option<&Summary> {
        match self {
            CollectOutcome::Completed(summary) => Some(summary),
            CollectOutcome::NoResults => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_output_file_name_is_lowercase() {
        assert_eq!(
            output_file_name("Stratton_Field", AssetType::VectorLog, 1_700_000_000),
            "stratton_field_1700000000_vector_log.json"
        );
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = CollectOutcome::Completed(Summary {
            asset: AssetType::Dst,
            docs_written: 3,
            chunks: 1,
            out_file: PathBuf::from("/depot/a_1_dst.json"),
        });
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "outcome": "completed",
                "summary": {"asset": "dst", "docs_written": 3, "chunks": 1, "out_file": "/depot/a_1_dst.json"}
            })
        );
        assert_eq!(serde_json::to_value(CollectOutcome::NoResults).unwrap(), json!({"outcome": "no_results"}));
    }
}
