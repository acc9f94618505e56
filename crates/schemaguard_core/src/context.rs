//! Validation context.
//!
//! Describes the dataset being validated for logging and reporting. It never
//! changes validation semantics.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Context describing a validation run.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Kind of dataset, e.g. `train` or `test`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset_kind: Option<String>,

    /// Free-form metadata, e.g. the source file
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

impl ValidationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the dataset kind.
    pub fn with_dataset_kind(mut self, kind: impl Into<String>) -> Self {
        self.dataset_kind = Some(kind.into());
        self
    }

    /// Adds metadata to the context.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let context = ValidationContext::new()
            .with_dataset_kind("train")
            .with_metadata("source_file", "train_FD001.txt");

        assert_eq!(context.dataset_kind.as_deref(), Some("train"));
        assert_eq!(
            context.metadata.get("source_file").map(String::as_str),
            Some("train_FD001.txt")
        );
    }
}
