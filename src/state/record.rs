use crate::state::Partition;
use serde::{Deserialize, Serialize};

/// One collected job posting
///
/// Field order is the column order of the persisted dataset. The aliases let
/// datasets written with the older `city` / `category` / `is_scam` headers be
/// resumed without conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub compensation: String,
    #[serde(default)]
    pub employment_type: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub post_date: String,
    #[serde(default, alias = "city")]
    pub partition_region: String,
    #[serde(default, alias = "category")]
    pub partition_category: String,
    /// Filled in later by manual annotation; the crawler always leaves it empty
    #[serde(default, alias = "is_scam")]
    pub label: String,
}

impl JobRecord {
    /// Creates an empty record for `url` tagged with its partition
    pub fn new(url: impl Into<String>, partition: &Partition) -> Self {
        Self {
            url: url.into(),
            partition_region: partition.region().to_string(),
            partition_category: partition.label().to_string(),
            ..Self::default()
        }
    }
}
