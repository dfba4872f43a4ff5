use crate::state::JobRecord;
use std::collections::HashSet;

/// URLs already collected, in this run or a persisted earlier one
#[derive(Debug, Clone, Default)]
pub struct SeenUrls {
    urls: HashSet<String>,
}

impl SeenUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the set from previously persisted records
    pub fn from_records(records: &[JobRecord]) -> Self {
        Self {
            urls: records.iter().map(|r| r.url.clone()).collect(),
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    /// Inserts a URL; returns false if it was already present
    pub fn add(&mut self, url: &str) -> bool {
        self.urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_from_records() {
        let records = vec![
            JobRecord {
                url: "https://a.example/1".to_string(),
                ..JobRecord::default()
            },
            JobRecord {
                url: "https://a.example/2".to_string(),
                ..JobRecord::default()
            },
        ];
        let seen = SeenUrls::from_records(&records);
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("https://a.example/1"));
        assert!(!seen.contains("https://a.example/3"));
    }

    #[test]
    fn test_add_reports_duplicates() {
        let mut seen = SeenUrls::new();
        assert!(seen.is_empty());
        assert!(seen.add("https://a.example/1"));
        assert!(!seen.add("https://a.example/1"));
        assert_eq!(seen.len(), 1);
    }
}
