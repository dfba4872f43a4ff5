use crate::config::Config;
use crate::HarvestError;
use url::Url;

/// One (region, category) slice of the site
///
/// Partitions are enumerated once from the configuration and never change
/// afterwards, so their fields are only exposed through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    region: String,
    category: String,
    label: String,
    origin: Url,
    listing_url: Url,
}

impl Partition {
    /// Builds a partition from its codes and the site's URL templates
    ///
    /// # Arguments
    ///
    /// * `region` - Region code substituted into `origin_template`
    /// * `category` - Category code substituted into `listing_path`
    /// * `label` - Human-readable category label written to records
    /// * `origin_template` - e.g. `https://{region}.craigslist.org`
    /// * `listing_path` - e.g. `/search/{category}`
    pub fn new(
        region: &str,
        category: &str,
        label: &str,
        origin_template: &str,
        listing_path: &str,
    ) -> Result<Self, HarvestError> {
        let invalid = |reason: String| HarvestError::InvalidPartition {
            region: region.to_string(),
            category: category.to_string(),
            reason,
        };

        let origin = Url::parse(&origin_template.replace("{region}", region))
            .map_err(|e| invalid(format!("bad origin: {}", e)))?;
        let listing_url = origin
            .join(&listing_path.replace("{category}", category))
            .map_err(|e| invalid(format!("bad listing path: {}", e)))?;

        Ok(Self {
            region: region.to_string(),
            category: category.to_string(),
            label: label.to_string(),
            origin,
            listing_url,
        })
    }

    /// Enumerates every region × category pair, region-major
    pub fn enumerate(config: &Config) -> Result<Vec<Self>, HarvestError> {
        let mut partitions = Vec::with_capacity(config.regions.len() * config.categories.len());
        for region in &config.regions {
            for category in &config.categories {
                partitions.push(Self::new(
                    &region.code,
                    &category.code,
                    &category.label,
                    &config.site.origin_template,
                    &config.site.listing_path,
                )?);
            }
        }
        Ok(partitions)
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Human-readable category label (e.g. "software/web/info design")
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Base origin used to absolutize relative links
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    pub fn listing_url(&self) -> &Url {
        &self.listing_url
    }
}

impl std::fmt::Display for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{} ({})", self.region, self.category, self.label)
    }
}

/// A posting URL discovered on one partition's listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink<'a> {
    pub url: Url,
    pub partition: &'a Partition,
}
