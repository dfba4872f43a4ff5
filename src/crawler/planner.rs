//! Quota planning
//!
//! Splits the records still needed evenly across partitions and picks a
//! random visiting order, so repeated runs do not keep favouring whichever
//! region or category happens to come first in the configuration.

use crate::state::Partition;
use rand::seq::SliceRandom;
use rand::Rng;

/// Per-partition quota and the order to visit partitions in
#[derive(Debug, Clone)]
pub struct QuotaPlan {
    /// Records still needed when the plan was made
    pub remaining: usize,
    /// Maximum new records any single partition may contribute
    pub quota: usize,
    /// Partitions in visiting order
    pub order: Vec<Partition>,
}

/// Plans one crawl cycle
///
/// `quota = max(1, remaining / partitions.len())`, the same for every
/// partition. Regions are shuffled, then the categories within each region,
/// and the result is region-major. With no partitions the plan is empty.
pub fn plan<R: Rng + ?Sized>(remaining: usize, partitions: &[Partition], rng: &mut R) -> QuotaPlan {
    if partitions.is_empty() {
        return QuotaPlan {
            remaining,
            quota: 0,
            order: Vec::new(),
        };
    }

    let quota = (remaining / partitions.len()).max(1);

    // Group by region keeping first-seen order, then shuffle at both levels
    let mut regions: Vec<Vec<Partition>> = Vec::new();
    for partition in partitions {
        match regions
            .iter_mut()
            .find(|group| group[0].region() == partition.region())
        {
            Some(group) => group.push(partition.clone()),
            None => regions.push(vec![partition.clone()]),
        }
    }

    regions.shuffle(rng);
    for group in &mut regions {
        group.shuffle(rng);
    }

    QuotaPlan {
        remaining,
        quota,
        order: regions.into_iter().flatten().collect(),
    }
}
