use crate::risk_analysis::domain::{DependencyCoordinate, EnrichmentRecord, RiskAssessment};
use crate::shared::error::CacheError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cache key: the 5-tuple identifying a unique stored assessment.
///
/// Provider and model are part of the key by design - assessments are
/// provider/model-specific, so switching either is a miss, never a
/// collision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub provider: String,
    pub model: String,
}

impl CacheKey {
    pub fn new(coordinate: &DependencyCoordinate, provider: &str, model: &str) -> Self {
        Self {
            group_id: coordinate.group_id.clone(),
            artifact_id: coordinate.artifact_id.clone(),
            version: coordinate.version.clone(),
            provider: provider.to_string(),
            model: model.to_string(),
        }
    }
}

/// One persisted analysis result.
///
/// At most one live entry exists per key; a new analysis for the same key
/// overwrites rather than appends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub coordinate: DependencyCoordinate,
    pub enrichment: Option<EnrichmentRecord>,
    pub assessment: RiskAssessment,
    pub stored_at: DateTime<Utc>,
}

/// AnalysisCache port - keyed memoization of prior assessments.
///
/// The only mutable store shared by concurrent worker tasks. Writes to
/// distinct keys are independent; same-key writes are last-writer-wins
/// with no partially written record ever observable.
pub trait AnalysisCache: Send + Sync {
    /// Looks up a stored entry; any cache failure reads as a miss
    fn get(&self, key: &CacheKey) -> Option<CacheEntry>;

    /// Stores an entry, overwriting any live entry under the same key
    fn put(&self, key: CacheKey, entry: CacheEntry) -> Result<(), CacheError>;

    /// Removes entries older than the configured expiry, leaving live
    /// entries untouched. Returns the number of evicted entries.
    fn evict_expired(&self) -> Result<usize, CacheError>;

    /// All live entries for one (provider, model) pair
    fn entries_for(&self, provider: &str, model: &str) -> Vec<CacheEntry>;
}
