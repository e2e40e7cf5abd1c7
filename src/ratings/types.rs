//! Data types consumed and produced by the rating aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ratings::lenient;

/// Number of quality buckets in [`AggregateStats::distribution`].
pub const DISTRIBUTION_BUCKETS: usize = 5;

/// One student's rating of one professor, as stored in the `ratings` collection.
///
/// Every field deserializes leniently: a value of the wrong type becomes
/// absent instead of failing the whole record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub professor_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient::score")]
    pub difficulty: Option<f64>,
    #[serde(default, deserialize_with = "lenient::strict_true")]
    pub would_take_again: bool,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub course: Option<String>,
    #[serde(default, deserialize_with = "lenient::non_empty_string")]
    pub comment: Option<String>,
}

impl RatingRecord {
    /// Quality score if it is a finite number.
    pub fn valid_quality(&self) -> Option<f64> {
        self.quality.filter(|q| q.is_finite())
    }

    /// Difficulty score if it is a finite number.
    pub fn valid_difficulty(&self) -> Option<f64> {
        self.difficulty.filter(|d| d.is_finite())
    }
}

/// Display statistics derived from a professor's ratings.
///
/// Recomputed on every read and never written back to the store.
/// `distribution[0]` counts 5-star ratings, `distribution[4]` counts 1-star.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub average_quality: f64,
    pub average_difficulty: f64,
    pub would_take_again_percent: u8,
    pub distribution: [usize; DISTRIBUTION_BUCKETS],
    pub top_tags: Vec<String>,
    pub rating_count: usize,
}
