use std::collections::BTreeMap;

use crate::ratings::tags::TagTally;
use crate::ratings::types::{AggregateStats, DISTRIBUTION_BUCKETS, RatingRecord};
use crate::ratings::utility::{RunningMean, pct, round_half_up};

/// Maximum number of entries in [`AggregateStats::top_tags`].
pub const TOP_TAG_LIMIT: usize = 5;

/// Reduces a professor's ratings into display statistics.
///
/// Malformed fields only drop their own contribution: a record with an
/// unusable `quality` still counts towards difficulty, would-take-again and
/// tags. Never fails and never reads anything but `records`.
pub fn aggregate<'a, I>(records: I) -> AggregateStats
where
    I: IntoIterator<Item = &'a RatingRecord>,
{
    let mut rating_count = 0usize;
    let mut quality = RunningMean::default();
    let mut difficulty = RunningMean::default();
    let mut would_take_again = 0usize;
    let mut distribution = [0usize; DISTRIBUTION_BUCKETS];
    let mut tags = TagTally::default();

    for record in records {
        rating_count += 1;

        if let Some(q) = record.valid_quality() {
            quality.push(q);
            distribution[DISTRIBUTION_BUCKETS - bucket(q)] += 1;
        }

        if let Some(d) = record.valid_difficulty() {
            difficulty.push(d);
        }

        if record.would_take_again {
            would_take_again += 1;
        }

        tags.extend(&record.tags);
    }

    let top_tags = tags
        .ranked()
        .into_iter()
        .take(TOP_TAG_LIMIT)
        .map(|(tag, _)| tag.to_string())
        .collect();

    AggregateStats {
        average_quality: quality.mean_one_decimal(),
        average_difficulty: difficulty.mean_one_decimal(),
        would_take_again_percent: round_half_up(pct(would_take_again, rating_count)) as u8,
        distribution,
        top_tags,
        rating_count,
    }
}

/// Maps a quality score to its star bucket in `1..=5`.
fn bucket(quality: f64) -> usize {
    round_half_up(quality).clamp(1.0, DISTRIBUTION_BUCKETS as f64) as usize
}

/// Per-professor statistics for a mixed collection of ratings.
#[derive(Debug, Default)]
pub struct ProfessorStats {
    pub stats: BTreeMap<String, AggregateStats>,
    /// Records skipped because they carry no `professorId`.
    pub unattributed: usize,
}

/// Groups `records` by professor, keeping input order inside each group,
/// and aggregates every group.
pub fn aggregate_by_professor(records: &[RatingRecord]) -> ProfessorStats {
    let mut groups: BTreeMap<&str, Vec<&RatingRecord>> = BTreeMap::new();
    let mut unattributed = 0usize;

    for record in records {
        match record.professor_id.as_deref() {
            Some(id) => groups.entry(id).or_default().push(record),
            None => unattributed += 1,
        }
    }

    let stats = groups
        .into_iter()
        .map(|(id, group)| (id.to_string(), aggregate(group)))
        .collect();

    ProfessorStats {
        stats,
        unattributed,
    }
}

/// Ratings belonging to `professor_id`, in input order.
pub fn ratings_for<'a>(records: &'a [RatingRecord], professor_id: &str) -> Vec<&'a RatingRecord> {
    records
        .iter()
        .filter(|r| r.professor_id.as_deref() == Some(professor_id))
        .collect()
}
