use std::cmp::Reverse;

use crate::ratings::types::RatingRecord;

/// Newest ratings first, up to `limit`. Ratings without `createdAt` sort last.
pub fn recent<'a, I>(records: I, limit: usize) -> Vec<&'a RatingRecord>
where
    I: IntoIterator<Item = &'a RatingRecord>,
{
    let mut sorted: Vec<&RatingRecord> = records.into_iter().collect();
    sorted.sort_by_key(|r| Reverse(r.created_at));
    sorted.truncate(limit);
    sorted
}
