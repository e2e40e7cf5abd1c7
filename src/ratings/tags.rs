//! Tag frequency counting.
//!
//! Tags are compared by exact string value. "exigente" and "Exigente" are
//! two different tags; the moderated vocabulary is expected to prevent that.

use std::collections::HashMap;

use crate::ratings::types::RatingRecord;

/// Counts tags while remembering the order each one was first seen.
#[derive(Debug, Default)]
pub struct TagTally<'a> {
    index: HashMap<&'a str, usize>,
    counts: Vec<(&'a str, usize)>,
}

impl<'a> TagTally<'a> {
    pub fn add(&mut self, tag: &'a str) {
        match self.index.get(tag) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(tag, self.counts.len());
                self.counts.push((tag, 1));
            }
        }
    }

    pub fn extend<I>(&mut self, tags: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for tag in tags {
            self.add(tag);
        }
    }

    /// Tags by descending count. Ties keep first-seen order.
    pub fn ranked(mut self) -> Vec<(&'a str, usize)> {
        // sort_by is stable
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts
    }
}

/// Full ranked tag tally across `records`.
pub fn tag_counts<'a, I>(records: I) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a RatingRecord>,
{
    let mut tally = TagTally::default();
    for record in records {
        tally.extend(&record.tags);
    }

    tally
        .ranked()
        .into_iter()
        .map(|(tag, count)| (tag.to_string(), count))
        .collect()
}
