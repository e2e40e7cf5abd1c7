//! Professor directory: search and pagination.

use serde::{Deserialize, Serialize};

use crate::ratings::AggregateStats;
use crate::ratings::lenient;

/// A professor document from the `professors` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub university: String,
    #[serde(default, deserialize_with = "lenient::string_or_empty")]
    pub department: String,
}

/// A professor together with the statistics of their ratings.
#[derive(Debug, Clone, Serialize)]
pub struct ProfessorSummary {
    #[serde(flatten)]
    pub professor: Professor,
    pub stats: AggregateStats,
}

/// Professors whose name, university or department contains `query`,
/// ignoring case. An empty query matches everyone. Sorted by name, then id.
pub fn search<'a>(professors: &'a [Professor], query: &str) -> Vec<&'a Professor> {
    let needle = query.trim().to_lowercase();

    let mut matches: Vec<&Professor> = professors
        .iter()
        .filter(|p| {
            needle.is_empty()
                || [&p.name, &p.university, &p.department]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect();

    matches.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.id.cmp(&b.id))
    });
    matches
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_next: bool,
}

/// Slices `items` into page `page` (1-based). Page 0 is read as page 1 and a
/// `per_page` of 0 as 1. Pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let page = page.max(1);
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let items: Vec<T> = items.into_iter().skip(start).take(per_page).collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
        has_next: page < total_pages,
    }
}
