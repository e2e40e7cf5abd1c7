//! Anonymous profile view limit.
//!
//! Visitors who are not signed in may open a fixed number of distinct
//! professor profiles. The counter is owned by the caller and passed in
//! explicitly.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewDecision {
    Allowed,
    LimitReached,
}

#[derive(Debug, Clone, Default)]
pub struct ViewLimiter {
    /// Distinct profiles allowed; 0 means unlimited.
    limit: usize,
    viewed: HashSet<String>,
}

impl ViewLimiter {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            viewed: HashSet::new(),
        }
    }

    /// Records a view of `professor_id`. Re-opening a profile already seen is
    /// always allowed and does not use up a view.
    pub fn record_view(&mut self, professor_id: &str) -> ViewDecision {
        if self.viewed.contains(professor_id) {
            return ViewDecision::Allowed;
        }
        if self.limit != 0 && self.viewed.len() >= self.limit {
            return ViewDecision::LimitReached;
        }
        self.viewed.insert(professor_id.to_string());
        ViewDecision::Allowed
    }

    /// Views left, or `None` when unlimited.
    pub fn remaining(&self) -> Option<usize> {
        (self.limit != 0).then(|| self.limit.saturating_sub(self.viewed.len()))
    }

    pub fn viewed(&self) -> usize {
        self.viewed.len()
    }
}
