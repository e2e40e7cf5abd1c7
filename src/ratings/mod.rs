//! Rating aggregation.
//!
//! Turns the raw `ratings` documents for a professor into the numbers shown
//! on the profile page, the professor list and the admin analytics view.
//! Every entry point here is pure and infallible; malformed input only drops
//! the affected field's contribution.

pub mod aggregate;
pub mod lenient;
pub mod listing;
pub mod tags;
pub mod types;
pub mod utility;

pub use aggregate::{ProfessorStats, aggregate, aggregate_by_professor, ratings_for};
pub use listing::recent;
pub use tags::tag_counts;
pub use types::{AggregateStats, RatingRecord};
