//! Rating aggregation and directory filtering over fetched instructor records.
//!
//! Everything here is pure: callers fetch snapshots from the store, these
//! functions derive the views (average rating, filtered directory, top-N)
//! without mutating their inputs.

pub mod filter;
pub mod ranking;
pub mod rating;
pub mod view;

pub use filter::{DirectoryEntry, DirectoryFilter};
pub use ranking::{location_keys, top_rated};
pub use rating::{average_rating, summarize_by_instructor, Rated, RatingSummary};
pub use view::{FetchOutcome, ListState};
