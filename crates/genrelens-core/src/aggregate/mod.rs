//! Metric aggregators — independent, stateless transforms from genre-tagged
//! records to one genre-level table each.
//!
//! Every aggregator assumes its input is already restricted to the request
//! window and the country allow-list (the engine does that). Output rows are
//! ordered by `genre_id` and only genres present in the input appear.

pub mod count;
pub mod country_rank;
pub mod hhi;
pub mod rating;
pub mod revenue;
pub mod stability;
pub mod user;
pub mod version;
