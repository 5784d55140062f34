//! Team aggregation, statistics and ranking.
//!
//! Match entries are grouped by team, each team's averages and composite
//! scores are computed once every match is in, and teams are then ranked
//! across five metrics with the leaders of each marked for highlighting.

pub mod aggregate;
pub mod pipeline;
pub mod rank;
pub mod scoring;
pub mod types;
pub mod utility;
