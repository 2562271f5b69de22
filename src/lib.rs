//! Compound interest projection: a closed-form future value, a
//! year-by-year breakdown of interest and contributions, and thin CLI
//! and web surfaces that render the schedule.

pub mod api;
pub mod core;
