mod engine;
mod types;

pub use engine::{annual_breakdown, future_value, project};
pub use types::{Inputs, Projection, YearRecord};
