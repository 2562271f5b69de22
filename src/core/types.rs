use serde::Serialize;

#[derive(Debug, Clone, Copy)]
pub struct Inputs {
    pub principal: f64,
    pub contribution: f64,
    /// Annual rate as a fraction, e.g. 0.05 for 5%.
    pub annual_rate: f64,
    pub years: u32,
    pub compounds_per_year: u32,
    pub contributions_per_year: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearRecord {
    pub year: u32,
    pub interest_earned: f64,
    pub contributed: f64,
    pub end_balance: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    pub future_value: f64,
    pub total_contributions: f64,
    pub total_interest: f64,
    pub schedule: Vec<YearRecord>,
}
