use super::types::{Inputs, Projection, YearRecord};

/// Closed-form balance at the end of the term: compounded principal plus
/// the future value of the contribution annuity.
pub fn future_value(inputs: &Inputs) -> f64 {
    let compound_periods = (inputs.years * inputs.compounds_per_year) as i32;
    let grown_principal = inputs.principal * (1.0 + periodic_rate(inputs)).powi(compound_periods);
    grown_principal + contributions_future_value(inputs)
}

/// Year-by-year ledger of the same growth curve as [`future_value`].
///
/// The simulation steps at contribution-event granularity using the
/// effective per-event rate, so the last record's `end_balance` matches
/// the closed form up to floating-point noise. Deposits land at the end
/// of each event, after interest for the event has accrued.
pub fn annual_breakdown(inputs: &Inputs) -> Vec<YearRecord> {
    let growth_per_event = 1.0 + event_rate(inputs);
    let contributed_per_year = inputs.contribution * inputs.contributions_per_year as f64;

    let mut balance = inputs.principal;
    let mut schedule = Vec::with_capacity(inputs.years as usize);
    for year in 1..=inputs.years {
        let year_start = balance;
        for _ in 0..inputs.contributions_per_year {
            balance *= growth_per_event;
            balance += inputs.contribution;
        }
        schedule.push(YearRecord {
            year,
            interest_earned: balance - year_start - contributed_per_year,
            contributed: contributed_per_year,
            end_balance: balance,
        });
    }
    schedule
}

pub fn project(inputs: &Inputs) -> Projection {
    let future_value = future_value(inputs);
    let total_contributions =
        inputs.contribution * (inputs.contributions_per_year * inputs.years) as f64;
    Projection {
        future_value,
        total_contributions,
        total_interest: future_value - inputs.principal - total_contributions,
        schedule: annual_breakdown(inputs),
    }
}

fn periodic_rate(inputs: &Inputs) -> f64 {
    inputs.annual_rate / inputs.compounds_per_year as f64
}

// Growth over one contribution event. Interest compounds compounds_per_year
// times a year while deposits land contributions_per_year times, so one
// event spans compounds_per_year / contributions_per_year compounding
// periods (fractional when the frequencies differ).
fn event_rate(inputs: &Inputs) -> f64 {
    let periods_per_event =
        inputs.compounds_per_year as f64 / inputs.contributions_per_year as f64;
    (1.0 + periodic_rate(inputs)).powf(periods_per_event) - 1.0
}

fn contributions_future_value(inputs: &Inputs) -> f64 {
    let events = (inputs.years * inputs.contributions_per_year) as f64;
    if inputs.annual_rate == 0.0 {
        // Zero rate degenerates to plain summation; the annuity formula
        // below would divide by zero.
        return inputs.contribution * events;
    }
    let rate = event_rate(inputs);
    inputs.contribution * ((1.0 + rate).powf(events) - 1.0) / rate
}
