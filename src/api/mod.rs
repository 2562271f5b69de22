use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::core::{Inputs, Projection, project};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

/// Longest supported term; matches the range offered by the form UI.
pub const MAX_YEARS: u32 = 50;
/// Caps compounding and deposit frequencies at daily.
pub const MAX_PERIODS_PER_YEAR: u32 = 366;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} must be a finite amount >= 0")]
    NegativeAmount(&'static str),
    #[error("{0} must be a finite rate >= 0")]
    NegativeRate(&'static str),
    #[error("{0} must be between 1 and {max}", max = MAX_YEARS)]
    YearsOutOfRange(&'static str),
    #[error("{0} must be between 1 and {max}", max = MAX_PERIODS_PER_YEAR)]
    FrequencyOutOfRange(&'static str),
}

#[derive(Parser, Debug)]
#[command(
    name = "compound",
    about = "Compound interest projector: future value plus a year-by-year breakdown",
    after_help = "Run `compound serve [port]` to start the web UI instead."
)]
pub struct Cli {
    #[arg(long, default_value_t = 1_000.0, help = "Initial investment")]
    principal: f64,
    #[arg(
        long,
        default_value_t = 50.0,
        help = "Deposit amount per contribution period"
    )]
    contribution: f64,
    #[arg(
        long,
        default_value_t = 5.0,
        help = "Annual interest rate in percent, e.g. 5"
    )]
    interest_rate: f64,
    #[arg(long, default_value_t = 10, help = "Investment period in years")]
    years: u32,
    #[arg(
        long,
        default_value_t = 12,
        help = "Times interest compounds per year"
    )]
    compounds_per_year: u32,
    #[arg(long, default_value_t = 12, help = "Deposits made per year")]
    contributions_per_year: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct CalculatePayload {
    #[serde(alias = "initialInvestment")]
    principal: Option<f64>,
    #[serde(alias = "contributionAmount")]
    contribution: Option<f64>,
    #[serde(alias = "rate")]
    interest_rate: Option<f64>,
    #[serde(alias = "investmentPeriod")]
    years: Option<u32>,
    #[serde(alias = "compoundTimesPerYear")]
    compounds_per_year: Option<u32>,
    #[serde(alias = "contributionPeriodsPerYear")]
    contributions_per_year: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn build_inputs(cli: &Cli) -> Result<Inputs, InputError> {
    if !cli.principal.is_finite() || cli.principal < 0.0 {
        return Err(InputError::NegativeAmount("--principal"));
    }

    if !cli.contribution.is_finite() || cli.contribution < 0.0 {
        return Err(InputError::NegativeAmount("--contribution"));
    }

    if !cli.interest_rate.is_finite() || cli.interest_rate < 0.0 {
        return Err(InputError::NegativeRate("--interest-rate"));
    }

    if cli.years == 0 || cli.years > MAX_YEARS {
        return Err(InputError::YearsOutOfRange("--years"));
    }

    if cli.compounds_per_year == 0 || cli.compounds_per_year > MAX_PERIODS_PER_YEAR {
        return Err(InputError::FrequencyOutOfRange("--compounds-per-year"));
    }

    if cli.contributions_per_year == 0 || cli.contributions_per_year > MAX_PERIODS_PER_YEAR {
        return Err(InputError::FrequencyOutOfRange("--contributions-per-year"));
    }

    Ok(Inputs {
        principal: cli.principal,
        contribution: cli.contribution,
        annual_rate: cli.interest_rate / 100.0,
        years: cli.years,
        compounds_per_year: cli.compounds_per_year,
        contributions_per_year: cli.contributions_per_year,
    })
}

pub fn render_projection(inputs: &Inputs, projection: &Projection) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Future value after {} years: {:.2}\n",
        inputs.years, projection.future_value
    ));
    out.push_str(&format!(
        "Total contributions: {:.2}\n",
        projection.total_contributions
    ));
    out.push_str(&format!(
        "Total interest: {:.2}\n\n",
        projection.total_interest
    ));
    out.push_str(&format!(
        "{:>4}  {:>14}  {:>14}  {:>14}\n",
        "Year", "Interest", "Contributed", "End balance"
    ));
    for record in &projection.schedule {
        out.push_str(&format!(
            "{:>4}  {:>14.2}  {:>14.2}  {:>14.2}\n",
            record.year, record.interest_earned, record.contributed, record.end_balance
        ));
    }
    out
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/calculate",
            get(calculate_get_handler).post(calculate_post_handler),
        )
        .fallback(not_found_handler);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("compound interest UI listening on http://{addr}");
    tracing::info!("local access: http://127.0.0.1:{port}/");

    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

async fn calculate_get_handler(Query(payload): Query<CalculatePayload>) -> Response {
    calculate_handler_impl(payload).await
}

async fn calculate_post_handler(Json(payload): Json<CalculatePayload>) -> Response {
    calculate_handler_impl(payload).await
}

async fn calculate_handler_impl(payload: CalculatePayload) -> Response {
    let inputs = match inputs_from_payload(payload) {
        Ok(inputs) => inputs,
        Err(err) => {
            tracing::debug!(error = %err, "rejected calculation request");
            return error_response(StatusCode::BAD_REQUEST, &err.to_string());
        }
    };

    let projection = project(&inputs);
    tracing::debug!(
        years = inputs.years,
        future_value = projection.future_value,
        "calculation served"
    );
    json_response(StatusCode::OK, projection)
}

fn inputs_from_payload(payload: CalculatePayload) -> Result<Inputs, InputError> {
    let mut cli = default_cli_for_api();

    if let Some(v) = payload.principal {
        cli.principal = v;
    }
    if let Some(v) = payload.contribution {
        cli.contribution = v;
    }
    if let Some(v) = payload.interest_rate {
        cli.interest_rate = v;
    }
    if let Some(v) = payload.years {
        cli.years = v;
    }
    if let Some(v) = payload.compounds_per_year {
        cli.compounds_per_year = v;
    }
    if let Some(v) = payload.contributions_per_year {
        cli.contributions_per_year = v;
    }

    build_inputs(&cli)
}

fn default_cli_for_api() -> Cli {
    Cli {
        principal: 1_000.0,
        contribution: 50.0,
        interest_rate: 5.0,
        years: 10,
        compounds_per_year: 12,
        contributions_per_year: 12,
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn inputs_from_json(json: &str) -> Result<Inputs, String> {
    let payload = serde_json::from_str::<CalculatePayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    inputs_from_payload(payload).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cli() -> Cli {
        default_cli_for_api()
    }

    #[test]
    fn build_inputs_converts_percent_rate_to_fraction() {
        let inputs = build_inputs(&sample_cli()).expect("valid inputs");
        assert!((inputs.annual_rate - 0.05).abs() < 1e-12);
        assert_eq!(inputs.years, 10);
        assert_eq!(inputs.compounds_per_year, 12);
        assert_eq!(inputs.contributions_per_year, 12);
    }

    #[test]
    fn build_inputs_rejects_negative_principal() {
        let mut cli = sample_cli();
        cli.principal = -1.0;
        let err = build_inputs(&cli).unwrap_err();
        assert_eq!(err, InputError::NegativeAmount("--principal"));
        assert!(err.to_string().contains("--principal"));
    }

    #[test]
    fn build_inputs_rejects_non_finite_contribution() {
        let mut cli = sample_cli();
        cli.contribution = f64::NAN;
        assert_eq!(
            build_inputs(&cli).unwrap_err(),
            InputError::NegativeAmount("--contribution")
        );
    }

    #[test]
    fn build_inputs_rejects_negative_rate() {
        let mut cli = sample_cli();
        cli.interest_rate = -0.5;
        assert_eq!(
            build_inputs(&cli).unwrap_err(),
            InputError::NegativeRate("--interest-rate")
        );
    }

    #[test]
    fn build_inputs_rejects_zero_and_oversized_years() {
        let mut cli = sample_cli();
        cli.years = 0;
        assert_eq!(
            build_inputs(&cli).unwrap_err(),
            InputError::YearsOutOfRange("--years")
        );

        cli.years = MAX_YEARS + 1;
        assert_eq!(
            build_inputs(&cli).unwrap_err(),
            InputError::YearsOutOfRange("--years")
        );
    }

    #[test]
    fn build_inputs_rejects_zero_frequencies() {
        let mut cli = sample_cli();
        cli.compounds_per_year = 0;
        assert_eq!(
            build_inputs(&cli).unwrap_err(),
            InputError::FrequencyOutOfRange("--compounds-per-year")
        );

        let mut cli = sample_cli();
        cli.contributions_per_year = 0;
        assert_eq!(
            build_inputs(&cli).unwrap_err(),
            InputError::FrequencyOutOfRange("--contributions-per-year")
        );
    }

    #[test]
    fn years_error_message_names_the_bound() {
        let mut cli = sample_cli();
        cli.years = 99;
        let msg = build_inputs(&cli).unwrap_err().to_string();
        assert!(msg.contains("between 1 and 50"), "unexpected message: {msg}");
    }

    #[test]
    fn empty_payload_uses_form_defaults() {
        let inputs = inputs_from_json("{}").expect("defaults are valid");
        assert_eq!(inputs.principal, 1_000.0);
        assert_eq!(inputs.contribution, 50.0);
        assert!((inputs.annual_rate - 0.05).abs() < 1e-12);
        assert_eq!(inputs.years, 10);
    }

    #[test]
    fn payload_accepts_camel_case_fields() {
        let inputs = inputs_from_json(
            r#"{"principal": 2500, "interestRate": 7.5, "compoundsPerYear": 4, "contributionsPerYear": 4}"#,
        )
        .expect("valid payload");
        assert_eq!(inputs.principal, 2_500.0);
        assert!((inputs.annual_rate - 0.075).abs() < 1e-12);
        assert_eq!(inputs.compounds_per_year, 4);
        assert_eq!(inputs.contributions_per_year, 4);
    }

    #[test]
    fn payload_accepts_form_field_aliases() {
        let inputs = inputs_from_json(
            r#"{"initialInvestment": 800, "contributionAmount": 25, "rate": 3, "investmentPeriod": 20}"#,
        )
        .expect("valid payload");
        assert_eq!(inputs.principal, 800.0);
        assert_eq!(inputs.contribution, 25.0);
        assert!((inputs.annual_rate - 0.03).abs() < 1e-12);
        assert_eq!(inputs.years, 20);
    }

    #[test]
    fn payload_validation_errors_surface_before_computation() {
        let err = inputs_from_json(r#"{"years": 0}"#).unwrap_err();
        assert!(err.contains("--years"), "unexpected error: {err}");
    }

    #[test]
    fn malformed_payload_is_reported_as_invalid_json() {
        let err = inputs_from_json("{not json").unwrap_err();
        assert!(err.contains("Invalid API JSON payload"));
    }

    #[test]
    fn projection_serializes_with_camel_case_keys() {
        let inputs = build_inputs(&sample_cli()).expect("valid inputs");
        let value = serde_json::to_value(project(&inputs)).expect("serializable");
        assert!(value.get("futureValue").is_some());
        assert!(value.get("totalContributions").is_some());
        assert!(value.get("totalInterest").is_some());
        let schedule = value.get("schedule").and_then(|s| s.as_array()).unwrap();
        assert_eq!(schedule.len(), 10);
        assert!(schedule[0].get("interestEarned").is_some());
        assert!(schedule[0].get("endBalance").is_some());
    }

    #[test]
    fn rendered_projection_lists_every_year() {
        let inputs = build_inputs(&sample_cli()).expect("valid inputs");
        let rendered = render_projection(&inputs, &project(&inputs));
        assert!(rendered.starts_with("Future value after 10 years:"));
        assert!(rendered.contains("Total contributions: 6000.00"));
        assert!(rendered.contains("End balance"));
        assert_eq!(rendered.matches('\n').count(), 15);
    }
}
