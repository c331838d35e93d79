use axum::{
    Router,
    body::Bytes,
    extract::{Json, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

use crate::core::{
    CalculationResult, Child, ChildNeedResult, DEFAULT_JOB_EXPENSE_RATE, DEFAULT_PENSION_CAP_RATE,
    NeedTable, NeedTier, ParentFinancialProfile, PaymentSplit, PropertyHolding, RelevantIncomes,
    ResidenceStatus, TieredNeedTable, calculate,
};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const DEFAULT_CHILD_AGE: u32 = 18;
/// 10^12 per month; keeps every sum and product well inside `Decimal`.
const MAX_MONTHLY_AMOUNT: Decimal = Decimal::from_parts(3567587328, 232, 0, false, 0);

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Invalid API JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiPeriod {
    #[default]
    #[serde(alias = "month")]
    Monthly,
    #[serde(alias = "year", alias = "annual")]
    Yearly,
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiIncomeMode {
    #[default]
    Detailed,
    Net,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum ApiResidence {
    #[serde(alias = "withFather", alias = "with_father", alias = "father")]
    WithFather,
    #[serde(alias = "withMother", alias = "with_mother", alias = "mother")]
    WithMother,
    #[serde(alias = "ownHousehold", alias = "own_household", alias = "own")]
    OwnHousehold,
}

impl From<ApiResidence> for ResidenceStatus {
    fn from(value: ApiResidence) -> Self {
        match value {
            ApiResidence::WithFather => ResidenceStatus::WithFather,
            ApiResidence::WithMother => ResidenceStatus::WithMother,
            ApiResidence::OwnHousehold => ResidenceStatus::OwnHousehold,
        }
    }
}

/// A plain number is a monthly amount.
#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum MoneyPayload {
    Amount(Decimal),
    Periodic {
        amount: Decimal,
        #[serde(default)]
        period: ApiPeriod,
    },
}

impl Default for MoneyPayload {
    fn default() -> Self {
        MoneyPayload::Amount(Decimal::ZERO)
    }
}

impl MoneyPayload {
    fn monthly(self) -> Decimal {
        match self {
            MoneyPayload::Amount(amount) => amount,
            MoneyPayload::Periodic {
                amount,
                period: ApiPeriod::Monthly,
            } => amount,
            MoneyPayload::Periodic {
                amount,
                period: ApiPeriod::Yearly,
            } => amount / MONTHS_PER_YEAR,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PropertyPayload {
    label: Option<String>,
    owner_occupied: bool,
    rent_income: MoneyPayload,
    operating_costs: MoneyPayload,
    interest: MoneyPayload,
    principal: MoneyPayload,
    imputed_rent: MoneyPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParentPayload {
    mode: ApiIncomeMode,
    net_income: MoneyPayload,

    gross: MoneyPayload,
    taxes: MoneyPayload,
    #[serde(alias = "mandatorySocialSec")]
    mandatory_social_security: MoneyPayload,
    health_insurance: MoneyPayload,
    job_expense_rate: Option<Decimal>,
    job_expenses_absolute: Option<MoneyPayload>,
    additional_pension: MoneyPayload,
    additional_pension_cap_rate: Option<Decimal>,
    tax_refund: MoneyPayload,
    #[serde(alias = "otherNetIncomes")]
    other_net_income: MoneyPayload,
    properties: Vec<PropertyPayload>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ChildPayload {
    name: Option<String>,
    age: Option<u32>,
    #[serde(alias = "isInGeneralSchool", alias = "generalSchool")]
    in_general_schooling: bool,
    #[serde(alias = "isStudent")]
    student: bool,
    residence: Option<ApiResidence>,
    #[serde(alias = "kindergeldActive")]
    child_benefit_active: Option<bool>,
    has_mini_job: bool,
    mini_job_income: MoneyPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CalculatePayload {
    father: ParentPayload,
    mother: ParentPayload,
    children: Vec<ChildPayload>,
}

#[derive(Debug)]
struct CalculationRequest {
    father: ParentFinancialProfile,
    mother: ParentFinancialProfile,
    children: Vec<Child>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildResponse {
    name: String,
    reduced_self_support: bool,
    need: ChildNeedResult,
    split: PaymentSplit,
    uncovered_shortfall: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculateResponse {
    edition: String,
    incomes: RelevantIncomes,
    per_child: Vec<ChildResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TableResponse<'a> {
    edition: &'a str,
    student_own_household_need: Decimal,
    child_benefit: Decimal,
    self_support_standard: Decimal,
    self_support_reduced: Decimal,
    tiers: &'a [NeedTier],
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Clone)]
struct AppState {
    table: Arc<TieredNeedTable>,
}

fn require_amount(field: &str, value: Decimal) -> Result<Decimal, RequestError> {
    if value < Decimal::ZERO {
        return Err(RequestError::Invalid(format!("{field} must be >= 0")));
    }
    if value > MAX_MONTHLY_AMOUNT {
        return Err(RequestError::Invalid(format!(
            "{field} must be <= {MAX_MONTHLY_AMOUNT} per month"
        )));
    }
    Ok(value)
}

fn require_rate(field: &str, value: Decimal) -> Result<Decimal, RequestError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(RequestError::Invalid(format!(
            "{field} must be between 0 and 1"
        )));
    }
    Ok(value)
}

fn build_property(
    prefix: &str,
    payload: PropertyPayload,
) -> Result<PropertyHolding, RequestError> {
    let money = |field: &str, value: MoneyPayload| {
        require_amount(&format!("{prefix}.{field}"), value.monthly())
    };
    let interest = money("interest", payload.interest)?;
    let principal = money("principal", payload.principal)?;

    if payload.owner_occupied {
        return Ok(PropertyHolding::OwnerOccupied {
            imputed_rent: money("imputedRent", payload.imputed_rent)?,
            interest,
            principal,
        });
    }
    Ok(PropertyHolding::Rented {
        rent_income: money("rentIncome", payload.rent_income)?,
        operating_costs: money("operatingCosts", payload.operating_costs)?,
        interest,
        principal,
    })
}

fn build_profile(
    parent: &str,
    payload: ParentPayload,
) -> Result<ParentFinancialProfile, RequestError> {
    let money = |field: &str, value: MoneyPayload| {
        require_amount(&format!("{parent}.{field}"), value.monthly())
    };

    if payload.mode == ApiIncomeMode::Net {
        let net = money("netIncome", payload.net_income)?;
        return Ok(ParentFinancialProfile::from_net_income(net));
    }

    let job_expenses_absolute = match payload.job_expenses_absolute {
        Some(value) => Some(money("jobExpensesAbsolute", value)?),
        None => None,
    };

    let properties = payload
        .properties
        .into_iter()
        .enumerate()
        .map(|(idx, property)| {
            let prefix = match &property.label {
                Some(label) => format!("{parent}.properties[{label}]"),
                None => format!("{parent}.properties[{idx}]"),
            };
            build_property(&prefix, property)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ParentFinancialProfile {
        gross_income: money("gross", payload.gross)?,
        taxes: money("taxes", payload.taxes)?,
        mandatory_social_security: money(
            "mandatorySocialSecurity",
            payload.mandatory_social_security,
        )?,
        health_insurance: money("healthInsurance", payload.health_insurance)?,
        job_expense_rate: require_rate(
            &format!("{parent}.jobExpenseRate"),
            payload.job_expense_rate.unwrap_or(DEFAULT_JOB_EXPENSE_RATE),
        )?,
        job_expenses_absolute,
        voluntary_pension: money("additionalPension", payload.additional_pension)?,
        pension_cap_rate: require_rate(
            &format!("{parent}.additionalPensionCapRate"),
            payload
                .additional_pension_cap_rate
                .unwrap_or(DEFAULT_PENSION_CAP_RATE),
        )?,
        tax_refund: money("taxRefund", payload.tax_refund)?,
        other_net_income: money("otherNetIncome", payload.other_net_income)?,
        properties,
    })
}

fn build_child(idx: usize, payload: ChildPayload) -> Result<Child, RequestError> {
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| format!("Child {}", idx + 1));

    // Earnings only count once the child is flagged as having a mini-job.
    let mini_job_income = if payload.has_mini_job {
        require_amount(
            &format!("children[{idx}].miniJobIncome"),
            payload.mini_job_income.monthly(),
        )?
    } else {
        Decimal::ZERO
    };

    Ok(Child {
        name,
        age: payload.age.unwrap_or(DEFAULT_CHILD_AGE),
        in_general_schooling: payload.in_general_schooling,
        is_student: payload.student,
        residence: payload
            .residence
            .map(Into::into)
            .unwrap_or(ResidenceStatus::WithMother),
        child_benefit_active: payload.child_benefit_active.unwrap_or(true),
        mini_job_income,
    })
}

fn request_from_payload(payload: CalculatePayload) -> Result<CalculationRequest, RequestError> {
    let father = build_profile("father", payload.father)?;
    let mother = build_profile("mother", payload.mother)?;
    let children = payload
        .children
        .into_iter()
        .enumerate()
        .map(|(idx, child)| build_child(idx, child))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CalculationRequest {
        father,
        mother,
        children,
    })
}

fn build_calculate_response(edition: &str, result: CalculationResult) -> CalculateResponse {
    CalculateResponse {
        edition: edition.to_string(),
        incomes: result.incomes,
        per_child: result
            .children
            .into_iter()
            .map(|calc| ChildResponse {
                uncovered_shortfall: calc.split.shortfall(&calc.need),
                name: calc.child.name,
                reduced_self_support: calc.reduced_self_support,
                need: calc.need,
                split: calc.split,
            })
            .collect(),
    }
}

fn run_calculation(
    table: &TieredNeedTable,
    payload: CalculatePayload,
) -> Result<CalculateResponse, RequestError> {
    let request = request_from_payload(payload)?;
    let result = calculate(table, &request.father, &request.mother, &request.children);
    info!(
        edition = table.edition(),
        children = result.children.len(),
        "calculation completed"
    );
    Ok(build_calculate_response(table.edition(), result))
}

/// Parses a household request body and runs the calculation on `table`.
pub fn calculate_from_json(
    table: &TieredNeedTable,
    json: &str,
) -> Result<CalculateResponse, RequestError> {
    calculate_from_slice(table, json.as_bytes())
}

fn calculate_from_slice(
    table: &TieredNeedTable,
    body: &[u8],
) -> Result<CalculateResponse, RequestError> {
    let payload = serde_json::from_slice::<CalculatePayload>(body)?;
    run_calculation(table, payload)
}

pub async fn run_http_server(port: u16, table: TieredNeedTable) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let edition = table.edition().to_string();
    let state = AppState {
        table: Arc::new(table),
    };
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/table", get(table_handler))
        .route("/api/calculate", post(calculate_handler))
        .fallback(not_found_handler)
        .with_state(state);

    let listener = TcpListener::bind(addr).await?;
    info!(%addr, %edition, "child support API listening");
    info!("local access: http://127.0.0.1:{port}/api/calculate");

    axum::serve(listener, app).await
}

async fn health_handler() -> Response {
    json_response(StatusCode::OK, HealthResponse { status: "ok" })
}

async fn table_handler(State(state): State<AppState>) -> Response {
    let table = state.table.as_ref();
    json_response(
        StatusCode::OK,
        TableResponse {
            edition: table.edition(),
            student_own_household_need: table.student_own_household_need(),
            child_benefit: table.child_benefit(),
            self_support_standard: table.self_support_standard(),
            self_support_reduced: table.self_support_reduced(),
            tiers: table.tiers(),
        },
    )
}

async fn calculate_handler(State(state): State<AppState>, body: Bytes) -> Response {
    match calculate_from_slice(&state.table, &body) {
        Ok(response) => json_response(StatusCode::OK, response),
        Err(err) => error_response(StatusCode::BAD_REQUEST, &err.to_string()),
    }
}

async fn not_found_handler() -> Response {
    error_response(StatusCode::NOT_FOUND, "Not found")
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    let mut response = (status, Json(body)).into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
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
