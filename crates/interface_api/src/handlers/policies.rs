//! Policy accounting handlers
//!
//! Every handler loads a `PolicyAccounting` for the path's policy, so a
//! policy without invoices gets them on first access and a canceled policy
//! answers 409.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use core_kernel::{Currency, Money, PolicyId};
use domain_billing::PolicyAccounting;
use domain_policy::{BillingSchedule, Policy};

use crate::dto::billing::*;
use crate::dto::policy::*;
use crate::{error::ApiError, AppState};

fn parse_policy_id(raw: &str) -> Result<PolicyId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid policy id '{}'", raw)))
}

async fn load(state: &AppState, raw_id: &str) -> Result<PolicyAccounting, ApiError> {
    let id = parse_policy_id(raw_id)?;
    let accounting = PolicyAccounting::load(state.store.clone(), id).await?;
    Ok(accounting.with_timezone(state.timezone))
}

/// Creates a policy and its invoice schedule
pub async fn create_policy(
    State(state): State<AppState>,
    Json(request): Json<CreatePolicyRequest>,
) -> Result<(StatusCode, Json<PolicyResponse>), ApiError> {
    request.validate()?;

    let schedule: BillingSchedule = match request.billing_schedule.as_deref() {
        Some(name) => name.parse()?,
        None => BillingSchedule::default(),
    };
    let currency = request.currency.unwrap_or(Currency::USD);

    let mut builder = Policy::builder()
        .policy_number(request.policy_number)
        .effective_date(request.effective_date)
        .annual_premium(Money::new(request.annual_premium, currency))
        .billing_schedule(schedule);
    if let Some(id) = request.named_insured {
        builder = builder.named_insured(id);
    }
    if let Some(id) = request.agent {
        builder = builder.agent(id);
    }

    let accounting = PolicyAccounting::create_policy(state.store.clone(), builder.build()?).await?;
    Ok((
        StatusCode::CREATED,
        Json(PolicyResponse::from(accounting.policy())),
    ))
}

/// Gets a policy by ID
pub async fn get_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let accounting = load(&state, &id).await?;
    Ok(Json(PolicyResponse::from(accounting.policy())))
}

/// Gets a policy by its policy number
pub async fn get_policy_by_number(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<PolicyResponse>, ApiError> {
    let accounting = PolicyAccounting::load_by_number(state.store.clone(), &number).await?;
    Ok(Json(PolicyResponse::from(accounting.policy())))
}

/// Lists invoices, live ones only unless `include_deleted=true`
pub async fn list_invoices(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<InvoiceQuery>,
) -> Result<Json<Vec<InvoiceResponse>>, ApiError> {
    let accounting = load(&state, &id).await?;
    let invoices = if query.include_deleted {
        accounting.invoice_history().await?
    } else {
        accounting.invoices().await?
    };
    Ok(Json(invoices.iter().map(InvoiceResponse::from).collect()))
}

/// Lists payments in transaction-date order
pub async fn list_payments(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<PaymentResponse>>, ApiError> {
    let accounting = load(&state, &id).await?;
    let payments = accounting.payments().await?;
    Ok(Json(payments.iter().map(PaymentResponse::from).collect()))
}

/// Balance owed as of `?date=`
pub async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let as_of = query.resolve(state.timezone)?;
    let accounting = load(&state, &id).await?;
    let balance = accounting.balance(Some(as_of)).await?;

    Ok(Json(BalanceResponse {
        policy_id: accounting.policy().id,
        as_of,
        balance: balance.amount(),
        currency: balance.currency(),
    }))
}

/// Non-payment and cancellation status as of `?date=`
pub async fn get_delinquency(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<DelinquencyResponse>, ApiError> {
    let as_of = query.resolve(state.timezone)?;
    let accounting = load(&state, &id).await?;
    let pending_non_pay = accounting.pending_non_pay(Some(as_of)).await?;
    let assessment = accounting.cancellation_assessment(Some(as_of)).await?;

    Ok(Json(DelinquencyResponse {
        policy_id: accounting.policy().id,
        as_of,
        pending_non_pay,
        should_cancel: assessment.is_some(),
        cancellation: assessment.as_ref().map(CancellationDetail::from),
    }))
}

/// Records a payment
pub async fn make_payment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MakePaymentRequest>,
) -> Result<(StatusCode, Json<PaymentResponse>), ApiError> {
    let mut accounting = load(&state, &id).await?;
    let amount = Money::new(request.amount, accounting.policy().currency());
    let payment = accounting
        .make_payment(request.contact_id, request.date, amount)
        .await?;
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(&payment))))
}

/// Moves the policy to another billing schedule
pub async fn switch_billing_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SwitchScheduleRequest>,
) -> Result<Json<Vec<InvoiceResponse>>, ApiError> {
    request.validate()?;
    let mut accounting = load(&state, &id).await?;
    let invoices = accounting
        .switch_billing_schedule(&request.billing_schedule)
        .await?;
    Ok(Json(invoices.iter().map(InvoiceResponse::from).collect()))
}

/// Cancels the policy
pub async fn cancel_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<CancelPolicyRequest>,
) -> Result<Json<PolicyResponse>, ApiError> {
    request.validate()?;
    let accounting = load(&state, &id).await?;
    let policy = accounting.cancel_policy(&request.reason, request.date).await?;
    Ok(Json(PolicyResponse::from(&policy)))
}
