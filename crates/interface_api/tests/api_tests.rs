//! HTTP API tests against the in-memory store

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::json;

use core_kernel::Timezone;
use domain_billing::AccountingStore;
use domain_policy::{BillingSchedule, PolicyStatus};
use interface_api::dto::billing::{
    BalanceResponse, DelinquencyResponse, InvoiceResponse, PaymentResponse,
};
use interface_api::dto::contact::ContactResponse;
use interface_api::dto::policy::PolicyResponse;
use interface_api::error::ErrorResponse;
use interface_api::handlers::health::HealthResponse;
use interface_api::{create_router, AppState};
use test_utils::{date, AccountingScenario, TestPolicyBuilder};

fn server_for(store: Arc<dyn AccountingStore>) -> TestServer {
    let app = create_router(AppState::new(store, Timezone::default()));
    TestServer::new(app).unwrap()
}

async fn quarterly() -> (AccountingScenario, TestServer) {
    let scenario =
        AccountingScenario::new(TestPolicyBuilder::new().with_schedule(BillingSchedule::Quarterly))
            .await;
    let server = server_for(scenario.store.clone());
    (scenario, server)
}

fn policy_path(scenario: &AccountingScenario, suffix: &str) -> String {
    format!("/api/v1/policies/{}{}", scenario.policy.id, suffix)
}

// ============================================================================
// Health
// ============================================================================

mod health {
    use super::*;

    #[tokio::test]
    async fn test_liveness_and_readiness() {
        let (_, server) = quarterly().await;

        let live = server.get("/health").await;
        live.assert_status_ok();
        assert_eq!(live.json::<HealthResponse>().status, "healthy");

        let ready = server.get("/health/ready").await;
        ready.assert_status_ok();
        assert_eq!(ready.json::<HealthResponse>().status, "ready");
    }
}

// ============================================================================
// Policies and contacts
// ============================================================================

mod policies {
    use super::*;

    #[tokio::test]
    async fn test_create_contacts_then_policy() {
        let store: Arc<dyn AccountingStore> =
            Arc::new(domain_billing::InMemoryAccountingStore::new());
        let server = server_for(store);

        let insured = server
            .post("/api/v1/contacts")
            .json(&json!({ "name": "Anna White", "role": "Named Insured" }))
            .await;
        insured.assert_status(StatusCode::CREATED);
        let insured = insured.json::<ContactResponse>();

        let response = server
            .post("/api/v1/policies")
            .json(&json!({
                "policy_number": "Policy Two",
                "effective_date": "2015-02-01",
                "annual_premium": "1600",
                "billing_schedule": "Quarterly",
                "named_insured": insured.id,
            }))
            .await;
        response.assert_status(StatusCode::CREATED);

        let policy = response.json::<PolicyResponse>();
        assert_eq!(policy.status, PolicyStatus::Active);
        assert_eq!(policy.billing_schedule, BillingSchedule::Quarterly);
        assert_eq!(policy.named_insured, Some(insured.id));

        let invoices = server
            .get(&format!("/api/v1/policies/{}/invoices", policy.id))
            .await
            .json::<Vec<InvoiceResponse>>();
        assert_eq!(invoices.len(), 4);
        assert_eq!(invoices[0].invoice.bill_date, date(2015, 2, 1));
        assert_eq!(invoices[0].invoice.due_date, date(2015, 3, 1));
        assert!(invoices.iter().all(|i| i.invoice.amount_due == dec!(400)));
    }

    #[tokio::test]
    async fn test_lookup_by_number() {
        let (scenario, server) = quarterly().await;

        let response = server
            .get(&format!(
                "/api/v1/policies/by-number/{}",
                scenario.policy.policy_number.replace(' ', "%20")
            ))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<PolicyResponse>().id, scenario.policy.id);
    }

    #[tokio::test]
    async fn test_duplicate_policy_number_conflicts() {
        let (scenario, server) = quarterly().await;

        let response = server
            .post("/api/v1/policies")
            .json(&json!({
                "policy_number": scenario.policy.policy_number,
                "effective_date": "2015-01-01",
                "annual_premium": "100",
            }))
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unknown_policy_and_bad_id() {
        let (_, server) = quarterly().await;

        server
            .get(&format!("/api/v1/policies/{}", core_kernel::PolicyId::new()))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/api/v1/policies/not-a-policy")
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_contact_requests() {
        let (_, server) = quarterly().await;

        let blank = server
            .post("/api/v1/contacts")
            .json(&json!({ "name": "", "role": "Agent" }))
            .await;
        blank.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(blank.json::<ErrorResponse>().details, Some(vec!["name".to_string()]));

        server
            .post("/api/v1/contacts")
            .json(&json!({ "name": "Mary Sue", "role": "Underwriter" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_policy_with_unknown_contact_is_unprocessable() {
        let (_, server) = quarterly().await;

        let response = server
            .post("/api/v1/policies")
            .json(&json!({
                "policy_number": "Policy Nobody",
                "effective_date": "2015-01-01",
                "annual_premium": "1200",
                "named_insured": core_kernel::ContactId::new(),
            }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response.json::<ErrorResponse>().error, "validation_error");

        server
            .get("/api/v1/policies/by-number/Policy%20Nobody")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

// ============================================================================
// Balances and delinquency
// ============================================================================

mod accounting {
    use super::*;

    #[tokio::test]
    async fn test_balance_as_of_dates() {
        let (scenario, server) = quarterly().await;

        let balance = server
            .get(&policy_path(&scenario, "/balance"))
            .add_query_param("date", "2015-01-01")
            .await
            .json::<BalanceResponse>();
        assert_eq!(balance.balance, dec!(300));
        assert_eq!(balance.as_of, date(2015, 1, 1));

        let balance = server
            .get(&policy_path(&scenario, "/balance"))
            .add_query_param("date", "2015-10-01")
            .await
            .json::<BalanceResponse>();
        assert_eq!(balance.balance, dec!(1200));
    }

    #[tokio::test]
    async fn test_malformed_date_is_bad_request() {
        let (scenario, server) = quarterly().await;

        let response = server
            .get(&policy_path(&scenario, "/balance"))
            .add_query_param("date", "01/02/2015")
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<ErrorResponse>().error, "bad_request");
    }

    #[tokio::test]
    async fn test_delinquency_windows() {
        let (scenario, server) = quarterly().await;

        let pending = server
            .get(&policy_path(&scenario, "/delinquency"))
            .add_query_param("date", "2015-02-10")
            .await
            .json::<DelinquencyResponse>();
        assert!(pending.pending_non_pay);
        assert!(!pending.should_cancel);
        assert!(pending.cancellation.is_none());

        let lapsed = server
            .get(&policy_path(&scenario, "/delinquency"))
            .add_query_param("date", "2015-02-16")
            .await
            .json::<DelinquencyResponse>();
        assert!(lapsed.should_cancel);
        let detail = lapsed.cancellation.unwrap();
        assert_eq!(detail.cancel_date, date(2015, 2, 15));
        assert_eq!(detail.outstanding, dec!(300));
    }

    #[tokio::test]
    async fn test_only_agent_pays_while_past_due() {
        let (scenario, server) = quarterly().await;

        let rejected = server
            .post(&policy_path(&scenario, "/payments"))
            .json(&json!({ "date": "2015-02-05", "amount": "300" }))
            .await;
        rejected.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(rejected.json::<ErrorResponse>().error, "forbidden");

        let accepted = server
            .post(&policy_path(&scenario, "/payments"))
            .json(&json!({
                "contact_id": scenario.agent.id,
                "date": "2015-02-05",
                "amount": "300",
            }))
            .await;
        accepted.assert_status(StatusCode::CREATED);
        let payment = accepted.json::<PaymentResponse>();
        assert_eq!(payment.contact_id, scenario.agent.id);

        let payments = server
            .get(&policy_path(&scenario, "/payments"))
            .await
            .json::<Vec<PaymentResponse>>();
        assert_eq!(payments.len(), 1);
    }

    #[tokio::test]
    async fn test_non_positive_payment_is_rejected() {
        let (scenario, server) = quarterly().await;

        server
            .post(&policy_path(&scenario, "/payments"))
            .json(&json!({ "date": "2015-01-01", "amount": "0" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}

// ============================================================================
// Schedule switches and cancellation
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn test_switch_schedule() {
        let (scenario, server) = quarterly().await;
        let path = policy_path(&scenario, "/billing-schedule");

        server
            .put(&path)
            .json(&json!({ "billing_schedule": "Quarterly" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
        server
            .put(&path)
            .json(&json!({ "billing_schedule": "Weekly" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let switched = server
            .put(&path)
            .json(&json!({ "billing_schedule": "Monthly" }))
            .await;
        switched.assert_status_ok();
        assert_eq!(switched.json::<Vec<InvoiceResponse>>().len(), 12);

        let history = server
            .get(&policy_path(&scenario, "/invoices"))
            .add_query_param("include_deleted", "true")
            .await
            .json::<Vec<InvoiceResponse>>();
        assert_eq!(history.len(), 16);
        assert_eq!(history.iter().filter(|i| i.deleted).count(), 4);
    }

    #[tokio::test]
    async fn test_cancel_freezes_policy() {
        let (scenario, server) = quarterly().await;

        let canceled = server
            .post(&policy_path(&scenario, "/cancel"))
            .json(&json!({ "reason": "Non-payment", "date": "2015-02-16" }))
            .await;
        canceled.assert_status_ok();
        let policy = canceled.json::<PolicyResponse>();
        assert_eq!(policy.status, PolicyStatus::Canceled);
        assert_eq!(policy.cancel_date, Some(date(2015, 2, 16)));

        let reload = server.get(&policy_path(&scenario, "")).await;
        reload.assert_status(StatusCode::CONFLICT);
        assert_eq!(reload.json::<ErrorResponse>().error, "conflict");

        server
            .post(&policy_path(&scenario, "/payments"))
            .json(&json!({ "amount": "100" }))
            .await
            .assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_cancel_requires_reason() {
        let (scenario, server) = quarterly().await;

        server
            .post(&policy_path(&scenario, "/cancel"))
            .json(&json!({ "reason": "" }))
            .await
            .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    }
}
