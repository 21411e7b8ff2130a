//! Policy domain tests
//!
//! Tests are grouped by functionality:
//! - `policy_creation` - PolicyBuilder tests and validation
//! - `policy_lifecycle` - Status transitions and cancellation
//! - `billing_schedules` - Schedule table, parsing and serialization

use chrono::NaiveDate;
use core_kernel::{ContactId, Currency, Money};
use domain_policy::{BillingSchedule, Policy, PolicyBuilder, PolicyError, PolicyEvent, PolicyStatus};
use rust_decimal_macros::dec;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn create_test_policy() -> Policy {
    PolicyBuilder::new()
        .policy_number("Policy Two")
        .effective_date(date(2015, 2, 1))
        .annual_premium(Money::new(dec!(1600), Currency::USD))
        .billing_schedule(BillingSchedule::Quarterly)
        .named_insured(ContactId::new())
        .agent(ContactId::new())
        .build()
        .unwrap()
}

// ============================================================================
// POLICY CREATION
// ============================================================================

mod policy_creation {
    use super::*;

    #[test]
    fn test_build_complete_policy() {
        let policy = create_test_policy();

        assert_eq!(policy.policy_number, "Policy Two");
        assert_eq!(policy.billing_schedule, BillingSchedule::Quarterly);
        assert_eq!(policy.currency(), Currency::USD);
        assert!(policy.is_active());
        assert!(policy.named_insured.is_some());
    }

    #[test]
    fn test_build_missing_premium() {
        let result = PolicyBuilder::new()
            .policy_number("Policy X")
            .effective_date(date(2015, 1, 1))
            .build();

        assert_eq!(
            result.unwrap_err(),
            PolicyError::MissingRequiredField("annual_premium".to_string())
        );
    }

    #[test]
    fn test_build_rejects_zero_premium() {
        let result = Policy::builder()
            .policy_number("Policy X")
            .effective_date(date(2015, 1, 1))
            .annual_premium(Money::zero(Currency::USD))
            .build();

        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }

    #[test]
    fn test_build_rejects_blank_number() {
        let result = Policy::builder()
            .policy_number("   ")
            .effective_date(date(2015, 1, 1))
            .annual_premium(Money::new(dec!(100), Currency::USD))
            .build();

        assert!(matches!(result, Err(PolicyError::Validation(_))));
    }
}

// ============================================================================
// POLICY LIFECYCLE
// ============================================================================

mod policy_lifecycle {
    use super::*;

    #[test]
    fn test_cancel_emits_event() {
        let mut policy = create_test_policy();
        let event = policy.cancel("insured request", date(2015, 5, 1)).unwrap();

        assert_eq!(event.event_type(), "PolicyCanceled");
        assert_eq!(event.policy_id(), policy.id);
        assert_eq!(policy.status, PolicyStatus::Canceled);
    }

    #[test]
    fn test_cancel_twice_reports_original_cancellation() {
        let mut policy = create_test_policy();
        policy.cancel("non-payment", date(2015, 5, 1)).unwrap();

        let result = policy.cancel("again", date(2015, 6, 1));
        assert_eq!(
            result.unwrap_err(),
            PolicyError::AlreadyCanceled {
                cancel_date: date(2015, 5, 1),
                cancel_reason: "non-payment".to_string(),
            }
        );
    }

    #[test]
    fn test_cancel_requires_reason() {
        let mut policy = create_test_policy();
        assert!(matches!(
            policy.cancel("  ", date(2015, 5, 1)),
            Err(PolicyError::Validation(_))
        ));
        assert!(policy.is_active());
    }

    #[test]
    fn test_expired_policy_can_be_canceled() {
        let mut policy = create_test_policy();
        policy.status = PolicyStatus::Expired;
        assert!(policy.validate().is_ok());

        policy.cancel("late cancel", date(2016, 3, 1)).unwrap();
        assert!(policy.is_canceled());
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_schedule_change_on_canceled_policy_fails() {
        let mut policy = create_test_policy();
        policy.cancel("non-payment", date(2015, 5, 1)).unwrap();

        let result = policy.change_billing_schedule(BillingSchedule::Monthly);
        assert!(matches!(result, Err(PolicyError::AlreadyCanceled { .. })));
        assert_eq!(policy.billing_schedule, BillingSchedule::Quarterly);
    }

    #[test]
    fn test_schedule_change_event_records_both_sides() {
        let mut policy = create_test_policy();
        let event = policy.change_billing_schedule(BillingSchedule::Monthly).unwrap();

        match event {
            PolicyEvent::BillingScheduleChanged { from, to, .. } => {
                assert_eq!(from, BillingSchedule::Quarterly);
                assert_eq!(to, BillingSchedule::Monthly);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }
}

// ============================================================================
// BILLING SCHEDULES
// ============================================================================

mod billing_schedules {
    use super::*;

    #[test]
    fn test_installment_table() {
        assert_eq!(BillingSchedule::Annual.installments(), 1);
        assert_eq!(BillingSchedule::TwoPay.installments(), 2);
        assert_eq!(BillingSchedule::SemiAnnual.installments(), 3);
        assert_eq!(BillingSchedule::Quarterly.installments(), 4);
        assert_eq!(BillingSchedule::Monthly.installments(), 12);
    }

    #[test]
    fn test_spacing() {
        assert_eq!(BillingSchedule::TwoPay.months_between_installments(), 6);
        assert_eq!(BillingSchedule::SemiAnnual.months_between_installments(), 4);
        assert_eq!(BillingSchedule::Quarterly.months_between_installments(), 3);
    }

    #[test]
    fn test_unknown_schedule() {
        assert_eq!(
            "Biweekly".parse::<BillingSchedule>(),
            Err(PolicyError::InvalidSchedule("Biweekly".to_string()))
        );
    }

    #[test]
    fn test_serde_uses_display_names() {
        for schedule in BillingSchedule::ALL {
            let json = serde_json::to_string(&schedule).unwrap();
            assert_eq!(json, format!("\"{}\"", schedule));
        }
    }
}
