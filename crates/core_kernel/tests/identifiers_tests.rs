//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing, conversion, and display formatting.

use core_kernel::{ContactId, InvoiceId, PaymentId, PolicyId};
use uuid::Uuid;

mod policy_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = PolicyId::new();
        let id2 = PolicyId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = PolicyId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_from_str_rejects_garbage() {
        let result: Result<PolicyId, _> = "POL-not-a-uuid".parse();
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_as_bare_uuid() {
        let uuid = Uuid::new_v4();
        let id = PolicyId::from_uuid(uuid);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid));
    }
}

mod prefixes {
    use super::*;

    #[test]
    fn test_each_identifier_has_its_own_prefix() {
        assert_eq!(PolicyId::prefix(), "POL");
        assert_eq!(ContactId::prefix(), "CNT");
        assert_eq!(InvoiceId::prefix(), "INV");
        assert_eq!(PaymentId::prefix(), "PAY");
    }

    #[test]
    fn test_display_uses_prefix() {
        assert!(ContactId::new().to_string().starts_with("CNT-"));
        assert!(PaymentId::new_v7().to_string().starts_with("PAY-"));
    }
}
