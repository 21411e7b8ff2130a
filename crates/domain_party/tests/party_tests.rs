//! Tests for domain_party

use domain_party::{Contact, ContactRole, PartyError};

// ============================================================================
// Contact Role Tests
// ============================================================================

mod role_tests {
    use super::*;

    #[test]
    fn test_role_parses_display_names() {
        assert_eq!("Named Insured".parse::<ContactRole>().unwrap(), ContactRole::NamedInsured);
        assert_eq!("Agent".parse::<ContactRole>().unwrap(), ContactRole::Agent);
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert_eq!(
            "Broker".parse::<ContactRole>(),
            Err(PartyError::UnknownRole("Broker".to_string()))
        );
    }

    #[test]
    fn test_role_serializes_with_spaces() {
        let json = serde_json::to_string(&ContactRole::NamedInsured).unwrap();
        assert_eq!(json, "\"Named Insured\"");
    }

    #[test]
    fn test_only_agents_are_agents() {
        assert!(ContactRole::Agent.is_agent());
        assert!(!ContactRole::NamedInsured.is_agent());
    }
}

// ============================================================================
// Contact Tests
// ============================================================================

mod contact_tests {
    use super::*;

    #[test]
    fn test_same_name_different_roles_are_distinct_contacts() {
        let agent = Contact::agent("John Doe").unwrap();
        let insured = Contact::named_insured("John Doe").unwrap();

        assert_ne!(agent.id, insured.id);
        assert_ne!(agent.role, insured.role);
    }

    #[test]
    fn test_with_role_keeps_identity() {
        let contact = Contact::named_insured("Joe Lee").unwrap();
        let id = contact.id;
        let agent = contact.with_role(ContactRole::Agent);

        assert_eq!(agent.id, id);
        assert!(agent.is_agent());
    }

    #[test]
    fn test_overlong_name_rejected() {
        let name = "x".repeat(129);
        assert!(Contact::agent(name).is_err());
    }

    #[test]
    fn test_contact_json_shape() {
        let contact = Contact::named_insured("Ryan Bucket").unwrap();
        let json = serde_json::to_value(&contact).unwrap();

        assert_eq!(json["name"], "Ryan Bucket");
        assert_eq!(json["role"], "Named Insured");
    }
}
