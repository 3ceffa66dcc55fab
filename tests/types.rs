// ABOUTME: Integration tests for validated names and image references.
// ABOUTME: Property tests cover the name alphabets and the derived resource names.

use azdeploy::types::*;
use proptest::prelude::*;

mod app_name_tests {
    use super::*;

    #[test]
    fn accepts_lowercase_labels() {
        for valid in ["ab", "orders-api", "app2", "a1-b2-c3"] {
            assert!(AppName::new(valid).is_ok(), "{valid} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_names() {
        assert_eq!(AppName::new("a"), Err(AppNameError::TooShort));
        assert_eq!(AppName::new(&"a".repeat(61)), Err(AppNameError::TooLong));
        assert_eq!(AppName::new("-app"), Err(AppNameError::StartsWithHyphen));
        assert_eq!(AppName::new("app-"), Err(AppNameError::EndsWithHyphen));
        assert_eq!(AppName::new("MyApp"), Err(AppNameError::NotLowercase));
        assert_eq!(AppName::new("my_app"), Err(AppNameError::InvalidChar('_')));
    }

    #[test]
    fn resource_group_is_named_after_deployment() {
        let name = AppName::new("checkout").unwrap();
        assert_eq!(name.resource_group().as_str(), "checkout");
    }

    proptest! {
        #[test]
        fn valid_names_round_trip(name in "[a-z0-9][a-z0-9-]{0,58}[a-z0-9]") {
            let parsed = AppName::new(&name).unwrap();
            prop_assert_eq!(parsed.as_str(), name.as_str());
            prop_assert_eq!(parsed.to_string(), name.clone());
            prop_assert!(ResourceGroupName::new(parsed.resource_group().as_str()).is_ok());
        }

        #[test]
        fn derived_names_fit_provider_limits(name in "[a-z0-9][a-z0-9-]{0,58}[a-z0-9]") {
            let parsed = AppName::new(&name).unwrap();

            let storage = parsed.storage_account_name();
            prop_assert!((3..=24).contains(&storage.len()));
            prop_assert!(storage.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));

            let registry = parsed.registry_name();
            prop_assert!((5..=50).contains(&registry.len()));
            prop_assert!(registry.chars().all(|c| c.is_ascii_alphanumeric()));

            let app = parsed.container_app_name();
            prop_assert!(!app.is_empty() && app.len() <= 32);
            prop_assert!(!app.ends_with('-'));
        }

        #[test]
        fn uppercase_is_always_rejected(prefix in "[a-z]{1,10}", upper in "[A-Z]", suffix in "[a-z]{1,10}") {
            let name = format!("{prefix}{upper}{suffix}");
            prop_assert_eq!(AppName::new(&name), Err(AppNameError::NotLowercase));
        }
    }
}

mod resource_group_name_tests {
    use super::*;

    #[test]
    fn accepts_provider_alphabet() {
        for valid in ["rg", "RG_Prod", "team.(eu)-1", "x"] {
            assert!(ResourceGroupName::new(valid).is_ok(), "{valid} should be valid");
        }
    }

    #[test]
    fn rejects_invalid_names() {
        assert_eq!(ResourceGroupName::new(""), Err(ResourceGroupNameError::Empty));
        assert_eq!(
            ResourceGroupName::new(&"g".repeat(91)),
            Err(ResourceGroupNameError::TooLong)
        );
        assert_eq!(
            ResourceGroupName::new("group."),
            Err(ResourceGroupNameError::EndsWithPeriod)
        );
        assert_eq!(
            ResourceGroupName::new("a/b"),
            Err(ResourceGroupNameError::InvalidChar('/'))
        );
    }

    proptest! {
        #[test]
        fn names_up_to_ninety_characters_are_accepted(name in "[A-Za-z0-9_()-][A-Za-z0-9_.()-]{0,88}[A-Za-z0-9_()-]") {
            prop_assert!(ResourceGroupName::new(&name).is_ok());
        }

        #[test]
        fn spaces_are_rejected(left in "[a-z]{1,20}", right in "[a-z]{1,20}") {
            let name = format!("{left} {right}");
            prop_assert_eq!(
                ResourceGroupName::new(&name),
                Err(ResourceGroupNameError::InvalidChar(' '))
            );
        }
    }
}

mod image_ref_tests {
    use super::*;

    #[test]
    fn parse_with_tag() {
        let img = ImageRef::parse("crdemo.azurecr.io/orders-api:20240501123000").unwrap();
        assert_eq!(img.registry(), "crdemo.azurecr.io");
        assert_eq!(img.repository(), "orders-api");
        assert_eq!(img.tag(), "20240501123000");
    }

    #[test]
    fn tag_defaults_to_latest() {
        let img = ImageRef::parse("crdemo.azurecr.io/team/app").unwrap();
        assert_eq!(img.repository(), "team/app");
        assert_eq!(img.tag(), "latest");
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        let img = ImageRef::parse("localhost:5000/app").unwrap();
        assert_eq!(img.registry(), "localhost:5000");
        assert_eq!(img.repository(), "app");
        assert_eq!(img.tag(), "latest");
    }

    #[test]
    fn display_is_fully_qualified() {
        let img = ImageRef::new("crdemo.azurecr.io", "app", "v1");
        assert_eq!(img.to_string(), "crdemo.azurecr.io/app:v1");
        assert_eq!(ImageRef::parse(&img.to_string()).unwrap(), img);
    }

    #[test]
    fn rejects_invalid_references() {
        assert_eq!(ImageRef::parse("  "), Err(ParseImageRefError::Empty));
        assert!(matches!(
            ImageRef::parse("nginx"),
            Err(ParseImageRefError::MissingRegistry(_))
        ));
        assert_eq!(
            ImageRef::parse("cr.io/app@sha256"),
            Err(ParseImageRefError::InvalidChar('@'))
        );
    }
}
