// Integration tests for the discovery service

use halkit::config::DiscoverySettings;
use halkit::{DiscoveryError, Entity, ServiceDiscovery, Variables};

mod common;

const SETTINGS: &str = r#"
api_root: https://api.example.com/v1/
overlay:
  - name: status
    template: https://status.example.com/{region}
underlay:
  - name: legacy
    template: legacy/{id}
  - name: orders
    template: /never-used
"#;

fn discovery() -> ServiceDiscovery {
    let settings = DiscoverySettings::from_yaml_str(SETTINGS).unwrap();
    let mut discovery = ServiceDiscovery::from_settings(&settings).unwrap();
    discovery.load_root(&common::root_document()).unwrap();
    discovery
}

#[test]
fn test_lookup_precedence() {
    let discovery = discovery();

    // overlay beats the root document
    let vars = Variables::new().with("region", "au");
    assert_eq!(
        discovery.url_for("status", &vars).unwrap().as_str(),
        "https://status.example.com/au"
    );

    // root document beats the underlay
    let vars = Variables::new().with("page", "3").with("size", "20");
    assert_eq!(
        discovery.url_for("orders", &vars).unwrap().as_str(),
        "https://api.example.com/v1/orders?page=3&size=20"
    );

    // underlay is the fallback
    let vars = Variables::new().with("id", "77");
    assert_eq!(
        discovery.url_for("legacy", &vars).unwrap().as_str(),
        "https://api.example.com/v1/legacy/77"
    );
}

#[test]
fn test_variable_names_for_entries() {
    let discovery = discovery();
    assert_eq!(
        discovery.variable_names_for("order"),
        Some(vec!["id".to_string()])
    );
    assert_eq!(
        discovery.variable_names_for("status"),
        Some(vec!["region".to_string()])
    );
    assert_eq!(discovery.variable_names_for("nope"), None);
}

#[test]
fn test_named_entity_with_json_variables() {
    let discovery = discovery();
    let vars = Variables::from_json(&serde_json::json!({"promoGroupId": "12345"})).unwrap();
    let entity = Entity::named("invenue:promo-groups:update").with_variables(vars);
    assert_eq!(
        discovery.resolve(&entity).unwrap().as_str(),
        "https://api.example.com/v1/invenue-service/promo-groups/12345"
    );
}

#[test]
fn test_missing_entity() {
    let discovery = discovery();
    let entity = Entity::named("does-not-exist");
    assert_eq!(
        discovery.resolve(&entity),
        Err(DiscoveryError::EntityNotFound("does-not-exist".to_string()))
    );
}

#[test]
fn test_linked_entity_relative_to_api_root() {
    let discovery = discovery();
    let entity = Entity::linked("accounts/{accountNumber}/transactions{?count}")
        .with_variables(Variables::new().with("accountNumber", "A1").with("count", "5"));
    assert_eq!(
        discovery.resolve(&entity).unwrap().as_str(),
        "https://api.example.com/v1/accounts/A1/transactions?count=5"
    );
}

#[test]
fn test_invalid_settings_template() {
    let yml = r#"
api_root: https://api.example.com/
overlay:
  - name: broken
    template: "/x/{"
"#;
    let settings = DiscoverySettings::from_yaml_str(yml).unwrap();
    let err = ServiceDiscovery::from_settings(&settings).unwrap_err();
    assert!(err.to_string().contains("broken"));
}

#[test]
fn test_load_root_rejects_non_object() {
    let mut discovery = discovery();
    let err = discovery.load_root(&serde_json::json!([1, 2])).unwrap_err();
    assert!(matches!(err, DiscoveryError::Parsing(_)));
}
