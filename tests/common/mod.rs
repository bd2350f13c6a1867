// Common test utilities shared across test files

use halkit::{UriTemplate, Value, Variables};

/// Build a binding from name/value pairs
#[allow(dead_code)]
pub fn vars(pairs: &[(&str, Value)]) -> Variables {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

/// Parse and expand in one step
#[allow(dead_code)]
pub fn expand(template: &str, variables: &Variables) -> String {
    UriTemplate::parse(template)
        .expect("Failed to parse template")
        .expand(variables)
}

/// A small HAL root document in the shape discovery services publish
#[allow(dead_code)]
pub fn root_document() -> serde_json::Value {
    serde_json::json!({
        "_links": {
            "self": {"href": "https://api.example.com/v1/"},
            "orders": {"href": "orders{?page,size}", "templated": true, "title": "Orders"},
            "order": {"href": "orders/{id}", "templated": true},
            "invenue:promo-groups:update": "https://api.example.com/v1/invenue-service/promo-groups/{promoGroupId}",
            "status": {"href": "status"}
        },
        "version": "1.4"
    })
}
