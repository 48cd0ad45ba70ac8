//! JSON Schema generation for the overlay configuration.

use crate::config::OverlayConfig;

/// Generates a JSON Schema for the overlay configuration.
///
/// The schema includes all configuration options with their types,
/// descriptions, and default values.
#[must_use]
pub fn generate_schema() -> schemars::Schema {
    let mut schema = schemars::schema_for!(OverlayConfig);

    if let Some(obj) = schema.as_object_mut() {
        obj.insert("$id".to_string(), serde_json::json!("pfd-traffic-map.schema.json"));
    }

    schema
}

/// Generates a JSON Schema string for the overlay configuration.
///
/// Returns a pretty-printed JSON string that can be saved to a file
/// or used for validation.
#[must_use]
pub fn generate_schema_json() -> String {
    let schema = generate_schema();
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}
