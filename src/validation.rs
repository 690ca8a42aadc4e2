//! Schema validation helpers.
//!
//! Validates `serde_json::Value` configuration against a [`Schema`] before
//! any request is issued, mirroring the constraints the control plane
//! enforces so misconfiguration fails fast with a precise diagnostic.
//!
//! # Example
//!
//! ```
//! use neon_provider::schema::{Attribute, Schema, Validator};
//! use neon_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute(
//!         "name",
//!         Attribute::required_string().with_validator(Validator::LengthBetween(1, 64)),
//!     )
//!     .with_attribute("region_id", Attribute::required_string());
//!
//! let diagnostics = validate(&schema, &json!({ "name": "mine", "region_id": "aws-us-east-2" }));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate(&schema, &json!({ "name": "mine" }));
//! assert_eq!(diagnostics[0].attribute, Some("region_id".to_string()));
//! ```

use regex::Regex;
use serde_json::Value;

use crate::schema::{Attribute, AttributeType, Diagnostic, Schema, Validator};

/// Pattern every platform identifier must match.
const ID_PATTERN: &str = "^[-0-9a-z]+$";

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any violations found; an empty list
/// means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present and non-null.
/// - Optional attributes may be absent or null.
/// - Computed-only attributes are skipped (the platform sets these).
/// - Present values must match the declared type and pass every attached
///   [`Validator`].
/// - Object attributes are validated recursively.
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_attributes(&schema.attributes, value, "", &mut diagnostics);
    diagnostics
}

/// Validate a JSON value against a schema, returning `Err` with the
/// diagnostics when anything is violated.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_attributes(
    attributes: &std::collections::HashMap<String, Attribute>,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value)))
                    .with_attribute(path),
            );
            return;
        }
    };

    for (name, attr) in attributes {
        let attr_path = join_path(path, name);
        validate_attribute(attr, obj.get(name), &attr_path, diagnostics);
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    // Computed-only attributes are filled in by the platform.
    if attr.flags.computed && !attr.flags.optional && !attr.flags.required {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        }
        Some(v) => {
            validate_type(&attr.attr_type, v, path, diagnostics);
            for validator in &attr.validators {
                apply_validator(validator, v, path, diagnostics);
            }
        }
    }
}

fn validate_type(attr_type: &AttributeType, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        }
        AttributeType::Int64 => {
            if !value.is_i64() && !value.is_u64() {
                diagnostics.push(type_error(path, "int64", value));
            }
        }
        AttributeType::Float64 => {
            if !value.is_number() {
                diagnostics.push(type_error(path, "float64", value));
            }
        }
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        }
        AttributeType::Object(attrs) => {
            if value.is_object() {
                validate_attributes(attrs, value, path, diagnostics);
            } else {
                diagnostics.push(type_error(path, "object", value));
            }
        }
    }
}

fn apply_validator(validator: &Validator, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    match validator {
        Validator::MinLength(min) => {
            if let Some(s) = value.as_str() {
                if s.chars().count() < *min {
                    diagnostics.push(
                        Diagnostic::error(format!("Attribute '{}' is too short", path))
                            .with_detail(format!("Must be at least {} character(s)", min))
                            .with_attribute(path),
                    );
                }
            }
        }
        Validator::LengthBetween(min, max) => {
            if let Some(s) = value.as_str() {
                let len = s.chars().count();
                if len < *min || len > *max {
                    diagnostics.push(
                        Diagnostic::error(format!("Attribute '{}' has invalid length", path))
                            .with_detail(format!("Must be between {} and {} characters", min, max))
                            .with_attribute(path),
                    );
                }
            }
        }
        Validator::IntBetween(min, max) => {
            if let Some(n) = value.as_i64() {
                if n < *min || n > *max {
                    diagnostics.push(
                        Diagnostic::error(format!("Attribute '{}' is out of range", path))
                            .with_detail(format!("Must be between {} and {}", min, max))
                            .with_attribute(path),
                    );
                }
            }
        }
        Validator::IntOneOf(allowed) => {
            if let Some(n) = value.as_i64() {
                if !allowed.contains(&n) {
                    diagnostics.push(
                        Diagnostic::error(format!("Attribute '{}' has unsupported value", path))
                            .with_detail(format!("Must be one of {:?}, got {}", allowed, n))
                            .with_attribute(path),
                    );
                }
            }
        }
        Validator::FloatOneOf(allowed) => {
            if let Some(n) = value.as_f64() {
                if !allowed.contains(&n) {
                    diagnostics.push(
                        Diagnostic::error(format!("Attribute '{}' has unsupported value", path))
                            .with_detail(format!("Must be one of {:?}, got {}", allowed, n))
                            .with_attribute(path),
                    );
                }
            }
        }
        Validator::Id => {
            if let Some(s) = value.as_str() {
                let re = Regex::new(ID_PATTERN).expect("id pattern is valid");
                if !re.is_match(s) {
                    diagnostics.push(
                        Diagnostic::error(format!("Attribute '{}' must be an id", path))
                            .with_detail(format!("Must match {}, got {:?}", ID_PATTERN, s))
                            .with_attribute(path),
                    );
                }
            }
        }
    }
}

fn type_error(path: &str, expected: &str, value: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(value)))
        .with_attribute(path)
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}
