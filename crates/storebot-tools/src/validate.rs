//! Argument validation against a tool's JSON-schema parameter specification.

/// Validates `arguments` against `schema` and returns the normalized argument
/// object with declared defaults applied for missing optional fields.
///
/// Checks performed:
/// - the arguments must be a JSON object (`null` is treated as empty);
/// - every name in the schema's `required` array must be present;
/// - every provided property with a declared `type` must match it;
/// - missing optional properties with a `default` get that default.
///
/// Properties not mentioned in the schema pass through untouched; generation
/// backends occasionally add extras and rejecting them helps nobody.
pub fn validate_arguments(
    schema: &serde_json::Value,
    arguments: &serde_json::Value,
) -> Result<serde_json::Value, String> {
    let mut args = match arguments {
        serde_json::Value::Null => serde_json::Map::new(),
        serde_json::Value::Object(map) => map.clone(),
        other => {
            return Err(format!(
                "arguments must be an object, got {}",
                type_name(other)
            ))
        }
    };

    let empty = serde_json::Map::new();
    let properties = schema["properties"].as_object().unwrap_or(&empty);

    if let Some(required) = schema["required"].as_array() {
        for name in required.iter().filter_map(|v| v.as_str()) {
            if !args.contains_key(name) {
                return Err(format!("missing required field '{name}'"));
            }
        }
    }

    for (name, spec) in properties {
        match args.get(name) {
            Some(value) => {
                if let Some(expected) = spec["type"].as_str() {
                    if !type_matches(expected, value) {
                        return Err(format!(
                            "field '{}' expected {}, got {}",
                            name,
                            expected,
                            type_name(value)
                        ));
                    }
                }
                if let Some(allowed) = spec["enum"].as_array() {
                    if !allowed.contains(value) {
                        return Err(format!(
                            "field '{name}' must be one of {allowed:?}, got {value}"
                        ));
                    }
                }
            }
            None => {
                if let Some(default) = spec.get("default") {
                    args.insert(name.clone(), default.clone());
                }
            }
        }
    }

    Ok(serde_json::Value::Object(args))
}

fn type_matches(expected: &str, value: &serde_json::Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        // Unknown type keyword: don't reject what we can't check.
        _ => true,
    }
}

fn type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
