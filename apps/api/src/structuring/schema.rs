//! The output schema enforced on the structuring call.
//!
//! Strict structured output requires every property to be listed under
//! `required`, so the optional experience fields are typed `string | null`.

use std::sync::LazyLock;

use serde_json::json;

use crate::llm_client::OutputSchema;

pub static RESUME_SCHEMA: LazyLock<OutputSchema> = LazyLock::new(|| OutputSchema {
    name: "structured_resume",
    schema: json!({
        "type": "object",
        "properties": {
            "name": { "type": "string" },
            "education": {
                "anyOf": [
                    { "type": "array", "items": { "type": "string" } },
                    { "type": "string" }
                ]
            },
            "experience": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "company": { "type": ["string", "null"] },
                        "position": { "type": ["string", "null"] },
                        "duration": { "type": ["string", "null"] },
                        "description": { "type": ["string", "null"] }
                    },
                    "required": ["company", "position", "duration", "description"],
                    "additionalProperties": false
                }
            },
            "skills": {
                "type": "array",
                "items": { "type": "string" }
            },
            "other": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "description": { "type": "string" }
                    },
                    "required": ["name", "description"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["name", "education", "experience", "skills", "other"],
        "additionalProperties": false
    }),
});

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    /// Strict mode rejects any object whose `required` does not list all properties.
    fn assert_strict(node: &Value) {
        if let Some(props) = node.get("properties").and_then(Value::as_object) {
            let required: Vec<&str> = node["required"]
                .as_array()
                .unwrap()
                .iter()
                .filter_map(Value::as_str)
                .collect();
            for key in props.keys() {
                assert!(required.contains(&key.as_str()), "{key} not required");
            }
            assert_eq!(node["additionalProperties"], false);
            props.values().for_each(assert_strict);
        }
        if let Some(items) = node.get("items") {
            assert_strict(items);
        }
        if let Some(variants) = node.get("anyOf").and_then(Value::as_array) {
            variants.iter().for_each(assert_strict);
        }
    }

    #[test]
    fn test_schema_is_strict_compatible() {
        assert_strict(&RESUME_SCHEMA.schema);
    }

    #[test]
    fn test_education_accepts_list_or_string() {
        let variants = RESUME_SCHEMA.schema["properties"]["education"]["anyOf"]
            .as_array()
            .unwrap();
        assert_eq!(variants[0]["type"], "array");
        assert_eq!(variants[1]["type"], "string");
    }
}
