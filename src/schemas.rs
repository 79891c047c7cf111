use serde_json::{Map, Value, json};
use std::sync::Arc;

pub fn analyze_schema() -> Arc<Map<String, Value>> {
    let schema = json!({
        "type": "object",
        "properties": {
            "user_input": {
                "type": "string",
                "description": "Text to run through the analysis pipeline"
            }
        },
        "required": ["user_input"]
    });
    Arc::new(schema.as_object().cloned().unwrap_or_else(Map::new))
}

pub fn analyze_output_schema() -> Arc<Map<String, Value>> {
    let schema = json!({
        "type": "object",
        "properties": {
            "result": {
                "type": "object",
                "properties": {
                    "data": {
                        "type": "object",
                        "additionalProperties": {"type": "string"}
                    }
                },
                "required": ["data"]
            }
        },
        "required": ["result"]
    });
    Arc::new(schema.as_object().cloned().unwrap_or_else(Map::new))
}
