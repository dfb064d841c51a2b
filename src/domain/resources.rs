//! Model Context Protocol static resource provider
//!
//! Exposes a fixed example Squiggle snippet under a `resource://` URI so
//! clients can discover what the `run-squiggle` tool accepts.

use rust_mcp_sdk::schema::{
    ReadResourceContent, ReadResourceRequestParams, ReadResourceResult, Resource,
    TextResourceContents,
};
use serde_json::{json, Value};

use crate::mcp::rpc::{json_rpc_error, json_rpc_error_with_data, json_rpc_result};

pub const EXAMPLE_RESOURCE_URI: &str = "resource://examples/basic";

pub const EXAMPLE_CODE: &str = r#"// Days until a small project ships
optimistic = 2 to 4
pessimistic = 8 to 16
days = mixture(optimistic, pessimistic, [0.7, 0.3])
chanceLate = cdf(days, 10)
summary = [
  { value: "Median completion: " + String(quantile(days, 0.5)) + " days" },
  { value: "Chance of finishing within 10 days: " + String(chanceLate) },
]
"#;

pub fn build_resources_list() -> Vec<Resource> {
    vec![Resource {
        annotations: None,
        description: Some("Example Squiggle model for the run-squiggle tool".to_string()),
        icons: vec![],
        meta: None,
        mime_type: Some("text/plain".to_string()),
        name: "Example Squiggle Code".to_string(),
        size: None,
        title: None,
        uri: EXAMPLE_RESOURCE_URI.to_string(),
    }]
}

pub fn handle_resources_read(id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let resource_read: ReadResourceRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match resource_read.uri.as_str() {
        EXAMPLE_RESOURCE_URI => {
            let result = serde_json::to_value(ReadResourceResult {
                contents: vec![ReadResourceContent::from(TextResourceContents {
                    meta: None,
                    mime_type: Some("text/plain".to_string()),
                    text: EXAMPLE_CODE.to_string(),
                    uri: EXAMPLE_RESOURCE_URI.to_string(),
                })],
                meta: None,
            })
            .expect("read example result serialization");

            json_rpc_result(id, result)
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "resource_not_found",
                "message": "unknown resource uri",
                "details": {
                    "uri": resource_read.uri,
                },
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{build_resources_list, handle_resources_read, EXAMPLE_RESOURCE_URI};

    #[test]
    fn resources_list_contains_example() {
        let resources = build_resources_list();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].uri, EXAMPLE_RESOURCE_URI);
        assert_eq!(resources[0].mime_type.as_deref(), Some("text/plain"));
    }

    #[test]
    fn reads_example_resource() {
        let response = handle_resources_read(
            Some(json!(1)),
            Some(json!({ "uri": EXAMPLE_RESOURCE_URI })),
        );

        assert_eq!(response["result"]["contents"][0]["uri"], EXAMPLE_RESOURCE_URI);
        let text = response["result"]["contents"][0]["text"]
            .as_str()
            .expect("text content");
        assert!(text.contains("summary"));
    }

    #[test]
    fn unknown_uri_returns_resource_not_found() {
        let response = handle_resources_read(
            Some(json!(2)),
            Some(json!({ "uri": "resource://unknown/item" })),
        );

        assert_eq!(response["error"]["code"], -32601);
        assert_eq!(response["error"]["data"]["code"], "resource_not_found");
    }
}
