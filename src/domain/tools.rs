//! Interactive tools exposed via Model Context Protocol
//!
//! Provides the `run-squiggle` implementation by delegating evaluation to the
//! configured `Evaluator` and normalizing the outcome into text content.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::format::format_outcome;
use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};
use crate::AppState;

pub const RUN_SQUIGGLE_TOOL: &str = "run-squiggle";

#[derive(Debug, Deserialize)]
pub struct RunSquiggleParams {
    pub code: String,
    pub render_summary: Option<String>,
}

#[macros::mcp_tool(
    name = "run-squiggle",
    description = "Runs Squiggle code and returns the result."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
pub struct RunSquiggleTool {
    /// The Squiggle code to run.
    pub code: String,
    /// If "true", the binding named "summary" is rendered as newline-joined
    /// lines instead of the generic bindings dump. Default "false".
    pub render_summary: Option<String>,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![RunSquiggleTool::tool()]
}

/// Only the exact string "true" opts in; every other value is falsy.
pub fn summary_requested(render_summary: Option<&str>) -> bool {
    render_summary == Some("true")
}

pub async fn handle_tools_call(state: &AppState, id: Option<Value>, params: Option<Value>) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match tool_call.name.as_str() {
        RUN_SQUIGGLE_TOOL => {
            let params: RunSquiggleParams =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            let render_summary = summary_requested(params.render_summary.as_deref());

            // Evaluation failures are data and still produce a successful
            // response; only infrastructure errors become JSON-RPC errors.
            match state.evaluator.evaluate(&params.code).await {
                Ok(outcome) => {
                    let text = format_outcome(&outcome, render_summary);
                    json_rpc_result(
                        id,
                        serde_json::to_value(CallToolResult {
                            content: vec![ContentBlock::from(TextContent::new(text, None, None))],
                            is_error: None,
                            meta: None,
                            structured_content: None,
                        })
                        .expect("run-squiggle tool result serialization"),
                    )
                }
                Err(err) => app_error_to_json_rpc(id, err),
            }
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{build_tools_list, summary_requested};

    #[test]
    fn only_literal_true_enables_summary_mode() {
        assert!(summary_requested(Some("true")));
        assert!(!summary_requested(Some("false")));
        assert!(!summary_requested(Some("TRUE")));
        assert!(!summary_requested(Some("yes")));
        assert!(!summary_requested(Some(" true ")));
        assert!(!summary_requested(None));
    }

    #[test]
    fn tools_list_contains_run_squiggle() {
        let tools = build_tools_list();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "run-squiggle");
    }
}
