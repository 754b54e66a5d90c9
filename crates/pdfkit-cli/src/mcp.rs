//! MCP (Model Context Protocol) server implementation

use pdfkit::{OperationArgs, Tool};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::io::{self, BufRead, Write};
use tracing::{debug, error};

/// URI of the masked configuration resource
const CONFIG_RESOURCE_URI: &str = "config://settings";

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP Server implementation
struct McpServer {
    tool: Tool,
}

impl McpServer {
    fn new(tool: Tool) -> Self {
        Self { tool }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "resources/list" => self.handle_resources_list(request.id),
            "resources/read" => self.handle_resources_read(request.id, request.params),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "notifications/initialized" => {
                // This is a notification, no response needed
                JsonRpcResponse::success(request.id, json!(null))
            }
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {},
                    "resources": {}
                },
                "serverInfo": {
                    "name": "pdfkit",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools: Vec<Value> = self
            .tool
            .operations()
            .map(|op| {
                json!({
                    "name": op.name,
                    "description": op.description,
                    "inputSchema": op.schema_json()
                })
            })
            .collect();

        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if self.tool.operation(tool_name).is_none() {
            return JsonRpcResponse::error(id, -32602, format!("Unknown tool: {}", tool_name));
        }

        let arguments: OperationArgs = match params.get("arguments") {
            None | Some(Value::Null) => OperationArgs::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return JsonRpcResponse::error(
                    id,
                    -32602,
                    "Invalid arguments: expected an object",
                );
            }
        };

        debug!(tool = tool_name, "tools/call");

        // Every outcome, errors included, is reported as text
        let text = self.tool.invoke(tool_name, &arguments).await;

        JsonRpcResponse::success(
            id,
            json!({
                "content": [{
                    "type": "text",
                    "text": text
                }]
            }),
        )
    }

    fn handle_resources_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "resources": [{
                    "uri": CONFIG_RESOURCE_URI,
                    "name": "settings",
                    "description": "Get current configuration settings.",
                    "mimeType": "application/json"
                }]
            }),
        )
    }

    fn handle_resources_read(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let uri = params
            .get("uri")
            .and_then(|v| v.as_str())
            .unwrap_or_default();

        if uri != CONFIG_RESOURCE_URI {
            return JsonRpcResponse::error(id, -32602, format!("Unknown resource: {}", uri));
        }

        JsonRpcResponse::success(
            id,
            json!({
                "contents": [{
                    "uri": CONFIG_RESOURCE_URI,
                    "mimeType": "application/json",
                    "text": self.tool.config_resource()
                }]
            }),
        )
    }
}

/// Run the MCP server over stdio
pub async fn run_server(tool: Tool) {
    let server = McpServer::new(tool);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("Error reading stdin: {}", e);
                continue;
            }
        };

        if line.is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                let json = serde_json::to_string(&response).unwrap_or_default();
                let _ = writeln!(stdout, "{}", json);
                let _ = stdout.flush();
                continue;
            }
        };

        // Skip notifications (no id)
        if request.id.is_none() && request.method.starts_with("notifications/") {
            continue;
        }

        let response = server.handle_request(request).await;
        let json = serde_json::to_string(&response).unwrap_or_default();
        let _ = writeln!(stdout, "{}", json);
        let _ = stdout.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfkit::{Config, MISSING_CONFIG_MESSAGE};

    fn server(config: Config) -> McpServer {
        McpServer::new(Tool::builder().config(config).build())
    }

    fn request(method: &str, params: Value) -> JsonRpcRequest {
        JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: Some(json!(1)),
            method: method.to_string(),
            params,
        }
    }

    #[tokio::test]
    async fn test_initialize() {
        let response = server(Config::default())
            .handle_request(request("initialize", json!({})))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "pdfkit");
        assert!(result["capabilities"]["resources"].is_object());
    }

    #[tokio::test]
    async fn test_tools_list() {
        let response = server(Config::default())
            .handle_request(request("tools/list", json!({})))
            .await;
        let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
        assert_eq!(tools.len(), 8);
        assert_eq!(tools[3]["name"], "post_merge");
        assert!(tools[3]["inputSchema"]["properties"]["urls"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_missing_config() {
        let response = server(Config::default())
            .handle_request(request(
                "tools/call",
                json!({"name": "post_merge", "arguments": {"urls": "[]"}}),
            ))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["content"][0]["type"], "text");
        assert_eq!(result["content"][0]["text"], MISSING_CONFIG_MESSAGE);
    }

    #[tokio::test]
    async fn test_tools_call_unknown_tool() {
        let response = server(Config::default())
            .handle_request(request("tools/call", json!({"name": "post_nothing"})))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_tools_call_bad_arguments() {
        let response = server(Config::default())
            .handle_request(request(
                "tools/call",
                json!({"name": "post_merge", "arguments": ["not", "an", "object"]}),
            ))
            .await;
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_resources_read_masks_token() {
        let response = server(Config::new("https://api.test", "secret-token"))
            .handle_request(request(
                "resources/read",
                json!({"uri": "config://settings"}),
            ))
            .await;
        let result = response.result.unwrap();
        let text = result["contents"][0]["text"].as_str().unwrap();
        assert!(!text.contains("secret-token"));
        assert!(text.contains("\"***\""));
        assert!(text.contains("https://api.test"));
    }

    #[tokio::test]
    async fn test_resources_list() {
        let response = server(Config::default())
            .handle_request(request("resources/list", json!({})))
            .await;
        let result = response.result.unwrap();
        assert_eq!(result["resources"][0]["uri"], "config://settings");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let response = server(Config::default())
            .handle_request(request("prompts/list", json!({})))
            .await;
        assert_eq!(response.error.unwrap().code, -32601);
    }
}
