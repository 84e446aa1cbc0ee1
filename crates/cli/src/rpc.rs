// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stdio JSON-RPC transport for the tool surface.
//!
//! Wire format: one JSON-RPC 2.0 object per line on stdin, one response
//! per line on stdout. One session per child process - the assistant
//! spawns `wd serve` and owns its lifetime. Every tool failure comes back
//! as a structured error object, never a trace.

use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use wd_core::{Clock, ErrorCode, ErrorReport, IdGen};
use wd_engine::Tools;

use crate::context::CliTools;

/// JSON-RPC error codes.
const PARSE_ERROR: i64 = -32700;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;
/// All tool-level failures surface under one server-defined code; the
/// `data` payload carries the structured report.
const TOOL_ERROR: i64 = -32000;

#[derive(Debug, Deserialize)]
struct RpcRequest {
    #[serde(default)]
    id: Value,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreflightParams {
    #[serde(default)]
    aggressive: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DoctorParams {
    #[serde(default)]
    output_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcquireParams {
    slots: u32,
    ttl_seconds: u64,
    #[serde(default)]
    reason: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleaseParams {
    lease_id: String,
}

fn ok_response(id: Value, result: Value) -> String {
    json!({ "jsonrpc": "2.0", "id": id, "result": result }).to_string()
}

fn error_response(id: Value, code: i64, message: &str, data: Option<Value>) -> String {
    let mut error = json!({ "code": code, "message": message });
    if let Some(data) = data {
        error["data"] = data;
    }
    json!({ "jsonrpc": "2.0", "id": id, "error": error }).to_string()
}

fn report_response(id: Value, report: &ErrorReport) -> String {
    let data = serde_json::to_value(report).unwrap_or(Value::Null);
    error_response(id, TOOL_ERROR, &report.message, Some(data))
}

fn to_value<T: serde::Serialize>(id: Value, value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(result) => ok_response(id, result),
        Err(e) => report_response(
            id,
            &ErrorReport::new(ErrorCode::Unknown, "failed to serialize reply").with_cause(e),
        ),
    }
}

fn params<T: serde::de::DeserializeOwned>(id: &Value, raw: Value) -> Result<T, String> {
    serde_json::from_value(raw).map_err(|e| {
        error_response(
            id.clone(),
            INVALID_PARAMS,
            &format!("invalid params: {e}"),
            None,
        )
    })
}

/// Handle one request line, returning the response line.
pub async fn handle_line<C: Clock, I: IdGen>(tools: &Tools<C, I>, line: &str) -> String {
    let request: RpcRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            return error_response(Value::Null, PARSE_ERROR, &format!("parse error: {e}"), None)
        }
    };
    let id = request.id.clone();

    match request.method.as_str() {
        "status" => match tools.status().await {
            Ok(reply) => to_value(id, &reply),
            Err(report) => report_response(id, &report),
        },
        "preflight_fix" => {
            let parsed: PreflightParams = match params(&id, request.params) {
                Ok(parsed) => parsed,
                Err(response) => return response,
            };
            match tools.preflight(true, parsed.aggressive).await {
                Ok(reply) => to_value(id, &reply),
                Err(report) => report_response(id, &report),
            }
        }
        "doctor" => {
            let parsed: DoctorParams = match params(&id, request.params) {
                Ok(parsed) => parsed,
                Err(response) => return response,
            };
            match tools.doctor(parsed.output_path).await {
                Ok(reply) => to_value(id, &reply),
                Err(report) => report_response(id, &report),
            }
        }
        "nudge" => match tools.nudge().await {
            Ok(reply) => to_value(id, &reply),
            Err(report) => report_response(id, &report),
        },
        "budget_get" => match tools.budget_get().await {
            Ok(reply) => to_value(id, &reply),
            Err(report) => report_response(id, &report),
        },
        "budget_acquire" => {
            let parsed: AcquireParams = match params(&id, request.params) {
                Ok(parsed) => parsed,
                Err(response) => return response,
            };
            match tools
                .budget_acquire(parsed.slots, parsed.ttl_seconds, parsed.reason)
                .await
            {
                Ok(reply) => to_value(id, &reply),
                Err(report) => report_response(id, &report),
            }
        }
        "budget_release" => {
            let parsed: ReleaseParams = match params(&id, request.params) {
                Ok(parsed) => parsed,
                Err(response) => return response,
            };
            match tools.budget_release(&parsed.lease_id).await {
                Ok(reply) => to_value(id, &reply),
                Err(report) => report_response(id, &report),
            }
        }
        "recovery_plan" => match tools.recovery_plan().await {
            Ok(reply) => to_value(id, &reply),
            Err(report) => report_response(id, &report),
        },
        other => error_response(
            id,
            METHOD_NOT_FOUND,
            &format!("unknown method: {other}"),
            None,
        ),
    }
}

/// Serve requests from stdin until EOF.
pub async fn serve(tools: CliTools) -> std::io::Result<()> {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = handle_line(&tools, &line).await;
        stdout.write_all(response.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        stdout.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "rpc_tests.rs"]
mod tests;
