//! Result → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): one line per entry, e.g. `UPDATED 1 = "a" (v2)`
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use gotthard_client::ClientReport;
use gotthard_core::{ResultKind, TxnResult, Value};
use serde_json::json;

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn value_json(value: &Value) -> serde_json::Value {
    match value.as_str() {
        Some(s) => json!(s),
        None => json!(value.as_bytes()),
    }
}

fn kind_str(kind: ResultKind) -> &'static str {
    match kind {
        ResultKind::Value => "VALUE",
        ResultKind::Updated => "UPDATED",
    }
}

/// Format a transaction result.
pub fn format_result(result: &TxnResult, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let doc = json!({
                "status": result.status.as_str(),
                "client_id": result.client_id.0,
                "request_id": result.request_id.0,
                "results": result.results.iter().map(|op| json!({
                    "kind": kind_str(op.kind),
                    "key": op.key.as_u32(),
                    "value": value_json(&op.value),
                    "version": op.version.as_u64(),
                })).collect::<Vec<_>>(),
            });
            serde_json::to_string_pretty(&doc)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputMode::Human => {
            let mut lines = vec![format!(
                "{} (client {}, request {})",
                result.status, result.client_id, result.request_id
            )];
            for op in &result.results {
                lines.push(format!(
                    "{} {} = {:?} ({})",
                    kind_str(op.kind),
                    op.key,
                    op.value,
                    op.version
                ));
            }
            lines.join("\n")
        }
    }
}

/// Format the per-client summary of an `inc` run.
pub fn format_reports(reports: &[ClientReport], mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            let doc: Vec<_> = reports
                .iter()
                .map(|r| {
                    json!({
                        "client_id": r.client_id.0,
                        "last_value": r.last_value,
                        "attempts": r.attempts,
                    })
                })
                .collect();
            serde_json::to_string_pretty(&doc)
                .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
        }
        OutputMode::Human => reports
            .iter()
            .map(|r| {
                format!(
                    "client ({:>11}) incremented it to {} in {} attempts",
                    r.client_id.0, r.last_value, r.attempts
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

/// Format an error.
pub fn format_error(err: &anyhow::Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({ "error": format!("{:#}", err) }))
            .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {:#}", err),
    }
}
