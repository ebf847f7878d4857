use serde_json::Value;

use super::id;
use crate::format::{items, pick, render_list, Summary};
use crate::platform::Operation;
use crate::registry::ToolDescriptor;
use crate::schema::{Param, ParamType};

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "create_deployment",
            Operation::DeploymentsCreate,
            "creating deployment",
            "Deploy a chat version to Vercel.",
        )
        .params(vec![
            id("projectId", "Project ID"),
            id("chatId", "Chat ID"),
            id("versionId", "Version to deploy"),
        ])
        .render(render_created_deployment),
        ToolDescriptor::new(
            "get_deployment",
            Operation::DeploymentsGetById,
            "getting deployment",
            "Get a deployment's status and URLs.",
        )
        .params(vec![id("deploymentId", "Deployment ID")])
        .read_only()
        .render(render_deployment),
        ToolDescriptor::new(
            "find_deployments",
            Operation::DeploymentsFind,
            "finding deployments",
            "List the deployments of one chat version.",
        )
        .params(vec![
            id("projectId", "Project ID"),
            id("chatId", "Chat ID"),
            id("versionId", "Version ID"),
        ])
        .read_only()
        .render(render_deployment_list),
        ToolDescriptor::new(
            "delete_deployment",
            Operation::DeploymentsDelete,
            "deleting deployment",
            "Delete a deployment.",
        )
        .params(vec![id("deploymentId", "Deployment ID")])
        .destructive()
        .idempotent()
        .render(render_deleted_deployment),
        ToolDescriptor::new(
            "find_deployment_logs",
            Operation::DeploymentsFindLogs,
            "finding deployment logs",
            "Get build and runtime logs for a deployment.",
        )
        .params(vec![
            id("deploymentId", "Deployment ID"),
            Param::optional(
                "since",
                ParamType::Integer,
                "Only logs after this Unix timestamp in milliseconds",
            ),
        ])
        .read_only()
        .render(render_logs),
        ToolDescriptor::new(
            "find_deployment_errors",
            Operation::DeploymentsFindErrors,
            "finding deployment errors",
            "Get the errors a deployment produced.",
        )
        .params(vec![id("deploymentId", "Deployment ID")])
        .read_only()
        .render(render_errors),
    ]
}

fn deployment_summary(heading: &str, deployment: &Value) -> Summary {
    Summary::new(heading)
        .field("ID", deployment, &["/id"])
        .field("Status", deployment, &["/status"])
        .field("URL", deployment, &["/webUrl", "/url"])
        .field("Inspector", deployment, &["/inspectorUrl"])
        .field("Chat ID", deployment, &["/chatId"])
        .field("Version ID", deployment, &["/versionId"])
}

fn render_created_deployment(deployment: &Value) -> String {
    deployment_summary("Deployment created", deployment).finish()
}

fn render_deployment(deployment: &Value) -> String {
    deployment_summary("Deployment", deployment)
        .field("Project ID", deployment, &["/projectId"])
        .finish()
}

fn deployment_line(deployment: &Value) -> String {
    let id = pick(deployment, &["/id"]).unwrap_or_else(|| "unknown".to_string());
    let mut line = id;
    if let Some(status) = pick(deployment, &["/status"]) {
        line.push_str(&format!(" [{}]", status));
    }
    if let Some(url) = pick(deployment, &["/webUrl", "/url"]) {
        line.push_str(&format!(" {}", url));
    }
    line
}

fn render_deployment_list(response: &Value) -> String {
    render_list(response, "deployments", deployment_line)
}

fn render_deleted_deployment(response: &Value) -> String {
    match pick(response, &["/id"]) {
        Some(id) => format!("Deleted deployment {}", id),
        None => "Deployment deleted".to_string(),
    }
}

/// Log entries are either plain strings or objects with a message.
fn log_text(entry: &Value) -> Option<String> {
    match entry {
        Value::String(s) => Some(s.clone()),
        other => pick(other, &["/message", "/text"]),
    }
}

fn render_logs(response: &Value) -> String {
    let logs = response
        .get("logs")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_else(|| items(response));
    if logs.is_empty() {
        return "No logs found.".to_string();
    }

    let mut text = format!("Deployment logs ({} lines):", logs.len());
    for line in logs.iter().filter_map(log_text) {
        text.push('\n');
        text.push_str(&line);
    }
    if let Some(next) = pick(response, &["/nextSince"]) {
        text.push_str(&format!("\nNext since: {}", next));
    }
    text
}

fn render_errors(response: &Value) -> String {
    if let Some(error) = pick(response, &["/error"]) {
        let mut text = format!("Deployment error: {}", error);
        if let Some(kind) = pick(response, &["/errorType"]) {
            text.push_str(&format!(" ({})", kind));
        }
        if let Some(full) = pick(response, &["/fullErrorText"]) {
            text.push('\n');
            text.push_str(&full);
        }
        return text;
    }

    let errors = items(response);
    if errors.is_empty() {
        return "No deployment errors found.".to_string();
    }
    let mut text = format!("Found {} deployment errors:", errors.len());
    for error in errors.iter().filter_map(log_text) {
        text.push_str("\n- ");
        text.push_str(&error);
    }
    text
}
