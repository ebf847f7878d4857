use serde_json::{json, Value};

use super::id;
use crate::adapter::rename_env_var_ids;
use crate::format::{items, name_and_id, pick, render_list, Summary};
use crate::platform::Operation;
use crate::registry::ToolDescriptor;
use crate::schema::{Param, ParamType};

const PROJECT_PRIVACY: &[&str] = &["private", "team"];

fn env_vars(required: bool) -> Param {
    let ty = ParamType::array_of(ParamType::object(vec![
        Param::required("key", ParamType::String, "Variable name"),
        Param::required("value", ParamType::String, "Variable value"),
    ]));
    let description = "Environment variables as key/value pairs";
    if required {
        Param::required("environmentVariables", ty, description)
    } else {
        Param::optional("environmentVariables", ty, description)
    }
}

fn decrypted() -> Param {
    Param::optional("decrypted", ParamType::Boolean, "Return values in plain text")
        .with_default(json!(false))
}

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "create_project",
            Operation::ProjectsCreate,
            "creating project",
            "Create a project to group chats, instructions and environment variables.",
        )
        .params(vec![
            Param::required("name", ParamType::String, "Project name"),
            Param::optional("description", ParamType::String, "Project description"),
            Param::optional("icon", ParamType::String, "Icon name"),
            env_vars(false),
            Param::optional("instructions", ParamType::String, "Instructions applied to every chat"),
            Param::optional("vercelProjectId", ParamType::String, "Vercel project to link"),
            Param::optional("privacy", ParamType::one_of(PROJECT_PRIVACY), "Who can see the project"),
        ])
        .render(render_created_project),
        ToolDescriptor::new(
            "get_project",
            Operation::ProjectsGetById,
            "getting project",
            "Get a project's details and its chats.",
        )
        .params(vec![id("projectId", "Project ID")])
        .read_only()
        .render(render_project),
        ToolDescriptor::new(
            "find_projects",
            Operation::ProjectsFind,
            "finding projects",
            "List your projects.",
        )
        .read_only()
        .render(render_project_list),
        ToolDescriptor::new(
            "update_project",
            Operation::ProjectsUpdate,
            "updating project",
            "Change a project's name, description, instructions or privacy.",
        )
        .params(vec![
            id("projectId", "Project ID"),
            Param::optional("name", ParamType::String, "New name"),
            Param::optional("description", ParamType::String, "New description"),
            Param::optional("instructions", ParamType::String, "New instructions"),
            Param::optional("privacy", ParamType::one_of(PROJECT_PRIVACY), "Who can see the project"),
        ])
        .idempotent()
        .render(render_project),
        ToolDescriptor::new(
            "delete_project",
            Operation::ProjectsDelete,
            "deleting project",
            "Delete a project permanently.",
        )
        .params(vec![id("projectId", "Project ID")])
        .destructive()
        .idempotent()
        .render(render_deleted_project),
        ToolDescriptor::new(
            "get_project_by_chat",
            Operation::ProjectsGetByChatId,
            "getting project for chat",
            "Get the project a chat belongs to.",
        )
        .params(vec![id("chatId", "Chat ID")])
        .read_only()
        .render(render_project),
        ToolDescriptor::new(
            "assign_project_to_chat",
            Operation::ProjectsAssign,
            "assigning project to chat",
            "Move a chat into a project.",
        )
        .params(vec![id("projectId", "Project ID"), id("chatId", "Chat to assign")])
        .idempotent()
        .render(render_assigned),
        ToolDescriptor::new(
            "find_env_vars",
            Operation::ProjectsFindEnvVars,
            "finding environment variables",
            "List a project's environment variables.",
        )
        .params(vec![id("projectId", "Project ID"), decrypted()])
        .read_only()
        .render(render_env_var_list),
        ToolDescriptor::new(
            "create_env_vars",
            Operation::ProjectsCreateEnvVars,
            "creating environment variables",
            "Add environment variables to a project.",
        )
        .params(vec![
            id("projectId", "Project ID"),
            env_vars(true),
            Param::optional("upsert", ParamType::Boolean, "Overwrite variables that already exist")
                .with_default(json!(false)),
            decrypted(),
        ])
        .render(render_env_var_list),
        ToolDescriptor::new(
            "delete_env_vars",
            Operation::ProjectsDeleteEnvVars,
            "deleting environment variables",
            "Remove environment variables from a project by ID.",
        )
        .params(vec![
            id("projectId", "Project ID"),
            Param::required(
                "ids",
                ParamType::array_of(ParamType::String),
                "Environment variable IDs to delete",
            ),
        ])
        .reshape(rename_env_var_ids)
        .destructive()
        .idempotent()
        .render(render_deleted_env_vars),
    ]
}

fn project_summary(heading: &str, project: &Value) -> Summary {
    Summary::new(heading)
        .field("ID", project, &["/id"])
        .field("Name", project, &["/name"])
        .field("Privacy", project, &["/privacy"])
        .field("Vercel project", project, &["/vercelProjectId"])
        .field("URL", project, &["/webUrl", "/url"])
}

fn render_created_project(project: &Value) -> String {
    project_summary("Project created", project).finish()
}

fn render_project(project: &Value) -> String {
    let mut text = project_summary("Project", project)
        .field("Description", project, &["/description"])
        .finish();

    let chats = project.get("chats").map(items).unwrap_or(&[]);
    if !chats.is_empty() {
        text.push_str(&format!("\nChats ({}):", chats.len()));
        for chat in chats {
            text.push_str("\n- ");
            text.push_str(&name_and_id(chat, &["/name", "/title"]));
        }
    }
    text
}

fn render_project_list(response: &Value) -> String {
    render_list(response, "projects", |p| name_and_id(p, &["/name"]))
}

fn render_deleted_project(response: &Value) -> String {
    match pick(response, &["/id"]) {
        Some(id) => format!("Deleted project {}", id),
        None => "Project deleted".to_string(),
    }
}

fn render_assigned(response: &Value) -> String {
    match pick(response, &["/id"]) {
        Some(id) => format!("Chat assigned to project {}", id),
        None => "Chat assigned to project".to_string(),
    }
}

fn env_var_line(var: &Value) -> String {
    let key = pick(var, &["/key"]).unwrap_or_else(|| "unknown".to_string());
    let id = pick(var, &["/id"]).unwrap_or_else(|| "unknown".to_string());
    match pick(var, &["/value"]) {
        Some(value) => format!("{} = {} (ID: {})", key, value, id),
        None => format!("{} (ID: {})", key, id),
    }
}

fn render_env_var_list(response: &Value) -> String {
    render_list(response, "environment variables", env_var_line)
}

fn render_deleted_env_vars(response: &Value) -> String {
    let ids: Vec<String> = items(response)
        .iter()
        .filter_map(|v| pick(v, &["/id"]))
        .collect();
    if ids.is_empty() {
        "Environment variables deleted".to_string()
    } else {
        format!("Deleted {} environment variables: {}", ids.len(), ids.join(", "))
    }
}
