use serde_json::Value;

use super::id;
use crate::format::{name_and_id, render_list, Summary};
use crate::platform::Operation;
use crate::registry::ToolDescriptor;
use crate::schema::{Param, ParamType};

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "find_vercel_projects",
            Operation::VercelProjectsFind,
            "finding Vercel projects",
            "List the Vercel projects linked to your account.",
        )
        .read_only()
        .render(render_vercel_projects),
        ToolDescriptor::new(
            "create_vercel_project",
            Operation::VercelProjectsCreate,
            "creating Vercel project",
            "Create a Vercel project and link it to a v0 project.",
        )
        .params(vec![
            id("projectId", "v0 project to link"),
            Param::required("name", ParamType::String, "Vercel project name"),
        ])
        .render(render_created_vercel_project),
    ]
}

fn render_vercel_projects(response: &Value) -> String {
    render_list(response, "Vercel projects", |p| name_and_id(p, &["/name"]))
}

fn render_created_vercel_project(project: &Value) -> String {
    Summary::new("Vercel project created")
        .field("ID", project, &["/id"])
        .field("Name", project, &["/name"])
        .finish()
}
