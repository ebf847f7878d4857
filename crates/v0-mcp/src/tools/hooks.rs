use serde_json::Value;

use super::id;
use crate::format::{name_and_id, pick, render_list, Summary};
use crate::platform::Operation;
use crate::registry::ToolDescriptor;
use crate::schema::{Param, ParamType};

const EVENTS: &[&str] = &[
    "chat.created",
    "chat.updated",
    "chat.deleted",
    "message.created",
    "message.updated",
    "message.deleted",
    "message.finished",
];

fn events(required: bool) -> Param {
    let ty = ParamType::array_of(ParamType::one_of(EVENTS));
    if required {
        Param::required("events", ty, "Events that trigger the hook")
    } else {
        Param::optional("events", ty, "Events that trigger the hook")
    }
}

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "create_hook",
            Operation::HooksCreate,
            "creating hook",
            "Register a webhook for chat and message events.",
        )
        .params(vec![
            Param::required("name", ParamType::String, "Hook name"),
            Param::required("url", ParamType::String, "URL the events are posted to"),
            events(true),
            Param::optional("chatId", ParamType::String, "Only events from this chat"),
        ])
        .render(render_created_hook),
        ToolDescriptor::new(
            "get_hook",
            Operation::HooksGetById,
            "getting hook",
            "Get a webhook's configuration.",
        )
        .params(vec![id("hookId", "Hook ID")])
        .read_only()
        .render(render_hook),
        ToolDescriptor::new("find_hooks", Operation::HooksFind, "finding hooks", "List your webhooks.")
            .read_only()
            .render(render_hook_list),
        ToolDescriptor::new(
            "update_hook",
            Operation::HooksUpdate,
            "updating hook",
            "Change a webhook's name, URL or events.",
        )
        .params(vec![
            id("hookId", "Hook ID"),
            Param::optional("name", ParamType::String, "New name"),
            Param::optional("url", ParamType::String, "New URL"),
            events(false),
        ])
        .idempotent()
        .render(render_hook),
        ToolDescriptor::new(
            "delete_hook",
            Operation::HooksDelete,
            "deleting hook",
            "Delete a webhook.",
        )
        .params(vec![id("hookId", "Hook ID")])
        .destructive()
        .idempotent()
        .render(render_deleted_hook),
    ]
}

fn event_list(hook: &Value) -> Option<String> {
    let events: Vec<&str> = hook
        .get("events")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .collect();
    (!events.is_empty()).then(|| events.join(", "))
}

fn hook_summary(heading: &str, hook: &Value) -> Summary {
    Summary::new(heading)
        .field("ID", hook, &["/id"])
        .field("Name", hook, &["/name"])
        .field("URL", hook, &["/url"])
        .line("Events", event_list(hook))
        .field("Chat ID", hook, &["/chatId"])
}

fn render_created_hook(hook: &Value) -> String {
    hook_summary("Hook created", hook).finish()
}

fn render_hook(hook: &Value) -> String {
    hook_summary("Hook", hook).finish()
}

fn render_hook_list(response: &Value) -> String {
    render_list(response, "hooks", |h| name_and_id(h, &["/name"]))
}

fn render_deleted_hook(response: &Value) -> String {
    match pick(response, &["/id"]) {
        Some(id) => format!("Deleted hook {}", id),
        None => "Hook deleted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hook_events_joined() {
        let text = render_hook(&json!({
            "id": "h1",
            "name": "ci",
            "url": "https://example.com/hook",
            "events": ["chat.created", "message.finished"]
        }));
        assert!(text.contains("ID: h1"));
        assert!(text.contains("Events: chat.created, message.finished"));
    }
}
