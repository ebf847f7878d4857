use serde_json::Value;

use super::{cursor, id, limit};
use crate::adapter::nest_model_configuration;
use crate::format::{items, name_and_id, pick, render_list, Summary};
use crate::platform::Operation;
use crate::registry::ToolDescriptor;
use crate::schema::{Param, ParamType};

const CHAT_PRIVACY: &[&str] = &["public", "private", "team-edit", "team", "unlisted"];
const MODELS: &[&str] = &["v0-1.5-sm", "v0-1.5-md", "v0-1.5-lg", "v0-gpt-5"];

fn privacy(name: &'static str) -> Param {
    Param::optional(name, ParamType::one_of(CHAT_PRIVACY), "Who can see the chat")
}

/// Flat model flags, folded into `modelConfiguration` by the adapter.
fn model_params() -> Vec<Param> {
    vec![
        Param::optional("modelId", ParamType::one_of(MODELS), "Model to generate with"),
        Param::optional(
            "imageGenerations",
            ParamType::Boolean,
            "Allow the model to generate images",
        ),
        Param::optional("thinking", ParamType::Boolean, "Enable extended thinking"),
    ]
}

fn url_object() -> ParamType {
    ParamType::object(vec![Param::required("url", ParamType::String, "")])
}

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    let mut create_params = vec![
        Param::required("message", ParamType::String, "What to build"),
        Param::optional("system", ParamType::String, "System prompt for the chat"),
        privacy("chatPrivacy"),
        Param::optional("projectId", ParamType::String, "Project to create the chat in"),
    ];
    create_params.extend(model_params());
    create_params.push(Param::optional(
        "responseMode",
        ParamType::one_of(&["sync", "async"]),
        "Wait for generation to finish, or return immediately",
    ));

    let mut send_params = vec![
        id("chatId", "Chat to continue"),
        Param::required("message", ParamType::String, "Message text"),
        Param::optional("system", ParamType::String, "System prompt override"),
        Param::optional(
            "attachments",
            ParamType::array_of(url_object()),
            "Files to attach, by URL",
        ),
    ];
    send_params.extend(model_params());
    send_params.push(Param::optional(
        "responseMode",
        ParamType::one_of(&["sync", "async"]),
        "Wait for generation to finish, or return immediately",
    ));

    vec![
        ToolDescriptor::new(
            "create_chat",
            Operation::ChatsCreate,
            "creating chat",
            "Create a new v0 chat from a prompt. Returns the chat ID and its URL.",
        )
        .params(create_params)
        .reshape(nest_model_configuration)
        .render(render_created_chat),
        ToolDescriptor::new(
            "init_chat",
            Operation::ChatsInit,
            "initializing chat",
            "Start a chat from existing code: inline files, a repository, a registry item or a zip archive.",
        )
        .params(vec![
            Param::required(
                "type",
                ParamType::one_of(&["files", "repo", "registry", "zip"]),
                "Where the initial code comes from",
            ),
            Param::optional("name", ParamType::String, "Chat name"),
            privacy("chatPrivacy"),
            Param::optional("projectId", ParamType::String, "Project to create the chat in"),
            Param::optional(
                "files",
                ParamType::array_of(ParamType::object(vec![
                    Param::required("name", ParamType::String, "File path"),
                    Param::optional("content", ParamType::String, "File contents"),
                    Param::optional("url", ParamType::String, "Where to fetch the file from"),
                    Param::optional("locked", ParamType::Boolean, "Prevent edits to the file"),
                ])),
                "Files, when type is 'files'",
            ),
            Param::optional(
                "repo",
                ParamType::object(vec![
                    Param::required("url", ParamType::String, "Repository URL"),
                    Param::optional("branch", ParamType::String, "Branch to import"),
                ]),
                "Repository, when type is 'repo'",
            ),
            Param::optional(
                "registry",
                url_object(),
                "Registry item, when type is 'registry'",
            ),
            Param::optional("zip", url_object(), "Archive, when type is 'zip'"),
        ])
        .render(render_created_chat),
        ToolDescriptor::new(
            "get_chat",
            Operation::ChatsGetById,
            "getting chat",
            "Get a chat's details, including its URL and latest version.",
        )
        .params(vec![id("chatId", "Chat ID")])
        .read_only()
        .render(render_chat),
        ToolDescriptor::new(
            "find_chats",
            Operation::ChatsFind,
            "finding chats",
            "List your chats.",
        )
        .params(vec![
            limit(),
            Param::optional("offset", ParamType::Integer, "Number of chats to skip"),
            Param::optional("isFavorite", ParamType::Boolean, "Only favorites, or only non-favorites"),
        ])
        .read_only()
        .render(render_chat_list),
        ToolDescriptor::new(
            "update_chat",
            Operation::ChatsUpdate,
            "updating chat",
            "Rename a chat or change its privacy.",
        )
        .params(vec![
            id("chatId", "Chat ID"),
            Param::optional("name", ParamType::String, "New name"),
            privacy("privacy"),
        ])
        .idempotent()
        .render(render_chat),
        ToolDescriptor::new(
            "delete_chat",
            Operation::ChatsDelete,
            "deleting chat",
            "Delete a chat permanently.",
        )
        .params(vec![id("chatId", "Chat ID")])
        .destructive()
        .idempotent()
        .render(render_deleted_chat),
        ToolDescriptor::new(
            "favorite_chat",
            Operation::ChatsFavorite,
            "updating chat favorite",
            "Mark or unmark a chat as a favorite.",
        )
        .params(vec![
            id("chatId", "Chat ID"),
            Param::required("isFavorite", ParamType::Boolean, "Whether the chat is a favorite"),
        ])
        .idempotent()
        .render(render_favorite),
        ToolDescriptor::new(
            "fork_chat",
            Operation::ChatsFork,
            "forking chat",
            "Copy a chat, optionally from a specific version, into a new chat.",
        )
        .params(vec![
            id("chatId", "Chat to fork"),
            Param::optional("versionId", ParamType::String, "Version to fork from"),
            privacy("privacy"),
        ])
        .render(render_forked_chat),
        ToolDescriptor::new(
            "send_message",
            Operation::ChatsSendMessage,
            "sending message",
            "Send a follow-up message to an existing chat.",
        )
        .params(send_params)
        .reshape(nest_model_configuration)
        .render(render_sent_message),
        ToolDescriptor::new(
            "find_messages",
            Operation::ChatsFindMessages,
            "finding messages",
            "List the messages in a chat.",
        )
        .params(vec![id("chatId", "Chat ID"), limit(), cursor()])
        .read_only()
        .render(render_message_list),
        ToolDescriptor::new(
            "get_message",
            Operation::ChatsGetMessage,
            "getting message",
            "Get one message from a chat.",
        )
        .params(vec![id("chatId", "Chat ID"), id("messageId", "Message ID")])
        .read_only()
        .render(render_message),
        ToolDescriptor::new(
            "find_chat_versions",
            Operation::ChatsFindVersions,
            "finding chat versions",
            "List the generated versions of a chat.",
        )
        .params(vec![id("chatId", "Chat ID"), limit(), cursor()])
        .read_only()
        .render(render_version_list),
        ToolDescriptor::new(
            "get_chat_version",
            Operation::ChatsGetVersion,
            "getting chat version",
            "Get one version of a chat, with its files and demo URL.",
        )
        .params(vec![
            id("chatId", "Chat ID"),
            id("versionId", "Version ID"),
            Param::optional(
                "includeDefaultFiles",
                ParamType::Boolean,
                "Include scaffold files the user did not change",
            ),
        ])
        .read_only()
        .render(render_version),
    ]
}

fn chat_summary(heading: &str, chat: &Value) -> Summary {
    Summary::new(heading)
        .field("ID", chat, &["/id"])
        .field("Name", chat, &["/name", "/title"])
        .field("Privacy", chat, &["/privacy"])
        .field("URL", chat, &["/webUrl", "/url"])
        .field("Demo", chat, &["/latestVersion/demoUrl", "/demo"])
}

fn render_created_chat(chat: &Value) -> String {
    chat_summary("Chat created", chat).finish()
}

fn render_chat(chat: &Value) -> String {
    chat_summary("Chat", chat)
        .field("Favorite", chat, &["/favorite"])
        .field("Updated", chat, &["/updatedAt"])
        .finish()
}

fn render_forked_chat(chat: &Value) -> String {
    chat_summary("Chat forked", chat).finish()
}

fn render_sent_message(chat: &Value) -> String {
    let last = items(&chat["messages"]).last().cloned().unwrap_or(Value::Null);
    chat_summary("Message sent", chat)
        .field("Message ID", &last, &["/id"])
        .finish()
}

fn render_deleted_chat(response: &Value) -> String {
    match pick(response, &["/id"]) {
        Some(id) => format!("Deleted chat {}", id),
        None => "Chat deleted".to_string(),
    }
}

fn render_favorite(response: &Value) -> String {
    let id = pick(response, &["/id"]).unwrap_or_else(|| "unknown".to_string());
    match response.get("favorited").or_else(|| response.get("favorite")) {
        Some(Value::Bool(true)) => format!("Chat {} marked as favorite", id),
        Some(Value::Bool(false)) => format!("Chat {} removed from favorites", id),
        _ => format!("Chat {} favorite updated", id),
    }
}

fn chat_line(chat: &Value) -> String {
    let mut line = name_and_id(chat, &["/name", "/title"]);
    if let Some(url) = pick(chat, &["/webUrl", "/url"]) {
        line.push_str(&format!(" {}", url));
    }
    line
}

fn render_chat_list(response: &Value) -> String {
    render_list(response, "chats", chat_line)
}

fn message_line(message: &Value) -> String {
    let role = pick(message, &["/role"]).unwrap_or_else(|| "unknown".to_string());
    let id = pick(message, &["/id"]).unwrap_or_else(|| "unknown".to_string());
    format!("{} [{}]", id, role)
}

fn render_message_list(response: &Value) -> String {
    with_next_cursor(render_list(response, "messages", message_line), response)
}

fn render_message(message: &Value) -> String {
    Summary::new("Message")
        .field("ID", message, &["/id"])
        .field("Chat ID", message, &["/chatId"])
        .field("Role", message, &["/role"])
        .field("Created", message, &["/createdAt"])
        .line(
            "Content",
            message.get("content").and_then(Value::as_str).map(str::to_string),
        )
        .finish()
}

fn version_line(version: &Value) -> String {
    let id = pick(version, &["/id"]).unwrap_or_else(|| "unknown".to_string());
    match pick(version, &["/status"]) {
        Some(status) => format!("{} ({})", id, status),
        None => id,
    }
}

fn render_version_list(response: &Value) -> String {
    with_next_cursor(render_list(response, "versions", version_line), response)
}

fn render_version(version: &Value) -> String {
    let files = version
        .get("files")
        .and_then(Value::as_array)
        .map(|files| {
            files
                .iter()
                .filter_map(|f| pick(f, &["/name"]))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    let mut text = Summary::new("Version")
        .field("ID", version, &["/id"])
        .field("Status", version, &["/status"])
        .field("Demo", version, &["/demoUrl"])
        .finish();
    if !files.is_empty() {
        text.push_str(&format!("\nFiles ({}):", files.len()));
        for name in files {
            text.push_str(&format!("\n- {}", name));
        }
    }
    text
}

/// Append the next-page cursor when the platform returned one.
fn with_next_cursor(mut text: String, response: &Value) -> String {
    if let Some(next) = pick(response, &["/pagination/nextCursor"]) {
        text.push_str(&format!("\nNext cursor: {}", next));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_created_chat_shows_id_and_url() {
        let text = render_created_chat(&json!({ "id": "c1", "url": "https://v0.dev/chat/c1" }));
        assert!(text.contains("ID: c1"));
        assert!(text.contains("URL: https://v0.dev/chat/c1"));
    }

    #[test]
    fn test_chat_list() {
        let text = render_chat_list(&json!({
            "data": [
                { "id": "c1", "name": "Todo", "webUrl": "https://v0.dev/chat/c1" },
                { "id": "c2" }
            ]
        }));
        assert_eq!(
            text,
            "Found 2 chats:\n- Todo (ID: c1) https://v0.dev/chat/c1\n- ID: c2"
        );
    }

    #[test]
    fn test_message_list_cursor() {
        let text = render_message_list(&json!({
            "data": [{ "id": "m1", "role": "user" }],
            "pagination": { "hasMore": true, "nextCursor": "abc" }
        }));
        assert!(text.contains("- m1 [user]"));
        assert!(text.ends_with("Next cursor: abc"));
    }

    #[test]
    fn test_version_lists_files() {
        let text = render_version(&json!({
            "id": "v1",
            "status": "completed",
            "files": [{ "name": "app/page.tsx" }, { "name": "package.json" }]
        }));
        assert!(text.contains("ID: v1"));
        assert!(text.contains("Files (2):\n- app/page.tsx\n- package.json"));
    }

    #[test]
    fn test_favorite() {
        assert_eq!(
            render_favorite(&json!({ "id": "c1", "favorited": true })),
            "Chat c1 marked as favorite"
        );
    }
}
