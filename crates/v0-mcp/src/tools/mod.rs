//! The tool table.
//!
//! Each submodule declares the tools for one area of the platform. A tool is
//! a [`ToolDescriptor`]: its parameters, the operation it calls, how its
//! arguments are reshaped and how its response is rendered.

mod chats;
mod deployments;
mod hooks;
mod integrations;
mod projects;
mod user;

use crate::registry::{Registry, RegistryError, ToolDescriptor};
use crate::schema::{Param, ParamType};

/// Every tool, in listing order.
pub fn descriptors() -> Vec<ToolDescriptor> {
    let mut all = Vec::new();
    all.extend(chats::descriptors());
    all.extend(projects::descriptors());
    all.extend(deployments::descriptors());
    all.extend(integrations::descriptors());
    all.extend(hooks::descriptors());
    all.extend(user::descriptors());
    all
}

/// A registry holding every tool.
pub fn registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    registry.register_all(descriptors())?;
    Ok(registry)
}

fn id(name: &'static str, description: &'static str) -> Param {
    Param::required(name, ParamType::String, description)
}

fn limit() -> Param {
    Param::optional("limit", ParamType::Integer, "Maximum number of results")
}

fn cursor() -> Param {
    Param::optional("cursor", ParamType::String, "Cursor from a previous page")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Operation;
    use std::collections::HashSet;

    #[test]
    fn test_every_operation_has_one_tool() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), Operation::ALL.len());

        let operations: HashSet<_> = registry.descriptors().iter().map(|d| d.operation).collect();
        assert_eq!(operations.len(), Operation::ALL.len());
    }

    #[test]
    fn test_path_params_are_required_strings() {
        let registry = registry().unwrap();
        for descriptor in registry.descriptors() {
            for name in descriptor.operation.path_params() {
                let param = descriptor
                    .params
                    .get(name)
                    .unwrap_or_else(|| panic!("{} lacks path param {}", descriptor.name, name));
                assert!(param.required, "{}.{} must be required", descriptor.name, name);
                assert_eq!(param.ty, ParamType::String);
            }
        }
    }

    #[test]
    fn test_error_phrases_distinct() {
        let registry = registry().unwrap();
        let actions: HashSet<_> = registry.descriptors().iter().map(|d| d.action).collect();
        assert_eq!(actions.len(), registry.len());
    }

    #[test]
    fn test_listed_names() {
        let names: Vec<_> = registry()
            .unwrap()
            .tools()
            .into_iter()
            .map(|t| t.name)
            .collect();
        for expected in [
            "create_chat",
            "get_chat",
            "find_chats",
            "send_message",
            "delete_chat",
            "create_project",
            "find_projects",
            "create_deployment",
            "find_deployment_logs",
            "create_hook",
            "get_user_info",
            "check_rate_limits",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_destructive_tools_are_deletes() {
        let registry = registry().unwrap();
        for descriptor in registry.descriptors() {
            if descriptor.destructive {
                assert!(descriptor.name.starts_with("delete_"), "{}", descriptor.name);
            }
            if descriptor.name.starts_with("delete_") {
                assert!(descriptor.destructive, "{}", descriptor.name);
            }
        }
    }
}
