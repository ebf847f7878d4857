//! The platform's operations and where each one lives on the REST API.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Whether leftover parameters travel in the query string rather than a
    /// JSON body.
    pub fn uses_query(self) -> bool {
        matches!(self, Method::Get | Method::Delete)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resource-action pair of the platform API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // Chats
    ChatsCreate,
    ChatsInit,
    ChatsGetById,
    ChatsFind,
    ChatsUpdate,
    ChatsDelete,
    ChatsFavorite,
    ChatsFork,
    ChatsSendMessage,
    ChatsFindMessages,
    ChatsGetMessage,
    ChatsFindVersions,
    ChatsGetVersion,

    // Projects
    ProjectsCreate,
    ProjectsGetById,
    ProjectsFind,
    ProjectsUpdate,
    ProjectsDelete,
    ProjectsGetByChatId,
    ProjectsAssign,
    ProjectsFindEnvVars,
    ProjectsCreateEnvVars,
    ProjectsDeleteEnvVars,

    // Deployments
    DeploymentsCreate,
    DeploymentsGetById,
    DeploymentsFind,
    DeploymentsDelete,
    DeploymentsFindLogs,
    DeploymentsFindErrors,

    // Integrations
    VercelProjectsFind,
    VercelProjectsCreate,

    // Webhooks
    HooksCreate,
    HooksGetById,
    HooksFind,
    HooksUpdate,
    HooksDelete,

    // User
    UserGet,
    UserGetBilling,
    UserGetPlan,
    UserGetScopes,

    RateLimitsFind,
}

impl Operation {
    /// Every operation, for route-table checks.
    pub const ALL: [Operation; 41] = [
        Operation::ChatsCreate,
        Operation::ChatsInit,
        Operation::ChatsGetById,
        Operation::ChatsFind,
        Operation::ChatsUpdate,
        Operation::ChatsDelete,
        Operation::ChatsFavorite,
        Operation::ChatsFork,
        Operation::ChatsSendMessage,
        Operation::ChatsFindMessages,
        Operation::ChatsGetMessage,
        Operation::ChatsFindVersions,
        Operation::ChatsGetVersion,
        Operation::ProjectsCreate,
        Operation::ProjectsGetById,
        Operation::ProjectsFind,
        Operation::ProjectsUpdate,
        Operation::ProjectsDelete,
        Operation::ProjectsGetByChatId,
        Operation::ProjectsAssign,
        Operation::ProjectsFindEnvVars,
        Operation::ProjectsCreateEnvVars,
        Operation::ProjectsDeleteEnvVars,
        Operation::DeploymentsCreate,
        Operation::DeploymentsGetById,
        Operation::DeploymentsFind,
        Operation::DeploymentsDelete,
        Operation::DeploymentsFindLogs,
        Operation::DeploymentsFindErrors,
        Operation::VercelProjectsFind,
        Operation::VercelProjectsCreate,
        Operation::HooksCreate,
        Operation::HooksGetById,
        Operation::HooksFind,
        Operation::HooksUpdate,
        Operation::HooksDelete,
        Operation::UserGet,
        Operation::UserGetBilling,
        Operation::UserGetPlan,
        Operation::UserGetScopes,
        Operation::RateLimitsFind,
    ];

    /// Dotted name, as the platform SDK spells it.
    pub fn name(self) -> &'static str {
        self.route().0
    }

    pub fn method(self) -> Method {
        self.route().1
    }

    /// Path template relative to the API base. `{name}` placeholders are
    /// filled from the call's parameters.
    pub fn path(self) -> &'static str {
        self.route().2
    }

    fn route(self) -> (&'static str, Method, &'static str) {
        use Method::*;
        match self {
            Operation::ChatsCreate => ("chats.create", Post, "/chats"),
            Operation::ChatsInit => ("chats.init", Post, "/chats/init"),
            Operation::ChatsGetById => ("chats.getById", Get, "/chats/{chatId}"),
            Operation::ChatsFind => ("chats.find", Get, "/chats"),
            Operation::ChatsUpdate => ("chats.update", Patch, "/chats/{chatId}"),
            Operation::ChatsDelete => ("chats.delete", Delete, "/chats/{chatId}"),
            Operation::ChatsFavorite => ("chats.favorite", Put, "/chats/{chatId}/favorite"),
            Operation::ChatsFork => ("chats.fork", Post, "/chats/{chatId}/fork"),
            Operation::ChatsSendMessage => ("chats.sendMessage", Post, "/chats/{chatId}/messages"),
            Operation::ChatsFindMessages => ("chats.findMessages", Get, "/chats/{chatId}/messages"),
            Operation::ChatsGetMessage => (
                "chats.getMessage",
                Get,
                "/chats/{chatId}/messages/{messageId}",
            ),
            Operation::ChatsFindVersions => ("chats.findVersions", Get, "/chats/{chatId}/versions"),
            Operation::ChatsGetVersion => (
                "chats.getVersion",
                Get,
                "/chats/{chatId}/versions/{versionId}",
            ),

            Operation::ProjectsCreate => ("projects.create", Post, "/projects"),
            Operation::ProjectsGetById => ("projects.getById", Get, "/projects/{projectId}"),
            Operation::ProjectsFind => ("projects.find", Get, "/projects"),
            Operation::ProjectsUpdate => ("projects.update", Patch, "/projects/{projectId}"),
            Operation::ProjectsDelete => ("projects.delete", Delete, "/projects/{projectId}"),
            Operation::ProjectsGetByChatId => ("projects.getByChatId", Get, "/chats/{chatId}/project"),
            Operation::ProjectsAssign => ("projects.assign", Post, "/projects/{projectId}/assign"),
            Operation::ProjectsFindEnvVars => (
                "projects.findEnvVars",
                Get,
                "/projects/{projectId}/env-vars",
            ),
            Operation::ProjectsCreateEnvVars => (
                "projects.createEnvVars",
                Post,
                "/projects/{projectId}/env-vars",
            ),
            Operation::ProjectsDeleteEnvVars => (
                "projects.deleteEnvVars",
                Post,
                "/projects/{projectId}/env-vars/delete",
            ),

            Operation::DeploymentsCreate => ("deployments.create", Post, "/deployments"),
            Operation::DeploymentsGetById => (
                "deployments.getById",
                Get,
                "/deployments/{deploymentId}",
            ),
            Operation::DeploymentsFind => ("deployments.find", Get, "/deployments"),
            Operation::DeploymentsDelete => (
                "deployments.delete",
                Delete,
                "/deployments/{deploymentId}",
            ),
            Operation::DeploymentsFindLogs => (
                "deployments.findLogs",
                Get,
                "/deployments/{deploymentId}/logs",
            ),
            Operation::DeploymentsFindErrors => (
                "deployments.findErrors",
                Get,
                "/deployments/{deploymentId}/errors",
            ),

            Operation::VercelProjectsFind => (
                "integrations.vercel.projects.find",
                Get,
                "/integrations/vercel/projects",
            ),
            Operation::VercelProjectsCreate => (
                "integrations.vercel.projects.create",
                Post,
                "/integrations/vercel/projects",
            ),

            Operation::HooksCreate => ("hooks.create", Post, "/hooks"),
            Operation::HooksGetById => ("hooks.getById", Get, "/hooks/{hookId}"),
            Operation::HooksFind => ("hooks.find", Get, "/hooks"),
            Operation::HooksUpdate => ("hooks.update", Patch, "/hooks/{hookId}"),
            Operation::HooksDelete => ("hooks.delete", Delete, "/hooks/{hookId}"),

            Operation::UserGet => ("user.get", Get, "/user"),
            Operation::UserGetBilling => ("user.getBilling", Get, "/user/billing"),
            Operation::UserGetPlan => ("user.getPlan", Get, "/user/plan"),
            Operation::UserGetScopes => ("user.getScopes", Get, "/user/scopes"),

            Operation::RateLimitsFind => ("rateLimits.find", Get, "/rate-limits"),
        }
    }

    /// Placeholder names in the path template, in order.
    pub fn path_params(self) -> impl Iterator<Item = &'static str> {
        self.path()
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_unique() {
        let names: HashSet<_> = Operation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names.len(), Operation::ALL.len());
    }

    #[test]
    fn test_routes_unique() {
        let routes: HashSet<_> = Operation::ALL
            .iter()
            .map(|op| (op.method(), op.path()))
            .collect();
        assert_eq!(routes.len(), Operation::ALL.len());
    }

    #[test]
    fn test_paths_are_rooted() {
        for op in Operation::ALL {
            assert!(op.path().starts_with('/'), "{} has a relative path", op);
        }
    }

    #[test]
    fn test_path_params() {
        let params: Vec<_> = Operation::ChatsGetMessage.path_params().collect();
        assert_eq!(params, vec!["chatId", "messageId"]);
        assert_eq!(Operation::UserGet.path_params().count(), 0);
    }
}
