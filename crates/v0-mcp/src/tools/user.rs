use serde_json::Value;

use crate::format::{render_json, Summary};
use crate::platform::Operation;
use crate::registry::ToolDescriptor;
use crate::schema::{Param, ParamType};

fn scope() -> Param {
    Param::optional("scope", ParamType::String, "Team or account scope")
}

pub(super) fn descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor::new(
            "get_user_info",
            Operation::UserGet,
            "getting user info",
            "Get the account the API key belongs to.",
        )
        .read_only()
        .render(render_user),
        ToolDescriptor::new(
            "get_user_billing",
            Operation::UserGetBilling,
            "getting user billing",
            "Get billing and credit usage.",
        )
        .params(vec![scope()])
        .read_only(),
        ToolDescriptor::new(
            "get_user_plan",
            Operation::UserGetPlan,
            "getting user plan",
            "Get the current plan and its limits.",
        )
        .read_only()
        .render(render_plan),
        ToolDescriptor::new(
            "get_user_scopes",
            Operation::UserGetScopes,
            "getting user scopes",
            "List the scopes (personal and team) the key can act in.",
        )
        .read_only(),
        ToolDescriptor::new(
            "check_rate_limits",
            Operation::RateLimitsFind,
            "checking rate limits",
            "Show remaining requests in the current rate-limit window.",
        )
        .params(vec![scope()])
        .read_only()
        .render(render_rate_limits),
    ]
}

fn render_user(user: &Value) -> String {
    Summary::new("User")
        .field("ID", user, &["/id"])
        .field("Name", user, &["/name"])
        .field("Username", user, &["/username"])
        .field("Email", user, &["/email"])
        .finish()
}

fn render_plan(plan: &Value) -> String {
    let text = Summary::new("Plan")
        .field("Plan", plan, &["/plan", "/name"])
        .field("Billing cycle start", plan, &["/billingCycle/start"])
        .field("Billing cycle end", plan, &["/billingCycle/end"])
        .field("Balance remaining", plan, &["/balance/remaining"])
        .field("Balance total", plan, &["/balance/total"])
        .finish();
    if text == "Plan" {
        render_json(plan)
    } else {
        text
    }
}

fn render_rate_limits(limits: &Value) -> String {
    Summary::new("Rate limits")
        .field("Remaining", limits, &["/remaining"])
        .field("Limit", limits, &["/limit"])
        .field("Resets at", limits, &["/reset", "/resetAt"])
        .finish()
}
