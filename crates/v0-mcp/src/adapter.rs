//! Operation adapter.
//!
//! Turns decoded arguments into exactly one [`PlatformCall`] and performs it
//! with the caller's credential. Reshaping is pure; the only side effect is
//! the single upstream request.

use serde_json::{Map, Value};
use switchboard::Credential;

use crate::platform::{Platform, PlatformCall, UpstreamError};
use crate::registry::ToolDescriptor;
use crate::validate::Arguments;

/// Reshapes decoded arguments into the platform's parameter object.
pub type Reshape = fn(Arguments) -> Map<String, Value>;

/// Build the one call a tool makes for these arguments.
pub fn build_call(descriptor: &ToolDescriptor, arguments: Arguments) -> PlatformCall {
    PlatformCall::new(descriptor.operation, (descriptor.reshape)(arguments))
}

/// Perform the tool's upstream call. Failures come back unchanged.
pub async fn execute(
    descriptor: &ToolDescriptor,
    arguments: Arguments,
    platform: &dyn Platform,
    credential: &Credential,
) -> Result<Value, UpstreamError> {
    let call = build_call(descriptor, arguments);
    platform.perform(call, credential).await
}

/// Arguments already use the platform's names and shape.
pub fn passthrough(arguments: Arguments) -> Map<String, Value> {
    arguments.into_map()
}

/// Fold the flat model flags into `modelConfiguration`.
///
/// The nested object is only sent when `modelId` was given. Without it the
/// flags are dropped, since the platform treats a present configuration as
/// an override of its defaults.
pub fn nest_model_configuration(arguments: Arguments) -> Map<String, Value> {
    let mut params = arguments.into_map();

    let model_id = params.remove("modelId");
    let image_generations = params.remove("imageGenerations");
    let thinking = params.remove("thinking");

    if let Some(model_id) = model_id {
        let mut config = Map::new();
        config.insert("modelId".to_string(), model_id);
        if let Some(v) = image_generations {
            config.insert("imageGenerations".to_string(), v);
        }
        if let Some(v) = thinking {
            config.insert("thinking".to_string(), v);
        }
        params.insert("modelConfiguration".to_string(), Value::Object(config));
    }

    params
}

/// `ids` on the tool surface is `environmentVariableIds` on the platform.
pub fn rename_env_var_ids(arguments: Arguments) -> Map<String, Value> {
    let mut params = arguments.into_map();
    if let Some(ids) = params.remove("ids") {
        params.insert("environmentVariableIds".to_string(), ids);
    }
    params
}
