use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// A structured answer expected from a language model.
///
/// `Default` plus `mark_as_fallback` describe what callers get when the
/// model output cannot be used; the schema string is embedded in prompts.
pub trait LlmResponse: DeserializeOwned + Default + JsonSchema {
    /// Turn this value into the fallback answer, recording why
    fn mark_as_fallback(&mut self, reason: String);

    fn is_success(&self) -> bool;

    /// JSON schema of the model-facing fields, pretty printed
    fn json_schema_string() -> String {
        let schema = SchemaGenerator::default().into_root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }

    /// Fallback value with the failure reason attached
    fn fallback(reason: impl Into<String>) -> Self {
        let mut value = Self::default();
        value.mark_as_fallback(reason.into());
        value
    }
}
