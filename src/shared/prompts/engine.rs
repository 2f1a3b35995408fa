//! Jinja template environment for model prompts.
//!
//! Every prompt ships inside the binary. A file with the same name under
//! `templates/prompts/` replaces the built-in copy at startup, so wording can
//! be tuned on a deployment without a rebuild.

use minijinja::{Environment, Value};
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Override directory relative to the working directory
const TEMPLATE_DIR: &str = "templates/prompts";

const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "location_analysis.jinja",
        include_str!("../../../templates/prompts/location_analysis.jinja"),
    ),
    (
        "investment_recommendation.jinja",
        include_str!("../../../templates/prompts/investment_recommendation.jinja"),
    ),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in BUILTIN_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::error!("Built-in template {} is invalid: {}", name, e);
        }
    }

    load_overrides(&mut env, Path::new(TEMPLATE_DIR));
    env
}

fn load_overrides(env: &mut Environment<'static>, dir: &Path) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };

    for path in entries.flatten().map(|e| e.path()) {
        if !path.extension().is_some_and(|ext| ext == "jinja") {
            continue;
        }
        let (Some(name), Ok(source)) = (
            path.file_name().map(|n| n.to_string_lossy().into_owned()),
            std::fs::read_to_string(&path),
        ) else {
            continue;
        };

        // Environment<'static> borrows template sources for its whole lifetime
        let name: &'static str = Box::leak(name.into_boxed_str());
        let source: &'static str = Box::leak(source.into_boxed_str());
        match env.add_template(name, source) {
            Ok(()) => tracing::debug!("Loaded prompt template override: {}", name),
            Err(e) => tracing::warn!("Ignoring invalid template {}: {}", name, e),
        }
    }
}

fn environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render `template_name` with a context built by `minijinja::context!`
pub fn render_template(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

pub fn template_exists(template_name: &str) -> bool {
    environment().get_template(template_name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use minijinja::context;

    #[test]
    fn test_builtins_are_registered() {
        for (name, _) in BUILTIN_TEMPLATES {
            assert!(template_exists(name), "missing {}", name);
        }
        assert!(!template_exists("tidak_ada.jinja"));
    }

    #[test]
    fn test_missing_template() {
        let result = render_template("tidak_ada.jinja", context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }
}
