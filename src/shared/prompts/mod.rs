//! Prompt rendering for recommendation narratives.
//!
//! ```ignore
//! let prompt = render_location_analysis(&row, "Wisata", &schema)?;
//! ```

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::{context, Value};

use crate::shared::constants::KABUPATEN;

pub const LOCATION_ANALYSIS_TEMPLATE: &str = "location_analysis.jinja";
pub const INVESTMENT_RECOMMENDATION_TEMPLATE: &str = "investment_recommendation.jinja";

/// Render the feasibility prompt for a single location.
///
/// `item` is the location row serialized as JSON.
pub fn render_location_analysis(
    item: &serde_json::Value,
    type_label: &str,
    json_schema: &str,
) -> Result<String, TemplateError> {
    render_template(
        LOCATION_ANALYSIS_TEMPLATE,
        context! {
            kabupaten => KABUPATEN,
            item => Value::from_serialize(item),
            type_label => type_label,
            json_schema => json_schema,
        },
    )
}

/// Render the investment prompt for a desa profile
pub fn render_investment_recommendation(
    item: &serde_json::Value,
    json_schema: &str,
) -> Result<String, TemplateError> {
    render_template(
        INVESTMENT_RECOMMENDATION_TEMPLATE,
        context! {
            kabupaten => KABUPATEN,
            item => Value::from_serialize(item),
            json_schema => json_schema,
        },
    )
}
