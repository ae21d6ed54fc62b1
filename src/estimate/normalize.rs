//! Model and proxy replies are duck-typed JSON; coerce field by field instead
//! of trusting shape. Individually missing or non-numeric fields become zero,
//! a missing description becomes "Food".

use serde_json::Value;

use super::dto::Estimate;

const DEFAULT_DESCRIPTION: &str = "Food";

pub fn normalize(value: &Value) -> Estimate {
    Estimate {
        description: value
            .get("description")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        calories: coerce_count(value.get("calories")),
        protein_g: coerce_count(value.get("protein_g")),
    }
}

/// Numbers and numeric strings round to the nearest integer; everything else
/// (missing, null, garbage, negative) is zero.
fn coerce_count(value: Option<&Value>) -> u32 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() && n > 0.0 {
        n.round() as u32
    } else {
        0
    }
}

/// Models habitually wrap JSON in markdown fences; accept that.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(text) = text.strip_prefix("```") else {
        return text;
    };
    let text = text.strip_prefix("json").unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
