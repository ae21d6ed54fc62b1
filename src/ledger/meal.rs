use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::error::LedgerError;

const DEFAULT_DESCRIPTION: &str = "Meal";

/// One logged eating event. `logged_at` is the instant of logging (not of
/// eating) and goes over the wire as unix milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: Uuid,
    #[serde(with = "time::serde::timestamp::milliseconds")]
    pub logged_at: OffsetDateTime,
    pub description: String,
    pub calories: u32,
    pub protein_g: u32,
    pub photo_ref: Option<String>,
}

/// Raw entry-form fields, not yet validated. Numeric fields stay text here so
/// the form can round-trip whatever the user typed.
#[derive(Debug, Clone, Default)]
pub struct MealDraft {
    pub description: String,
    pub calories: String,
    pub protein_g: String,
    pub photo_ref: Option<String>,
}

impl Meal {
    pub(crate) fn from_draft(draft: MealDraft) -> Result<Meal, LedgerError> {
        let calories = parse_count(&draft.calories, "calories")?;
        let protein_g = parse_count(&draft.protein_g, "protein_g")?;
        let description = match draft.description.trim() {
            "" => DEFAULT_DESCRIPTION.to_string(),
            s => s.to_string(),
        };
        Ok(Meal {
            id: Uuid::new_v4(),
            logged_at: OffsetDateTime::now_utc(),
            description,
            calories,
            protein_g,
            photo_ref: draft.photo_ref,
        })
    }
}

/// Blank means zero; anything else must parse as a non-negative integer.
pub fn parse_count(text: &str, field: &str) -> Result<u32, LedgerError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse::<u32>().map_err(|_| {
        LedgerError::InvalidInput(format!(
            "{field} must be a non-negative integer, got {text:?}"
        ))
    })
}
