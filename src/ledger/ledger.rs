use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use super::error::LedgerError;
use super::meal::{Meal, MealDraft};
use super::store::LedgerStore;

/// Authoritative in-memory meal list. Mutations go through `append` and
/// `remove` only, and each one rewrites the whole collection to the store.
/// A failed write leaves the in-memory state as the session's source of truth.
pub struct Ledger {
    meals: Vec<Meal>,
    store: Arc<dyn LedgerStore>,
}

impl Ledger {
    /// Hydrates from the store; an unavailable store degrades to an empty
    /// ledger so manual entry keeps working.
    pub async fn open(store: Arc<dyn LedgerStore>) -> Self {
        let meals = match store.load().await {
            Ok(meals) => meals,
            Err(e) => {
                warn!(error = %e, "meal store unavailable, starting empty");
                Vec::new()
            }
        };
        Self { meals, store }
    }

    /// Validates the draft, stamps id and timestamp, prepends and persists.
    /// Rejects with `InvalidInput` before any state changes.
    pub async fn append(&mut self, draft: MealDraft) -> Result<Meal, LedgerError> {
        let meal = Meal::from_draft(draft)?;
        self.meals.insert(0, meal.clone());
        self.persist().await;
        Ok(meal)
    }

    /// Removing an id that is not present is a no-op, not an error.
    pub async fn remove(&mut self, id: Uuid) {
        self.meals.retain(|m| m.id != id);
        self.persist().await;
    }

    pub fn all(&self) -> &[Meal] {
        &self.meals
    }

    async fn persist(&self) {
        if let Err(e) = self.store.save(&self.meals).await {
            warn!(error = %e, "meal store save failed, keeping in-memory state");
        }
    }
}
