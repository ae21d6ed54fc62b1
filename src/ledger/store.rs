use std::path::PathBuf;

use anyhow::anyhow;
use async_trait::async_trait;
use tracing::warn;

use super::error::LedgerError;
use super::meal::Meal;

/// Version suffix in the file name is the only migration mechanism: changing
/// the `Meal` shape means bumping it and treating old data as absent.
const STORE_FILE: &str = "meals.v1.json";

/// Durable snapshot of the whole meal sequence. Every save rewrites the full
/// collection; there is no incremental log.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn load(&self) -> Result<Vec<Meal>, LedgerError>;
    async fn save(&self, meals: &[Meal]) -> Result<(), LedgerError>;
}

pub struct FileLedgerStore {
    path: PathBuf,
}

impl FileLedgerStore {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self, LedgerError> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => dirs::data_dir()
                .ok_or_else(|| {
                    LedgerError::StoreUnavailable(anyhow!("could not determine data directory"))
                })?
                .join("foodlog"),
        };
        std::fs::create_dir_all(&dir)
            .map_err(|e| LedgerError::StoreUnavailable(anyhow::Error::new(e)))?;
        Ok(Self {
            path: dir.join(STORE_FILE),
        })
    }
}

#[async_trait]
impl LedgerStore for FileLedgerStore {
    async fn load(&self) -> Result<Vec<Meal>, LedgerError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(LedgerError::StoreUnavailable(e.into())),
        };
        match serde_json::from_slice(&bytes) {
            Ok(meals) => Ok(meals),
            Err(e) => {
                // Corrupt data fails closed to an empty ledger rather than crashing.
                warn!(error = %e, path = %self.path.display(), "meal store unreadable, starting empty");
                Ok(Vec::new())
            }
        }
    }

    async fn save(&self, meals: &[Meal]) -> Result<(), LedgerError> {
        let json = serde_json::to_vec_pretty(meals)
            .map_err(|e| LedgerError::StoreUnavailable(e.into()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| LedgerError::StoreUnavailable(e.into()))?;
        Ok(())
    }
}

/// In-memory store: same contract, no durability. For tests and ephemeral
/// sessions.
#[derive(Default)]
pub struct MemoryLedgerStore {
    meals: std::sync::Mutex<Vec<Meal>>,
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn load(&self) -> Result<Vec<Meal>, LedgerError> {
        Ok(self.meals.lock().unwrap().clone())
    }

    async fn save(&self, meals: &[Meal]) -> Result<(), LedgerError> {
        *self.meals.lock().unwrap() = meals.to_vec();
        Ok(())
    }
}
