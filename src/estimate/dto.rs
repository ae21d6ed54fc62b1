use serde::{Deserialize, Serialize};

/// Advisory nutrition guess for one photo. Pre-fills a draft the user may
/// edit before it becomes a committed meal; never authoritative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estimate {
    pub description: String,
    pub calories: u32,
    pub protein_g: u32,
}
