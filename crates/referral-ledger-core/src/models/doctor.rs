//! Referring doctor models.

use serde::{Deserialize, Serialize};

/// Portrait used when a doctor is added without an image.
pub const DEFAULT_DOCTOR_IMAGE: &str = "https://images.unsplash.com/photo-1612349317150-e413f6a5b16d?ixlib=rb-4.0.3&auto=format&fit=crop&w=200&q=80";

/// A referring doctor on the roster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Doctor {
    /// Store-assigned identifier (opaque, stable)
    pub id: String,
    /// Display name
    pub name: String,
    /// Specialty (e.g., "Cardiology")
    #[serde(default)]
    pub specialty: String,
    /// Image reference
    #[serde(default)]
    pub image: Option<String>,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: String,
}

impl Doctor {
    /// Create a new doctor with a fresh id and the default portrait.
    pub fn new(name: String, specialty: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            specialty,
            image: Some(DEFAULT_DOCTOR_IMAGE.to_string()),
            created_at: super::timestamp_now(),
        }
    }

    /// Case-insensitive substring match on name or specialty.
    pub fn matches_search(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.specialty.to_lowercase().contains(&term)
    }
}
