use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::action::Action;

/// Current recording format version.
pub const FORMAT_VERSION: &str = "1.0.0";

/// An ordered, versioned sequence of actions plus capture-time metadata.
///
/// The `version` tag exists for forward compatibility of the on-disk
/// format; a recording with an empty version is invalid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    pub version: String,
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub screen_width: i32,
    pub screen_height: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    pub actions: Vec<Action>,
}

impl Default for Recording {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            version: FORMAT_VERSION.to_string(),
            id: Uuid::new_v4(),
            name: None,
            description: None,
            created_at: now,
            modified_at: now,
            screen_width: 0,
            screen_height: 0,
            os_version: None,
            actions: Vec::new(),
        }
    }
}

impl Recording {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total replay duration: the sum of every action's delay.
    pub fn total_duration_ms(&self) -> i64 {
        self.actions.iter().map(|a| a.delay_ms).sum()
    }

    pub fn action_count(&self) -> usize {
        self.actions.len()
    }

    /// A recording is valid iff its version tag is non-empty and every
    /// contained action passes its own invariants.
    pub fn is_valid(&self) -> bool {
        if self.version.is_empty() {
            return false;
        }
        self.actions.iter().all(Action::is_valid)
    }

    /// Deep copy under fresh identifiers and fresh creation stamps.
    /// Contained actions are duplicated, not aliased.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            version: self.version.clone(),
            id: Uuid::new_v4(),
            name: self.name.clone(),
            description: self.description.clone(),
            created_at: now,
            modified_at: now,
            screen_width: self.screen_width,
            screen_height: self.screen_height,
            os_version: self.os_version.clone(),
            actions: self.actions.iter().map(Action::duplicate).collect(),
        }
    }

    /// One-line human summary. Presentation only.
    pub fn summary(&self) -> String {
        let total = self.total_duration_ms();
        let minutes = total / 60_000;
        let seconds = (total % 60_000) / 1000;
        let millis = total % 1000;
        format!(
            "{}: {} actions, {:02}:{:02}.{:03}, {}x{}",
            self.name.as_deref().unwrap_or("untitled"),
            self.action_count(),
            minutes,
            seconds,
            millis,
            self.screen_width,
            self.screen_height,
        )
    }
}
