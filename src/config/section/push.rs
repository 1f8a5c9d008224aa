//! `[push]` section configuration.
//!
//! Defaults substituted when a push payload omits its title or body.

use serde::{Deserialize, Serialize};

/// Push notification defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Notification title used when the payload has none.
    pub title: String,

    /// Notification body used when the payload has none.
    pub body: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            title: "mdshelf".into(),
            body: "New reading material is available.".into(),
        }
    }
}
