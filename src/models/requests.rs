//! Request DTOs for the proxy API
//!
//! Defines the structure of incoming path parameters.

use serde::Deserialize;

/// Longest in-game name accepted by the player route
pub const MAX_IGN_LENGTH: usize = 32;

/// Path parameters for GET /v1/players/:ign
#[derive(Debug, Clone, Deserialize)]
pub struct PlayerPath {
    /// The player's in-game name
    pub ign: String,
}

impl PlayerPath {
    /// Validates the in-game name.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.ign.trim().is_empty() {
            return Some("Player name cannot be empty".to_string());
        }
        if self.ign.chars().count() > MAX_IGN_LENGTH {
            return Some(format!(
                "Player name exceeds maximum length of {} characters",
                MAX_IGN_LENGTH
            ));
        }
        if !self
            .ign
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ' ')
        {
            return Some("Player name may only contain letters, digits, '_' and spaces".to_string());
        }
        None
    }
}
