use serde::{Deserialize, Serialize};

use crate::app::ModelSettings;
use crate::constants::{DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P, SYSTEM_PROMPT};

/// Fixed configuration a session is created with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub model: String,
    pub system_prompt: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
        }
    }
}

impl From<&ModelSettings> for SessionConfig {
    fn from(settings: &ModelSettings) -> Self {
        Self {
            model: settings.name.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            temperature: settings.temperature,
            top_p: settings.top_p,
            top_k: settings.top_k,
        }
    }
}

/// Who produced a turn, in the remote service's vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}
