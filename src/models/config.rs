use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::time::Duration;

/// Prompt texts keyed by situation.
///
/// `{side}` expands to the side to move, `{movetext}` to the game so far and
/// `{legal}` to the list of legal moves.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PromptTemplates {
    pub start: String,
    pub normal: String,
    pub failed: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        PromptTemplates {
            start: "Say the first move to play in chess in standard notation".to_string(),
            normal: "Reply next chess move as {side}. Only say the move. {movetext}".to_string(),
            failed: "Reply next chess move as {side}. Play one of these moves: {legal}. Only say the move. {movetext}"
                .to_string(),
        }
    }
}

/// Tuning of a game session
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    /// Completion requests per model move before giving up
    pub max_attempts: u32,
    /// Ceiling of the consecutive failure counter
    pub max_failures: u32,
    pub completion_timeout_ms: u64,
    pub max_reply_tokens: u32,
    pub prompts: PromptTemplates,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            max_attempts: 5,
            max_failures: 5,
            completion_timeout_ms: 5_000,
            max_reply_tokens: 10,
            prompts: PromptTemplates::default(),
        }
    }
}

impl GameConfig {
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_millis(self.completion_timeout_ms)
    }

    /// Read a JSON config file; missing fields keep their defaults
    pub fn load(path: &Path) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Connection details of the chat-completion provider
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Hard cap on a single HTTP exchange, independent of the move deadline
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            request_timeout_secs: 30,
        }
    }
}
