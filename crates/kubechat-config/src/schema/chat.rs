use serde::{Deserialize, Serialize};

/// Conversation console settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Title given to sessions before their first message.
    pub default_title: String,
    /// Titles derived from the first message are cut at this many characters
    /// (valid range: 10-120).
    pub title_max_chars: u32,
    /// How far past `title_max_chars` a cut may extend to finish a word
    /// (valid range: 0-40).
    pub title_word_slack: u32,
    /// Number of messages requested when loading a session's history
    /// (valid range: 1-500).
    pub history_limit: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_title: "New Chat".into(),
            title_max_chars: 30,
            title_word_slack: 10,
            history_limit: 50,
        }
    }
}
