//! Conversation settings validation.

use crate::schema::KubechatConfig;

use super::helpers::validate_range;

pub(crate) fn validate_chat(errors: &mut Vec<String>, config: &KubechatConfig) {
    if config.chat.default_title.trim().is_empty() {
        errors.push("chat.default_title must not be empty".into());
    }
    validate_range(
        errors,
        "chat.title_max_chars",
        config.chat.title_max_chars,
        10,
        120,
    );
    validate_range(
        errors,
        "chat.title_word_slack",
        config.chat.title_word_slack,
        0,
        40,
    );
    validate_range(
        errors,
        "chat.history_limit",
        config.chat.history_limit,
        1,
        500,
    );
}
