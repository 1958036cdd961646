//! Commented default config written on first run.

pub(super) fn default_config_toml() -> &'static str {
    r#"# kubechat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[backend]
# base_url = "http://localhost:5000"   # overridden by KUBECHAT_BACKEND_URL
# connect_timeout_secs = 10            # 1-60
# request_timeout_secs = 120           # 5-600

[chat]
# default_title = "New Chat"
# title_max_chars = 30                 # 10-120
# title_word_slack = 10                # 0-40
# history_limit = 50                   # 1-500

[logging]
# level = "INFO"                       # DEBUG, INFO, WARNING, ERROR
"#
}
