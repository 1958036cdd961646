//! Backend connection validation.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::KubechatConfig;

use super::helpers::validate_range;

static BASE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/?#]+(/[^\s?#]*)?$").unwrap());

pub(crate) fn validate_backend(errors: &mut Vec<String>, config: &KubechatConfig) {
    let url = &config.backend.base_url;
    if !BASE_URL_RE.is_match(url) {
        errors.push(format!("backend.base_url = {url:?} is not an http(s) URL"));
    } else if url.ends_with('/') {
        errors.push(format!("backend.base_url = {url:?} must not end with '/'"));
    }

    validate_range(
        errors,
        "backend.connect_timeout_secs",
        config.backend.connect_timeout_secs,
        1,
        60,
    );
    validate_range(
        errors,
        "backend.request_timeout_secs",
        config.backend.request_timeout_secs,
        5,
        600,
    );
}
