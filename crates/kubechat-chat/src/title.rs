//! Session titles derived from the first user message.

const ELLIPSIS: &str = "...";

/// Title for a session whose first message is `text`.
///
/// The trimmed text is cut at `max_chars` characters and `...` is appended
/// when anything was dropped. A cut landing inside a word moves to the end
/// of that word if the word ends within `word_slack` further characters.
///
/// Titles can therefore run up to `word_slack` characters past `max_chars`.
/// The default slack of 10 turns "Show me all pods in the default namespace"
/// into "Show me all pods in the default..." rather than a cut mid-word;
/// a slack of 0 gives a strict `max_chars` limit.
pub fn derive_title(text: &str, max_chars: usize, word_slack: usize) -> String {
    let text = text.trim();
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_chars {
        return text.to_string();
    }

    let mut cut = max_chars;
    let splits_word = cut > 0 && !chars[cut - 1].is_whitespace() && !chars[cut].is_whitespace();
    if splits_word {
        let word_end = chars[cut..]
            .iter()
            .position(|c| c.is_whitespace())
            .unwrap_or(chars.len() - cut);
        if word_end <= word_slack {
            cut += word_end;
        }
    }
    if cut >= chars.len() {
        return text.to_string();
    }

    let head: String = chars[..cut].iter().collect();
    format!("{}{ELLIPSIS}", head.trim_end())
}
