const FENCE: &str = "```";

/// Remove one pair of surrounding triple-backtick fences, including an
/// optional language tag after the opening fence. Text without both an
/// opening and a closing fence is only trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let Some(inner) = text
        .strip_prefix(FENCE)
        .and_then(|rest| rest.strip_suffix(FENCE))
    else {
        return text;
    };

    // language tag: `json`, `JSON`, `js` ... up to the first newline
    let inner = match inner.split_once('\n') {
        Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
        _ => inner,
    };
    inner.trim()
}
