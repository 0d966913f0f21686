/// Opening marker of a markdown JSON code block.
pub const JSON_FENCE_OPEN: &str = "```json\n";
/// Closing marker of a markdown code block.
pub const JSON_FENCE_CLOSE: &str = "\n```";

/// Removes a markdown JSON fence around `text`.
///
/// Only applies when the text starts with the opener; the closing marker is
/// then removed if it ends the text. Purely textual, nothing is parsed here.
pub fn strip_json_fence(text: &str) -> &str {
    match text.strip_prefix(JSON_FENCE_OPEN) {
        Some(inner) => inner.strip_suffix(JSON_FENCE_CLOSE).unwrap_or(inner),
        None => text,
    }
}
