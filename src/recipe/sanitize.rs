//! Cleanup of raw model output before JSON parsing.

/// Strip Markdown code fences and surrounding chatter from a model reply.
///
/// The result is narrowed to the span between the first `{` and the last `}`
/// when both exist. Anything still unparsable surfaces as a JSON error.
pub fn clean_model_output(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the info string (`json`, `JSON`, ...) up to the end of the line.
        text = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
        };
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    let text = text.trim();

    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => text,
    }
}
