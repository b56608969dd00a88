//! README decoding and text features.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::models::raw::ReadmeContent;

/// Decode the base64 README payload to text.
///
/// GitHub wraps the payload with newlines, which are stripped first.
/// Invalid base64 decodes to an empty string; invalid UTF-8 is replaced.
pub fn decode(readme: &ReadmeContent) -> String {
    let compact: String = readme
        .content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    match STANDARD.decode(compact.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::debug!(error = %e, "README content is not valid base64");
            String::new()
        }
    }
}

/// Number of pieces when `text` is split on whitespace runs.
///
/// Leading and trailing whitespace each contribute an empty piece, so
/// `"one two three\n"` counts 4. Empty or blank text counts 0.
pub fn word_count(text: &str) -> usize {
    let words = text.split_whitespace().count();
    if words == 0 {
        return 0;
    }
    let leading = text.starts_with(char::is_whitespace);
    let trailing = text.ends_with(char::is_whitespace);
    words + usize::from(leading) + usize::from(trailing)
}

/// Case-insensitive check for any of `keywords` in `text`.
pub fn has_any_keyword(text: &str, keywords: &[String]) -> bool {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .any(|k| !k.is_empty() && lower.contains(&k.to_lowercase()))
}
