//! Bounded previews of block text

/// Preview length stored on every semantic block
pub const DEFAULT_EXCERPT_CHARS: usize = 100;

/// First `max_chars` characters of `text`, followed by `...` if anything was cut
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
