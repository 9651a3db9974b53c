/// Telegram rejects messages longer than 4096 UTF-16 code units
pub const TELEGRAM_MESSAGE_LIMIT: usize = 4096;

pub struct MessageFormatter;

impl MessageFormatter {
    pub fn escape_html(text: &str) -> String {
        html_escape::encode_text(text).to_string()
    }

    /// shortens text longer than `max_chars` to `max_chars - 3` characters plus "..."
    pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
        if text.chars().count() <= max_chars {
            return text.to_string();
        }
        let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }

    /// counts UTF-16 code units as Telegram does for message length limits
    pub fn count_utf16_code_units(text: &str) -> usize {
        text.encode_utf16().count()
    }

    /// splits a message on line boundaries into chunks under `max_length` code units.
    ///
    /// A single line longer than the limit becomes its own oversized chunk.
    pub fn split_by_lines(text: &str, max_length: usize) -> Vec<String> {
        if Self::count_utf16_code_units(text) <= max_length {
            return vec![text.to_string()];
        }

        let mut chunks = Vec::new();
        let mut current = String::new();

        for line in text.lines() {
            let needed = Self::count_utf16_code_units(line) + 1;
            if !current.is_empty() && Self::count_utf16_code_units(&current) + needed > max_length
            {
                chunks.push(current.trim_end().to_string());
                current.clear();
            }
            current.push_str(line);
            current.push('\n');
        }

        if !current.trim().is_empty() {
            chunks.push(current.trim_end().to_string());
        }

        chunks
    }
}
