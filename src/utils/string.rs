//! String helpers for table cells
//!
//! Everything the backend sends is user-controlled text. Before it reaches the
//! terminal it goes through [`sanitize_cell`] so that embedded control
//! sequences cannot move the cursor, recolor the screen or rewrite the title.

/// Number of characters of a memory id shown in the table
pub const ID_PREFIX_CHARS: usize = 8;

/// Neutralize terminal control characters in a cell value.
///
/// Newlines, carriage returns and tabs collapse to a single space so a row
/// stays on one line. Every other control character (ESC, BEL, C1 controls)
/// becomes U+FFFD. Markup such as `<b>` has no meaning to a terminal and is
/// kept literally.
///
/// # Examples
/// ```
/// use mnemon_dash::utils::string::sanitize_cell;
///
/// assert_eq!(sanitize_cell("<b>hi</b>"), "<b>hi</b>");
/// assert_eq!(sanitize_cell("a\nb"), "a b");
/// assert_eq!(sanitize_cell("\u{1b}[31mred"), "\u{fffd}[31mred");
/// ```
pub fn sanitize_cell(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '\u{fffd}',
            c => c,
        })
        .collect()
}

/// First [`ID_PREFIX_CHARS`] characters of an identifier.
///
/// Counts characters, not bytes, so non-ASCII ids never split mid-codepoint.
pub fn id_prefix(id: &str) -> &str {
    match id.char_indices().nth(ID_PREFIX_CHARS) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// Safely truncate a string at a character boundary, adding ellipsis if truncated.
///
/// # Examples
/// ```
/// use mnemon_dash::utils::string::truncate_at_char_boundary;
///
/// assert_eq!(truncate_at_char_boundary("hello world", 5), "hello...");
/// assert_eq!(truncate_at_char_boundary("hello", 10), "hello");
/// ```
pub fn truncate_at_char_boundary(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{}...", truncated)
    }
}
