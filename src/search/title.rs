//! Display titles: truncation, highlight markup and the fallback title for
//! untitled notes.

use super::matcher::{find_all_matches, segments};
use regex::RegexBuilder;
use tracing::warn;

/// Background colour used for highlighted title matches
pub const HIGHLIGHT_COLOR: &str = "#F7A9A9";

const ELLIPSIS: &str = "...";

/// Characters with a meaning in highlight patterns
const PATTERN_METACHARACTERS: &[char] = &[
    '{', '}', '(', ')', '[', ']', '.', '+', '*', '?', '^', '$', '\\', '|',
];

/// Shorten `title` to fit `limit` characters.
///
/// Titles of at most `limit` characters come back unchanged. Longer ones keep
/// their first `limit - 2` characters followed by `"..."`.
pub fn truncate(title: &str, limit: usize) -> String {
    if title.chars().count() <= limit {
        return title.to_string();
    }
    let mut short: String = title.chars().take(limit.saturating_sub(2)).collect();
    short.push_str(ELLIPSIS);
    short
}

/// Escape highlight-pattern metacharacters in `term` with a backslash so the
/// term is matched literally.
pub fn escape_for_highlight_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() * 2);
    for c in term.chars() {
        if PATTERN_METACHARACTERS.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Escape text for embedding in the title markup
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn highlight_open() -> String {
    format!("<span bgcolor='{}'>", HIGHLIGHT_COLOR)
}

/// Build the title markup with every case-insensitive occurrence of `term`
/// wrapped in a highlight span.
///
/// The title is truncated first, so only the visible part is highlighted.
/// An empty term yields the (possibly truncated) title in the markup envelope.
pub fn highlight_title(title: &str, term: &str, limit: usize) -> String {
    let shown = truncate(title, limit);
    let mut markup = String::from("<html>");

    if term.is_empty() {
        markup.push_str(&escape_html(&shown));
        markup.push_str("</html>");
        return markup;
    }

    let pattern = escape_for_highlight_pattern(term);
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => {
            let mut cursor = 0;
            for m in re.find_iter(&shown) {
                markup.push_str(&escape_html(&shown[cursor..m.start()]));
                markup.push_str(&highlight_open());
                markup.push_str(&escape_html(m.as_str()));
                markup.push_str("</span>");
                cursor = m.end();
            }
            markup.push_str(&escape_html(&shown[cursor..]));
        }
        Err(e) => {
            warn!("Highlight pattern for {:?} rejected ({}), using plain matching", term, e);
            for (segment, highlighted) in segments(&shown, &find_all_matches(&shown, term)) {
                if highlighted {
                    markup.push_str(&highlight_open());
                    markup.push_str(&escape_html(segment));
                    markup.push_str("</span>");
                } else {
                    markup.push_str(&escape_html(segment));
                }
            }
        }
    }

    markup.push_str("</html>");
    markup
}

/// Title shown for notes saved without one: `"Note <date>"`
pub fn default_title(created_date: &str) -> String {
    format!("Note {}", created_date)
}
