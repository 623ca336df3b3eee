use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static BULLET: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^[*-] (.*)$").unwrap());
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").unwrap());

/// Renders the restricted markup subset used by bio, description and
/// contribution fields into display markup.
///
/// Supported: `**bold**`, `*italic*`, line-start `* item` / `- item`
/// bullets, blank-line paragraph boundaries and single-newline line breaks.
/// Anything else passes through literally. Structural characters of the raw
/// input are escaped before any substitution runs, so author text can never
/// reach the page as live markup.
///
/// Bullets are consumed before italics; a `* item` line must not feed its
/// leading star into single-star emphasis. Both line-oriented passes run
/// before the paragraph and line-break passes.
pub fn render_markup(text: &str) -> String {
    let escaped = escape(text);
    let rendered = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let rendered = BULLET.replace_all(&rendered, "<li>$1</li>");
    let rendered = ITALIC.replace_all(&rendered, "<em>$1</em>");
    let rendered = rendered.replace("\n\n", "</p><p>");
    rendered.replace('\n', "<br />")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
