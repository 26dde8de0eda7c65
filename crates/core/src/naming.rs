//! Project naming helpers.
//!
//! Derives a human-readable project name from a prompt, a hosting-safe slug
//! from a project name, and escapes text for inclusion in generated HTML.

/// Maximum length (in characters) of a derived project name.
pub const MAX_PROJECT_NAME_LEN: usize = 50;

/// Maximum length (in characters) of a hosting slug.
pub const MAX_SLUG_LEN: usize = 50;

/// Slug used when sanitizing leaves nothing behind.
pub const DEFAULT_SLUG: &str = "my-app";

/// Number of leading prompt words used for a derived project name.
const NAME_WORD_COUNT: usize = 5;

const ELLIPSIS: &str = "...";

/// Derive a display name from the first five words of a prompt.
///
/// Each word has its first character upper-cased; the rest of the word is
/// kept as written. Names longer than 50 characters are cut to 47
/// characters followed by `...`.
///
/// ```
/// use appgen_core::naming::extract_project_name;
///
/// assert_eq!(
///     extract_project_name("a simple todo list app with dark mode"),
///     "A Simple Todo List App"
/// );
/// ```
pub fn extract_project_name(prompt: &str) -> String {
    let name = prompt
        .split_whitespace()
        .take(NAME_WORD_COUNT)
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ");

    if name.chars().count() > MAX_PROJECT_NAME_LEN {
        let keep = MAX_PROJECT_NAME_LEN - ELLIPSIS.len();
        let mut truncated: String = name.chars().take(keep).collect();
        truncated.push_str(ELLIPSIS);
        truncated
    } else {
        name
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Turn a project name into a hosting-compatible slug.
///
/// Lowercases, replaces every run of characters outside `[a-z0-9-]` (and
/// any run of hyphens) with a single hyphen, strips leading and trailing
/// hyphens, and keeps at most 50 characters. Falls back to
/// [`DEFAULT_SLUG`] when nothing is left.
///
/// ```
/// use appgen_core::naming::sanitize_slug;
///
/// assert_eq!(sanitize_slug("My Cool App!!"), "my-cool-app");
/// assert_eq!(sanitize_slug("!!!"), "my-app");
/// ```
pub fn sanitize_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    let slug: String = slug.trim_matches('-').chars().take(MAX_SLUG_LEN).collect();
    if slug.is_empty() {
        DEFAULT_SLUG.to_string()
    } else {
        slug
    }
}

/// Escape text for safe inclusion in HTML element content or attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
