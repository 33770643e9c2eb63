use ammonia::Builder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use validator::ValidationError;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color pattern is valid")
});

/// Cleans editor-produced HTML down to a safe subset of formatting tags.
/// Scripts, event handlers and unknown tags are removed.
pub fn sanitize_rich_text(input: &str) -> String {
    let tags_to_allow = [
        "h1", "h2", "h3", "h4", "h5", "h6", "b", "strong", "i", "em", "u", "p", "br", "a", "ul", "ol",
        "li", "blockquote", "code", "pre", "hr", "img", "figure", "figcaption", "table", "thead",
        "tbody", "tr", "th", "td", "s", "del", "span", "div",
    ];
    let safe_attributes = ["src", "href", "alt", "title", "class", "width", "height"];

    Builder::new()
        .tags(tags_to_allow.iter().cloned().collect::<HashSet<_>>())
        .generic_attributes(safe_attributes.iter().cloned().collect::<HashSet<_>>())
        .link_rel(Some("nofollow noopener"))
        .clean(input)
        .to_string()
}

/// Strips all HTML tags, keeping only text. Used for titles and names.
pub fn strip_all_html(input: &str) -> String {
    Builder::new().tags(HashSet::new()).clean(input).to_string()
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// `#rgb` or `#rrggbb`.
pub fn validate_hex_color(value: &str) -> Result<(), ValidationError> {
    if HEX_COLOR.is_match(value) {
        Ok(())
    } else {
        Err(invalid("hex_color", "must be a hex color such as #2563eb"))
    }
}

/// Absolute http(s) URL. An empty string is accepted and means "unset".
pub fn validate_optional_http_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(invalid("url", "must be an absolute http(s) URL")),
    }
}

/// Absolute http(s) URL or a site-relative path such as `/images/team/a.jpg`.
pub fn validate_image_reference(value: &str) -> Result<(), ValidationError> {
    if value.starts_with('/') && !value.starts_with("//") {
        return Ok(());
    }
    validate_optional_http_url(value).map_err(|_| invalid("image", "must be an http(s) URL or a site path"))
}
