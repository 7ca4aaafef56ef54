use std::sync::LazyLock;

use {regex::Regex, tracing::error};

/// TikTok video links on the main domain or the `vt.` short-link subdomain.
const VIDEO_LINK_PATTERN: &str = r"https?://(?:www\.|vt\.)?tiktok\.com/[a-zA-Z0-9/_?=&%@.-]+";

static VIDEO_LINK: LazyLock<Regex> = LazyLock::new(|| compile_regex(VIDEO_LINK_PATTERN));

/// Compile `pattern`, falling back to a never-matching regex (logged).
fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(e) => {
            error!(pattern, error = %e, "video link pattern failed to compile, no links will match");
            match Regex::new(r"$^") {
                Ok(fallback) => fallback,
                Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
            }
        },
    }
}

/// First supported video link in free-form text. Later links are ignored.
///
/// Sentence punctuation directly after a link is not part of it.
#[must_use]
pub fn extract_video_link(content: &str) -> Option<&str> {
    let found = VIDEO_LINK.find(content)?;
    let link = found.as_str().trim_end_matches('.');
    (!link.is_empty()).then_some(link)
}
