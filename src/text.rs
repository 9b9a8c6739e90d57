//! Text normalization helpers shared by the curator and the generator.
//!
//! Everything here is pure. Lengths and truncation points are counted in
//! chars, not bytes, so multi-byte titles never split mid-character.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::warn;

/// Summaries longer than this are truncated.
pub const SUMMARY_MAX_CHARS: usize = 220;
/// Truncation point for an over-long first sentence.
const SENTENCE_CUT_CHARS: usize = 215;
/// A first sentence shorter than this is not informative enough on its own.
const SENTENCE_MIN_CHARS: usize = 60;
/// Stripping a trailing publisher name must leave at least this much text.
const SOURCE_STRIP_MIN_CHARS: usize = 40;

pub const ELLIPSIS: char = '…';

const DASHES: &[char] = &['-', '–', '—'];
const DASHES_AND_COLON: &[char] = &['-', '–', '—', ':'];

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid tag regex"))
}

fn href_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)href="(https?://[^"]+)""#).expect("valid href regex"))
}

fn url_param_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[?&]url=([^&]+)").expect("valid url param regex"))
}

fn sentence_end_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+").expect("valid sentence regex"))
}

/// Decode the handful of entities feeds leave in descriptions.
///
/// `&amp;` goes last so `&amp;quot;` decodes to `&quot;` rather than `"`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Strip markup, decode entities and collapse whitespace.
pub fn sanitize_description(description: &str) -> String {
    let without_tags = tag_regex().replace_all(description, " ");
    let decoded = decode_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max` chars of `text`.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn cut_at_any<'a>(text: &'a str, separators: &[char]) -> &'a str {
    match text.find(separators) {
        Some(idx) => text[..idx].trim(),
        None => text.trim(),
    }
}

/// Headline with everything from the first dash onward removed.
pub fn strip_dash_segment(title: &str) -> &str {
    cut_at_any(title, DASHES)
}

/// Headline with everything from the first dash or colon onward removed.
pub fn headline_prefix(title: &str) -> &str {
    cut_at_any(title, DASHES_AND_COLON)
}

/// Headline with a trailing `| Publisher` suffix removed.
pub fn strip_publisher_suffix(title: &str) -> &str {
    cut_at_any(title, &['|'])
}

fn strip_trailing_source(clean: String, source_name: &str) -> String {
    let pattern = format!("(?i){}$", regex::escape(source_name));
    let Ok(re) = Regex::new(&pattern) else {
        return clean;
    };

    let trimmed = re.replace(&clean, "").trim().to_string();
    if trimmed.chars().count() >= SOURCE_STRIP_MIN_CHARS {
        trimmed
    } else {
        clean
    }
}

fn first_sentence(clean: &str) -> &str {
    match sentence_end_regex().find(clean) {
        Some(m) => clean[..m.start() + 1].trim(),
        None => clean.trim(),
    }
}

/// Derive a short synopsis from a feed description.
pub fn smart_summary(description: &str, title: &str, source_name: Option<&str>) -> String {
    let mut clean = sanitize_description(description);
    if let Some(source) = source_name.filter(|s| !s.is_empty()) {
        clean = strip_trailing_source(clean, source);
    }

    if clean.is_empty() {
        return format!("{} just broke in the last 24 hours.", headline_prefix(title));
    }

    let sentence = first_sentence(&clean);
    let sentence_len = sentence.chars().count();
    if sentence_len > SUMMARY_MAX_CHARS {
        return format!(
            "{}{}",
            truncate_chars(sentence, SENTENCE_CUT_CHARS).trim(),
            ELLIPSIS
        );
    }

    if sentence_len >= SENTENCE_MIN_CHARS {
        return sentence.to_string();
    }

    let head = truncate_chars(&clean, SUMMARY_MAX_CHARS);
    if head.len() < clean.len() {
        format!("{}{}", head, ELLIPSIS)
    } else {
        head.to_string()
    }
}

/// Resolve the publisher URL behind an aggregator redirect link.
///
/// Prefers the first absolute `href` in the description, then a `url=`
/// query parameter on the raw link, then the raw link itself.
pub fn extract_primary_url(description_html: &str, fallback: &str) -> String {
    if let Some(caps) = href_regex().captures(description_html) {
        return caps[1].to_string();
    }

    if let Some(caps) = url_param_regex().captures(fallback) {
        match urlencoding::decode(&caps[1]) {
            Ok(decoded) => return decoded.into_owned(),
            Err(e) => warn!("Failed to decode url parameter in '{}': {}", fallback, e),
        }
    }

    fallback.to_string()
}

/// Stable id from the resolved link and topic label, e.g. `spacex-1a2b3c4d5e`.
pub fn build_id(link: &str, topic: &str) -> String {
    let digest = format!("{:x}", md5::compute(link.as_bytes()));
    let slug = topic
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!("{}-{}", slug, &digest[..10])
}

/// Strict relative distance with a suffix: "5 minutes ago", "in 2 hours".
pub fn format_relative_time(published: DateTime<Utc>, now: DateTime<Utc>) -> String {
    const MINUTES_IN_DAY: f64 = 1440.0;
    const MINUTES_IN_MONTH: f64 = 43200.0;
    const MINUTES_IN_YEAR: f64 = 525600.0;

    let diff_ms = (now - published).num_milliseconds();
    let future = diff_ms < 0;
    let ms = diff_ms.unsigned_abs() as f64;
    let minutes = ms / 60_000.0;

    let (value, unit) = if minutes < 1.0 {
        ((ms / 1000.0).round(), "second")
    } else if minutes < 60.0 {
        (minutes.round(), "minute")
    } else if minutes < MINUTES_IN_DAY {
        ((minutes / 60.0).round(), "hour")
    } else if minutes < MINUTES_IN_MONTH {
        ((minutes / MINUTES_IN_DAY).round(), "day")
    } else if minutes < MINUTES_IN_YEAR {
        ((minutes / MINUTES_IN_MONTH).round(), "month")
    } else {
        ((minutes / MINUTES_IN_YEAR).round(), "year")
    };

    let value = value as u64;
    let plural = if value == 1 { "" } else { "s" };
    if future {
        format!("in {} {}{}", value, unit, plural)
    } else {
        format!("{} {}{} ago", value, unit, plural)
    }
}

/// `MMM d, HH:mm` in UTC, e.g. `Mar 5, 09:07`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %H:%M").to_string()
}
