// src/feed/extract.rs
//
// Regex-based field extraction for the narrow, well-known shape of Medium's
// RSS output. All pattern matching is kept behind this module so a structural
// XML parser could replace it without touching callers.

use std::collections::HashMap;
use std::sync::RwLock;

use once_cell::sync::Lazy;
use regex::Regex;

// Compiled per-tag patterns, built on first use. The tag set per feed is a
// handful of fixed names, so the cache stays tiny.
static TAG_PATTERNS: Lazy<RwLock<HashMap<String, Regex>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn tag_pattern(tag: &str) -> Regex {
    if let Some(re) = TAG_PATTERNS.read().expect("rwlock poisoned").get(tag) {
        return re.clone();
    }
    let re = Regex::new(&format!(
        r"(?is)<{0}(?:[^>]*)>(.*?)</{0}>",
        regex::escape(tag)
    ))
    .expect("tag pattern");
    TAG_PATTERNS
        .write()
        .expect("rwlock poisoned")
        .insert(tag.to_string(), re.clone());
    re
}

/// First matching tag's inner text, or empty string when absent.
///
/// Tag matching is case-insensitive, tolerates attributes on the opening tag
/// (incl. namespaced tags like `dc:creator`), and spans line breaks. Empty
/// string is the "not found" sentinel; absence is never an error.
pub fn extract_tag(xml: &str, tag: &str) -> String {
    tag_pattern(tag)
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

static RE_CDATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!\[CDATA\[(.*?)\]\]>").expect("cdata pattern"));

/// Unwrap CDATA sections, then decode the fixed five-entity set.
///
/// Only `&lt;` `&gt;` `&quot;` `&#39;` `&amp;` are in scope; anything else
/// passes through literally. `&amp;` is decoded last so already-escaped
/// entities decode exactly once (`&amp;lt;` becomes `&lt;`, not `<`).
pub fn decode_entities(s: &str) -> String {
    let unwrapped = RE_CDATA.replace_all(s, "$1");
    decode_basic_entities(unwrapped.trim())
}

fn decode_basic_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Convenience for the common extract-then-decode pairing.
pub fn extract_text(xml: &str, tag: &str) -> String {
    decode_entities(&extract_tag(xml, tag))
}

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("markup pattern"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Strip markup from a text blob and bound it to `max_len` characters.
///
/// Runs of whitespace collapse to single spaces and the result is trimmed.
/// `"..."` is appended only when truncation actually occurred; a text of
/// exactly `max_len` characters comes back unchanged.
pub fn clean_description(s: &str, max_len: usize) -> String {
    let mut out = RE_TAGS.replace_all(s, "").to_string();
    out = out.replace("&nbsp;", " ");
    out = decode_basic_entities(&out);
    out = RE_WS.replace_all(&out, " ").to_string();
    let out = out.trim();

    if out.chars().count() > max_len {
        let cut: String = out.chars().take(max_len).collect();
        format!("{}...", cut.trim_end())
    } else {
        out.to_string()
    }
}

static RE_IMG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src="([^">]+)""#).expect("img pattern"));
static RE_MEDIA_THUMB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<media:thumbnail[^>]*?\surl="([^"]+)""#).expect("media thumbnail pattern")
});

/// Locate an item's thumbnail URL.
///
/// Fallback order: first `<img src>` inside `content:encoded` (or, when that
/// field is empty, inside `description`), then a `<media:thumbnail url>` tag.
/// `None` means "no thumbnail available", not an error.
pub fn extract_thumbnail(item: &str) -> Option<String> {
    let rich = extract_text(item, "content:encoded");
    let content = if rich.is_empty() {
        extract_text(item, "description")
    } else {
        rich
    };

    if let Some(c) = RE_IMG.captures(&content) {
        return Some(c[1].to_string());
    }
    // Matched against the raw item so self-closing thumbnail tags work too.
    RE_MEDIA_THUMB
        .captures(item)
        .map(|c| c[1].to_string())
}

static RE_CATEGORY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<category(?:[^>]*)>(.*?)</category>").expect("category pattern"));

/// Every category label in document order, trimmed. Duplicates are preserved
/// as-is; the source feed's own repetition is the caller's business.
pub fn extract_categories(item: &str) -> Vec<String> {
    RE_CATEGORY
        .captures_iter(item)
        .filter_map(|c| c.get(1))
        .map(|m| decode_entities(m.as_str()).trim().to_string())
        .filter(|label| !label.is_empty())
        .collect()
}
