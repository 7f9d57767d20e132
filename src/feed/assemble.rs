// src/feed/assemble.rs
use metrics::{counter, histogram};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::feed::ensure_metrics_described;
use crate::feed::extract::{
    clean_description, extract_categories, extract_text, extract_thumbnail,
};

/// One normalized feed entry, shaped for the JSON surface.
///
/// Every field is best-effort: a missing tag in the source item leaves the
/// field empty (or `None` for the thumbnail) and never fails the batch.
/// `guid` is a dedupe hint for callers; nothing here enforces uniqueness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    pub categories: Vec<String>,
    pub author: String,
    pub guid: String,
}

/// Channel-level feed metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub description: String,
    pub link: String,
}

static RE_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<item>(.*?)</item>").expect("item pattern"));

/// Split a raw feed document into items and assemble at most `limit` of them,
/// in document order. Item order is feed-native; no sorting happens here.
pub fn parse_feed(xml: &str, limit: usize, max_description_len: usize) -> Vec<Article> {
    ensure_metrics_described();
    let t0 = std::time::Instant::now();

    let mut articles = Vec::new();
    for caps in RE_ITEM.captures_iter(xml).take(limit) {
        let item = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        articles.push(assemble_item(item, max_description_len));
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("feed_parse_ms").record(ms);
    counter!("feed_items_total").increment(articles.len() as u64);

    articles
}

fn assemble_item(item: &str, max_description_len: usize) -> Article {
    let author = {
        let creator = extract_text(item, "dc:creator");
        if creator.is_empty() {
            extract_text(item, "author")
        } else {
            creator
        }
    };

    Article {
        title: extract_text(item, "title"),
        link: extract_text(item, "link"),
        pub_date: extract_text(item, "pubDate"),
        description: clean_description(
            &extract_text(item, "description"),
            max_description_len,
        ),
        thumbnail: extract_thumbnail(item),
        categories: extract_categories(item),
        author,
        guid: extract_text(item, "guid"),
    }
}

/// Channel metadata off the same document: the first title/description/link
/// in an RSS document are the channel's own, ahead of any item.
pub fn parse_profile(xml: &str) -> Profile {
    Profile {
        name: extract_text(xml, "title"),
        description: extract_text(xml, "description"),
        link: extract_text(xml, "link"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_doc(inner: &str) -> String {
        format!("<rss><channel><item>{inner}</item></channel></rss>")
    }

    #[test]
    fn assembles_fields_from_a_single_item() {
        let xml = item_doc(
            r#"
            <title><![CDATA[Hello &amp; welcome]]></title>
            <link>https://medium.com/@alice/hello</link>
            <pubDate>Tue, 05 Aug 2025 09:30:00 GMT</pubDate>
            <dc:creator><![CDATA[Alice]]></dc:creator>
            <guid isPermaLink="false">abc123</guid>
            <category>rust</category>
            <description><![CDATA[<p>Short intro.</p>]]></description>
            "#,
        );
        let out = parse_feed(&xml, 10, 200);
        assert_eq!(out.len(), 1);
        let a = &out[0];
        assert_eq!(a.title, "Hello & welcome");
        assert_eq!(a.link, "https://medium.com/@alice/hello");
        assert_eq!(a.pub_date, "Tue, 05 Aug 2025 09:30:00 GMT");
        assert_eq!(a.author, "Alice");
        assert_eq!(a.guid, "abc123");
        assert_eq!(a.categories, vec!["rust"]);
        assert_eq!(a.description, "Short intro.");
        assert_eq!(a.thumbnail, None);
    }

    #[test]
    fn missing_fields_become_empty_not_errors() {
        let xml = item_doc("<title>only a title</title>");
        let out = parse_feed(&xml, 5, 200);
        assert_eq!(out.len(), 1);
        let a = &out[0];
        assert_eq!(a.title, "only a title");
        assert_eq!(a.link, "");
        assert_eq!(a.author, "");
        assert!(a.categories.is_empty());
        assert_eq!(a.thumbnail, None);
    }

    #[test]
    fn author_falls_back_to_plain_author_tag() {
        let xml = item_doc("<author>bob@example.com</author>");
        assert_eq!(parse_feed(&xml, 1, 200)[0].author, "bob@example.com");
    }

    #[test]
    fn limit_bounds_the_batch_and_zero_is_honored() {
        let xml = format!(
            "<rss>{}{}{}</rss>",
            "<item><title>one</title></item>",
            "<item><title>two</title></item>",
            "<item><title>three</title></item>",
        );
        assert_eq!(parse_feed(&xml, 2, 200).len(), 2);
        assert_eq!(parse_feed(&xml, 2, 200)[0].title, "one");
        assert!(parse_feed(&xml, 0, 200).is_empty());
        // Fewer items than the limit: return what's there.
        assert_eq!(parse_feed(&xml, 10, 200).len(), 3);
    }

    #[test]
    fn profile_reads_channel_level_fields() {
        let xml = r#"
            <rss><channel>
            <title><![CDATA[Stories by Alice on Medium]]></title>
            <description><![CDATA[Alice writes here]]></description>
            <link>https://medium.com/@alice</link>
            <item><title>an item title</title></item>
            </channel></rss>
        "#;
        let p = parse_profile(xml);
        assert_eq!(p.name, "Stories by Alice on Medium");
        assert_eq!(p.description, "Alice writes here");
        assert_eq!(p.link, "https://medium.com/@alice");
    }
}
