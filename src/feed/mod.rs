// src/feed/mod.rs
pub mod assemble;
pub mod client;
pub mod extract;

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up on /metrics).
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "feed_fetch_total",
            "Successful upstream feed retrievals."
        );
        describe_counter!(
            "feed_fetch_errors_total",
            "Upstream fetch failures (transport error or non-success status)."
        );
        describe_counter!("feed_items_total", "Feed items assembled into articles.");
        describe_histogram!("feed_fetch_ms", "Upstream fetch time in milliseconds.");
        describe_histogram!("feed_parse_ms", "Feed parse time in milliseconds.");
    });
}
