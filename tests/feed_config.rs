// tests/feed_config.rs
//
// Resolution order for FeedConfig: $FEED_CONFIG_PATH -> config/feed.toml ->
// built-in defaults, with individual env overrides on top. These tests mutate
// process env and CWD, so they run serialized.

use medium_rss_proxy::config::{FeedConfig, ENV_CONFIG_PATH};
use serial_test::serial;
use std::{env, fs};

const ENV_KEYS: &[&str] = &[
    ENV_CONFIG_PATH,
    "FEED_DEFAULT_LIMIT",
    "FEED_MAX_DESCRIPTION",
    "FEED_ARTICLES_MAX_AGE",
    "FEED_PROFILE_MAX_AGE",
    "FEED_SWR",
    "FEED_BASE_URL",
];

fn clear_env() {
    for k in ENV_KEYS {
        env::remove_var(k);
    }
}

#[serial]
#[test]
fn defaults_without_file_or_env() {
    clear_env();
    // Isolate CWD so a real config/ in the repo can't interfere.
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    let cfg = FeedConfig::load_default().unwrap();
    assert_eq!(cfg.default_limit, 10);
    assert_eq!(cfg.max_description_len, 200);
    assert_eq!(cfg.articles_max_age_secs, 3_600);
    assert_eq!(cfg.profile_max_age_secs, 86_400);
    assert_eq!(cfg.stale_while_revalidate_secs, 86_400);
    assert_eq!(cfg.base_url, "https://medium.com");

    env::set_current_dir(&old).unwrap();
}

#[serial]
#[test]
fn file_values_load_and_env_wins_over_them() {
    clear_env();
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("feed.toml");
    fs::write(&path, "default_limit = 5\nmax_description_len = 150\n").unwrap();

    env::set_var(ENV_CONFIG_PATH, path.display().to_string());
    env::set_var("FEED_DEFAULT_LIMIT", "7");

    let cfg = FeedConfig::load_default().unwrap();
    assert_eq!(cfg.default_limit, 7, "env override beats the file");
    assert_eq!(cfg.max_description_len, 150, "file value survives");
    assert_eq!(cfg.articles_max_age_secs, 3_600, "defaults backfill the rest");

    clear_env();
}

#[serial]
#[test]
fn malformed_env_values_are_ignored() {
    clear_env();
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::set_var("FEED_DEFAULT_LIMIT", "abc");
    env::set_var("FEED_ARTICLES_MAX_AGE", "-1");

    let cfg = FeedConfig::load_default().unwrap();
    assert_eq!(cfg.default_limit, 10);
    assert_eq!(cfg.articles_max_age_secs, 3_600);

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial]
#[test]
fn env_path_to_missing_file_errors() {
    clear_env();
    env::set_var(ENV_CONFIG_PATH, "/definitely/not/here/feed.toml");
    assert!(FeedConfig::load_default().is_err());
    clear_env();
}

#[serial]
#[test]
fn base_url_override_drops_trailing_slash() {
    clear_env();
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();

    env::set_var("FEED_BASE_URL", "http://localhost:8080/");
    let cfg = FeedConfig::load_default().unwrap();
    assert_eq!(cfg.base_url, "http://localhost:8080");

    clear_env();
    env::set_current_dir(&old).unwrap();
}
