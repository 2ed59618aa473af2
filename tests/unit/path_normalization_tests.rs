//! Unit tests for URL normalization
//!
//! Tests `normalize_url()`, `normalize_base()` and `strip_base()` to ensure
//! every URL form reaches the route table the same way.

use page_navigator::history::{normalize_base, normalize_url, split_query, strip_base};

#[test]
fn test_normalize_base_forms() {
    assert_eq!(normalize_base(""), "/");
    assert_eq!(normalize_base("/"), "/");
    assert_eq!(normalize_base("app"), "/app/");
    assert_eq!(normalize_base("/app"), "/app/");
    assert_eq!(normalize_base("app/"), "/app/");
    assert_eq!(normalize_base("/shop/en/"), "/shop/en/");
}

#[test]
fn test_normalize_absolute_urls() {
    // Scheme and host are dropped, the path keeps the base
    assert_eq!(normalize_url("http://example.com/app/about", "/app/"), "/app/about");
    assert_eq!(normalize_url("https://example.com/about", "/app/"), "/app/about");
    assert_eq!(normalize_url("https://example.com", "/"), "/");
}

#[test]
fn test_normalize_protocol_relative_urls() {
    assert_eq!(normalize_url("//example.com/app/about", "/app/"), "/app/about");
}

#[test]
fn test_normalize_relative_paths() {
    // Paths without the base get it prepended
    assert_eq!(normalize_url("about", "/app/"), "/app/about");
    assert_eq!(normalize_url("/about", "/app/"), "/app/about");
    assert_eq!(normalize_url("", "/app/"), "/app/");
}

#[test]
fn test_normalize_never_doubles_base() {
    assert_eq!(normalize_url("/app/about", "/app/"), "/app/about");
    assert_eq!(normalize_url("/app/", "/app/"), "/app/");
    assert_eq!(normalize_url("/app", "/app/"), "/app");
}

#[test]
fn test_normalize_keeps_query() {
    assert_eq!(normalize_url("/about?x=1", "/app/"), "/app/about?x=1");
}

#[test]
fn test_strip_base_round_trip() {
    for path in ["/", "/about", "/gallery/2", "/article/a.html"] {
        let full = normalize_url(path, "/app/");
        assert_eq!(strip_base(&full, "/app/"), path, "{}", full);
    }
}

#[test]
fn test_split_query_and_fragment() {
    assert_eq!(split_query("/app/a?b=c"), ("/app/a", Some("b=c")));
    assert_eq!(split_query("/app/a?b=c#d"), ("/app/a", Some("b=c")));
    assert_eq!(split_query("/app/a#d?e"), ("/app/a", None));
}
