//! Unit tests for slug encoding
//!
//! Tests `slugify()` against accented input and checks idempotence.

use page_navigator::slugify;
use proptest::prelude::*;

#[test]
fn test_slugify_folds_accents() {
    assert_eq!(slugify("Déjà Vu"), "deja-vu");
    assert_eq!(slugify("Œuvre Complète"), "oeuvre-complete");
    assert_eq!(slugify("Straße"), "strasse");
}

#[test]
fn test_slugify_drops_symbols() {
    assert_eq!(slugify("50% off!"), "50-off");
    assert_eq!(slugify("a/b?c"), "abc");
}

proptest! {
    #[test]
    fn prop_slugify_is_idempotent(input in "\\PC{0,40}") {
        let once = slugify(&input);
        prop_assert_eq!(slugify(&once), once);
    }

    #[test]
    fn prop_slugify_is_url_safe(input in "\\PC{0,40}") {
        let slug = slugify(&input);
        prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.contains("--"));
    }
}
