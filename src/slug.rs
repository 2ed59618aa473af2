//! URL slugs for reverse routing.

/// Convert text into a lowercase, dash-separated URL token.
///
/// Latin-1 accented letters are folded to ASCII, whitespace runs become a
/// single `-`, anything outside `[a-z0-9-]` is dropped and repeated dashes
/// are collapsed. The result is stable: `slugify(slugify(x)) == slugify(x)`.
///
/// ```
/// use page_navigator::slugify;
///
/// assert_eq!(slugify("I'm a robot"), "im-a-robot");
/// assert_eq!(slugify("Crème Brûlée"), "creme-brulee");
/// assert_eq!(slugify("a  -  b"), "a-b");
/// ```
pub fn slugify(input: &str) -> String {
    let mut folded = String::with_capacity(input.len());
    let mut in_whitespace = false;

    for ch in input.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                folded.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;

        match fold_latin1(ch) {
            Some(ascii) => folded.push_str(ascii),
            None => folded.extend(ch.to_lowercase()),
        }
    }

    let mut slug = String::with_capacity(folded.len());
    for ch in folded.chars() {
        let keep = ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-';
        if !keep || (ch == '-' && slug.ends_with('-')) {
            continue;
        }
        slug.push(ch);
    }
    slug
}

/// Lowercase ASCII replacement for Latin-1 letters carrying diacritics.
fn fold_latin1(ch: char) -> Option<&'static str> {
    let folded = match ch {
        'À'..='Å' | 'à'..='å' => "a",
        'Æ' | 'æ' => "ae",
        'Ç' | 'ç' => "c",
        'È'..='Ë' | 'è'..='ë' => "e",
        'Ì'..='Ï' | 'ì'..='ï' => "i",
        'Ð' | 'ð' => "d",
        'Ñ' | 'ñ' => "n",
        'Ò'..='Ö' | 'Ø' | 'ò'..='ö' | 'ø' => "o",
        'Ù'..='Ü' | 'ù'..='ü' => "u",
        'Ý' | 'ý' | 'ÿ' => "y",
        'Þ' | 'þ' => "th",
        'ß' => "ss",
        'Œ' | 'œ' => "oe",
        _ => return None,
    };
    Some(folded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_spaces_become_single_dash() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Hello \t\n World"), "hello-world");
    }

    #[test]
    fn test_drops_punctuation() {
        assert_eq!(slugify("Special!@#Characters"), "specialcharacters");
        assert_eq!(slugify("a-!-b"), "a-b");
        assert_eq!(slugify("under_score"), "underscore");
    }

    #[test]
    fn test_folds_diacritics() {
        assert_eq!(slugify("Été à Noël"), "ete-a-noel");
        assert_eq!(slugify("Ñandú"), "nandu");
        assert_eq!(slugify("Straße"), "strasse");
    }

    #[test]
    fn test_keeps_digits_and_edge_dashes() {
        assert_eq!(slugify("Test 123"), "test-123");
        assert_eq!(slugify(" padded "), "-padded-");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }

    proptest! {
        #[test]
        fn slugify_is_idempotent(input in "[ -~\u{a0}-\u{ff}]{0,40}") {
            let once = slugify(&input);
            prop_assert_eq!(slugify(&once), once.clone());
        }

        #[test]
        fn slugify_output_is_url_safe(input in "\\PC{0,40}") {
            let slug = slugify(&input);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
