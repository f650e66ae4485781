//! Entity decoding and comparison keys for trivia text.
//!
//! Trivia sources hand back HTML-escaped strings (`&quot;`, `&#039;`,
//! `&eacute;`). Decoding is a pure text transform: markup is never parsed
//! or rendered, only entity references are replaced.

use tracing::instrument;

/// Decodes HTML entity references (named, decimal and hex) to their literal characters.
///
/// Unknown or malformed references are left untouched.
#[instrument(level = "trace")]
pub fn decode(raw: &str) -> String {
    html_escape::decode_html_entities(raw).into_owned()
}

/// Returns the comparison key used to decide whether two questions are the same.
///
/// The key is the decoded text, trimmed, with whitespace runs collapsed and
/// lowercased.
#[instrument(level = "trace")]
pub fn normalize(raw: &str) -> String {
    decode(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_named_entities() {
        assert_eq!(decode("&quot;Hello&quot; &amp; bye"), "\"Hello\" & bye");
    }

    #[test]
    fn test_decode_numeric_entities() {
        assert_eq!(decode("It&#039;s"), "It's");
        assert_eq!(decode("caf&#xE9;"), "café");
    }

    #[test]
    fn test_decode_does_not_strip_markup() {
        assert_eq!(decode("&lt;b&gt;bold&lt;/b&gt;"), "<b>bold</b>");
        assert_eq!(decode("<i>kept</i>"), "<i>kept</i>");
    }

    #[test]
    fn test_decode_plain_text_unchanged() {
        assert_eq!(decode("What is the capital of France?"), "What is the capital of France?");
    }

    #[test]
    fn test_normalize_ignores_case_entities_and_spacing() {
        assert_eq!(
            normalize("  Who wrote &quot;Hamlet&quot;? "),
            normalize("who   WROTE \"hamlet\"?")
        );
    }
}
