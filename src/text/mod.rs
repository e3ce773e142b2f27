//! Post composition: excerpt split, localization, markup stripping, ordered
//! substitutions, hashtag and source link, and the final blocklist gate.

pub mod translate;

use metrics::counter;
use once_cell::sync::OnceCell;
use regex::Regex;
use tracing::warn;

use crate::article::Article;
use crate::config::TranslationRule;
use self::translate::Translator;

/// Marker separating a truncated description from its overflow note.
const ELLIPSIS: char = '…';

/// First segment of the description, up to the truncation marker. Without a
/// marker the whole description is the excerpt.
pub fn excerpt(description: &str) -> &str {
    description.split(ELLIPSIS).next().unwrap_or_default()
}

/// Localized form of `text` plus whether a translation actually happened.
/// Han-script input passes through; anything else is translated, falling
/// back to the original on failure.
async fn localize(text: &str, translator: &dyn Translator) -> (String, bool) {
    if translate::is_han(text) {
        return (text.to_string(), false);
    }
    match translator.translate(text).await {
        Ok(translated) => (translated, true),
        Err(e) => {
            counter!("translate_fallback_total").increment(1);
            warn!(error = ?e, "translation failed, keeping original text");
            (text.to_string(), false)
        }
    }
}

/// Strip `</ word>` fragments first, then decode entities and drop every
/// remaining tag. Decoding happens before the tag pass, so encoded markup is
/// stripped as well.
pub fn strip_markup(s: &str) -> String {
    static RE_CLOSING_FRAGMENT: OnceCell<Regex> = OnceCell::new();
    static RE_TAGS: OnceCell<Regex> = OnceCell::new();

    let re_fragment = RE_CLOSING_FRAGMENT.get_or_init(|| Regex::new(r"</ [A-Za-z]*>").unwrap());
    let out = re_fragment.replace_all(s, "").to_string();
    let out = html_escape::decode_html_entities(&out).to_string();
    let re_tags = RE_TAGS.get_or_init(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
    re_tags.replace_all(&out, "").to_string()
}

/// Apply substitution rules in list order, each replacing every occurrence.
/// Earlier rules can create or destroy matches for later ones; the order is
/// part of the contract.
pub fn apply_rules(text: String, rules: &[TranslationRule]) -> String {
    let mut out = text;
    for rule in rules {
        out = out.replace(&rule.target, &rule.replacement);
    }
    out
}

/// True when any non-empty blocked term occurs in `text`. Matching is plain
/// case-sensitive substring containment; empty terms never match.
pub fn violates_blocklist(text: &str, blocked: &[String]) -> bool {
    blocked
        .iter()
        .filter(|term| !term.is_empty())
        .any(|term| text.contains(term.as_str()))
}

/// Keyword with every whitespace character removed, for use after `#`.
fn hashtag(keyword: &str) -> String {
    keyword.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Compose the full post body for one article:
/// localized title, blank line, localized excerpt (with a visual ellipsis
/// appended only when the excerpt was actually translated), hashtag from the
/// keyword, markup stripping, substitution rules, then the source URL on its
/// own line.
pub async fn render_post(
    article: &Article,
    translator: &dyn Translator,
    rules: &[TranslationRule],
) -> String {
    let (mut body, translated) = localize(excerpt(&article.description), translator).await;
    if translated {
        body.push_str("...");
    }
    let (title, _) = localize(&article.title, translator).await;

    let mut out = format!("{title}\n\n{body}");
    let tag = hashtag(&article.keyword);
    if !tag.is_empty() {
        out.push_str(" #");
        out.push_str(&tag);
    }
    let mut out = apply_rules(strip_markup(&out), rules);
    out.push('\n');
    out.push_str(&article.url);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_stops_at_the_truncation_marker() {
        assert_eq!(excerpt("first part… [+1234 chars]"), "first part");
        assert_eq!(excerpt("no marker at all"), "no marker at all");
        assert_eq!(excerpt(""), "");
    }

    #[test]
    fn hashtag_strips_all_whitespace() {
        assert_eq!(hashtag("chip design"), "chipdesign");
        assert_eq!(hashtag("deep\tlearning ai"), "deeplearningai");
        assert_eq!(hashtag("   "), "");
    }

    #[test]
    fn rules_apply_in_order_and_cascade() {
        let rules = vec![
            TranslationRule {
                target: "a".into(),
                replacement: "b".into(),
            },
            TranslationRule {
                target: "b".into(),
                replacement: "c".into(),
            },
        ];
        assert_eq!(apply_rules("a".into(), &rules), "c");
        assert_eq!(apply_rules("banana".into(), &rules), "ccncnc");
    }

    #[test]
    fn blocklist_is_case_sensitive_substring() {
        let blocked = vec!["spam".to_string()];
        assert!(violates_blocklist("buy spam now", &blocked));
        assert!(!violates_blocklist("buy SPAM now", &blocked));
    }

    #[test]
    fn empty_blocked_terms_never_match() {
        let blocked = vec![String::new(), "bet".to_string()];
        assert!(!violates_blocklist("anything at all", &blocked));
        assert!(violates_blocklist("betting news", &blocked));
        assert!(!violates_blocklist("", &[]));
    }
}
