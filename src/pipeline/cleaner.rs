use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Lexicon;

/// Dialogue-attribution artifact: a short run of words, a colon, then an
/// opening quote (`Gareth:"well`). Only the part before the colon is a name.
static COLON_DIALOGUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^([A-Za-z][A-Za-z\s]*?)\s*:\s*["“”'‘’]"#).unwrap());

/// Copular/possessive connectives that signal the tagger swallowed a verb
/// phrase ("Pickle is Matheus sitting"). Checked in this order.
const CONNECTIVES: [&str; 6] = [" is ", " are ", " was ", " were ", " has ", " have "];

/// Characters trimmed off both ends of a candidate name.
const EDGE_TRIM: [char; 12] = [' ', '-', '–', '—', ':', ';', ',', '.', '\'', '"', '!', '?'];

const MAX_NAME_WORDS: usize = 3;

/// Normalize a raw tagged span's text into a candidate name. Returns `None`
/// when the span is a tagger artifact rather than a usable name; rejection is
/// an expected, frequent outcome here, not an error.
pub fn clean_span_text(raw: &str, lexicon: &Lexicon) -> Option<String> {
    let mut name = raw.trim().to_string();

    // Multi-line spans are always tagger garbage
    if name.contains('\n') {
        return None;
    }

    // "Gareth:"well" -> "Gareth"
    if let Some(caps) = COLON_DIALOGUE_RE.captures(&name) {
        name = caps[1].trim().to_string();
    }

    // "Sophia's" -> "Sophia"
    if let Some(base) = name.strip_suffix("'s").or_else(|| name.strip_suffix("’s")) {
        name = base.trim().to_string();
    }

    // Normalize typographic quotes to their plain equivalents
    name = name
        .replace(['’', '‘'], "'")
        .replace(['“', '”'], "\"");

    // Strip leading noise words until a fixed point is reached
    let mut changed = true;
    while changed {
        changed = false;
        let lower = name.to_lowercase();
        for prefix in &lexicon.noise_prefixes {
            if let Some(rest) = strip_word_prefix(&name, &lower, prefix) {
                name = rest;
                changed = true;
                break;
            }
        }
    }

    // Truncate at a swallowed verb phrase
    let lower = name.to_lowercase();
    for connective in CONNECTIVES {
        if let Some(pos) = lower.find(connective) {
            if name.is_char_boundary(pos) {
                name.truncate(pos);
                name = name.trim().to_string();
            }
            break;
        }
    }

    // Spaced dashes and ellipses signal a run-on or garbled span
    if name.contains(" - ") || name.contains(" – ") || name.contains(" — ") {
        return None;
    }
    if name.contains('…') || name.contains("...") {
        return None;
    }

    // Names longer than three words are noise around a name, keep the head
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() > MAX_NAME_WORDS {
        name = words[..MAX_NAME_WORDS].join(" ");
    }

    let name = name.trim_matches(EDGE_TRIM.as_slice()).to_string();

    if name.chars().count() < 2 {
        return None;
    }
    // All-caps beyond a short acronym is shouting, not a proper name
    if is_shouting(&name) {
        return None;
    }
    // Ordinal/measurement artifacts ("45th Adept", "2nd year")
    if name.chars().next().is_some_and(|c| c.is_numeric()) {
        return None;
    }

    Some(name)
}

/// Strip `prefix` off the front of `name` when it matches case-insensitively
/// as a whole leading word and at least two characters remain.
fn strip_word_prefix(name: &str, lower: &str, prefix: &str) -> Option<String> {
    if prefix.is_empty() || !lower.starts_with(prefix) || !name.is_char_boundary(prefix.len()) {
        return None;
    }
    let rest = &name[prefix.len()..];
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return None;
    }
    let rest = rest.trim_start();
    if rest.chars().count() >= 2 {
        Some(rest.to_string())
    } else {
        None
    }
}

fn is_shouting(name: &str) -> bool {
    let has_cased = name.chars().any(|c| c.is_uppercase() || c.is_lowercase());
    has_cased && !name.chars().any(|c| c.is_lowercase()) && name.chars().count() > 4
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clean(raw: &str) -> Option<String> {
        clean_span_text(raw, &Lexicon::default())
    }

    #[test]
    fn rejects_multiline_spans() {
        assert_eq!(clean("Sophia\nAlcazar"), None);
    }

    #[test]
    fn truncates_colon_dialogue_artifacts() {
        assert_eq!(clean("Gareth:\"well"), Some("Gareth".to_string()));
        assert_eq!(clean("Gareth : “well"), Some("Gareth".to_string()));
    }

    #[test]
    fn strips_possessive_suffix() {
        assert_eq!(clean("Sophia's"), Some("Sophia".to_string()));
        assert_eq!(clean("Sophia’s"), Some("Sophia".to_string()));
    }

    #[test]
    fn normalizes_typographic_quotes() {
        assert_eq!(clean("O’Malley"), Some("O'Malley".to_string()));
    }

    #[test]
    fn strips_noise_prefixes_to_a_fixed_point() {
        assert_eq!(clean("Old Uncle Torin"), Some("Torin".to_string()));
        assert_eq!(clean("the Sophia"), Some("Sophia".to_string()));
        assert_eq!(clean("Mrs. Alcazar"), Some("Alcazar".to_string()));
    }

    #[test]
    fn prefix_stripping_keeps_at_least_two_characters() {
        // Stripping "the " would leave a single character, so nothing happens
        assert_eq!(clean("The A"), Some("The A".to_string()));
    }

    #[test]
    fn truncates_at_swallowed_verb_phrases() {
        assert_eq!(clean("Pickle is Matheus sitting"), Some("Pickle".to_string()));
        assert_eq!(clean("Torin was tired"), Some("Torin".to_string()));
    }

    #[test]
    fn rejects_spaced_dashes_and_ellipses() {
        assert_eq!(clean("Green - Scor"), None);
        assert_eq!(clean("Yea… Dad"), None);
        assert_eq!(clean("Well... Torin"), None);
    }

    #[test]
    fn caps_names_at_three_words() {
        assert_eq!(
            clean("Sophia Alcazar of Wern"),
            Some("Sophia Alcazar of".to_string())
        );
    }

    #[test]
    fn trims_trailing_punctuation() {
        assert_eq!(clean("Torin,"), Some("Torin".to_string()));
        assert_eq!(clean("\"Sophia\""), Some("Sophia".to_string()));
    }

    #[test]
    fn rejects_short_and_empty_results() {
        assert_eq!(clean(""), None);
        assert_eq!(clean("X"), None);
        assert_eq!(clean("!?"), None);
    }

    #[test]
    fn rejects_shouting_but_keeps_short_acronyms() {
        assert_eq!(clean("WHAT'S GOING ON"), None);
        assert_eq!(clean("ARIA"), Some("ARIA".to_string()));
    }

    #[test]
    fn rejects_leading_digits() {
        assert_eq!(clean("45th Adept"), None);
        assert_eq!(clean("2nd year"), None);
    }
}
