//! Deterministic rule-based tagger used when no statistical model is wired
//! in. It finds maximal runs of capitalized tokens and labels them with a
//! small gazetteer: honorifics mark people, structure nouns mark facilities,
//! collective suffixes mark organizations. Precision is deliberately loose;
//! the downstream pipeline exists to repair exactly this kind of noise.

use std::collections::HashSet;

use crate::domain::{SpanLabel, TaggedSpan};
use crate::error::Result;
use crate::tagger::Tagger;

/// Titles that mark the following capitalized run as a person.
const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "sir", "lady", "lord", "captain", "master", "uncle", "aunt",
];

/// Structure and terrain nouns that mark a run as a facility/place.
const PLACE_TERMS: &[&str] = &[
    "academy", "school", "temple", "tower", "castle", "palace", "keep", "fort", "city", "town",
    "village", "forest", "mountain", "river", "lake", "sea", "island", "kingdom", "empire",
];

/// Collective suffixes that mark a run as an organization.
const COLLECTIVE_TERMS: &[&str] = &[
    "guild", "order", "company", "house", "legion", "circle", "brotherhood", "collective",
];

#[derive(Debug, Default)]
pub struct PatternTagger;

impl PatternTagger {
    pub fn new() -> Self {
        Self
    }
}

impl Tagger for PatternTagger {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>> {
        Ok(extract_spans(text))
    }
}

/// A token's byte range within the full text.
#[derive(Debug, Clone, Copy)]
struct Token {
    start: usize,
    end: usize,
}

fn extract_spans(text: &str) -> Vec<TaggedSpan> {
    let sentences = split_sentences(text);

    // First pass: vocabulary of words seen capitalized away from a sentence
    // start. Sentence-initial capitals are only trusted when the same word
    // also appears capitalized mid-sentence somewhere in the text.
    let mut mid_sentence_caps: HashSet<String> = HashSet::new();
    for &(start, end) in &sentences {
        let tokens = tokenize(text, start, end);
        for token in tokens.iter().skip(1) {
            let word = &text[token.start..token.end];
            if is_name_candidate(word) {
                mid_sentence_caps.insert(word.to_lowercase());
            }
        }
    }

    let mut spans = Vec::new();
    for &(start, end) in &sentences {
        let sentence_text = text[start..end].trim();
        let tokens = tokenize(text, start, end);

        let mut i = 0;
        while i < tokens.len() {
            let word = &text[tokens[i].start..tokens[i].end];
            if !is_name_candidate(word) {
                i += 1;
                continue;
            }

            // Extend to the maximal capitalized run
            let mut j = i + 1;
            while j < tokens.len() && is_name_candidate(&text[tokens[j].start..tokens[j].end]) {
                j += 1;
            }

            let mut run_start = i;
            if i == 0 {
                let first = text[tokens[0].start..tokens[0].end].to_lowercase();
                if !mid_sentence_caps.contains(&first) && !HONORIFICS.contains(&first.as_str()) {
                    run_start += 1;
                }
            }

            if run_start < j {
                let span_start = tokens[run_start].start;
                let span_end = tokens[j - 1].end;
                let surface = &text[span_start..span_end];
                spans.push(TaggedSpan {
                    text: surface.to_string(),
                    label: label_for_run(text, &tokens[run_start..j]),
                    start: span_start,
                    end: span_end,
                    sentence: Some(sentence_text.to_string()),
                });
            }
            i = j;
        }
    }
    spans
}

/// Gazetteer labeling: honorific first token wins, then place terms, then
/// collective suffixes, defaulting to person (most capitalized runs in prose
/// are names).
fn label_for_run(text: &str, run: &[Token]) -> SpanLabel {
    let words: Vec<String> = run
        .iter()
        .map(|t| text[t.start..t.end].to_lowercase())
        .collect();

    if HONORIFICS.contains(&words[0].as_str()) {
        return SpanLabel::Person;
    }
    if words.iter().any(|w| PLACE_TERMS.contains(&w.as_str())) {
        return SpanLabel::Facility;
    }
    if COLLECTIVE_TERMS.contains(&words[words.len() - 1].as_str()) {
        return SpanLabel::Organization;
    }
    SpanLabel::Person
}

/// True for tokens that can belong to a name run: leading uppercase letter,
/// excluding the pronoun "I" and its contractions.
fn is_name_candidate(word: &str) -> bool {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_uppercase() {
        return false;
    }
    if word == "I" || word.starts_with("I'") || word.starts_with("I’") {
        return false;
    }
    true
}

/// Split text into sentence byte ranges. Terminators are `.`, `!`, `?` and
/// newlines; trailing closing quotes stay with their sentence.
fn split_sentences(text: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?' | '\n') {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, q)) = chars.peek() {
            if matches!(q, '"' | '”' | '\'' | '’') {
                chars.next();
                end = j + q.len_utf8();
            } else {
                break;
            }
        }
        if !text[start..end].trim().is_empty() {
            out.push((start, end));
        }
        start = end;
    }
    if !text[start..].trim().is_empty() {
        out.push((start, text.len()));
    }
    out
}

/// Tokenize one sentence range into word tokens, keeping apostrophes and
/// hyphens inside words.
fn tokenize(text: &str, start: usize, end: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut token_start: Option<usize> = None;

    for (i, c) in text[start..end].char_indices() {
        let abs = start + i;
        let is_word = c.is_alphanumeric() || matches!(c, '\'' | '’' | '-');
        match (is_word, token_start) {
            (true, None) => token_start = Some(abs),
            (false, Some(s)) => {
                tokens.push(Token { start: s, end: abs });
                token_start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = token_start {
        tokens.push(Token { start: s, end });
    }

    // Trim punctuation stuck to token edges
    tokens
        .into_iter()
        .filter_map(|t| trim_token(text, t))
        .collect()
}

fn trim_token(text: &str, token: Token) -> Option<Token> {
    let word = &text[token.start..token.end];
    let trimmed = word.trim_matches(|c| matches!(c, '\'' | '’' | '-'));
    if trimmed.is_empty() {
        return None;
    }
    let offset = word.len() - word.trim_start_matches(|c| matches!(c, '\'' | '’' | '-')).len();
    Some(Token {
        start: token.start + offset,
        end: token.start + offset + trimmed.len(),
    })
}
