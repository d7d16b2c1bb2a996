pub mod aggregate;
pub mod alias;
pub mod classify;
pub mod cleaner;
pub mod partition;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, trace};

use crate::config::Lexicon;
use crate::domain::{ChapterText, ExtractionReport, TaggedSpan};
use crate::error::Result;
use crate::pipeline::aggregate::EntityRegistry;
use crate::tagger::Tagger;

/// Candidates that are only digits and sentence punctuation.
static NUMERIC_NOISE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d\s.,!?]+$").unwrap());

/// Fallback snippet window around a span when the tagger gave no sentence.
const SNIPPET_BEFORE: usize = 40;
const SNIPPET_AFTER: usize = 120;
/// Snippets are capped to this many characters.
const SNIPPET_MAX_CHARS: usize = 200;

/// The entity extraction and resolution engine. One instance per lexicon;
/// every `analyze` call is a stateless batch that owns its own registry, so
/// concurrent batches need no locking as long as each gets its own call.
pub struct ExtractionPipeline {
    lexicon: Lexicon,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionPipeline {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::default(),
        }
    }

    pub fn with_lexicon(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Run one extraction batch over ordered chapter texts. Chapters are
    /// processed sequentially into a single shared registry; a tagger failure
    /// aborts the whole batch with no partial results. Empty chapters and
    /// rejected spans are absorbed silently.
    pub fn analyze(
        &self,
        tagger: &dyn Tagger,
        chapters: &[ChapterText],
    ) -> Result<ExtractionReport> {
        let mut registry = EntityRegistry::new();

        for chapter in chapters {
            if chapter.content.trim().is_empty() {
                continue;
            }
            let spans = tagger.tag(&chapter.content)?;
            debug!(chapter = chapter.index, spans = spans.len(), "tagged chapter");

            for span in &spans {
                let Some(cleaned) = cleaner::clean_span_text(&span.text, &self.lexicon) else {
                    trace!(raw = %span.text, "span rejected by cleaner");
                    continue;
                };
                let folded = cleaned.to_lowercase();
                if NUMERIC_NOISE_RE.is_match(&cleaned) || self.lexicon.is_stopword(&folded) {
                    trace!(candidate = %cleaned, "candidate rejected as noise");
                    continue;
                }
                registry.fold(&cleaned, span.label, chapter.index, || {
                    snippet_for(span, &chapter.content)
                });
            }
        }

        registry.resolve_display_names();
        alias::resolve_aliases(&mut registry);
        classify::classify_entities(&mut registry, &self.lexicon);
        let report = partition::partition_entities(registry);

        info!(
            confident = report.confident.len(),
            low_confidence = report.low_confidence.len(),
            "extraction batch complete"
        );
        Ok(report)
    }
}

/// Context snippet for a newly seen entity: the enclosing sentence when the
/// tagger provided one, otherwise a fixed-width window of chapter text around
/// the span.
fn snippet_for(span: &TaggedSpan, content: &str) -> String {
    if let Some(sentence) = &span.sentence {
        return cap_chars(sentence.trim(), SNIPPET_MAX_CHARS);
    }
    let mut start = span.start.saturating_sub(SNIPPET_BEFORE).min(content.len());
    while !content.is_char_boundary(start) {
        start -= 1;
    }
    let mut end = (span.end + SNIPPET_AFTER).min(content.len());
    while !content.is_char_boundary(end) {
        end += 1;
    }
    cap_chars(content[start..end].trim(), SNIPPET_MAX_CHARS)
}

fn cap_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
