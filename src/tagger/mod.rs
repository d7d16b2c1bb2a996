pub mod pattern;

use tracing::warn;

use crate::domain::TaggedSpan;
use crate::error::Result;

pub use pattern::PatternTagger;

/// Capability trait for named-entity taggers. Implementations are pluggable:
/// a statistical model, a rule-based fallback, or a scripted tagger in tests
/// all satisfy the same contract. Tagging is an opaque synchronous call; a
/// failure aborts the whole batch and is never retried here.
pub trait Tagger: Send + Sync {
    /// Identifier for this tagger implementation
    fn name(&self) -> &'static str;

    /// Tag one chapter's text, returning spans in document order. Every span
    /// must carry a label from the fixed vocabulary and byte offsets into the
    /// given text.
    fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>>;
}

/// Languages the built-in pattern tagger is tuned for. Other languages still
/// get the pattern tagger, just with a warning: a degraded tagger beats no
/// extraction at all, and the review bucket catches the fallout.
const TUNED_LANGUAGES: &[&str] = &["en"];

/// Resolve the tagger for a language selector. Initialization failures are
/// fatal for the batch; an unknown language is not.
pub fn for_language(language: &str) -> Result<Box<dyn Tagger>> {
    if !TUNED_LANGUAGES.contains(&language) {
        warn!(language, "no tuned tagger for language, falling back to pattern tagger");
    }
    Ok(Box::new(PatternTagger::new()))
}
