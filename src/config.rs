use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{MinerError, Result};

/// Common words the tagger frequently misfires on. Anything whose cleaned,
/// case-folded form lands in this set is rejected before aggregation.
const DEFAULT_STOPWORDS: &[&str] = &[
    // Pronouns and articles
    "i", "me", "my", "you", "he", "she", "it", "we", "they", "the", "a", "an", "this", "that",
    // Interjections and filler
    "yes", "no", "ok", "haha", "hahaha", "oh", "ah", "um", "hmm", "hey", "hi", "hello", "ya",
    "yea", "huff", "shit", "damn", "chill",
    // Emotion/state words that leak through as entities
    "calm", "surprised", "anger", "angry", "watching", "down", "creepy",
    // Common nouns the tagger mistakes for names
    "mind", "heat", "air", "cold", "light", "liquid", "moon", "footsteps", "bite", "rank",
    "kid", "baby", "babyy", "thoughts", "hundreds",
    // Kinship terms used as bare address
    "mom", "dad", "uncle", "aunt", "im",
];

/// Leading words and phrases stripped off candidate names. Matching is
/// case-insensitive and repeats until no prefix applies.
const DEFAULT_NOISE_PREFIXES: &[&str] = &[
    "sorry", "damn", "damned", "hey", "oh", "dear", "poor", "i'm", "im", "i am", "it's", "its",
    "catching", "mr", "mr.", "mrs", "mrs.", "ms", "ms.", "old", "young", "the", "a", "uncle",
    "aunt", "taking", "calling",
];

/// Nouns that mark a name as a place regardless of how the tagger labeled it.
const DEFAULT_LOCATION_KEYWORDS: &[&str] = &[
    "school", "academy", "temple", "tower", "castle", "palace", "city", "town", "village",
    "forest", "mountain", "river", "lake", "sea", "ocean", "island", "kingdom", "empire",
    "republic", "cave", "dungeon", "keep", "pass", "fort",
];

/// Tunable word lists driving the extraction pipeline. All lists are injectable
/// so they can be localized or extended per project without touching pipeline
/// logic; the compiled-in defaults target English manuscripts.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub stopwords: Vec<String>,
    pub noise_prefixes: Vec<String>,
    pub location_keywords: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            noise_prefixes: DEFAULT_NOISE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            location_keywords: DEFAULT_LOCATION_KEYWORDS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Lexicon {
    /// Load a lexicon override from a TOML file. Lists omitted from the file
    /// fall back to the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MinerError::Config(format!("Failed to read lexicon file '{}': {}", path.display(), e))
        })?;
        let lexicon: Lexicon = toml::from_str(&content)?;
        Ok(lexicon)
    }

    /// True if the case-folded candidate is a known tagger misfire.
    pub fn is_stopword(&self, folded: &str) -> bool {
        self.stopwords.iter().any(|s| s == folded)
    }

    /// True if the case-folded word marks its entity as a place.
    pub fn is_location_keyword(&self, folded: &str) -> bool {
        self.location_keywords.iter().any(|k| k == folded)
    }
}
