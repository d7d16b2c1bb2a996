use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse labels produced by a tagger. This is the fixed vocabulary every
/// tagger implementation must emit; numeric/temporal tagger output (dates,
/// cardinals, quantities) is not part of it and never reaches the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpanLabel {
    Person,
    /// Geo-political entity (countries, cities, states)
    GeoPolitical,
    Location,
    Facility,
    Organization,
    /// Nationality, religious or political group
    GroupAffiliation,
    Product,
    WorkOfArt,
    Event,
    Law,
    Language,
}

impl SpanLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpanLabel::Person => "person",
            SpanLabel::GeoPolitical => "geo_political",
            SpanLabel::Location => "location",
            SpanLabel::Facility => "facility",
            SpanLabel::Organization => "organization",
            SpanLabel::GroupAffiliation => "group_affiliation",
            SpanLabel::Product => "product",
            SpanLabel::WorkOfArt => "work_of_art",
            SpanLabel::Event => "event",
            SpanLabel::Law => "law",
            SpanLabel::Language => "language",
        }
    }
}

/// Story-entity types the pipeline suggests for author review; distinct from
/// `SpanLabel`, which is the tagger's native classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Character,
    Location,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Character => "character",
            EntityKind::Location => "location",
        }
    }
}

/// A single tagger-produced annotation over one chapter's text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedSpan {
    /// The surface text exactly as it appears in the chapter
    pub text: String,
    /// The tagger's coarse label for this span
    pub label: SpanLabel,
    /// Start byte offset into the chapter text
    pub start: usize,
    /// End byte offset (exclusive) into the chapter text
    pub end: usize,
    /// The enclosing sentence, when the tagger can provide it
    pub sentence: Option<String>,
}

/// One chapter of manuscript text, identified by its position in the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterText {
    pub index: usize,
    pub content: String,
}

/// A resolved, typed, alias-aware entity as emitted to the author for review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRecord {
    /// The most frequently seen surface casing
    pub name: String,
    /// Suggested story-entity type, if the pipeline could classify it
    pub suggested_kind: Option<EntityKind>,
    /// The tagger label the entity ended up with after merging
    pub label: SpanLabel,
    /// Total span occurrences folded in, including merged aliases
    pub frequency: usize,
    /// Number of distinct chapters the entity occurred in
    pub chapter_count: usize,
    /// Sorted chapter indices of occurrence
    pub chapter_indices: Vec<usize>,
    /// First captured context sentence
    pub snippet: String,
    /// Display names absorbed into this entity during alias resolution
    pub aliases: Vec<String>,
}

/// The two-bucket output of one extraction batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    /// Entities with a suggested type and enough occurrences to trust
    pub confident: Vec<EntityRecord>,
    /// Everything else, routed to the author for manual review
    pub low_confidence: Vec<EntityRecord>,
    /// When this batch was analyzed
    pub analyzed_at: DateTime<Utc>,
}

impl ExtractionReport {
    pub fn total_entities(&self) -> usize {
        self.confident.len() + self.low_confidence.len()
    }
}
