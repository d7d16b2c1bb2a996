use chrono::Utc;

use crate::domain::{EntityRecord, ExtractionReport};
use crate::pipeline::aggregate::{EntityRegistry, ResolvedEntity};

/// Minimum occurrences for an entity to be trusted without review.
const MIN_CONFIDENT_FREQUENCY: usize = 2;

/// Split the final registry into the confident and needs-review buckets.
/// Confident means a suggested type exists and the entity occurred at least
/// twice; everything else goes to the author. Each bucket is sorted by
/// frequency descending, stable with respect to registry insertion order.
pub fn partition_entities(registry: EntityRegistry) -> ExtractionReport {
    let mut confident = Vec::new();
    let mut low_confidence = Vec::new();

    for entity in registry.into_entities() {
        let is_confident = entity.kind.is_some() && entity.frequency >= MIN_CONFIDENT_FREQUENCY;
        let record = to_record(entity);
        if is_confident {
            confident.push(record);
        } else {
            low_confidence.push(record);
        }
    }

    confident.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    low_confidence.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    ExtractionReport {
        confident,
        low_confidence,
        analyzed_at: Utc::now(),
    }
}

fn to_record(entity: ResolvedEntity) -> EntityRecord {
    let chapter_indices: Vec<usize> = entity.chapters.iter().copied().collect();
    EntityRecord {
        name: entity.display_name,
        suggested_kind: entity.kind,
        label: entity.label,
        frequency: entity.frequency,
        chapter_count: chapter_indices.len(),
        chapter_indices,
        snippet: entity.snippet,
        aliases: entity.aliases,
    }
}
