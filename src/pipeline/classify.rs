use tracing::debug;

use crate::config::Lexicon;
use crate::domain::{EntityKind, SpanLabel};
use crate::pipeline::aggregate::EntityRegistry;

/// Occurrence floor for promoting a single-word organization to a character.
const MIN_PROMOTION_FREQUENCY: usize = 3;

/// Assign each surviving entity a suggested story-entity type from its tagger
/// label, then apply the heuristic overrides. Runs after alias resolution so
/// merged labels are final and the location-keyword override cannot be
/// clobbered by a later merge.
pub fn classify_entities(registry: &mut EntityRegistry, lexicon: &Lexicon) {
    for key in registry.keys_in_order() {
        let Some(entity) = registry.get_mut(&key) else {
            continue;
        };

        entity.kind = base_kind(entity.label);

        // Fiction rarely names single-word organizations; a frequent one-word
        // "organization" is almost always a misread character name.
        if entity.label == SpanLabel::Organization
            && entity.kind.is_none()
            && entity.display_name.split_whitespace().count() == 1
            && entity.frequency >= MIN_PROMOTION_FREQUENCY
        {
            debug!(name = %entity.display_name, "promoting single-word organization to character");
            entity.kind = Some(EntityKind::Character);
            entity.label = SpanLabel::Person;
        }

        // Keyword override runs last and wins over everything above
        if entity
            .display_name
            .split_whitespace()
            .any(|word| lexicon.is_location_keyword(&word.to_lowercase()))
        {
            entity.kind = Some(EntityKind::Location);
        }
    }
}

/// Static label-to-type mapping. Organization is deliberately unmapped: too
/// many character names arrive labeled organization, so the author decides.
fn base_kind(label: SpanLabel) -> Option<EntityKind> {
    match label {
        SpanLabel::Person => Some(EntityKind::Character),
        SpanLabel::GeoPolitical | SpanLabel::Location | SpanLabel::Facility => {
            Some(EntityKind::Location)
        }
        _ => None,
    }
}
