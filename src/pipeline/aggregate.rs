use std::collections::{BTreeSet, HashMap};

use crate::domain::{EntityKind, SpanLabel};

/// A partially-resolved entity being accumulated across a batch. Mutated by
/// every span folded into it, by alias merges, and by the type classifier.
#[derive(Debug, Clone)]
pub struct ResolvedEntity {
    /// Most-frequently-seen surface casing; elected after all spans are folded
    pub display_name: String,
    /// Surface casing -> occurrence count, in first-seen order
    pub casing_counts: Vec<(String, usize)>,
    /// The tagger label for this entity; may be upgraded during merging
    pub label: SpanLabel,
    /// Total span occurrences folded in, including merged aliases
    pub frequency: usize,
    /// Chapter indices where this entity or any merged alias occurred
    pub chapters: BTreeSet<usize>,
    /// First captured context sentence; never updated after creation
    pub snippet: String,
    /// Display names absorbed via merging
    pub aliases: Vec<String>,
    /// Suggested story-entity type, assigned by the classifier
    pub kind: Option<EntityKind>,
}

impl ResolvedEntity {
    /// Case-folded display name, the form all alias comparisons use.
    pub fn folded_name(&self) -> String {
        self.display_name.to_lowercase()
    }
}

/// The batch-local registry of partially-resolved entities, keyed by the
/// case-folded cleaned name. A plain keyed store: merges are key removal plus
/// field accumulation, never reference rewiring, so the structure stays
/// trivially acyclic. Insertion order is tracked for deterministic iteration.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entries: HashMap<String, ResolvedEntity>,
    order: Vec<String>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one accepted cleaned candidate into the registry. The snippet
    /// closure is only invoked when this key is seen for the first time.
    pub fn fold<F>(&mut self, candidate: &str, label: SpanLabel, chapter: usize, snippet: F)
    where
        F: FnOnce() -> String,
    {
        let key = candidate.to_lowercase();
        match self.entries.get_mut(&key) {
            Some(entity) => {
                entity.frequency += 1;
                entity.chapters.insert(chapter);
                match entity.casing_counts.iter_mut().find(|(c, _)| c == candidate) {
                    Some((_, count)) => *count += 1,
                    None => entity.casing_counts.push((candidate.to_string(), 1)),
                }
            }
            None => {
                self.entries.insert(
                    key.clone(),
                    ResolvedEntity {
                        display_name: candidate.to_string(),
                        casing_counts: vec![(candidate.to_string(), 1)],
                        label,
                        frequency: 1,
                        chapters: BTreeSet::from([chapter]),
                        snippet: snippet(),
                        aliases: Vec::new(),
                        kind: None,
                    },
                );
                self.order.push(key);
            }
        }
    }

    /// Elect each entity's display name: the casing with the highest count,
    /// ties going to the variant seen first.
    pub fn resolve_display_names(&mut self) {
        for entity in self.entries.values_mut() {
            let mut best: Option<(&str, usize)> = None;
            for (casing, count) in &entity.casing_counts {
                if best.map_or(true, |(_, best_count)| *count > best_count) {
                    best = Some((casing, *count));
                }
            }
            if let Some((casing, _)) = best {
                entity.display_name = casing.to_string();
            }
        }
    }

    /// Surviving identity keys in original insertion order. Snapshots the key
    /// list so callers can mutate the registry while iterating.
    pub fn keys_in_order(&self) -> Vec<String> {
        self.order
            .iter()
            .filter(|k| self.entries.contains_key(*k))
            .cloned()
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&ResolvedEntity> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ResolvedEntity> {
        self.entries.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<ResolvedEntity> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the registry, yielding surviving entities in insertion order.
    pub fn into_entities(mut self) -> Vec<ResolvedEntity> {
        let order = std::mem::take(&mut self.order);
        order
            .into_iter()
            .filter_map(|key| self.entries.remove(&key))
            .collect()
    }
}
