use std::collections::HashSet;

use tracing::debug;

use crate::domain::SpanLabel;
use crate::pipeline::aggregate::EntityRegistry;

/// Minimum folded-name length for a pass-2 short-side candidate.
const MIN_WORD_MATCH_LEN: usize = 2;
/// Minimum folded-name length for either side of a pass-3 prefix pair.
const MIN_PREFIX_MATCH_LEN: usize = 3;

/// Fold alias, nickname and possessive variants into one primary entity per
/// underlying story element. The three passes are ordered: each assumes the
/// previous pass has already collapsed the cases it is responsible for.
pub fn resolve_aliases(registry: &mut EntityRegistry) {
    let before = registry.len();
    collapse_possessives(registry);
    merge_within_groups(registry);
    merge_prefix_pairs(registry);
    debug!(
        entities_before = before,
        entities_after = registry.len(),
        "alias resolution complete"
    );
}

/// Merge `alias_key` into `primary_key`: the alias's display name (and any
/// names it had absorbed earlier) land in the primary's alias list, frequency
/// and chapter sets accumulate, and a person-labeled alias upgrades an
/// organization-labeled primary so the classifier reconsiders it.
fn merge_entities(registry: &mut EntityRegistry, alias_key: &str, primary_key: &str) {
    let Some(alias) = registry.remove(alias_key) else {
        return;
    };
    let Some(primary) = registry.get_mut(primary_key) else {
        return;
    };
    debug!(alias = %alias.display_name, primary = %primary.display_name, "merging alias");
    // Carrying the alias's own absorbed names keeps the resolution forest at
    // depth one: every absorbed name points at the one surviving primary.
    primary.aliases.extend(alias.aliases);
    primary.aliases.push(alias.display_name);
    primary.frequency += alias.frequency;
    primary.chapters.extend(alias.chapters.iter().copied());
    if alias.label == SpanLabel::Person && primary.label == SpanLabel::Organization {
        primary.label = SpanLabel::Person;
        primary.kind = None;
    }
}

/// Pass 1: collapse informal possessives written without an apostrophe
/// ("Torins" alongside "Torin").
fn collapse_possessives(registry: &mut EntityRegistry) {
    for key in registry.keys_in_order() {
        if key.chars().count() <= 3 || !key.ends_with('s') {
            continue;
        }
        let base = &key[..key.len() - 1];
        if registry.contains(base) {
            merge_entities(registry, &key, base);
        }
    }
}

/// Pass 2: within each label group, fold entities whose display name appears
/// as a whole word inside a longer entity's display name ("Sophia" into
/// "Sophia Alcazar"). Person and organization labels are pooled into one
/// group because the tagger frequently confuses the two.
fn merge_within_groups(registry: &mut EntityRegistry) {
    let mut groups: Vec<(GroupKey, Vec<String>)> = Vec::new();
    for key in registry.keys_in_order() {
        let label = registry.get(&key).map(|e| e.label).unwrap_or(SpanLabel::Person);
        let group_key = GroupKey::for_label(label);
        match groups.iter_mut().find(|(g, _)| *g == group_key) {
            Some((_, members)) => members.push(key),
            None => groups.push((group_key, vec![key])),
        }
    }

    for (_, mut members) in groups {
        // Longest display name first: the long form is the likeliest primary
        members.sort_by_key(|key| {
            std::cmp::Reverse(
                registry
                    .get(key)
                    .map(|e| e.display_name.chars().count())
                    .unwrap_or(0),
            )
        });

        for long_key in &members {
            // The long side may itself have been folded into an even longer
            // name earlier in this pass
            let Some(long_words) = registry.get(long_key).map(|e| {
                e.folded_name()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            }) else {
                continue;
            };
            for short_key in &members {
                if short_key == long_key || !registry.contains(short_key) {
                    continue;
                }
                let Some(short_name) = registry.get(short_key).map(|e| e.folded_name()) else {
                    continue;
                };
                if short_name.chars().count() >= MIN_WORD_MATCH_LEN
                    && long_words.iter().any(|w| *w == short_name)
                {
                    merge_entities(registry, short_key, long_key);
                }
            }
        }
    }
}

/// Label pooling for pass 2.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum GroupKey {
    /// Person and organization spans, merged across labels
    Name,
    Single(SpanLabel),
}

impl GroupKey {
    fn for_label(label: SpanLabel) -> Self {
        match label {
            SpanLabel::Person | SpanLabel::Organization => GroupKey::Name,
            other => GroupKey::Single(other),
        }
    }
}

/// Pass 3: cross-group nickname detection. Any two survivors whose display
/// names are prefix-related ("Wern" / "Werniel") merge, the higher-frequency
/// entity winning as primary. Greedy and first-match-wins: each entity
/// participates in at most one merge here, scanning in registry insertion
/// order, so chains of three or more mutually prefix-related names resolve
/// by encounter order rather than globally. O(n^2) over survivors.
fn merge_prefix_pairs(registry: &mut EntityRegistry) {
    let keys = registry.keys_in_order();
    let mut participated: HashSet<String> = HashSet::new();

    for (i, key_a) in keys.iter().enumerate() {
        if participated.contains(key_a) || !registry.contains(key_a) {
            continue;
        }
        let Some(name_a) = registry.get(key_a).map(|e| e.folded_name()) else {
            continue;
        };
        if name_a.chars().count() < MIN_PREFIX_MATCH_LEN {
            continue;
        }
        for key_b in &keys[i + 1..] {
            if participated.contains(key_b) || !registry.contains(key_b) {
                continue;
            }
            let Some(name_b) = registry.get(key_b).map(|e| e.folded_name()) else {
                continue;
            };
            if name_b.chars().count() < MIN_PREFIX_MATCH_LEN {
                continue;
            }
            let related = (name_b.starts_with(&name_a) && name_b.len() > name_a.len())
                || (name_a.starts_with(&name_b) && name_a.len() > name_b.len());
            if !related {
                continue;
            }

            let freq_a = registry.get(key_a).map(|e| e.frequency).unwrap_or(0);
            let freq_b = registry.get(key_b).map(|e| e.frequency).unwrap_or(0);
            // On equal frequency the earlier-registered entity wins
            if freq_a >= freq_b {
                merge_entities(registry, key_b, key_a);
            } else {
                merge_entities(registry, key_a, key_b);
            }
            participated.insert(key_a.clone());
            participated.insert(key_b.clone());
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::aggregate::ResolvedEntity;
    use std::collections::BTreeSet;

    fn seed(
        registry: &mut EntityRegistry,
        name: &str,
        label: SpanLabel,
        frequency: usize,
        chapters: &[usize],
    ) {
        for (i, chapter) in chapters.iter().enumerate() {
            let reps = if i == 0 {
                frequency - (chapters.len() - 1)
            } else {
                1
            };
            for _ in 0..reps {
                registry.fold(name, label, *chapter, String::new);
            }
        }
        registry.resolve_display_names();
    }

    fn entity<'a>(registry: &'a EntityRegistry, key: &str) -> &'a ResolvedEntity {
        registry.get(key).expect("entity should survive")
    }

    #[test]
    fn possessive_collapse_folds_s_variant_into_base() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Torin", SpanLabel::Person, 5, &[0, 1]);
        seed(&mut registry, "Torins", SpanLabel::Person, 2, &[2]);

        resolve_aliases(&mut registry);

        assert_eq!(registry.len(), 1);
        let torin = entity(&registry, "torin");
        assert_eq!(torin.display_name, "Torin");
        assert_eq!(torin.frequency, 7);
        assert_eq!(torin.chapters, BTreeSet::from([0, 1, 2]));
        assert_eq!(torin.aliases, vec!["Torins".to_string()]);
    }

    #[test]
    fn possessive_collapse_skips_short_keys() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Els", SpanLabel::GeoPolitical, 2, &[0]);
        seed(&mut registry, "El", SpanLabel::GeoPolitical, 2, &[0]);

        collapse_possessives(&mut registry);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn substring_merge_folds_short_into_long_never_the_reverse() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Sophia", SpanLabel::Person, 3, &[0]);
        seed(&mut registry, "Sophia Alcazar", SpanLabel::Person, 6, &[1]);

        resolve_aliases(&mut registry);

        assert_eq!(registry.len(), 1);
        let sophia = entity(&registry, "sophia alcazar");
        assert_eq!(sophia.display_name, "Sophia Alcazar");
        assert_eq!(sophia.frequency, 9);
        assert_eq!(sophia.aliases, vec!["Sophia".to_string()]);
    }

    #[test]
    fn substring_merge_pools_person_and_organization_labels() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Sylvie", SpanLabel::Organization, 4, &[0]);
        seed(&mut registry, "Sylvie Brightwater", SpanLabel::Person, 2, &[1]);

        merge_within_groups(&mut registry);

        assert_eq!(registry.len(), 1);
        let merged = entity(&registry, "sylvie brightwater");
        // Organization alias into person primary leaves the label alone
        assert_eq!(merged.label, SpanLabel::Person);
        assert_eq!(merged.aliases, vec!["Sylvie".to_string()]);
    }

    #[test]
    fn substring_merge_keeps_unrelated_label_groups_apart() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Wern", SpanLabel::WorkOfArt, 2, &[0]);
        seed(&mut registry, "Wern Hollow", SpanLabel::GeoPolitical, 3, &[0]);

        merge_within_groups(&mut registry);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn prefix_merge_picks_higher_frequency_primary_across_groups() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Wern", SpanLabel::WorkOfArt, 2, &[0]);
        seed(&mut registry, "Werniel", SpanLabel::Person, 9, &[1]);

        resolve_aliases(&mut registry);

        assert_eq!(registry.len(), 1);
        let werniel = entity(&registry, "werniel");
        assert_eq!(werniel.display_name, "Werniel");
        assert_eq!(werniel.label, SpanLabel::Person);
        assert_eq!(werniel.frequency, 11);
        assert_eq!(werniel.aliases, vec!["Wern".to_string()]);
    }

    #[test]
    fn prefix_merge_frequency_tie_goes_to_first_registered() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Hanna", SpanLabel::Person, 3, &[0]);
        seed(&mut registry, "Hannah", SpanLabel::Person, 3, &[1]);

        merge_prefix_pairs(&mut registry);

        assert_eq!(registry.len(), 1);
        assert_eq!(entity(&registry, "hanna").aliases, vec!["Hannah".to_string()]);
    }

    #[test]
    fn prefix_merge_is_greedy_first_match_wins() {
        // "El" is below the length floor; "Ella" and "Ellana" pair up and the
        // chain stops there - each entity merges at most once in this pass.
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "El", SpanLabel::Person, 1, &[0]);
        seed(&mut registry, "Ella", SpanLabel::Person, 5, &[0]);
        seed(&mut registry, "Ellana", SpanLabel::Person, 2, &[1]);

        merge_prefix_pairs(&mut registry);

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("el"));
        let ella = entity(&registry, "ella");
        assert_eq!(ella.frequency, 7);
        assert_eq!(ella.aliases, vec!["Ellana".to_string()]);
    }

    #[test]
    fn person_alias_upgrades_organization_primary() {
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Ashfall Collective", SpanLabel::Organization, 4, &[0]);
        seed(&mut registry, "Ashfall", SpanLabel::Person, 2, &[1]);

        resolve_aliases(&mut registry);

        assert_eq!(registry.len(), 1);
        let merged = entity(&registry, "ashfall collective");
        assert_eq!(merged.label, SpanLabel::Person);
        assert!(merged.kind.is_none());
    }

    #[test]
    fn chained_merges_keep_every_absorbed_name() {
        // "Torins" collapses into "Torin" in pass 1; pass 2 then folds
        // "Torin" into "Torin Blackwood" and both names must survive as
        // aliases of the one primary.
        let mut registry = EntityRegistry::new();
        seed(&mut registry, "Torin", SpanLabel::Person, 4, &[0]);
        seed(&mut registry, "Torins", SpanLabel::Person, 1, &[1]);
        seed(&mut registry, "Torin Blackwood", SpanLabel::Person, 2, &[2]);

        resolve_aliases(&mut registry);

        assert_eq!(registry.len(), 1);
        let primary = entity(&registry, "torin blackwood");
        assert_eq!(primary.frequency, 7);
        assert_eq!(primary.chapters, BTreeSet::from([0, 1, 2]));
        assert_eq!(
            primary.aliases,
            vec!["Torins".to_string(), "Torin".to_string()]
        );
    }
}
