use prose_miner::config::Lexicon;
use prose_miner::domain::{ChapterText, EntityKind};
use prose_miner::{tagger, ExtractionPipeline};

fn chapters(texts: &[&str]) -> Vec<ChapterText> {
    texts
        .iter()
        .enumerate()
        .map(|(index, content)| ChapterText {
            index,
            content: content.to_string(),
        })
        .collect()
}

#[test]
fn analyzes_a_manuscript_end_to_end() {
    let batch = chapters(&[
        "The rain had stopped when Sophia reached the gate. A lantern swung while \
         Sophia counted the coins. Nobody trusted Sophia with the ledger. She \
         grabbed Sophia's basket and ran. They met behind Ashfall Academy at dusk.",
        "A courier delivered letters to Sophia Alcazar at dawn. Every guard owed \
         Sophia Alcazar a favor. Smoke rose above Ashfall Academy all night.",
    ]);

    let tagger = tagger::for_language("en").unwrap();
    let pipeline = ExtractionPipeline::new();
    let report = pipeline.analyze(tagger.as_ref(), &batch).unwrap();

    assert_eq!(report.confident.len(), 2);
    assert!(report.low_confidence.is_empty());

    // Sorted by frequency: the merged character first, the place second
    let character = &report.confident[0];
    assert_eq!(character.name, "Sophia Alcazar");
    assert_eq!(character.suggested_kind, Some(EntityKind::Character));
    assert_eq!(character.frequency, 6);
    assert_eq!(character.chapter_indices, vec![0, 1]);
    assert_eq!(character.aliases, vec!["Sophia".to_string()]);
    assert!(!character.snippet.is_empty());

    let place = &report.confident[1];
    assert_eq!(place.name, "Ashfall Academy");
    assert_eq!(place.suggested_kind, Some(EntityKind::Location));
    assert_eq!(place.frequency, 2);
    assert_eq!(place.chapter_indices, vec![0, 1]);
}

#[test]
fn single_mentions_land_in_the_review_bucket() {
    let batch = chapters(&["A stranger asked about Torin before leaving town."]);

    let tagger = tagger::for_language("en").unwrap();
    let report = ExtractionPipeline::new()
        .analyze(tagger.as_ref(), &batch)
        .unwrap();

    assert!(report.confident.is_empty());
    assert_eq!(report.low_confidence.len(), 1);
    let record = &report.low_confidence[0];
    assert_eq!(record.name, "Torin");
    assert_eq!(record.suggested_kind, Some(EntityKind::Character));
    assert_eq!(record.frequency, 1);
}

#[test]
fn custom_lexicon_stopwords_suppress_entities() {
    let batch = chapters(&[
        "The crowd parted around Torin at the market. A boy ran after Torin all \
         the way home. Later the bells woke Torin again.",
    ]);

    let mut lexicon = Lexicon::default();
    lexicon.stopwords.push("torin".to_string());

    let tagger = tagger::for_language("en").unwrap();
    let report = ExtractionPipeline::with_lexicon(lexicon)
        .analyze(tagger.as_ref(), &batch)
        .unwrap();

    assert_eq!(report.total_entities(), 0);
}

#[test]
fn buckets_never_share_an_entity() {
    let batch = chapters(&[
        "A shadow followed Sophia down the alley. Someone had warned Sophia twice. \
         The innkeeper pointed at Wern without a word.",
    ]);

    let tagger = tagger::for_language("en").unwrap();
    let report = ExtractionPipeline::new()
        .analyze(tagger.as_ref(), &batch)
        .unwrap();

    for confident in &report.confident {
        assert!(report
            .low_confidence
            .iter()
            .all(|other| other.name != confident.name));
    }
    assert_eq!(report.total_entities(), 2);
}
