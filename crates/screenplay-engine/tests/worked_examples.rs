use pretty_assertions::assert_eq;
use screenplay_engine::corrector::{Corrector, CorrectorConfig};
use screenplay_engine::counters::{ChronometryConfig, CounterEngine};
use screenplay_engine::editing::{Document, EditError};
use screenplay_engine::layout::PageBreak;
use screenplay_engine::models::{Block, BlockType, Decoration, GroupKind};
use screenplay_engine::scenes::{Place, TimeOfDay, segment};
use screenplay_engine::template::Template;
use std::time::Duration;

#[test]
fn one_scene_with_granular_chronometry() {
    let doc = Document::from_blocks(vec![
        Block::new(BlockType::SceneHeading, "INT. HOUSE - DAY"),
        Block::new(BlockType::Character, "JOHN"),
        Block::new(BlockType::Dialogue, "Hello there."),
    ])
    .unwrap();

    let mut scenes = segment(doc.blocks());
    assert_eq!(scenes.len(), 1);
    let location = scenes[0].location.clone().unwrap();
    assert_eq!(location.place, Place::Interior);
    assert_eq!(location.name, "HOUSE");
    assert_eq!(location.time, TimeOfDay::Day);
    assert_eq!(scenes[0].characters, vec!["JOHN"]);

    let config = ChronometryConfig {
        seconds_per_page: 0.0,
        seconds_per_50_characters: 5.0,
        seconds_per_dialogue_paragraph: 0.0,
        seconds_per_scene_heading: 0.0,
        consider_spaces_in_character_count: true,
        pages_mode_only: false,
    };
    let mut counters = CounterEngine::new(config).unwrap();
    let totals = counters.refresh(&doc, &Template::default());
    counters.annotate_scenes(&mut scenes);

    assert_eq!(totals.duration, Duration::from_secs(5));
    assert_eq!(scenes[0].duration, Duration::from_secs(5));
}

#[test]
fn corrector_twice_yields_one_marker_pair() {
    let mut doc = Document::from_blocks(vec![
        Block::new(BlockType::SceneHeading, "INT. HOUSE - DAY"),
        Block::new(BlockType::Character, "JOHN"),
        Block::new(
            BlockType::Dialogue,
            "I have been waiting all night. You never called.",
        ),
    ])
    .unwrap();
    let corrector = Corrector::new(CorrectorConfig::default());
    let split = [PageBreak {
        block: 2,
        offset: 31,
    }];

    assert_eq!(corrector.correct_page_breaks(&mut doc, &split).unwrap(), 1);
    assert_eq!(corrector.correct_page_breaks(&mut doc, &split).unwrap(), 0);

    let count = |decoration| {
        doc.blocks()
            .iter()
            .filter(|b| b.decoration == Some(decoration))
            .count()
    };
    assert_eq!(count(Decoration::More), 1);
    assert_eq!(count(Decoration::ContinuedCharacter), 1);
    assert_eq!(doc.blocks()[3].text, "(MORE)");
    assert_eq!(doc.blocks()[4].text, "JOHN (CONT'D)");
    assert_eq!(doc.blocks()[5].text, "You never called.");
}

#[test]
fn deleting_folder_opener_alone_is_rejected() {
    let mut doc = Document::new();
    doc.insert_group(0, GroupKind::Folder, "ACT ONE").unwrap();
    doc.insert_block(1, BlockType::SceneHeading, "INT. HOUSE - DAY")
        .unwrap();
    let before = doc.blocks().to_vec();
    let version = doc.version();

    let result = doc.delete_block(0);

    assert!(matches!(result, Err(EditError::UnbalancedStructure(_))));
    assert_eq!(doc.blocks(), before.as_slice());
    assert_eq!(doc.version(), version);
}
