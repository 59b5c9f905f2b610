use std::time::Duration;

use crate::reports::query::{Entry, ReportQuery};
use crate::reports::speech::{self, Speech};
use crate::reports::table::{format_duration, ReportTable};
use crate::reports::{ReportError, ReportSource};
use crate::scenes::normalize_name;

#[derive(Debug, Default)]
struct CastMember {
    name: String,
    scenes: usize,
    speeches: usize,
    words: usize,
    screen_time: Duration,
    first_scene: String,
}

/// Everyone who appears, with scene and speech counts.
///
/// `Count` sorts by number of scenes, `Duration` by the summed duration of
/// those scenes.
pub fn cast_report(source: &ReportSource<'_>, query: &ReportQuery) -> ReportTable {
    let speeches = speech::collect(source.blocks, source.scenes);
    let mut cast: Vec<CastMember> = Vec::new();

    for scene in source.scenes {
        for name in &scene.characters {
            let index = match cast.iter().position(|m| &m.name == name) {
                Some(index) => index,
                None => {
                    cast.push(CastMember {
                        name: name.clone(),
                        first_scene: scene_label(scene.number),
                        ..CastMember::default()
                    });
                    cast.len() - 1
                }
            };
            cast[index].scenes += 1;
            cast[index].screen_time += scene.duration;
        }
    }
    for speech in &speeches {
        if let Some(member) = cast.iter_mut().find(|m| m.name == speech.speaker) {
            member.speeches += 1;
            member.words += speech.words;
        }
    }

    let mut entries: Vec<Entry> = cast
        .into_iter()
        .enumerate()
        .map(|(order, member)| Entry {
            order,
            count: member.scenes,
            duration: member.screen_time,
            cells: vec![
                member.name.clone(),
                member.scenes.to_string(),
                member.speeches.to_string(),
                member.words.to_string(),
                format_duration(member.screen_time),
                member.first_scene,
            ],
            name: member.name,
        })
        .collect();
    query.arrange(&mut entries);

    let mut table = ReportTable::new(
        "Cast",
        &["Character", "Scenes", "Speeches", "Words", "Screen time", "First scene"],
    );
    for entry in entries {
        table.push_row(entry.cells);
    }
    table
}

/// Every speech of one character, in document order unless sorted otherwise.
///
/// `Count` sorts by words, `Duration` by the duration of the scene.
pub fn character_dialogue_report(
    source: &ReportSource<'_>,
    character: &str,
    query: &ReportQuery,
) -> Result<ReportTable, ReportError> {
    let wanted = normalize_name(character);
    let known = source
        .scenes
        .iter()
        .any(|scene| scene.characters.contains(&wanted));
    if !known {
        return Err(ReportError::UnknownCharacter(character.to_string()));
    }

    let mut entries: Vec<Entry> = speech::collect(source.blocks, source.scenes)
        .into_iter()
        .filter(|speech| speech.speaker == wanted)
        .enumerate()
        .map(|(order, speech)| {
            let scene = &source.scenes[speech.scene];
            let Speech {
                parentheticals,
                dialogue,
                words,
                speaker,
                ..
            } = speech;
            Entry {
                name: speaker,
                order,
                count: words,
                duration: scene.duration,
                cells: vec![
                    scene_label(scene.number),
                    scene.heading.clone(),
                    parentheticals.join(" "),
                    dialogue.join(" "),
                ],
            }
        })
        .collect();
    let query = ReportQuery {
        filter: Vec::new(),
        ..query.clone()
    };
    query.arrange(&mut entries);

    let mut table = ReportTable::new(
        format!("Dialogue: {wanted}"),
        &["Scene", "Heading", "Parenthetical", "Dialogue"],
    );
    for entry in entries {
        table.push_row(entry.cells);
    }
    Ok(table)
}

pub(crate) fn scene_label(number: Option<usize>) -> String {
    number.map_or_else(|| "-".to_string(), |n| n.to_string())
}
