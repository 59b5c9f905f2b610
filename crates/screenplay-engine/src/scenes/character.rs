use regex::Regex;
use std::sync::OnceLock;

use crate::scenes::heading::collapse_upper;

/// Canonical speaker name from a Character block.
///
/// Anything from the first opening parenthesis on is a state ("(V.O.)",
/// "(CONT'D)") and is dropped, as are bare extension tokens. The result is
/// upper-cased with whitespace collapsed.
pub fn normalize_name(text: &str) -> String {
    static EXTENSION_REGEX: OnceLock<Regex> = OnceLock::new();
    let extension_regex = EXTENSION_REGEX.get_or_init(|| {
        Regex::new(r"(?i)(^|\s)(V\.O\.|O\.S\.|O\.C\.|CONT['\u{2019}]D\.?|ПРОД\.|ЗК)(\s|$)")
            .expect("Invalid character extension regex")
    });

    let name = match text.find('(') {
        Some(i) => &text[..i],
        None => text,
    };
    let name = extension_regex.replace_all(name, " ");
    collapse_upper(&name)
}

/// The parenthesised state of a Character block, upper-cased ("V.O.").
pub fn state(text: &str) -> Option<String> {
    let start = text.find('(')?;
    let state: String = text[start..]
        .chars()
        .filter(|c| *c != '(' && *c != ')')
        .collect();
    let state = collapse_upper(&state);
    (!state.is_empty()).then_some(state)
}

/// Names listed in a SceneCharacters block, with the template's
/// prefix/postfix removed.
pub fn parse_scene_characters(text: &str, prefix: &str, postfix: &str) -> Vec<String> {
    let mut list = text.trim();
    if !prefix.is_empty() {
        list = list.strip_prefix(prefix).unwrap_or(list);
    }
    if !postfix.is_empty() {
        list = list.strip_suffix(postfix).unwrap_or(list);
    }

    list.split(',')
        .map(collapse_upper)
        .filter(|name| !name.is_empty())
        .collect()
}
