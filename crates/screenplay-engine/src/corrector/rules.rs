//! Text rules. Each rule is idempotent and returns `None` when it has nothing
//! to change. All rules except [`fix_ellipsis`] keep the char count, so review
//! ranges stay valid.

use crate::models::Locale;

const ELLIPSIS: char = '\u{2026}';
const APOSTROPHE: char = '\u{2019}';

/// Collapse "..." into "…".
///
/// Returns the new text and the char positions (in the old text) where a
/// collapsed run started.
pub fn fix_ellipsis(text: &str) -> Option<(String, Vec<usize>)> {
    if !text.contains("...") {
        return None;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut collapsed = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '.' && chars.get(i + 1) == Some(&'.') && chars.get(i + 2) == Some(&'.') {
            out.push(ELLIPSIS);
            collapsed.push(i);
            i += 3;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    Some((out, collapsed))
}

/// Map a char offset in the old text to the text produced by [`fix_ellipsis`].
pub fn map_ellipsis_offset(offset: usize, collapsed: &[usize]) -> usize {
    let mut shift = 0;
    for &start in collapsed {
        if offset >= start + 3 {
            shift += 2;
        } else if offset > start {
            return start + 1 - shift;
        } else {
            break;
        }
    }
    offset - shift
}

/// Straight quotes to the locale's curly quotes.
///
/// Double quotes run through a two-state machine (outside/inside a
/// quotation) over the whole block; curly quotes already present drive the
/// state too. If a straight double quote would be left unclosed the double
/// quotes are left alone.
///
/// A single quote between letters is an apostrophe. One at the start of a
/// word opens a quotation if a later one closes it at the end of a word;
/// otherwise it is an elision ("’Tis") and also becomes an apostrophe.
pub fn smart_quotes(text: &str, locale: Locale) -> Option<String> {
    if !text.contains('"') && !text.contains('\'') {
        return None;
    }

    let open = locale.opening_quote();
    let close = locale.closing_quote();
    let chars: Vec<char> = text.chars().collect();

    let mut inside = false;
    let mut quotes = Vec::with_capacity(chars.len());
    for &c in &chars {
        let replaced = match c {
            '"' if inside => {
                inside = false;
                close
            }
            '"' => {
                inside = true;
                open
            }
            c if c == open => {
                inside = true;
                c
            }
            c if c == close => {
                inside = false;
                c
            }
            c => c,
        };
        quotes.push(replaced);
    }
    let convert_doubles = !inside;
    let singles = single_quotes(&chars, locale);

    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        match c {
            '"' if convert_doubles => out.push(quotes[i]),
            '\'' => out.push(singles[i].unwrap_or(c)),
            c => out.push(c),
        }
    }

    (out != text).then_some(out)
}

/// Replacement for each straight single quote, `None` where it stays.
fn single_quotes(chars: &[char], locale: Locale) -> Vec<Option<char>> {
    let (open, close) = locale.single_quotes();
    let mut out = vec![None; chars.len()];
    let mut pending_open: Option<usize> = None;

    for (i, &c) in chars.iter().enumerate() {
        if c != '\'' {
            continue;
        }
        let before = i.checked_sub(1).and_then(|j| chars.get(j)).copied();
        let after = chars.get(i + 1).copied();
        let word_before = before.is_some_and(char::is_alphanumeric);
        let word_after = after.is_some_and(char::is_alphanumeric);

        if is_letter_at(chars, i.wrapping_sub(1)) && is_letter_at(chars, i + 1) {
            out[i] = Some(APOSTROPHE);
        } else if word_after && !word_before {
            if let Some(previous) = pending_open.replace(i) {
                out[previous] = Some(APOSTROPHE);
            }
        } else if !word_after
            && (word_before || before.is_some_and(|b| matches!(b, '.' | ',' | '!' | '?' | ELLIPSIS)))
        {
            match pending_open.take() {
                Some(start) => {
                    out[start] = Some(open);
                    out[i] = Some(close);
                }
                None => out[i] = Some(APOSTROPHE),
            }
        }
    }
    if let Some(start) = pending_open {
        out[start] = Some(APOSTROPHE);
    }
    out
}

fn is_letter_at(chars: &[char], i: usize) -> bool {
    chars.get(i).is_some_and(|c| c.is_alphabetic())
}

/// "THe" → "The": a word starting with two capitals followed by a lowercase
/// letter loses the second capital.
pub fn fix_double_capitals(text: &str) -> Option<String> {
    let mut chars: Vec<char> = text.chars().collect();
    let mut changed = false;

    for i in 2..chars.len() {
        let word_start = i == 2 || !chars[i - 3].is_alphabetic();
        if word_start
            && chars[i - 2].is_uppercase()
            && chars[i - 1].is_uppercase()
            && chars[i].is_lowercase()
            && let Some(lower) = single_char(chars[i - 1].to_lowercase())
        {
            chars[i - 1] = lower;
            changed = true;
        }
    }

    changed.then(|| chars.into_iter().collect())
}

/// Upper-case the first letter of the block and of every sentence.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace (closing quotes
/// may sit in between); "…" does not end a sentence. Opening quotes and brackets before the letter are skipped.
pub fn capitalize_sentences(text: &str) -> Option<String> {
    let mut chars: Vec<char> = text.chars().collect();
    let mut changed = false;
    let mut expect_capital = true;

    for i in 0..chars.len() {
        let c = chars[i];
        if expect_capital {
            if c.is_alphabetic() {
                // "iPhone" and "tHe" are left for the author.
                let mixed = chars.get(i + 1).is_some_and(|n| n.is_uppercase());
                if c.is_lowercase()
                    && !mixed
                    && let Some(upper) = single_char(c.to_uppercase())
                {
                    chars[i] = upper;
                    changed = true;
                }
                expect_capital = false;
            } else if !c.is_whitespace() && !is_opening_mark(c) {
                expect_capital = false;
            }
        } else if matches!(c, '.' | '!' | '?') && ends_sentence(&chars[i + 1..]) {
            expect_capital = true;
        }
    }

    changed.then(|| chars.into_iter().collect())
}

/// Whitespace follows, possibly after closing quotes or brackets.
fn ends_sentence(rest: &[char]) -> bool {
    rest.iter()
        .find(|c| !is_closing_mark(**c))
        .is_some_and(|c| c.is_whitespace())
}

fn is_closing_mark(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201C}' | '\u{201D}' | '\u{2019}' | '\u{00BB}')
}

fn is_opening_mark(c: char) -> bool {
    matches!(c, '"' | '\'' | '(' | '[' | '\u{201C}' | '\u{2018}' | '\u{00AB}' | '\u{201E}')
}

/// Case mappings that expand ("ß" → "SS") are skipped to keep the char count.
fn single_char(mut mapped: impl Iterator<Item = char>) -> Option<char> {
    let first = mapped.next()?;
    mapped.next().is_none().then_some(first)
}
