use std::ops::{Range, RangeInclusive};

use crate::editing::Patch;
use crate::layout::wrap;
use crate::models::{Block, BlockType};
use crate::template::{StyleRule, Template};

/// Position of the layout cursor: page index and lines used on that page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutState {
    pub page: usize,
    pub line: u32,
}

/// Where one block landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub before: LayoutState,
    pub after: LayoutState,
    /// Page the first text line is printed on.
    pub start_page: usize,
    /// Char offsets in the block text where a new page begins.
    pub splits: Vec<usize>,
}

impl Placement {
    fn unprinted(state: LayoutState) -> Self {
        Self {
            before: state,
            after: state,
            start_page: state.page,
            splits: Vec::new(),
        }
    }

    /// Page lines consumed from `before` to `after`, including blank page tails.
    pub fn span_lines(&self, lines_per_page: u32) -> u64 {
        let before = self.before.page as u64 * lines_per_page as u64 + self.before.line as u64;
        let after = self.after.page as u64 * lines_per_page as u64 + self.after.line as u64;
        after.saturating_sub(before)
    }

    pub fn end_page(&self) -> usize {
        self.after.page
    }
}

/// A dialogue paragraph that continues on the next page at `offset` chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageBreak {
    pub block: usize,
    pub offset: usize,
}

/// Line-based pagination of a whole document under one template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLayout {
    placements: Vec<Placement>,
}

impl PageLayout {
    pub fn compute(blocks: &[Block], template: &Template) -> Self {
        Self::compute_while(blocks, template, || true).unwrap_or_default()
    }

    /// [`PageLayout::compute`] polling `keep_going` before each block.
    /// Returns `None` as soon as it answers false.
    pub fn compute_while(
        blocks: &[Block],
        template: &Template,
        mut keep_going: impl FnMut() -> bool,
    ) -> Option<Self> {
        let mut placements = Vec::with_capacity(blocks.len());
        let mut state = LayoutState::default();
        for block in blocks {
            if !keep_going() {
                return None;
            }
            let placement = place_block(state, block, template);
            state = placement.after;
            placements.push(placement);
        }
        Some(Self { placements })
    }

    /// Re-run layout for a patch already applied to `blocks`.
    ///
    /// Layout restarts at the first changed block from the cached state before
    /// it, and stops as soon as an unchanged block is reached in the same state
    /// it was laid out from before. Returns the indices that were placed again.
    pub fn update(&mut self, blocks: &[Block], template: &Template, patch: &Patch) -> Range<usize> {
        let old_len = self.placements.len();
        let consistent = patch.changed.end <= blocks.len()
            && old_len as isize + patch.len_delta() == blocks.len() as isize
            && patch.changed.start + patch.replaced <= old_len;
        if !consistent {
            log::debug!("Layout cache does not match patch, recomputing");
            *self = Self::compute(blocks, template);
            return 0..blocks.len();
        }

        let start = patch.changed.start;
        let tail = self.placements.split_off(start);
        let mut state = self.placements.last().map(|p| p.after).unwrap_or_default();

        for (index, block) in blocks.iter().enumerate().skip(start) {
            if index >= patch.changed.end {
                let old_index = index - patch.changed.end + patch.changed.start + patch.replaced;
                if let Some(cached) = tail.get(old_index - start)
                    && cached.before == state
                {
                    self.placements
                        .extend_from_slice(&tail[old_index - start..]);
                    return start..index;
                }
            }
            let placement = place_block(state, block, template);
            state = placement.after;
            self.placements.push(placement);
        }
        start..blocks.len()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, block: usize) -> Option<&Placement> {
        self.placements.get(block)
    }

    /// Dialogue split points, in document order.
    pub fn breaks(&self) -> Vec<PageBreak> {
        self.placements
            .iter()
            .enumerate()
            .flat_map(|(block, p)| p.splits.iter().map(move |&offset| PageBreak { block, offset }))
            .collect()
    }

    /// Number of pages; 0 when nothing printable was placed.
    pub fn page_count(&self) -> usize {
        match self.placements.iter().rev().find(|p| p.after != p.before) {
            Some(last) => last.after.page + 1,
            None => 0,
        }
    }

    /// Pages covered by the printable blocks in `range`.
    pub fn page_range(&self, range: Range<usize>) -> Option<RangeInclusive<usize>> {
        let printed: Vec<&Placement> = self
            .placements
            .get(range)?
            .iter()
            .filter(|p| p.after != p.before)
            .collect();
        let first = printed.first()?;
        let last = printed.last()?;
        Some(first.start_page..=last.end_page())
    }
}

/// Lay one block out starting from `before`.
pub(crate) fn place_block(before: LayoutState, block: &Block, template: &Template) -> Placement {
    if !block.block_type.is_printable() {
        return Placement::unprinted(before);
    }

    let lines_per_page = template.page().lines_per_page;
    let line_height = template.page().line_height_mm();
    let rule = template.resolve(block.block_type);
    let starts = wrap::line_starts(&block.text, template.chars_per_line(block.block_type));
    let body = rule.spaced_lines(starts.len() as u32, line_height) + rule.bottom_space;
    let top = if before.line == 0 { 0 } else { rule.top_space };
    let remaining = lines_per_page.saturating_sub(before.line);

    if top + body <= remaining {
        return Placement {
            before,
            after: LayoutState {
                page: before.page,
                line: before.line + top + body,
            },
            start_page: before.page,
            splits: Vec::new(),
        };
    }

    if block.block_type == BlockType::Dialogue && starts.len() > 1 {
        return split_dialogue(before, rule, &starts, lines_per_page, line_height);
    }

    if body <= lines_per_page {
        let page = before.page + 1;
        return Placement {
            before,
            after: LayoutState { page, line: body },
            start_page: page,
            splits: Vec::new(),
        };
    }

    // Taller than a page: start on a fresh page and run over.
    let start_page = if before.line == 0 {
        before.page
    } else {
        before.page + 1
    };
    Placement {
        before,
        after: overflow(start_page, body, lines_per_page),
        start_page,
        splits: Vec::new(),
    }
}

fn overflow(page: usize, lines: u32, lines_per_page: u32) -> LayoutState {
    let mut state = LayoutState { page, line: lines };
    while state.line > lines_per_page {
        state.line -= lines_per_page;
        state.page += 1;
    }
    state
}

/// Split a speech across pages. Each page but the last ends with a reserved
/// "(MORE)" line and each continuation page starts with a "NAME (CONT'D)" cue.
fn split_dialogue(
    before: LayoutState,
    rule: &StyleRule,
    starts: &[usize],
    lines_per_page: u32,
    line_height: f32,
) -> Placement {
    let total = starts.len();
    let spaced = |n: usize| rule.spaced_lines(n as u32, line_height);

    let mut splits = Vec::new();
    let mut state = before;
    let mut top = if before.line == 0 { 0 } else { rule.top_space };
    let mut start_page = None;
    let mut from = 0;

    loop {
        let rest = total - from;
        let available = lines_per_page.saturating_sub(state.line + top);
        if spaced(rest) + rule.bottom_space <= available {
            state.line += top + spaced(rest) + rule.bottom_space;
            start_page.get_or_insert(state.page);
            break;
        }

        // Text lines that fit with one line left for "(MORE)".
        let fit = (1..rest)
            .rev()
            .find(|&k| spaced(k) < available)
            .unwrap_or(0);

        if fit == 0 {
            if state.line == 0 {
                // Page too short to ever split; let the rest run over.
                start_page.get_or_insert(state.page);
                state = overflow(state.page, spaced(rest) + rule.bottom_space, lines_per_page);
                break;
            }
            state = LayoutState {
                page: state.page + 1,
                line: 0,
            };
            top = 0;
            continue;
        }

        start_page.get_or_insert(state.page);
        from += fit;
        splits.push(starts[from]);
        state = LayoutState {
            page: state.page + 1,
            line: 1,
        };
        top = 0;
    }

    Placement {
        before,
        after: state,
        start_page: start_page.unwrap_or(before.page),
        splits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Document;
    use crate::template::PageMetrics;
    use pretty_assertions::assert_eq;
    use BlockType::*;

    /// Default rules on a page of `lines` lines.
    fn template(lines: u32) -> Template {
        let base = Template::default();
        let rules = BlockType::ALL
            .iter()
            .map(|t| base.resolve(*t).clone())
            .collect();
        Template::new(
            "Short",
            1,
            PageMetrics {
                lines_per_page: lines,
                ..PageMetrics::a4()
            },
            rules,
        )
        .unwrap()
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn test_empty_document_has_no_pages() {
        let layout = PageLayout::compute(&[], &Template::default());
        assert_eq!(layout.page_count(), 0);
        assert!(layout.breaks().is_empty());
    }

    #[test]
    fn test_top_space_is_dropped_at_page_top() {
        let t = template(10);
        let blocks = vec![
            Block::new(SceneHeading, "INT. HOUSE - DAY"),
            Block::new(Action, "Rain."),
        ];
        let layout = PageLayout::compute(&blocks, &t);
        assert_eq!(layout.placements()[0].after, LayoutState { page: 0, line: 1 });
        assert_eq!(layout.placements()[1].after, LayoutState { page: 0, line: 3 });
        assert_eq!(layout.page_count(), 1);
    }

    #[test]
    fn test_block_that_does_not_fit_moves_to_next_page() {
        let t = template(4);
        let blocks = vec![
            Block::new(Action, "One."),
            Block::new(Action, "Two."),
            // Needs top space + 1 line; only 1 left.
            Block::new(Action, "Three."),
        ];
        let layout = PageLayout::compute(&blocks, &t);
        let last = &layout.placements()[2];
        assert_eq!(last.start_page, 1);
        assert_eq!(last.after, LayoutState { page: 1, line: 1 });
        assert_eq!(layout.page_count(), 2);
        assert_eq!(layout.page_range(0..3), Some(0..=1));
    }

    #[test]
    fn test_long_dialogue_is_split_with_room_for_more() {
        let t = template(6);
        // Dialogue wraps at 28 chars: five words per line, four lines.
        let speech = words(20);
        let blocks = vec![
            Block::new(Action, "A."),
            Block::new(Character, "JOHN"),
            Block::new(Dialogue, speech.clone()),
        ];
        let layout = PageLayout::compute(&blocks, &t);

        // Action 1 line, character 1+1 lines: 3 used, 3 remain.
        // Two dialogue lines fit, one line is kept for "(MORE)".
        let breaks = layout.breaks();
        assert_eq!(breaks.len(), 1);
        assert_eq!(breaks[0].block, 2);
        let starts = wrap::line_starts(&speech, t.chars_per_line(Dialogue));
        assert_eq!(breaks[0].offset, starts[2]);

        // Next page: cue line plus the two remaining lines.
        assert_eq!(
            layout.placements()[2].after,
            LayoutState { page: 1, line: 3 }
        );
        assert_eq!(layout.placements()[2].start_page, 0);
    }

    #[test]
    fn test_dialogue_needs_two_lines_to_split() {
        let t = template(6);
        let blocks = vec![
            Block::new(Action, "A."),
            Block::new(Action, "B."),
            Block::new(Character, "JOHN"),
            Block::new(Dialogue, words(20)),
        ];
        // A, space+B, space+JOHN use 5 lines; one left is not enough.
        let layout = PageLayout::compute(&blocks, &t);
        assert!(layout.breaks().is_empty());
        assert_eq!(layout.placements()[3].start_page, 1);
        assert_eq!(layout.placements()[3].after, LayoutState { page: 1, line: 4 });
    }

    #[test]
    fn test_unprinted_blocks_take_no_space() {
        let t = template(10);
        let blocks = vec![
            Block::new(Folder, "ACT ONE"),
            Block::new(NoprintableText, "note to self"),
            Block::new(FolderFooter, ""),
        ];
        let layout = PageLayout::compute(&blocks, &t);
        assert_eq!(layout.page_count(), 0);
        assert_eq!(layout.page_range(0..3), None);
    }

    #[test]
    fn test_update_matches_full_compute() {
        let t = template(8);
        let mut doc = Document::from_blocks(
            (0..30)
                .map(|i| Block::new(if i % 3 == 0 { Character } else { Dialogue }, words(i % 7 + 1)))
                .collect(),
        )
        .unwrap();
        let mut layout = PageLayout::compute(doc.blocks(), &t);

        let patch = doc.set_text(4, words(30)).unwrap();
        let relaid = layout.update(doc.blocks(), &t, &patch);
        assert_eq!(relaid.start, 4);
        assert_eq!(layout, PageLayout::compute(doc.blocks(), &t));

        let patch = doc.delete_range(10..12).unwrap();
        layout.update(doc.blocks(), &t, &patch);
        assert_eq!(layout, PageLayout::compute(doc.blocks(), &t));

        let patch = doc.insert_block(28, Action, "Tail.").unwrap();
        layout.update(doc.blocks(), &t, &patch);
        assert_eq!(layout, PageLayout::compute(doc.blocks(), &t));
    }

    #[test]
    fn test_update_stops_when_layout_converges() {
        let t = template(50);
        let mut doc = Document::from_blocks(
            (0..20).map(|_| Block::new(Action, "Short line.")).collect(),
        )
        .unwrap();
        let mut layout = PageLayout::compute(doc.blocks(), &t);

        let patch = doc.set_text(3, "Also short.").unwrap();
        let relaid = layout.update(doc.blocks(), &t, &patch);
        assert_eq!(relaid, 3..4);
    }

    #[test]
    fn test_compute_while_stops_when_asked() {
        let blocks: Vec<Block> = (0..100).map(|_| Block::new(Action, "Short line.")).collect();
        let mut polls = 0;

        let layout = PageLayout::compute_while(&blocks, &template(50), || {
            polls += 1;
            polls <= 10
        });

        assert!(layout.is_none());
        assert_eq!(polls, 11);
    }
}
