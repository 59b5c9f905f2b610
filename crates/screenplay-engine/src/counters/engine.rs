use std::ops::Range;
use std::time::Duration;

use crate::counters::chronometry::{ChronometryConfig, ChronometryError};
use crate::counters::metrics::{BlockMetrics, Totals};
use crate::editing::{Document, Patch};
use crate::layout::PageLayout;
use crate::models::Block;
use crate::scenes::Scene;
use crate::template::Template;

/// Whole-document counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterSnapshot {
    pub pages: usize,
    pub words: usize,
    pub characters_with_spaces: usize,
    pub characters_without_spaces: usize,
    pub duration: Duration,
}

/// Per-block metrics, layout and totals kept in step with a document.
///
/// [`CounterEngine::refresh`] catches up from the document's patch journal:
/// metrics are recomputed only for the changed blocks and layout only from
/// the first changed block until it converges. A journal gap, a template
/// change or a config change falls back to a full rebuild.
#[derive(Debug, Clone, Default)]
pub struct CounterEngine {
    config: ChronometryConfig,
    version: Option<u64>,
    template: Option<Template>,
    metrics: Vec<BlockMetrics>,
    layout: PageLayout,
    totals: Totals,
}

impl CounterEngine {
    pub fn new(config: ChronometryConfig) -> Result<Self, ChronometryError> {
        config.validate()?;
        Ok(Self {
            config,
            ..Self::default()
        })
    }

    pub fn config(&self) -> &ChronometryConfig {
        &self.config
    }

    /// Swap the config. An invalid one is rejected and the old one kept.
    pub fn set_config(&mut self, config: ChronometryConfig) -> Result<(), ChronometryError> {
        config.validate()?;
        if config != self.config {
            self.config = config;
            self.version = None;
        }
        Ok(())
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn block_metrics(&self) -> &[BlockMetrics] {
        &self.metrics
    }

    /// Bring counters up to date with `doc` and return the totals.
    pub fn refresh(&mut self, doc: &Document, template: &Template) -> CounterSnapshot {
        if self.template.as_ref() != Some(template) {
            self.template = Some(template.clone());
            self.version = None;
        }

        let pending = self.version.and_then(|version| {
            doc.patches_since(version)
                .map(|patches| patches.fold(None, |acc: Option<Patch>, p| match acc {
                    Some(acc) => Some(acc.compose(p)),
                    None => Some(p.clone()),
                }))
        });

        match pending {
            Some(None) => {}
            Some(Some(patch)) => self.apply_patch(doc.blocks(), template, &patch),
            None => self.rebuild(doc.blocks(), template),
        }
        self.version = Some(doc.version());
        self.snapshot()
    }

    /// Totals as of the last refresh.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            pages: self.layout.page_count(),
            words: self.totals.words,
            characters_with_spaces: self.totals.chars_with_spaces,
            characters_without_spaces: self.totals.chars_without_spaces,
            duration: Duration::from_millis(self.totals.duration_ms),
        }
    }

    /// Fill in page ranges and durations of scenes built from the same document.
    pub fn annotate_scenes(&self, scenes: &mut [Scene]) {
        for scene in scenes {
            scene.pages = self.layout.page_range(scene.blocks.clone());
            scene.duration = Duration::from_millis(self.duration_ms(scene.blocks.clone()));
        }
    }

    /// Summed duration of a block range.
    pub fn duration_ms(&self, range: Range<usize>) -> u64 {
        self.metrics
            .get(range)
            .map(|m| m.iter().map(|m| m.duration_ms).sum())
            .unwrap_or(0)
    }

    /// Full recount of `doc` that polls `keep_going` once per block in each
    /// pass. Returns `None` as soon as it answers false; the next
    /// [`CounterEngine::refresh`] then rebuilds from scratch.
    pub fn recount_while(
        &mut self,
        doc: &Document,
        template: &Template,
        keep_going: impl FnMut() -> bool,
    ) -> Option<CounterSnapshot> {
        self.template = Some(template.clone());
        self.version = None;
        if !self.rebuild_while(doc.blocks(), template, keep_going) {
            log::debug!("Recount stopped before version {}", doc.version());
            return None;
        }
        self.version = Some(doc.version());
        Some(self.snapshot())
    }

    fn rebuild(&mut self, blocks: &[Block], template: &Template) {
        self.rebuild_while(blocks, template, || true);
    }

    fn rebuild_while(
        &mut self,
        blocks: &[Block],
        template: &Template,
        mut keep_going: impl FnMut() -> bool,
    ) -> bool {
        log::debug!("Rebuilding counters for {} blocks", blocks.len());
        let Some(layout) = PageLayout::compute_while(blocks, template, &mut keep_going) else {
            return false;
        };
        self.layout = layout;
        let mut metrics = Vec::with_capacity(blocks.len());
        for block in blocks {
            if !keep_going() {
                return false;
            }
            metrics.push(self.measure(block));
        }
        self.metrics = metrics;
        if self.config.pages_mode_only {
            for index in 0..blocks.len() {
                let duration = self.pages_duration(index, template);
                self.metrics[index].duration_ms = duration;
            }
        }
        self.totals = Totals::default();
        for m in &self.metrics {
            self.totals.add(m);
        }
        true
    }

    fn apply_patch(&mut self, blocks: &[Block], template: &Template, patch: &Patch) {
        let old_end = patch.changed.start + patch.replaced;
        let consistent = old_end <= self.metrics.len()
            && self.metrics.len() as isize + patch.len_delta() == blocks.len() as isize;
        if !consistent {
            self.rebuild(blocks, template);
            return;
        }

        let fresh: Vec<BlockMetrics> = blocks[patch.changed.clone()]
            .iter()
            .map(|b| self.measure(b))
            .collect();
        for m in &fresh {
            self.totals.add(m);
        }
        for m in self.metrics.splice(patch.changed.start..old_end, fresh) {
            self.totals.remove(&m);
        }

        let relaid = self.layout.update(blocks, template, patch);
        if self.config.pages_mode_only {
            for index in relaid.clone() {
                let duration = self.pages_duration(index, template);
                let m = &mut self.metrics[index];
                self.totals.duration_ms = self.totals.duration_ms - m.duration_ms + duration;
                m.duration_ms = duration;
            }
        }
        log::debug!(
            "Counters updated for blocks {:?}, layout for {relaid:?}",
            patch.changed
        );
    }

    fn measure(&self, block: &Block) -> BlockMetrics {
        let mut metrics = BlockMetrics::of(block);
        if !self.config.pages_mode_only {
            metrics.duration_ms = self.config.granular_ms(block);
        }
        metrics
    }

    fn pages_duration(&self, index: usize, template: &Template) -> u64 {
        let lines_per_page = template.page().lines_per_page;
        self.layout
            .placement(index)
            .map(|p| self.config.pages_ms(p.span_lines(lines_per_page), lines_per_page))
            .unwrap_or(0)
    }
}
