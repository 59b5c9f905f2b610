use crate::corrector::{Corrector, CorrectorConfig};
use crate::counters::{ChronometryConfig, CounterEngine, CounterSnapshot};
use crate::editing::{Cmd, Document, DocumentSnapshot, Patch};
use crate::errors::EngineError;
use crate::exchange::{self, BlockRecord};
use crate::layout::PageBreak;
use crate::reports::{self, PlotData, PlotKind, ReportKind, ReportQuery, ReportSource, ReportTable};
use crate::scenes::{Scene, SceneCache, Scenes};
use crate::template::Template;

/// What a renderer needs to draw the current state.
#[derive(Debug, Clone)]
pub struct RenderSnapshot {
    pub document: DocumentSnapshot,
    pub template: Template,
    pub page_breaks: Vec<PageBreak>,
    pub counters: CounterSnapshot,
}

/// One open script with everything derived from it.
///
/// The session is single-threaded: derived data is refreshed lazily on read.
/// Background work should go through [`ScriptSession::snapshot`] and the
/// [`worker`](crate::worker) jobs.
#[derive(Debug)]
pub struct ScriptSession {
    document: Document,
    template: Template,
    counters: CounterEngine,
    scenes: SceneCache,
    corrector: Corrector,
}

impl ScriptSession {
    pub fn new(
        document: Document,
        template: Template,
        chronometry: ChronometryConfig,
        corrector: CorrectorConfig,
    ) -> Result<Self, EngineError> {
        Ok(Self {
            document,
            template,
            counters: CounterEngine::new(chronometry)?,
            scenes: SceneCache::new(),
            corrector: Corrector::new(corrector),
        })
    }

    /// Session over converter records.
    pub fn import(
        records: Vec<BlockRecord>,
        template: Template,
        chronometry: ChronometryConfig,
        corrector: CorrectorConfig,
    ) -> Result<Self, EngineError> {
        let document = exchange::import(records)?;
        Self::new(document, template, chronometry, corrector)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EngineError> {
        Ok(self.document.apply(cmd)?)
    }

    pub fn set_template(&mut self, template: Template) {
        log::info!("Switching template to {} v{}", template.name(), template.version());
        self.template = template;
        self.scenes.invalidate();
    }

    /// An invalid config is rejected and the previous one stays active.
    pub fn set_chronometry(&mut self, config: ChronometryConfig) -> Result<(), EngineError> {
        if let Err(err) = self.counters.set_config(config) {
            log::warn!("Rejected chronometry config: {err}");
            return Err(err.into());
        }
        self.scenes.invalidate();
        Ok(())
    }

    pub fn chronometry(&self) -> &ChronometryConfig {
        self.counters.config()
    }

    pub fn set_corrector_config(&mut self, config: CorrectorConfig) {
        self.corrector.set_config(config);
    }

    pub fn corrector_config(&self) -> &CorrectorConfig {
        self.corrector.config()
    }

    /// Run every enabled corrector rule, including the continuity reflow.
    pub fn correct(&mut self) -> Result<(), EngineError> {
        self.corrector.correct_all(&mut self.document, &self.template)?;
        Ok(())
    }

    pub fn counters(&mut self) -> CounterSnapshot {
        self.counters.refresh(&self.document, &self.template)
    }

    /// Scenes with page ranges and durations, cached per document version.
    pub fn scenes(&mut self) -> &[Scene] {
        let Self {
            document,
            template,
            counters,
            scenes,
            ..
        } = self;
        counters.refresh(document, template);
        scenes.get_or_build(document, |doc| {
            let mut list: Vec<Scene> = Scenes::new(doc.blocks()).with_template(template).collect();
            counters.annotate_scenes(&mut list);
            list
        })
    }

    pub fn report(&mut self, kind: &ReportKind, query: &ReportQuery) -> Result<ReportTable, EngineError> {
        let counters = self.counters();
        self.scenes();
        let scenes = self
            .scenes
            .get(self.document.version())
            .unwrap_or_default();
        let source = ReportSource::new(self.document.blocks(), scenes).with_counters(counters);
        Ok(reports::build_report(kind, &source, query)?)
    }

    pub fn plot(&mut self, kind: PlotKind, query: &ReportQuery) -> PlotData {
        let counters = self.counters();
        self.scenes();
        let scenes = self
            .scenes
            .get(self.document.version())
            .unwrap_or_default();
        let source = ReportSource::new(self.document.blocks(), scenes).with_counters(counters);
        reports::build_plot(kind, &source, query)
    }

    pub fn export(&self) -> Vec<BlockRecord> {
        exchange::export(&self.document)
    }

    pub fn snapshot(&self) -> DocumentSnapshot {
        self.document.snapshot()
    }

    pub fn render(&mut self) -> RenderSnapshot {
        let counters = self.counters();
        RenderSnapshot {
            document: self.document.snapshot(),
            template: self.template.clone(),
            page_breaks: self.counters.layout().breaks(),
            counters,
        }
    }
}
