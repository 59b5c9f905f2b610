use crate::editing::Document;
use crate::scenes::Scene;

/// Scene list memoised by document version.
#[derive(Debug, Default)]
pub struct SceneCache {
    version: Option<u64>,
    scenes: Vec<Scene>,
}

impl SceneCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached scenes if they were built for `version`.
    pub fn get(&self, version: u64) -> Option<&[Scene]> {
        (self.version == Some(version)).then_some(self.scenes.as_slice())
    }

    /// Scenes for the document's current version, rebuilt with `build` when stale.
    pub fn get_or_build<F>(&mut self, doc: &Document, build: F) -> &[Scene]
    where
        F: FnOnce(&Document) -> Vec<Scene>,
    {
        if self.version != Some(doc.version()) {
            log::debug!("Rebuilding scene list for v{}", doc.version());
            self.scenes = build(doc);
            self.version = Some(doc.version());
        }
        &self.scenes
    }

    pub fn invalidate(&mut self) {
        self.version = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockType;
    use crate::scenes::segment;

    #[test]
    fn test_rebuilds_only_when_version_changes() {
        let mut doc = Document::new();
        doc.insert_block(0, BlockType::SceneHeading, "INT. A - DAY")
            .unwrap();

        let mut cache = SceneCache::new();
        let mut builds = 0;
        for _ in 0..3 {
            cache.get_or_build(&doc, |d| {
                builds += 1;
                segment(d.blocks())
            });
        }
        assert_eq!(builds, 1);
        assert_eq!(cache.get(doc.version()).map(<[Scene]>::len), Some(1));

        doc.insert_block(1, BlockType::SceneHeading, "INT. B - DAY")
            .unwrap();
        assert!(cache.get(doc.version()).is_none());
        let scenes = cache.get_or_build(&doc, |d| segment(d.blocks()));
        assert_eq!(scenes.len(), 2);

        cache.invalidate();
        assert!(cache.get(doc.version()).is_none());
    }
}
