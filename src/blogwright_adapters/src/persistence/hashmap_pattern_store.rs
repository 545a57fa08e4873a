use std::collections::BTreeMap;
use std::sync::Arc;

use blogwright_core::{
    NewPattern, NewSection, Pattern, PatternId, PatternStore, PatternStoreError, PatternUpdate,
    Section, SectionId, SectionUpdate,
};
use tokio::sync::RwLock;

#[derive(Default)]
struct Patterns {
    patterns: BTreeMap<PatternId, Pattern>,
    sections: BTreeMap<SectionId, Section>,
    last_pattern_id: i64,
    last_section_id: i64,
}

impl Patterns {
    fn title_taken(&self, pattern: &NewPattern, except: Option<PatternId>) -> bool {
        self.patterns
            .values()
            .any(|existing| existing.title == pattern.title && Some(existing.id) != except)
    }
}

#[derive(Default, Clone)]
pub struct HashMapPatternStore {
    inner: Arc<RwLock<Patterns>>,
}

impl HashMapPatternStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PatternStore for HashMapPatternStore {
    async fn add_pattern(&self, pattern: NewPattern) -> Result<Pattern, PatternStoreError> {
        let mut inner = self.inner.write().await;
        if inner.title_taken(&pattern, None) {
            return Err(PatternStoreError::TitleTaken);
        }
        inner.last_pattern_id += 1;
        let stored = Pattern {
            id: PatternId(inner.last_pattern_id),
            title: pattern.title,
            content: pattern.content,
        };
        inner.patterns.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_pattern(&self, id: PatternId) -> Result<Pattern, PatternStoreError> {
        let inner = self.inner.read().await;
        inner
            .patterns
            .get(&id)
            .cloned()
            .ok_or(PatternStoreError::PatternNotFound)
    }

    async fn update_pattern(
        &self,
        id: PatternId,
        update: PatternUpdate,
    ) -> Result<Pattern, PatternStoreError> {
        let mut inner = self.inner.write().await;
        if inner.title_taken(&update, Some(id)) {
            return Err(PatternStoreError::TitleTaken);
        }
        let pattern = inner
            .patterns
            .get_mut(&id)
            .ok_or(PatternStoreError::PatternNotFound)?;
        pattern.title = update.title;
        pattern.content = update.content;
        Ok(pattern.clone())
    }

    async fn delete_pattern(&self, id: PatternId) -> Result<(), PatternStoreError> {
        let mut inner = self.inner.write().await;
        inner
            .patterns
            .remove(&id)
            .ok_or(PatternStoreError::PatternNotFound)?;
        inner.sections.retain(|_, section| section.pattern_id != id);
        Ok(())
    }

    async fn list_patterns(&self) -> Result<Vec<Pattern>, PatternStoreError> {
        let inner = self.inner.read().await;
        let mut patterns: Vec<Pattern> = inner.patterns.values().cloned().collect();
        patterns.sort_by(|a, b| a.title.as_str().cmp(b.title.as_str()));
        Ok(patterns)
    }

    async fn add_section(&self, section: NewSection) -> Result<Section, PatternStoreError> {
        let mut inner = self.inner.write().await;
        if !inner.patterns.contains_key(&section.pattern_id) {
            return Err(PatternStoreError::PatternNotFound);
        }
        inner.last_section_id += 1;
        let stored = Section {
            id: SectionId(inner.last_section_id),
            pattern_id: section.pattern_id,
            title: section.title,
            content: section.content,
        };
        inner.sections.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_section(&self, id: SectionId) -> Result<Section, PatternStoreError> {
        let inner = self.inner.read().await;
        inner
            .sections
            .get(&id)
            .cloned()
            .ok_or(PatternStoreError::SectionNotFound)
    }

    async fn update_section(
        &self,
        id: SectionId,
        update: SectionUpdate,
    ) -> Result<Section, PatternStoreError> {
        let mut inner = self.inner.write().await;
        let section = inner
            .sections
            .get_mut(&id)
            .ok_or(PatternStoreError::SectionNotFound)?;
        section.title = update.title;
        section.content = update.content;
        Ok(section.clone())
    }

    async fn delete_section(&self, id: SectionId) -> Result<(), PatternStoreError> {
        let mut inner = self.inner.write().await;
        inner
            .sections
            .remove(&id)
            .ok_or(PatternStoreError::SectionNotFound)?;
        Ok(())
    }

    async fn list_sections(&self, pattern_id: PatternId) -> Result<Vec<Section>, PatternStoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .sections
            .values()
            .filter(|section| section.pattern_id == pattern_id)
            .cloned()
            .collect())
    }
}
