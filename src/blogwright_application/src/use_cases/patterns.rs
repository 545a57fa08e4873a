use blogwright_core::{
    Identity, NewPattern, NewSection, Pattern, PatternId, PatternStore, PatternStoreError,
    PatternUpdate, ResourceKind, Section, SectionId, SectionUpdate, can_create, can_modify,
};

#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Pattern not found")]
    PatternNotFound,
    #[error("Section not found")]
    SectionNotFound,
    #[error("Only admins may change patterns")]
    Forbidden,
    #[error("A pattern with that title already exists.")]
    TitleTaken,
    #[error("Pattern store error: {0}")]
    PatternStoreError(PatternStoreError),
}

impl From<PatternStoreError> for PatternError {
    fn from(e: PatternStoreError) -> Self {
        match e {
            PatternStoreError::PatternNotFound => PatternError::PatternNotFound,
            PatternStoreError::SectionNotFound => PatternError::SectionNotFound,
            PatternStoreError::TitleTaken => PatternError::TitleTaken,
            other => PatternError::PatternStoreError(other),
        }
    }
}

/// A pattern page: the pattern and its sections in creation order.
#[derive(Debug, Clone)]
pub struct PatternWithSections {
    pub pattern: Pattern,
    pub sections: Vec<Section>,
}

/// Read-only pattern queries, open to everyone.
pub struct BrowsePatternsUseCase<'a, S>
where
    S: PatternStore + ?Sized,
{
    pattern_store: &'a S,
}

impl<'a, S> BrowsePatternsUseCase<'a, S>
where
    S: PatternStore + ?Sized,
{
    pub fn new(pattern_store: &'a S) -> Self {
        Self { pattern_store }
    }

    #[tracing::instrument(name = "BrowsePatternsUseCase::index", skip(self))]
    pub async fn index(&self) -> Result<Vec<Pattern>, PatternError> {
        Ok(self.pattern_store.list_patterns().await?)
    }

    #[tracing::instrument(name = "BrowsePatternsUseCase::pattern", skip(self))]
    pub async fn pattern(&self, id: PatternId) -> Result<PatternWithSections, PatternError> {
        let pattern = self.pattern_store.get_pattern(id).await?;
        let sections = self.pattern_store.list_sections(id).await?;
        Ok(PatternWithSections { pattern, sections })
    }

    /// A section together with the pattern it belongs to.
    #[tracing::instrument(name = "BrowsePatternsUseCase::section", skip(self))]
    pub async fn section(&self, id: SectionId) -> Result<(Pattern, Section), PatternError> {
        let section = self.pattern_store.get_section(id).await?;
        let pattern = self.pattern_store.get_pattern(section.pattern_id).await?;
        Ok((pattern, section))
    }
}

/// Create, edit and delete patterns. Admin only.
pub struct ManagePatternsUseCase<'a, S>
where
    S: PatternStore + ?Sized,
{
    pattern_store: &'a S,
}

impl<'a, S> ManagePatternsUseCase<'a, S>
where
    S: PatternStore + ?Sized,
{
    pub fn new(pattern_store: &'a S) -> Self {
        Self { pattern_store }
    }

    /// Checked before a create form is shown.
    pub fn authorize_create(&self, actor: &Identity) -> Result<(), PatternError> {
        if can_create(actor, ResourceKind::Pattern) {
            Ok(())
        } else {
            Err(PatternError::Forbidden)
        }
    }

    #[tracing::instrument(name = "ManagePatternsUseCase::create", skip(self, pattern), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Identity,
        pattern: NewPattern,
    ) -> Result<Pattern, PatternError> {
        self.authorize_create(actor)?;
        Ok(self.pattern_store.add_pattern(pattern).await?)
    }

    #[tracing::instrument(name = "ManagePatternsUseCase::load_for_edit", skip(self), fields(user_id = %actor.id))]
    pub async fn load_for_edit(
        &self,
        actor: &Identity,
        id: PatternId,
    ) -> Result<Pattern, PatternError> {
        let pattern = self.pattern_store.get_pattern(id).await?;
        if !can_modify(actor, &pattern) {
            return Err(PatternError::Forbidden);
        }
        Ok(pattern)
    }

    #[tracing::instrument(name = "ManagePatternsUseCase::update", skip(self, update), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Identity,
        id: PatternId,
        update: PatternUpdate,
    ) -> Result<Pattern, PatternError> {
        self.load_for_edit(actor, id).await?;
        Ok(self.pattern_store.update_pattern(id, update).await?)
    }

    /// Deleting a pattern also deletes its sections.
    #[tracing::instrument(name = "ManagePatternsUseCase::delete", skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Identity, id: PatternId) -> Result<(), PatternError> {
        self.load_for_edit(actor, id).await?;
        Ok(self.pattern_store.delete_pattern(id).await?)
    }
}

/// Create, edit and delete the sections of a pattern. Admin only.
pub struct ManageSectionsUseCase<'a, S>
where
    S: PatternStore + ?Sized,
{
    pattern_store: &'a S,
}

impl<'a, S> ManageSectionsUseCase<'a, S>
where
    S: PatternStore + ?Sized,
{
    pub fn new(pattern_store: &'a S) -> Self {
        Self { pattern_store }
    }

    /// Resolve the parent pattern of a new section, refusing non-admins.
    #[tracing::instrument(name = "ManageSectionsUseCase::authorize_create", skip(self), fields(user_id = %actor.id))]
    pub async fn authorize_create(
        &self,
        actor: &Identity,
        pattern_id: PatternId,
    ) -> Result<Pattern, PatternError> {
        let pattern = self.pattern_store.get_pattern(pattern_id).await?;
        if !can_create(actor, ResourceKind::Section) {
            return Err(PatternError::Forbidden);
        }
        Ok(pattern)
    }

    #[tracing::instrument(name = "ManageSectionsUseCase::create", skip(self, update), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &Identity,
        pattern_id: PatternId,
        update: SectionUpdate,
    ) -> Result<Section, PatternError> {
        self.authorize_create(actor, pattern_id).await?;
        let section = self
            .pattern_store
            .add_section(NewSection {
                pattern_id,
                title: update.title,
                content: update.content,
            })
            .await?;
        Ok(section)
    }

    #[tracing::instrument(name = "ManageSectionsUseCase::load_for_edit", skip(self), fields(user_id = %actor.id))]
    pub async fn load_for_edit(
        &self,
        actor: &Identity,
        id: SectionId,
    ) -> Result<Section, PatternError> {
        let section = self.pattern_store.get_section(id).await?;
        if !can_modify(actor, &section) {
            return Err(PatternError::Forbidden);
        }
        Ok(section)
    }

    #[tracing::instrument(name = "ManageSectionsUseCase::update", skip(self, update), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &Identity,
        id: SectionId,
        update: SectionUpdate,
    ) -> Result<Section, PatternError> {
        self.load_for_edit(actor, id).await?;
        Ok(self.pattern_store.update_section(id, update).await?)
    }

    /// Returns the deleted section so callers can redirect to its pattern.
    #[tracing::instrument(name = "ManageSectionsUseCase::delete", skip(self), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Identity, id: SectionId) -> Result<Section, PatternError> {
        let section = self.load_for_edit(actor, id).await?;
        self.pattern_store.delete_section(id).await?;
        Ok(section)
    }
}
