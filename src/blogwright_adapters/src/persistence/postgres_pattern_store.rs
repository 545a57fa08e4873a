use blogwright_core::{
    NewPattern, NewSection, Pattern, PatternId, PatternStore, PatternStoreError, PatternUpdate,
    Section, SectionId, SectionUpdate, Title,
};
use sqlx::{FromRow, PgPool};

const TITLE_CONSTRAINT: &str = "patterns_title_key";
const PATTERN_FK_CONSTRAINT: &str = "sections_pattern_id_fkey";

#[derive(Clone)]
pub struct PostgresPatternStore {
    pool: PgPool,
}

impl PostgresPatternStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PatternRow {
    id: i64,
    title: String,
    content: Option<String>,
}

#[derive(FromRow)]
struct SectionRow {
    id: i64,
    pattern_id: i64,
    title: String,
    content: String,
}

fn parse_title(title: String) -> Result<Title, PatternStoreError> {
    Title::try_from(title).map_err(|e| PatternStoreError::UnexpectedError(e.to_string()))
}

impl TryFrom<PatternRow> for Pattern {
    type Error = PatternStoreError;

    fn try_from(row: PatternRow) -> Result<Self, Self::Error> {
        Ok(Pattern {
            id: PatternId(row.id),
            title: parse_title(row.title)?,
            content: row.content,
        })
    }
}

impl TryFrom<SectionRow> for Section {
    type Error = PatternStoreError;

    fn try_from(row: SectionRow) -> Result<Self, Self::Error> {
        Ok(Section {
            id: SectionId(row.id),
            pattern_id: PatternId(row.pattern_id),
            title: parse_title(row.title)?,
            content: row.content,
        })
    }
}

fn map_error(e: sqlx::Error) -> PatternStoreError {
    if let Some(db_err) = e.as_database_error() {
        match db_err.constraint() {
            Some(TITLE_CONSTRAINT) => return PatternStoreError::TitleTaken,
            Some(PATTERN_FK_CONSTRAINT) => return PatternStoreError::PatternNotFound,
            _ => {}
        }
    }
    PatternStoreError::UnexpectedError(e.to_string())
}

#[async_trait::async_trait]
impl PatternStore for PostgresPatternStore {
    #[tracing::instrument(name = "Adding pattern to PostgreSQL", skip_all)]
    async fn add_pattern(&self, pattern: NewPattern) -> Result<Pattern, PatternStoreError> {
        sqlx::query_as::<_, PatternRow>(
            "INSERT INTO patterns (title, content) VALUES ($1, $2) RETURNING id, title, content",
        )
        .bind(pattern.title.as_str())
        .bind(pattern.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_error)?
        .try_into()
    }

    #[tracing::instrument(name = "Retrieving pattern from PostgreSQL", skip(self))]
    async fn get_pattern(&self, id: PatternId) -> Result<Pattern, PatternStoreError> {
        sqlx::query_as::<_, PatternRow>("SELECT id, title, content FROM patterns WHERE id = $1")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?
            .ok_or(PatternStoreError::PatternNotFound)?
            .try_into()
    }

    #[tracing::instrument(name = "Updating pattern in PostgreSQL", skip(self, update))]
    async fn update_pattern(
        &self,
        id: PatternId,
        update: PatternUpdate,
    ) -> Result<Pattern, PatternStoreError> {
        sqlx::query_as::<_, PatternRow>(
            r#"
                UPDATE patterns SET title = $1, content = $2
                WHERE id = $3
                RETURNING id, title, content
            "#,
        )
        .bind(update.title.as_str())
        .bind(update.content)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_error)?
        .ok_or(PatternStoreError::PatternNotFound)?
        .try_into()
    }

    // sections go with it through ON DELETE CASCADE
    #[tracing::instrument(name = "Deleting pattern from PostgreSQL", skip(self))]
    async fn delete_pattern(&self, id: PatternId) -> Result<(), PatternStoreError> {
        let result = sqlx::query("DELETE FROM patterns WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(PatternStoreError::PatternNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Listing patterns from PostgreSQL", skip(self))]
    async fn list_patterns(&self) -> Result<Vec<Pattern>, PatternStoreError> {
        sqlx::query_as::<_, PatternRow>("SELECT id, title, content FROM patterns ORDER BY title")
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?
            .into_iter()
            .map(Pattern::try_from)
            .collect()
    }

    #[tracing::instrument(name = "Adding section to PostgreSQL", skip_all)]
    async fn add_section(&self, section: NewSection) -> Result<Section, PatternStoreError> {
        sqlx::query_as::<_, SectionRow>(
            r#"
                INSERT INTO sections (pattern_id, title, content)
                VALUES ($1, $2, $3)
                RETURNING id, pattern_id, title, content
            "#,
        )
        .bind(section.pattern_id.0)
        .bind(section.title.as_str())
        .bind(section.content)
        .fetch_one(&self.pool)
        .await
        .map_err(map_error)?
        .try_into()
    }

    #[tracing::instrument(name = "Retrieving section from PostgreSQL", skip(self))]
    async fn get_section(&self, id: SectionId) -> Result<Section, PatternStoreError> {
        sqlx::query_as::<_, SectionRow>(
            "SELECT id, pattern_id, title, content FROM sections WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_error)?
        .ok_or(PatternStoreError::SectionNotFound)?
        .try_into()
    }

    #[tracing::instrument(name = "Updating section in PostgreSQL", skip(self, update))]
    async fn update_section(
        &self,
        id: SectionId,
        update: SectionUpdate,
    ) -> Result<Section, PatternStoreError> {
        sqlx::query_as::<_, SectionRow>(
            r#"
                UPDATE sections SET title = $1, content = $2
                WHERE id = $3
                RETURNING id, pattern_id, title, content
            "#,
        )
        .bind(update.title.as_str())
        .bind(update.content)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_error)?
        .ok_or(PatternStoreError::SectionNotFound)?
        .try_into()
    }

    #[tracing::instrument(name = "Deleting section from PostgreSQL", skip(self))]
    async fn delete_section(&self, id: SectionId) -> Result<(), PatternStoreError> {
        let result = sqlx::query("DELETE FROM sections WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_error)?;

        if result.rows_affected() == 0 {
            return Err(PatternStoreError::SectionNotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Listing sections from PostgreSQL", skip(self))]
    async fn list_sections(&self, pattern_id: PatternId) -> Result<Vec<Section>, PatternStoreError> {
        sqlx::query_as::<_, SectionRow>(
            "SELECT id, pattern_id, title, content FROM sections WHERE pattern_id = $1 ORDER BY id",
        )
        .bind(pattern_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?
        .into_iter()
        .map(Section::try_from)
        .collect()
    }
}
