use blogwright_core::{
    NewPost, Page, PageRequest, Post, PostId, PostStore, PostStoreError, PostUpdate, Title, UserId,
};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct PostgresPostStore {
    pool: PgPool,
}

impl PostgresPostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: i64,
    title: String,
    content: String,
    date_posted: DateTime<Utc>,
    user_id: i64,
}

impl TryFrom<PostRow> for Post {
    type Error = PostStoreError;

    fn try_from(row: PostRow) -> Result<Self, Self::Error> {
        Ok(Post {
            id: PostId(row.id),
            title: Title::try_from(row.title)
                .map_err(|e| PostStoreError::UnexpectedError(e.to_string()))?,
            content: row.content,
            date_posted: row.date_posted,
            author_id: UserId(row.user_id),
        })
    }
}

fn unexpected(e: sqlx::Error) -> PostStoreError {
    PostStoreError::UnexpectedError(e.to_string())
}

fn into_page(rows: Vec<PostRow>, request: PageRequest, total: i64) -> Result<Page<Post>, PostStoreError> {
    let items = rows
        .into_iter()
        .map(Post::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(items, request, total.max(0) as u64))
}

#[async_trait::async_trait]
impl PostStore for PostgresPostStore {
    #[tracing::instrument(name = "Adding post to PostgreSQL", skip_all)]
    async fn add_post(&self, post: NewPost) -> Result<Post, PostStoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
                INSERT INTO posts (title, content, user_id)
                VALUES ($1, $2, $3)
                RETURNING id, title, content, date_posted, user_id
            "#,
        )
        .bind(post.title.as_str())
        .bind(&post.content)
        .bind(post.author_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        row.try_into()
    }

    #[tracing::instrument(name = "Retrieving post from PostgreSQL", skip(self))]
    async fn get_post(&self, id: PostId) -> Result<Post, PostStoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            "SELECT id, title, content, date_posted, user_id FROM posts WHERE id = $1",
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        row.ok_or(PostStoreError::PostNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Updating post in PostgreSQL", skip(self, update))]
    async fn update_post(&self, id: PostId, update: PostUpdate) -> Result<Post, PostStoreError> {
        let row = sqlx::query_as::<_, PostRow>(
            r#"
                UPDATE posts SET title = $1, content = $2
                WHERE id = $3
                RETURNING id, title, content, date_posted, user_id
            "#,
        )
        .bind(update.title.as_str())
        .bind(&update.content)
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        row.ok_or(PostStoreError::PostNotFound)?.try_into()
    }

    #[tracing::instrument(name = "Deleting post from PostgreSQL", skip(self))]
    async fn delete_post(&self, id: PostId) -> Result<(), PostStoreError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(PostStoreError::PostNotFound);
        }

        Ok(())
    }

    #[tracing::instrument(name = "Listing posts from PostgreSQL", skip(self))]
    async fn list_posts(&self, request: PageRequest) -> Result<Page<Post>, PostStoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;

        let rows = sqlx::query_as::<_, PostRow>(
            r#"
                SELECT id, title, content, date_posted, user_id FROM posts
                ORDER BY date_posted DESC, id DESC
                LIMIT $1 OFFSET $2
            "#,
        )
        .bind(request.limit() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        into_page(rows, request, total)
    }

    #[tracing::instrument(name = "Listing author posts from PostgreSQL", skip(self))]
    async fn list_posts_by_author(
        &self,
        author_id: UserId,
        request: PageRequest,
    ) -> Result<Page<Post>, PostStoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(author_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;

        let rows = sqlx::query_as::<_, PostRow>(
            r#"
                SELECT id, title, content, date_posted, user_id FROM posts
                WHERE user_id = $1
                ORDER BY date_posted DESC, id DESC
                LIMIT $2 OFFSET $3
            "#,
        )
        .bind(author_id.0)
        .bind(request.limit() as i64)
        .bind(request.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        into_page(rows, request, total)
    }
}
