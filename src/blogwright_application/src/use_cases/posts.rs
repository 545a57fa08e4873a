use std::collections::HashMap;

use blogwright_core::{
    Identity, NewPost, Page, PageRequest, Post, PostId, PostStore, PostStoreError, PostUpdate,
    ResourceKind, User, UserId, UserStore, UserStoreError, Username, can_create, can_modify,
};

#[derive(Debug, thiserror::Error)]
pub enum PostError {
    #[error("Post not found")]
    NotFound,
    #[error("Not allowed to modify this post")]
    Forbidden,
    #[error("Post store error: {0}")]
    PostStoreError(PostStoreError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
}

impl From<PostStoreError> for PostError {
    fn from(e: PostStoreError) -> Self {
        match e {
            PostStoreError::PostNotFound => PostError::NotFound,
            other => PostError::PostStoreError(other),
        }
    }
}

/// A post together with the account that wrote it.
#[derive(Debug, Clone)]
pub struct AuthoredPost {
    pub post: Post,
    pub author: User,
}

async fn with_authors<U>(user_store: &U, page: Page<Post>) -> Result<Page<AuthoredPost>, PostError>
where
    U: UserStore + ?Sized,
{
    let mut authors: HashMap<UserId, User> = HashMap::new();
    for post in &page.items {
        if !authors.contains_key(&post.author_id) {
            let author = user_store.get_user(post.author_id).await?;
            authors.insert(author.id, author);
        }
    }

    let Page {
        items,
        page,
        per_page,
        total,
    } = page;
    let items = items
        .into_iter()
        .filter_map(|post| {
            let author = authors.get(&post.author_id)?.clone();
            Some(AuthoredPost { post, author })
        })
        .collect();

    Ok(Page {
        items,
        page,
        per_page,
        total,
    })
}

/// Create post use case - any signed in user may write a post
pub struct CreatePostUseCase<'a, P>
where
    P: PostStore + ?Sized,
{
    post_store: &'a P,
}

impl<'a, P> CreatePostUseCase<'a, P>
where
    P: PostStore + ?Sized,
{
    pub fn new(post_store: &'a P) -> Self {
        Self { post_store }
    }

    #[tracing::instrument(name = "CreatePostUseCase::execute", skip(self, update), fields(user_id = %actor.id))]
    pub async fn execute(&self, actor: &Identity, update: PostUpdate) -> Result<Post, PostError> {
        if !can_create(actor, ResourceKind::Post) {
            return Err(PostError::Forbidden);
        }

        let post = self
            .post_store
            .add_post(NewPost {
                title: update.title,
                content: update.content,
                author_id: actor.id,
            })
            .await?;

        Ok(post)
    }
}

/// Show post use case - loads a single post and its author
pub struct ShowPostUseCase<'a, P, U>
where
    P: PostStore + ?Sized,
    U: UserStore + ?Sized,
{
    post_store: &'a P,
    user_store: &'a U,
}

impl<'a, P, U> ShowPostUseCase<'a, P, U>
where
    P: PostStore + ?Sized,
    U: UserStore + ?Sized,
{
    pub fn new(post_store: &'a P, user_store: &'a U) -> Self {
        Self {
            post_store,
            user_store,
        }
    }

    #[tracing::instrument(name = "ShowPostUseCase::execute", skip(self))]
    pub async fn execute(&self, id: PostId) -> Result<AuthoredPost, PostError> {
        let post = self.post_store.get_post(id).await?;
        let author = self.user_store.get_user(post.author_id).await?;
        Ok(AuthoredPost { post, author })
    }
}

/// List posts use case - newest first, one page at a time
pub struct ListPostsUseCase<'a, P, U>
where
    P: PostStore + ?Sized,
    U: UserStore + ?Sized,
{
    post_store: &'a P,
    user_store: &'a U,
}

impl<'a, P, U> ListPostsUseCase<'a, P, U>
where
    P: PostStore + ?Sized,
    U: UserStore + ?Sized,
{
    pub fn new(post_store: &'a P, user_store: &'a U) -> Self {
        Self {
            post_store,
            user_store,
        }
    }

    /// Page 0, or an empty page past the first, is `NotFound`.
    #[tracing::instrument(name = "ListPostsUseCase::execute", skip(self))]
    pub async fn execute(&self, request: PageRequest) -> Result<Page<AuthoredPost>, PostError> {
        if request.page == 0 {
            return Err(PostError::NotFound);
        }
        let page = self.post_store.list_posts(request).await?;
        if page.is_out_of_range() {
            return Err(PostError::NotFound);
        }
        with_authors(self.user_store, page).await
    }

    /// Posts of one author. Unknown usernames are `NotFound`.
    #[tracing::instrument(name = "ListPostsUseCase::by_author", skip(self))]
    pub async fn by_author(
        &self,
        username: &Username,
        request: PageRequest,
    ) -> Result<(User, Page<AuthoredPost>), PostError> {
        if request.page == 0 {
            return Err(PostError::NotFound);
        }
        let author = match self.user_store.get_user_by_username(username).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Err(PostError::NotFound),
            Err(e) => return Err(e.into()),
        };

        let page = self
            .post_store
            .list_posts_by_author(author.id, request)
            .await?;
        if page.is_out_of_range() {
            return Err(PostError::NotFound);
        }

        let items = page.map(|post| AuthoredPost {
            post,
            author: author.clone(),
        });
        Ok((author, items))
    }
}

/// Edit post use case - only the author may change a post
pub struct EditPostUseCase<'a, P>
where
    P: PostStore + ?Sized,
{
    post_store: &'a P,
}

impl<'a, P> EditPostUseCase<'a, P>
where
    P: PostStore + ?Sized,
{
    pub fn new(post_store: &'a P) -> Self {
        Self { post_store }
    }

    /// Load a post for its edit form, enforcing the same guard as `execute`.
    #[tracing::instrument(name = "EditPostUseCase::load_for_edit", skip(self), fields(user_id = %actor.id))]
    pub async fn load_for_edit(&self, actor: &Identity, id: PostId) -> Result<Post, PostError> {
        let post = self.post_store.get_post(id).await?;
        if !can_modify(actor, &post) {
            tracing::warn!(post_id = %id.0, "Edit refused, not the author");
            return Err(PostError::Forbidden);
        }
        Ok(post)
    }

    #[tracing::instrument(name = "EditPostUseCase::execute", skip(self, update), fields(user_id = %actor.id))]
    pub async fn execute(
        &self,
        actor: &Identity,
        id: PostId,
        update: PostUpdate,
    ) -> Result<Post, PostError> {
        self.load_for_edit(actor, id).await?;
        Ok(self.post_store.update_post(id, update).await?)
    }
}

/// Delete post use case - only the author may delete a post
pub struct DeletePostUseCase<'a, P>
where
    P: PostStore + ?Sized,
{
    post_store: &'a P,
}

impl<'a, P> DeletePostUseCase<'a, P>
where
    P: PostStore + ?Sized,
{
    pub fn new(post_store: &'a P) -> Self {
        Self { post_store }
    }

    #[tracing::instrument(name = "DeletePostUseCase::execute", skip(self), fields(user_id = %actor.id))]
    pub async fn execute(&self, actor: &Identity, id: PostId) -> Result<(), PostError> {
        let post = self.post_store.get_post(id).await?;
        if !can_modify(actor, &post) {
            tracing::warn!(post_id = %id.0, "Delete refused, not the author");
            return Err(PostError::Forbidden);
        }
        self.post_store.delete_post(id).await?;
        Ok(())
    }
}
