use std::collections::HashMap;
use std::sync::Arc;

use blogwright_core::{
    NewPost, Page, PageRequest, Post, PostId, PostStore, PostStoreError, PostUpdate, UserId,
};
use chrono::Utc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Posts {
    by_id: HashMap<PostId, Post>,
    last_id: i64,
}

impl Posts {
    fn newest_first(&self, author: Option<UserId>) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .by_id
            .values()
            .filter(|post| author.is_none_or(|author| post.author_id == author))
            .cloned()
            .collect();
        posts.sort_by(|a, b| {
            b.date_posted
                .cmp(&a.date_posted)
                .then_with(|| b.id.cmp(&a.id))
        });
        posts
    }
}

#[derive(Default, Clone)]
pub struct HashMapPostStore {
    posts: Arc<RwLock<Posts>>,
}

impl HashMapPostStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl PostStore for HashMapPostStore {
    async fn add_post(&self, post: NewPost) -> Result<Post, PostStoreError> {
        let mut posts = self.posts.write().await;
        posts.last_id += 1;
        let stored = Post {
            id: PostId(posts.last_id),
            title: post.title,
            content: post.content,
            date_posted: Utc::now(),
            author_id: post.author_id,
        };
        posts.by_id.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn get_post(&self, id: PostId) -> Result<Post, PostStoreError> {
        let posts = self.posts.read().await;
        posts
            .by_id
            .get(&id)
            .cloned()
            .ok_or(PostStoreError::PostNotFound)
    }

    async fn update_post(&self, id: PostId, update: PostUpdate) -> Result<Post, PostStoreError> {
        let mut posts = self.posts.write().await;
        let post = posts.by_id.get_mut(&id).ok_or(PostStoreError::PostNotFound)?;
        post.title = update.title;
        post.content = update.content;
        Ok(post.clone())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), PostStoreError> {
        let mut posts = self.posts.write().await;
        posts.by_id.remove(&id).ok_or(PostStoreError::PostNotFound)?;
        Ok(())
    }

    async fn list_posts(&self, request: PageRequest) -> Result<Page<Post>, PostStoreError> {
        let posts = self.posts.read().await;
        Ok(Page::from_ordered(posts.newest_first(None), request))
    }

    async fn list_posts_by_author(
        &self,
        author_id: UserId,
        request: PageRequest,
    ) -> Result<Page<Post>, PostStoreError> {
        let posts = self.posts.read().await;
        Ok(Page::from_ordered(posts.newest_first(Some(author_id)), request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blogwright_core::Title;

    fn new_post(title: &str, author: i64) -> NewPost {
        NewPost {
            title: Title::try_from(title.to_owned()).unwrap(),
            content: format!("{title} content"),
            author_id: UserId(author),
        }
    }

    #[tokio::test]
    async fn test_listing_is_newest_first_and_paginated() {
        let store = HashMapPostStore::new();
        for n in 1..=7 {
            store.add_post(new_post(&format!("post {n}"), 1)).await.unwrap();
        }

        let first = store.list_posts(PageRequest::new(1, 5)).await.unwrap();
        let titles: Vec<&str> = first.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["post 7", "post 6", "post 5", "post 4", "post 3"]);
        assert_eq!(first.total, 7);

        let second = store.list_posts(PageRequest::new(2, 5)).await.unwrap();
        assert_eq!(second.items.len(), 2);
    }

    #[tokio::test]
    async fn test_list_by_author_filters() {
        let store = HashMapPostStore::new();
        store.add_post(new_post("mine", 1)).await.unwrap();
        store.add_post(new_post("theirs", 2)).await.unwrap();

        let page = store
            .list_posts_by_author(UserId(2), PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title.as_str(), "theirs");
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_post() {
        let store = HashMapPostStore::new();
        let update = PostUpdate {
            title: Title::try_from("new".to_owned()).unwrap(),
            content: "new".to_owned(),
        };
        assert_eq!(
            store.update_post(PostId(9), update).await.unwrap_err(),
            PostStoreError::PostNotFound
        );
        assert_eq!(
            store.delete_post(PostId(9)).await.unwrap_err(),
            PostStoreError::PostNotFound
        );
    }
}
