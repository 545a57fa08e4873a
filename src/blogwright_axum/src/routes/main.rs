use axum::{
    extract::{Query, State},
    response::Response,
};
use blogwright_application::ListPostsUseCase;

use super::PageQuery;
use crate::error::AppError;
use crate::middleware::PageContext;
use crate::state::AppState;
use crate::views::{AboutTemplate, HomeTemplate, PostListing, render};

/// Latest posts, newest first.
#[tracing::instrument(name = "Home", skip_all)]
pub async fn home(
    State(state): State<AppState>,
    ctx: PageContext,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let page = ListPostsUseCase::new(&*state.post_store, &*state.user_store)
        .execute(query.request())
        .await?;
    let listing = PostListing::from(&page);

    render(&HomeTemplate {
        nav: ctx.nav(),
        page_title: String::new(),
        posts: listing.posts,
        links: listing.links,
        page_base: "/?page=".to_owned(),
    })
}

pub async fn about(ctx: PageContext) -> Result<Response, AppError> {
    render(&AboutTemplate {
        nav: ctx.nav(),
        page_title: "About".to_owned(),
    })
}
